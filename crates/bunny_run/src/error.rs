//! Game error types

use hop_engine::config::ConfigError;
use thiserror::Error;

use crate::spawner::SpawnError;

/// Errors raised while setting up or configuring a round
#[derive(Error, Debug)]
pub enum GameError {
    /// A node the game needs by name is absent from the scene
    #[error("scene has no node named '{0}'")]
    MissingNode(String),

    /// Template selection or placement failed
    #[error("spawn failed: {0}")]
    Spawn(#[from] SpawnError),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for game operations
pub type GameResult<T> = Result<T, GameError>;
