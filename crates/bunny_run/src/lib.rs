//! # Bunny Run
//!
//! Carrot-defence game on top of `hop_engine`. Bunnies hop across the
//! field, steal carrots and carry them to their holes; the player drives a
//! car through them. The round is lost when every carrot is gone and won
//! when every bunny has been stopped.
//!
//! [`Game`] owns the scene and runs one simulation tick per
//! [`Game::update`]. Rendering, audio and the HUD subscribe to the
//! [`events::GameEvent`]s each tick publishes.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod components;
pub mod config;
pub mod demo_scene;
pub mod error;
pub mod events;
pub mod game;
pub mod interaction;
pub mod play_area;
pub mod roles;
pub mod session;
pub mod spawner;


pub use config::GameConfig;
pub use error::{GameError, GameResult};
pub use game::Game;
