//! Configuration system
//!
//! Settings types implement [`Config`] and are read from `.toml` or `.ron`
//! files, chosen by extension.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        Self::from_str_with_format(&contents, ConfigFormat::from_path(path)?)
    }

    /// Parse configuration text in the given format
    fn from_str_with_format(contents: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Load from `path` when it exists, otherwise fall back to defaults
    fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Supported on-disk formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML
    Toml,
    /// Rusty Object Notation
    Ron,
}

impl ConfigFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Tuning {
        speed: f32,
        count: u32,
    }

    impl Default for Tuning {
        fn default() -> Self {
            Self { speed: 12.0, count: 3 }
        }
    }

    impl Config for Tuning {}

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("game.toml")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("game.ron")).unwrap(), ConfigFormat::Ron);
        assert!(matches!(
            ConfigFormat::from_path(Path::new("game.json")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let tuning = Tuning::from_str_with_format("count = 7", ConfigFormat::Toml).unwrap();
        assert_eq!(tuning, Tuning { speed: 12.0, count: 7 });
    }

    #[test]
    fn test_ron_parse() {
        let tuning = Tuning::from_str_with_format("(speed: 2.5)", ConfigFormat::Ron).unwrap();
        assert_eq!(tuning.speed, 2.5);
        assert_eq!(tuning.count, 3);
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let tuning = Tuning::load_or_default("definitely/not/here.toml").unwrap();
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_malformed_text_is_parse_error() {
        let result = Tuning::from_str_with_format("speed = [", ConfigFormat::Toml);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_save_then_load_in_both_formats() {
        let tuning = Tuning { speed: 4.5, count: 9 };
        let dir = std::env::temp_dir().join(format!("hop_engine_config_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        for name in ["tuning.toml", "tuning.ron"] {
            let path = dir.join(name);
            tuning.save_to_file(&path).unwrap();
            assert_eq!(Tuning::load_from_file(&path).unwrap(), tuning);
        }

        let unsupported = tuning.save_to_file(dir.join("tuning.json"));
        assert!(matches!(unsupported, Err(ConfigError::UnsupportedFormat(_))));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
