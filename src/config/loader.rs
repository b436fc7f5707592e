use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/featureflow/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("featureflow").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    /// - Returns an error if reading, parsing, or validation fails.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The feature has a name
    /// - News capacity is at least 1
    /// - The milestone is not negative
    /// - The saved-state key is not empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feature.name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "feature.name must not be empty".to_string(),
            });
        }

        if self.feature.news_capacity == 0 {
            return Err(ConfigError::ValidationError {
                message: "feature.news_capacity must be at least 1".to_string(),
            });
        }

        if self.counter.milestone < 0 {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "counter.milestone must not be negative (got {})",
                    self.counter.milestone
                ),
            });
        }

        if self.saved_state.key.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "saved_state.key must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
