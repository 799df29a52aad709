//! Centralized error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while assembling [`crate::Settings`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration missing: '{0}' is not set in any configuration source")]
    Missing(String),

    #[error("Failed to read configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for '{key}': {value}")]
    InvalidValue { key: String, value: String },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Create a missing-key error.
    pub fn missing(key: impl Into<String>) -> Self {
        Self::Missing(key.into())
    }
}
