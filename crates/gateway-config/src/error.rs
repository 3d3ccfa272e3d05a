//! Configuration error types.

use std::path::PathBuf;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration error type.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// File extension is not a known format.
    #[error("Unsupported config format: {0} (expected yaml, yml, toml or json)")]
    UnsupportedFormat(String),

    /// File content could not be parsed.
    #[error("Failed to parse {format} config: {message}")]
    Parse {
        /// Format that was attempted.
        format: &'static str,
        /// Parser message.
        message: String,
    },

    /// An environment override has an unusable value.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Value as found.
        value: String,
    },

    /// Parsed configuration failed validation.
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

impl ConfigError {
    /// Create a parse error.
    pub fn parse(format: &'static str, message: impl std::fmt::Display) -> Self {
        Self::Parse {
            format,
            message: message.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for ConfigError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}
