use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found at {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid TOML syntax: {0}")]
    InvalidToml(#[from] toml::de::Error),

    #[error("Invalid trigger pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Trigger pattern '{pattern}' needs a capture group for the query text")]
    PatternWithoutCapture { pattern: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Unknown config key: {key}")]
    UnknownKey { key: String },

    #[error("Failed to get home directory")]
    NoHomeDirectory,

    #[error("Failed to serialize config: {0}")]
    SerializationError(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
