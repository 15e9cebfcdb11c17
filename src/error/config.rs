//! Configuration error module.
//!
//! Errors raised while locating, parsing or validating the application
//! configuration.

use std::path::PathBuf;
use thiserror::Error;

use crate::data_structures::double_array_trie::DatrieError;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error when the configuration file is missing.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// Error when the configuration file has an extension no parser handles.
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Error when parsing the configuration file or environment.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Error when validating the configuration.
    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    /// Error when a configuration value is out of the valid range.
    #[error("Configuration value {key} is out of valid range: {message}")]
    ValueOutOfRange {
        /// The key of the invalid value
        key: String,
        /// Description of the valid range
        message: String,
    },
}

impl From<DatrieError> for ConfigError {
    fn from(err: DatrieError) -> Self {
        match err {
            DatrieError::InvalidConfiguration(message) => ConfigError::ValueOutOfRange {
                key: "trie".to_string(),
                message,
            },
            other => ConfigError::ValidationError(other.to_string()),
        }
    }
}
