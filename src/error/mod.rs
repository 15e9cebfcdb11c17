//! Error module for the Dactrie application.
//!
//! The trie itself reports [`DatrieError`]. This module wraps it together with
//! configuration, I/O and serialization failures into the single error type the
//! binary and the configuration layer propagate.

use thiserror::Error;

use crate::data_structures::double_array_trie::DatrieError;

pub mod config;

/// Result type alias used throughout the Dactrie application.
pub type DactrieResult<T> = Result<T, DactrieError>;

/// Core error enum for the Dactrie application.
#[derive(Error, Debug)]
pub enum DactrieError {
    /// Errors occurring during configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Errors reported by the trie.
    #[error("Trie error: {0}")]
    Trie(#[from] DatrieError),

    /// A malformed line in a word list.
    #[error("Word list line {line}: {message}")]
    WordList {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// IO errors that may occur during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/Deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Custom error with message for cases where specific error types are not defined.
    #[error("{0}")]
    Custom(String),
}

impl DactrieError {
    /// Creates a custom error from anything displayable.
    pub fn custom<S: Into<String>>(message: S) -> Self {
        Self::Custom(message.into())
    }

    /// Process exit code for this error: 2 for bad input, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::WordList { .. } => 2,
            Self::Trie(DatrieError::InvalidSymbol { .. }) => 2,
            _ => 1,
        }
    }
}
