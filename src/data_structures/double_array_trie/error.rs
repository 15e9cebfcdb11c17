// Copyright (c) 2025 Dactrie Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error types for the double-array trie.

/// Errors that can occur in double-array trie operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum DatrieError {
    /// A key contained a symbol the arc domain does not know, or the stop symbol.
    #[error("Invalid symbol: {symbol}")]
    InvalidSymbol {
        /// Debug rendering of the offending symbol.
        symbol: String,
    },

    /// A code has no label in the arc domain.
    #[error("Invalid arc code: {0}")]
    InvalidCode(usize),

    /// An alphabet could not be built from the given symbols.
    #[error("Invalid alphabet: {0}")]
    InvalidAlphabet(String),

    /// The trie has an invalid configuration.
    #[error("Invalid trie configuration: {0}")]
    InvalidConfiguration(String),

    /// The state arena no longer satisfies the transition invariants.
    #[error("Corrupted state {state}: {reason}")]
    CorruptedState {
        /// Id of the state where the inconsistency was detected.
        state: usize,
        /// What was inconsistent.
        reason: String,
    },
}

impl DatrieError {
    /// Builds an [`DatrieError::InvalidSymbol`] from any debuggable symbol.
    pub fn invalid_symbol<S: std::fmt::Debug>(symbol: S) -> Self {
        Self::InvalidSymbol {
            symbol: format!("{symbol:?}"),
        }
    }
}

/// Result type for double-array trie operations.
pub type Result<T> = std::result::Result<T, DatrieError>;
