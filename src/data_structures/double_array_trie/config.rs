// Copyright (c) 2025 Dactrie Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Configuration for the double-array trie.

use serde::{Deserialize, Serialize};

use super::error::{DatrieError, Result};

/// Configuration for the double-array trie.
///
/// Capacities are hints only: both the state arena and the tail buffer grow on
/// demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatrieConfig {
    /// Number of state slots to reserve up front (reserved slot and root included).
    pub initial_states: usize,

    /// Number of tail cells to reserve up front.
    pub initial_tail: usize,

    /// Whether deleting a key returns childless, non-terminal branch states to
    /// the free list, walking up towards the root.
    pub reclaim_empty_branches: bool,
}

impl DatrieConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of state slots reserved up front.
    pub fn with_initial_states(mut self, initial_states: usize) -> Self {
        if initial_states < 2 {
            panic!("Initial states must be at least 2");
        }
        self.initial_states = initial_states;
        self
    }

    /// Sets the number of tail cells reserved up front.
    pub fn with_initial_tail(mut self, initial_tail: usize) -> Self {
        if initial_tail == 0 {
            panic!("Initial tail must be greater than 0");
        }
        self.initial_tail = initial_tail;
        self
    }

    /// Enables or disables reclamation of emptied branch states on delete.
    pub fn with_reclaim_empty_branches(mut self, reclaim: bool) -> Self {
        self.reclaim_empty_branches = reclaim;
        self
    }

    /// Checks values that may have come from a deserialized source.
    pub fn validate(&self) -> Result<()> {
        if self.initial_states < 2 {
            return Err(DatrieError::InvalidConfiguration(
                "initial_states must be at least 2".to_string(),
            ));
        }
        if self.initial_tail == 0 {
            return Err(DatrieError::InvalidConfiguration(
                "initial_tail must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for DatrieConfig {
    fn default() -> Self {
        Self {
            initial_states: 64,
            initial_tail: 256,
            reclaim_empty_branches: true,
        }
    }
}
