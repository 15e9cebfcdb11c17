//! Data structures for the Dactrie library.
//!
//! This module contains the compact, array-backed structures the library is
//! built around. All implementations adhere to the project requirements:
//! - No unsafe code
//! - Amortized allocation through growable arenas
//! - Explicit error propagation instead of panics on bad input

pub mod double_array_trie;

// Re-export common data structures
pub use double_array_trie::{Alphabet, ArcDomain, Datrie, DatrieConfig, DatrieError, SharedDatrie};
