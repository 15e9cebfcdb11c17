//! Dactrie Library
//!
//! A double-array trie with tail compression, together with the configuration,
//! error handling and word-list utilities the `dactrie` binary is built from.
//! The library is designed to be used by the binary crate, but can also be
//! used as a dependency by other projects.
//!
//! # Architecture
//!
//! - [`data_structures::double_array_trie`] holds the trie, independent of the rest.
//! - [`config`] layers file and environment settings over defaults.
//! - [`error`] wraps trie, configuration and I/O failures.
//! - [`utils`] turns word lists into tries.

// Re-export public modules
pub mod config;
pub mod data_structures;
pub mod error;
pub mod utils;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

/// Version information for Dactrie.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library initialization function.
///
/// Loads and validates the default configuration, falling back to built-in
/// defaults when no configuration file is present.
pub fn init() -> error::DactrieResult<config::AppConfig> {
    let config = config::load_default_config()?;
    tracing::debug!(version = VERSION, "dactrie initialized");
    Ok(config)
}
