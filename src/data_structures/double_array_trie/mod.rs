// Copyright (c) 2025 Dactrie Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Double-array trie with tail compression.
//!
//! A compact, array-backed trie mapping keys (sequences of symbols from a
//! finite alphabet) to values. Transitions are resolved with two parallel
//! integer arrays, `base` and `check`, so each lookup step costs O(1)
//! regardless of alphabet size. Suffixes that no other key shares are moved
//! out of the arrays into a tail buffer.
//!
//! # Features
//!
//! - Pluggable symbol ⇄ code mapping through the [`ArcDomain`] trait.
//! - Exact lookup, insertion, replacement and deletion.
//! - Ordered iteration, prefix queries and longest-prefix matching.
//! - Free-list reuse of vacated states and in-place tail rewrites.
//! - [`SharedDatrie`] for sharing one trie across threads.
//!
//! # Example
//!
//! ```
//! use dactrie_lib::data_structures::double_array_trie::{Alphabet, Datrie, DatrieConfig};
//!
//! let alphabet = Alphabet::from_str_symbols('#', "abcdefghijklmnopqrstuvwxyz").unwrap();
//! let config = DatrieConfig::new().with_initial_states(256);
//! let mut trie = Datrie::with_config(alphabet, config);
//!
//! trie.insert_str("tea", 3).unwrap();
//! trie.insert_str("ten", 12).unwrap();
//! trie.insert_str("inn", 9).unwrap();
//!
//! assert_eq!(trie.get_str("ten"), Some(&12));
//! assert!(trie.has_prefix(&['t', 'e']));
//! assert_eq!(trie.longest_prefix(&['t', 'e', 'a', 's']), Some((3, &3)));
//!
//! let keys: Vec<String> = trie.iter().map(|(key, _)| key.into_iter().collect()).collect();
//! assert_eq!(keys, vec!["inn", "tea", "ten"]);
//! ```

mod arc_domain;
mod config;
mod error;
mod iter;
mod shared;
mod state;
mod tail;
mod trie;

pub use arc_domain::{Alphabet, ArcDomain};
pub use config::DatrieConfig;
pub use error::{DatrieError, Result};
pub use iter::Iter;
pub use shared::SharedDatrie;
pub use trie::{Datrie, DatrieStats};

#[cfg(test)]
pub use arc_domain::MockArcDomain;
