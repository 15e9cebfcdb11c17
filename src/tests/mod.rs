//! Test modules for Dactrie.
//!
//! This module contains the cross-component tests, including:
//! - Model-based property tests of the trie against a `BTreeMap`
//! - Parametrised edge cases
//! - Configuration loading from real files
//! - Error conversions and display
//!
//! Unit tests for a single file live next to the code they test.

pub mod config_tests;
pub mod datrie_tests;

// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{create_test_dir, key_strategy, op_strategy, Op, TestFixture};
