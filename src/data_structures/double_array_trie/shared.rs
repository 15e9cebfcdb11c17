// Copyright (c) 2025 Dactrie Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! A cloneable, thread-safe handle around a [`Datrie`].

use std::sync::Arc;

use parking_lot::RwLock;

use super::arc_domain::ArcDomain;
use super::error::Result;
use super::trie::{Datrie, DatrieStats};

/// Shares one trie between threads.
///
/// Lookups take a read lock and may run concurrently; mutations take the
/// write lock. Clones refer to the same trie.
#[derive(Debug)]
pub struct SharedDatrie<D: ArcDomain, V> {
    inner: Arc<RwLock<Datrie<D, V>>>,
}

impl<D: ArcDomain, V> Clone for SharedDatrie<D, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: ArcDomain, V> From<Datrie<D, V>> for SharedDatrie<D, V> {
    fn from(trie: Datrie<D, V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(trie)),
        }
    }
}

impl<D: ArcDomain, V> SharedDatrie<D, V> {
    /// Creates an empty shared trie over `domain`.
    pub fn new(domain: D) -> Self {
        Datrie::new(domain).into()
    }

    /// See [`Datrie::insert`].
    pub fn insert(&self, key: &[D::Symbol], value: V) -> Result<bool> {
        self.inner.write().insert(key, value)
    }

    /// Returns a clone of the value stored under `key`.
    pub fn get(&self, key: &[D::Symbol]) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().get(key).cloned()
    }

    /// See [`Datrie::contains`].
    pub fn contains(&self, key: &[D::Symbol]) -> bool {
        self.inner.read().contains(key)
    }

    /// See [`Datrie::remove`].
    pub fn remove(&self, key: &[D::Symbol]) -> Option<V> {
        self.inner.write().remove(key)
    }

    /// See [`Datrie::len`].
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// See [`Datrie::is_empty`].
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// See [`Datrie::stats`].
    pub fn stats(&self) -> DatrieStats {
        self.inner.read().stats()
    }

    /// Runs `f` with shared access to the trie.
    pub fn read<R>(&self, f: impl FnOnce(&Datrie<D, V>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` with exclusive access to the trie.
    pub fn write<R>(&self, f: impl FnOnce(&mut Datrie<D, V>) -> R) -> R {
        f(&mut self.inner.write())
    }
}
