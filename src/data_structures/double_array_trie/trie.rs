// Copyright (c) 2025 Dactrie Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! The trie controller: lookup, insertion and deletion over the state store
//! and the tail buffer.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::arc_domain::ArcDomain;
use super::config::DatrieConfig;
use super::error::{DatrieError, Result};
use super::iter::Iter;
use super::state::{Registration, StateStore, ROOT};
use super::tail::TailBuffer;

/// Base given to a state where a key ends exactly on registration.
///
/// Such a state has no children yet; a later child registration resolves any
/// collision through the usual relocation path.
const EMPTY_BRANCH_BASE: isize = 1;

/// Tail position stored in a negative base.
fn tail_pos(base: isize) -> usize {
    base.unsigned_abs()
}

/// Occupancy figures for a trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatrieStats {
    /// Number of stored keys.
    pub keys: usize,
    /// Size of the state arena, reserved slot included.
    pub states: usize,
    /// Occupied states, root included.
    pub occupied_states: usize,
    /// Vacant states on the free list.
    pub free_states: usize,
    /// Size of the tail buffer in cells.
    pub tail_cells: usize,
    /// Tombstoned tail cells.
    pub tail_tombstones: usize,
}

/// A double-array trie mapping symbol sequences to values.
///
/// Transitions are resolved in O(1) per symbol through the base/check arena.
/// Non-branching suffixes are kept out of the arena in a tail buffer, so a
/// key that shares no prefix with any other costs a single state.
///
/// # Example
///
/// ```
/// use dactrie_lib::data_structures::double_array_trie::{Alphabet, Datrie};
///
/// let mut trie = Datrie::new(Alphabet::<char>::default_alphanumeric());
/// trie.insert_str("bachelor", 100).unwrap();
/// trie.insert_str("jar", 101).unwrap();
/// trie.insert_str("badge", 102).unwrap();
///
/// assert_eq!(trie.get_str("jar"), Some(&101));
/// assert_eq!(trie.get_str("bachelor"), Some(&100));
/// assert!(trie.contains_str("badge"));
/// assert!(!trie.contains_str("bad"));
/// ```
#[derive(Debug, Clone)]
pub struct Datrie<D: ArcDomain, V> {
    pub(super) states: StateStore<V>,
    pub(super) tail: TailBuffer<D::Symbol>,
    pub(super) domain: D,
    config: DatrieConfig,
    len: usize,
}

impl<D: ArcDomain, V> Datrie<D, V> {
    /// Creates an empty trie over `domain` with the default configuration.
    pub fn new(domain: D) -> Self {
        Self::with_config(domain, DatrieConfig::default())
    }

    /// Creates an empty trie over `domain` with the given configuration.
    pub fn with_config(domain: D, config: DatrieConfig) -> Self {
        Self {
            states: StateStore::new(config.initial_states),
            tail: TailBuffer::new(domain.stop_symbol(), config.initial_tail),
            domain,
            config,
            len: 0,
        }
    }

    /// The arc domain this trie encodes keys with.
    pub fn domain(&self) -> &D {
        &self.domain
    }

    /// The configuration this trie was built with.
    pub fn config(&self) -> &DatrieConfig {
        &self.config
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no key is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every key, keeping the domain and configuration.
    pub fn clear(&mut self) {
        self.states = StateStore::new(self.config.initial_states);
        self.tail = TailBuffer::new(self.domain.stop_symbol(), self.config.initial_tail);
        self.len = 0;
    }

    /// Occupancy figures for the arena and the tail buffer.
    pub fn stats(&self) -> DatrieStats {
        DatrieStats {
            keys: self.len,
            states: self.states.len(),
            occupied_states: self.states.occupied(),
            free_states: self.states.free(),
            tail_cells: self.tail.len(),
            tail_tombstones: self.tail.tombstones(),
        }
    }

    /// Checks the transition, leaf and free-list invariants.
    ///
    /// Returns [`DatrieError::CorruptedState`] naming the first offending state.
    pub fn validate(&self) -> Result<()> {
        self.states.validate()
    }

    /// Arc code of `symbol`, checked against the domain's declared size.
    ///
    /// Code 0 belongs to the stop symbol and never labels an arc.
    fn encode(&self, symbol: D::Symbol) -> Result<usize> {
        let code = self.domain.code(symbol)?;
        if code == 0 || code >= self.domain.size() {
            return Err(DatrieError::InvalidCode(code));
        }
        Ok(code)
    }

    /// State holding `key`, if the key is stored.
    fn find(&self, key: &[D::Symbol]) -> Option<usize> {
        let mut s = ROOT;
        for (idx, &symbol) in key.iter().enumerate() {
            let code = self.encode(symbol).ok()?;
            let base = self.states.base(s);
            if base <= 0 {
                return None;
            }

            let t = tail_pos(base) + code;
            if self.states.check(t) != s {
                return None;
            }

            let next_base = self.states.base(t);
            if next_base < 0 {
                return self
                    .tail
                    .matches(tail_pos(next_base), &key[idx + 1..])
                    .then_some(t);
            }
            s = t;
        }

        self.states.is_end(s).then_some(s)
    }

    /// Returns the value stored under `key`.
    ///
    /// Keys containing symbols outside the domain are simply not found.
    pub fn get(&self, key: &[D::Symbol]) -> Option<&V> {
        self.find(key).and_then(|t| self.states.value(t))
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &[D::Symbol]) -> Option<&mut V> {
        let t = self.find(key)?;
        self.states.value_mut(t)
    }

    /// Whether `key` is stored.
    pub fn contains(&self, key: &[D::Symbol]) -> bool {
        self.find(key).is_some()
    }

    /// Inserts `value` under `key`, replacing any previous value.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The key was not stored before.
    /// * `Ok(false)` - The key existed and its value was replaced.
    /// * `Err(DatrieError::InvalidSymbol)` - A symbol of `key` is not in the
    ///   domain. The trie is left untouched.
    /// * `Err(DatrieError::InvalidCode)` - The domain mapped a symbol to the
    ///   stop code or past its size. The trie is left untouched.
    pub fn insert(&mut self, key: &[D::Symbol], value: V) -> Result<bool> {
        let codes = key
            .iter()
            .map(|&symbol| self.encode(symbol))
            .collect::<Result<Vec<_>>>()?;

        let inserted = self.insert_or_replace(key, &codes, value)?;
        if inserted {
            self.len += 1;
        }
        Ok(inserted)
    }

    fn insert_or_replace(&mut self, key: &[D::Symbol], codes: &[usize], value: V) -> Result<bool> {
        let mut s = ROOT;
        for (idx, &code) in codes.iter().enumerate() {
            let (t, registration) = self.states.register_next_state(s, code)?;
            match registration {
                Registration::Fresh => {
                    self.attach(t, &key[idx + 1..], value, None)?;
                    return Ok(true);
                }
                Registration::AlreadyOwned if self.states.base(t) < 0 => {
                    return self.split_leaf(t, &key[idx + 1..], &codes[idx + 1..], value);
                }
                Registration::AlreadyOwned => s = t,
                Registration::Collision => {
                    let t = self.resolve_collision(&mut s, code)?;
                    self.attach(t, &key[idx + 1..], value, None)?;
                    return Ok(true);
                }
            }
        }

        trace!(state = s, "key ends on a branch state");
        Ok(self.states.set_value(s, Some(value)).is_none())
    }

    /// Makes the freshly registered `t` hold `value` with remaining suffix `rest`.
    ///
    /// `reuse` is the tail segment `t` took over from a split leaf, if any.
    fn attach(&mut self, t: usize, rest: &[D::Symbol], value: V, reuse: Option<usize>) -> Result<()> {
        if rest.is_empty() {
            if let Some(pos) = reuse {
                let len = self.tail.segment_len(pos);
                self.tail.delete(pos, len + 1);
            }
            self.states.write_base(t, EMPTY_BRANCH_BASE)?;
        } else {
            let at = reuse.unwrap_or_else(|| self.tail.cursor());
            let pos = self.tail.write(at, rest);
            self.states.write_base(t, -(pos as isize))?;
        }
        self.states.set_value(t, Some(value));
        Ok(())
    }

    /// Gives the childless state `t` a base and registers its single arc `code`.
    fn extend_chain(&mut self, t: usize, code: usize) -> Result<usize> {
        let q = self.states.xcheck(&[code]);
        self.states.write_base(t, q as isize)?;
        self.register_fresh(t, code)
    }

    fn register_fresh(&mut self, s: usize, code: usize) -> Result<usize> {
        match self.states.register_next_state(s, code)? {
            (t, Registration::Fresh) => Ok(t),
            (t, _) => Err(DatrieError::CorruptedState {
                state: t,
                reason: format!("slot for arc {code} of state {s} was not vacant"),
            }),
        }
    }

    /// Turns the leaf `t` into a branch chain holding both its stored suffix
    /// and `rest`, the unconsumed part of the key being inserted.
    fn split_leaf(
        &mut self,
        t: usize,
        rest: &[D::Symbol],
        rest_codes: &[usize],
        value: V,
    ) -> Result<bool> {
        let pos = tail_pos(self.states.base(t));
        let leaf = self.tail.read(pos);

        if leaf.as_slice() == rest {
            self.states.set_value(t, Some(value));
            return Ok(false);
        }

        let shared = leaf
            .iter()
            .zip(rest)
            .take_while(|(stored, incoming)| stored == incoming)
            .count();
        debug!(state = t, shared, stored = leaf.len(), incoming = rest.len(), "splitting tail leaf");

        let old_value = self
            .states
            .set_value(t, None)
            .ok_or_else(|| DatrieError::CorruptedState {
                state: t,
                reason: "leaf state carries no value".to_string(),
            })?;
        let mut t = t;
        for &code in &rest_codes[..shared] {
            t = self.extend_chain(t, code)?;
        }

        match (leaf.get(shared), rest.get(shared)) {
            (Some(&stored), Some(_)) => {
                let stored_code = self.encode(stored)?;
                let incoming_code = rest_codes[shared];
                let q = self.states.xcheck(&[stored_code, incoming_code]);
                self.states.write_base(t, q as isize)?;

                let t1 = self.register_fresh(t, stored_code)?;
                self.attach(t1, &leaf[shared + 1..], old_value, Some(pos))?;
                let t2 = self.register_fresh(t, incoming_code)?;
                self.attach(t2, &rest[shared + 1..], value, None)?;
            }
            (None, Some(_)) => {
                // The stored key ends where the chain ends.
                self.tail.delete(pos, leaf.len() + 1);
                self.states.set_value(t, Some(old_value));
                let t2 = self.extend_chain(t, rest_codes[shared])?;
                self.attach(t2, &rest[shared + 1..], value, None)?;
            }
            (Some(&stored), None) => {
                // The new key ends where the chain ends.
                self.states.set_value(t, Some(value));
                let t1 = self.extend_chain(t, self.encode(stored)?)?;
                self.attach(t1, &leaf[shared + 1..], old_value, Some(pos))?;
            }
            (None, None) => {
                return Err(DatrieError::CorruptedState {
                    state: t,
                    reason: "split of identical suffixes".to_string(),
                });
            }
        }

        Ok(true)
    }

    /// Frees the slot `base(s) + code` for `s` by relocating whichever of the
    /// two competing neighborhoods is smaller, then registers the arc.
    ///
    /// `s` is updated if it was itself relocated.
    fn resolve_collision(&mut self, s: &mut usize, code: usize) -> Result<usize> {
        let t = tail_pos(self.states.base(*s)) + code;
        let owner = self.states.check(t);
        let own_arcs = self.states.find_all_arcs_leaving(*s);
        let owner_arcs = self.states.find_all_arcs_leaving(owner);

        if own_arcs.len() + 1 < owner_arcs.len() {
            debug!(state = *s, owner, arcs = own_arcs.len(), "collision: moving own arcs");
            let mut wanted = own_arcs.clone();
            wanted.push(code);
            self.move_neighborhood(*s, &own_arcs, &wanted)?;
        } else {
            debug!(state = *s, owner, arcs = owner_arcs.len(), "collision: moving owner's arcs");
            let moves = self.move_neighborhood(owner, &owner_arcs, &owner_arcs)?;
            if let Some(&(_, dst)) = moves.iter().find(|(src, _)| *src == *s) {
                *s = dst;
            }
        }

        self.register_fresh(*s, code)
    }

    /// Rebases `parent` so that every code in `wanted` lands on a vacant slot,
    /// then relocates the children reached through `arcs`.
    ///
    /// Returns the `(old, new)` id of every relocated child.
    fn move_neighborhood(
        &mut self,
        parent: usize,
        arcs: &[usize],
        wanted: &[usize],
    ) -> Result<Vec<(usize, usize)>> {
        let old_base = tail_pos(self.states.base(parent));
        let q = self.states.xcheck(wanted);
        self.states.write_base(parent, q as isize)?;

        let mut moves = Vec::with_capacity(arcs.len());
        for &code in arcs {
            let (src, dst) = (old_base + code, q + code);
            self.states.relocate_state(dst, src)?;
            moves.push((src, dst));
        }
        Ok(moves)
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &[D::Symbol]) -> Option<V> {
        let t = self.find(key)?;
        let base = self.states.base(t);

        let value = if base < 0 {
            let parent = self.states.check(t);
            let state = self.states.detach(t)?;

            let pos = tail_pos(base);
            let len = self.tail.segment_len(pos);
            self.tail.delete(pos, len + 1);
            self.reclaim_from(parent);
            state.value
        } else {
            let value = self.states.set_value(t, None);
            self.reclaim_from(t);
            value
        };

        if value.is_some() {
            self.len -= 1;
        }
        value
    }

    /// Removes `key`. Returns whether it was stored.
    pub fn delete(&mut self, key: &[D::Symbol]) -> bool {
        self.remove(key).is_some()
    }

    /// Returns childless, non-terminal branch states to the free list,
    /// starting at `s` and walking towards the root.
    fn reclaim_from(&mut self, mut s: usize) {
        if !self.config.reclaim_empty_branches {
            return;
        }
        while s != ROOT {
            let reclaimable = self
                .states
                .state(s)
                .is_some_and(|state| state.base >= 0 && state.arcs.is_empty() && state.value.is_none());
            if !reclaimable {
                break;
            }
            let parent = self.states.check(s);
            self.states.detach(s);
            trace!(state = s, "reclaimed empty branch");
            s = parent;
        }
    }

    /// Iterates over every `(key, value)` pair in code order.
    pub fn iter(&self) -> Iter<'_, D, V> {
        Iter::new(self, Some((ROOT, Vec::new())))
    }

    /// Iterates over the pairs whose key starts with `prefix`, in code order.
    pub fn iter_prefix(&self, prefix: &[D::Symbol]) -> Iter<'_, D, V> {
        Iter::new(self, self.prefix_start(prefix))
    }

    /// Whether any stored key starts with `prefix`.
    pub fn has_prefix(&self, prefix: &[D::Symbol]) -> bool {
        self.iter_prefix(prefix).next().is_some()
    }

    /// The state below which every key starting with `prefix` lives, with the
    /// key symbols leading to it.
    fn prefix_start(&self, prefix: &[D::Symbol]) -> Option<(usize, Vec<D::Symbol>)> {
        let mut s = ROOT;
        for (idx, &symbol) in prefix.iter().enumerate() {
            let code = self.encode(symbol).ok()?;
            let base = self.states.base(s);
            if base <= 0 {
                return None;
            }

            let t = tail_pos(base) + code;
            if self.states.check(t) != s {
                return None;
            }

            let next_base = self.states.base(t);
            if next_base < 0 {
                let remaining = &prefix[idx + 1..];
                let stored = self.tail.read(tail_pos(next_base));
                return stored
                    .starts_with(remaining)
                    .then(|| (t, prefix[..=idx].to_vec()));
            }
            s = t;
        }
        Some((s, prefix.to_vec()))
    }

    /// Longest stored key that is a prefix of `key`.
    ///
    /// Returns its length in symbols and its value.
    pub fn longest_prefix(&self, key: &[D::Symbol]) -> Option<(usize, &V)> {
        let mut best = self.states.value(ROOT).map(|value| (0, value));
        let mut s = ROOT;

        for (idx, &symbol) in key.iter().enumerate() {
            let code = match self.encode(symbol) {
                Ok(code) => code,
                Err(_) => break,
            };
            let base = self.states.base(s);
            if base <= 0 {
                break;
            }

            let t = tail_pos(base) + code;
            if self.states.check(t) != s {
                break;
            }

            let next_base = self.states.base(t);
            if next_base < 0 {
                let pos = tail_pos(next_base);
                if self.tail.is_prefix_of(pos, &key[idx + 1..]) {
                    let len = idx + 1 + self.tail.segment_len(pos);
                    best = self.states.value(t).map(|value| (len, value)).or(best);
                }
                break;
            }

            s = t;
            if let Some(value) = self.states.value(s) {
                best = Some((idx + 1, value));
            }
        }

        best
    }
}

impl<D, V> Datrie<D, V>
where
    D: ArcDomain<Symbol = char>,
{
    /// [`Datrie::insert`] for string keys.
    pub fn insert_str(&mut self, key: &str, value: V) -> Result<bool> {
        let key: Vec<char> = key.chars().collect();
        self.insert(&key, value)
    }

    /// [`Datrie::get`] for string keys.
    pub fn get_str(&self, key: &str) -> Option<&V> {
        let key: Vec<char> = key.chars().collect();
        self.get(&key)
    }

    /// [`Datrie::contains`] for string keys.
    pub fn contains_str(&self, key: &str) -> bool {
        let key: Vec<char> = key.chars().collect();
        self.contains(&key)
    }

    /// [`Datrie::delete`] for string keys.
    pub fn delete_str(&mut self, key: &str) -> bool {
        let key: Vec<char> = key.chars().collect();
        self.delete(&key)
    }
}

impl<'a, D: ArcDomain, V> IntoIterator for &'a Datrie<D, V> {
    type Item = (Vec<D::Symbol>, &'a V);
    type IntoIter = Iter<'a, D, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
