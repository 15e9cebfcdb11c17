// Copyright (c) 2025 Dactrie Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! State store: the base/check arena of the double-array trie.
//!
//! States live in a growable arena indexed by state id. Id 0 is reserved and
//! id 1 is the root. For every occupied child `t` reached from `s` through
//! code `c`, `base(s) + c == t` and `check(t) == s`. A negative base marks a
//! compressed leaf whose suffix starts at `-base` in the tail buffer.
//!
//! Vacant ids form a doubly linked free list in ascending id order, bounded by
//! `empty_start` and `empty_end`. Every occupied state also keeps the sorted
//! codes of its outgoing arcs, so neighborhoods are enumerated without scanning
//! the arena.

use tracing::{debug, trace};

use super::error::{DatrieError, Result};

/// Id of the root state.
pub(crate) const ROOT: usize = 1;

/// An occupied state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct State<V> {
    /// Child offset when positive, negated tail position when negative.
    pub(crate) base: isize,
    /// Parent state id; 0 only for the root.
    pub(crate) check: usize,
    /// Payload of the key ending here. `Some` iff the state is an end state.
    pub(crate) value: Option<V>,
    /// Sorted codes of the arcs leaving this state.
    pub(crate) arcs: Vec<usize>,
}

impl<V> State<V> {
    fn new(check: usize) -> Self {
        Self {
            base: 0,
            check,
            value: None,
            arcs: Vec::new(),
        }
    }
}

/// One arena cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Slot<V> {
    /// Id 0, never handed out.
    Reserved,
    /// Vacant, threaded into the free list.
    Free {
        prev: Option<usize>,
        next: Option<usize>,
    },
    /// Holds a live state.
    Occupied(State<V>),
}

/// Outcome of [`StateStore::register_next_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Registration {
    /// The target was vacant and now belongs to the source state.
    Fresh,
    /// The target already belonged to the source state.
    AlreadyOwned,
    /// The target belongs to another parent.
    Collision,
}

/// The base/check arena together with its free list.
#[derive(Debug, Clone)]
pub(crate) struct StateStore<V> {
    slots: Vec<Slot<V>>,
    empty_start: Option<usize>,
    empty_end: Option<usize>,
    occupied: usize,
}

impl<V> StateStore<V> {
    /// Creates a store holding only the root, whose base is 1.
    pub(crate) fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity.max(ROOT + 1));
        slots.push(Slot::Reserved);
        slots.push(Slot::Occupied(State {
            base: 1,
            ..State::new(0)
        }));

        Self {
            slots,
            empty_start: None,
            empty_end: None,
            occupied: 1,
        }
    }

    /// Size of the arena, reserved slot included.
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied states, root included.
    pub(crate) fn occupied(&self) -> usize {
        self.occupied
    }

    /// Number of vacant slots threaded into the free list.
    pub(crate) fn free(&self) -> usize {
        self.slots.len() - 1 - self.occupied
    }

    pub(crate) fn state(&self, s: usize) -> Option<&State<V>> {
        match self.slots.get(s) {
            Some(Slot::Occupied(state)) => Some(state),
            _ => None,
        }
    }

    fn state_mut(&mut self, s: usize) -> Option<&mut State<V>> {
        match self.slots.get_mut(s) {
            Some(Slot::Occupied(state)) => Some(state),
            _ => None,
        }
    }

    /// Base of `s`; 0 for vacant or out-of-range ids.
    pub(crate) fn base(&self, s: usize) -> isize {
        self.state(s).map_or(0, |state| state.base)
    }

    /// Parent of `t`; 0 for vacant or out-of-range ids and for the root.
    pub(crate) fn check(&self, t: usize) -> usize {
        self.state(t).map_or(0, |state| state.check)
    }

    pub(crate) fn is_vacant(&self, t: usize) -> bool {
        matches!(self.slots.get(t), None | Some(Slot::Free { .. }))
    }

    pub(crate) fn is_end(&self, s: usize) -> bool {
        self.state(s).is_some_and(|state| state.value.is_some())
    }

    pub(crate) fn value(&self, s: usize) -> Option<&V> {
        self.state(s).and_then(|state| state.value.as_ref())
    }

    pub(crate) fn value_mut(&mut self, s: usize) -> Option<&mut V> {
        self.state_mut(s).and_then(|state| state.value.as_mut())
    }

    /// Replaces the payload of `s`, returning the previous one.
    pub(crate) fn set_value(&mut self, s: usize, value: Option<V>) -> Option<V> {
        match self.state_mut(s) {
            Some(state) => std::mem::replace(&mut state.value, value),
            None => None,
        }
    }

    /// Sorted codes of the arcs leaving `s`.
    pub(crate) fn arcs(&self, s: usize) -> &[usize] {
        match self.state(s) {
            Some(state) => &state.arcs,
            None => &[],
        }
    }

    /// Codes of all arcs leaving `s`, in ascending order.
    pub(crate) fn find_all_arcs_leaving(&self, s: usize) -> Vec<usize> {
        self.arcs(s).to_vec()
    }

    pub(crate) fn write_base(&mut self, s: usize, base: isize) -> Result<()> {
        match self.state_mut(s) {
            Some(state) => {
                state.base = base;
                Ok(())
            }
            None => Err(DatrieError::CorruptedState {
                state: s,
                reason: "writing the base of a vacant state".to_string(),
            }),
        }
    }

    /// Grows the arena so that `index` is addressable. New slots are vacant.
    fn ensure(&mut self, index: usize) {
        while self.slots.len() <= index {
            let id = self.slots.len();
            self.slots.push(Slot::Free {
                prev: self.empty_end,
                next: None,
            });
            match self.empty_end {
                Some(last) => self.set_free_next(last, Some(id)),
                None => self.empty_start = Some(id),
            }
            self.empty_end = Some(id);
        }
    }

    fn free_next(&self, i: usize) -> Option<usize> {
        match self.slots.get(i) {
            Some(Slot::Free { next, .. }) => *next,
            _ => None,
        }
    }

    fn set_free_next(&mut self, i: usize, value: Option<usize>) {
        if let Some(Slot::Free { next, .. }) = self.slots.get_mut(i) {
            *next = value;
        }
    }

    fn set_free_prev(&mut self, i: usize, value: Option<usize>) {
        if let Some(Slot::Free { prev, .. }) = self.slots.get_mut(i) {
            *prev = value;
        }
    }

    fn unlink(&mut self, t: usize) {
        let (prev, next) = match self.slots[t] {
            Slot::Free { prev, next } => (prev, next),
            _ => return,
        };
        match prev {
            Some(p) => self.set_free_next(p, next),
            None => self.empty_start = next,
        }
        match next {
            Some(n) => self.set_free_prev(n, prev),
            None => self.empty_end = prev,
        }
    }

    /// Takes vacant slot `t` out of the free list and makes it a child of `parent`.
    pub(crate) fn claim(&mut self, t: usize, parent: usize) -> Result<()> {
        self.ensure(t);
        if !self.is_vacant(t) {
            return Err(DatrieError::CorruptedState {
                state: t,
                reason: "claimed a slot that is not vacant".to_string(),
            });
        }
        self.unlink(t);
        self.slots[t] = Slot::Occupied(State::new(parent));
        self.occupied += 1;
        Ok(())
    }

    /// Vacates `t` and threads it back into the free list in index order.
    ///
    /// The parent's arc list is left untouched; see [`StateStore::detach`].
    pub(crate) fn release(&mut self, t: usize) -> Option<State<V>> {
        if t == ROOT || self.state(t).is_none() {
            return None;
        }

        let mut prev = None;
        let mut next = self.empty_start;
        while let Some(r) = next {
            if r > t {
                break;
            }
            prev = Some(r);
            next = self.free_next(r);
        }

        let old = std::mem::replace(&mut self.slots[t], Slot::Free { prev, next });
        match prev {
            Some(p) => self.set_free_next(p, Some(t)),
            None => self.empty_start = Some(t),
        }
        match next {
            Some(n) => self.set_free_prev(n, Some(t)),
            None => self.empty_end = Some(t),
        }
        self.occupied -= 1;

        match old {
            Slot::Occupied(state) => Some(state),
            _ => None,
        }
    }

    /// Removes `t` from its parent's arcs and vacates it.
    pub(crate) fn detach(&mut self, t: usize) -> Option<State<V>> {
        let parent = self.check(t);
        let parent_base = self.base(parent);
        if parent_base > 0 {
            if let Some(code) = t.checked_sub(parent_base.unsigned_abs()) {
                self.remove_arc(parent, code);
            }
        }
        self.release(t)
    }

    fn add_arc(&mut self, s: usize, code: usize) {
        if let Some(state) = self.state_mut(s) {
            if let Err(at) = state.arcs.binary_search(&code) {
                state.arcs.insert(at, code);
            }
        }
    }

    fn remove_arc(&mut self, s: usize, code: usize) {
        if let Some(state) = self.state_mut(s) {
            if let Ok(at) = state.arcs.binary_search(&code) {
                state.arcs.remove(at);
            }
        }
    }

    /// Attempts to add the transition `s --code--> base(s) + code`.
    ///
    /// Resolving a [`Registration::Collision`] is left to the caller.
    pub(crate) fn register_next_state(&mut self, s: usize, code: usize) -> Result<(usize, Registration)> {
        let base = self.base(s);
        if base <= 0 {
            return Err(DatrieError::CorruptedState {
                state: s,
                reason: format!("registering an arc on a state with base {base}"),
            });
        }

        let t = base.unsigned_abs() + code;
        if self.is_vacant(t) {
            self.claim(t, s)?;
            self.add_arc(s, code);
            trace!(from = s, to = t, code, "registered fresh state");
            Ok((t, Registration::Fresh))
        } else if self.check(t) == s {
            Ok((t, Registration::AlreadyOwned))
        } else {
            trace!(from = s, to = t, owner = self.check(t), "transition collision");
            Ok((t, Registration::Collision))
        }
    }

    /// Moves the state at `src` into vacant slot `dst` and repoints its children.
    ///
    /// The parent's arc codes are unchanged: callers rebase the parent first.
    pub(crate) fn relocate_state(&mut self, dst: usize, src: usize) -> Result<()> {
        if !self.is_vacant(dst) {
            return Err(DatrieError::CorruptedState {
                state: dst,
                reason: format!("relocation target for {src} is occupied"),
            });
        }
        let moved = self.release(src).ok_or_else(|| DatrieError::CorruptedState {
            state: src,
            reason: "relocating a vacant state".to_string(),
        })?;

        if moved.base > 0 {
            let base = moved.base.unsigned_abs();
            for &code in &moved.arcs {
                if let Some(child) = self.state_mut(base + code) {
                    child.check = dst;
                }
            }
        }

        self.claim(dst, moved.check)?;
        self.slots[dst] = Slot::Occupied(moved);
        debug!(from = src, to = dst, "relocated state");
        Ok(())
    }

    /// Smallest base `q >= 1` such that `q + code` is vacant for every code.
    ///
    /// Candidates are taken from the free list in ascending order, falling back
    /// to the first base that places every code past the end of the arena.
    pub(crate) fn xcheck(&self, codes: &[usize]) -> usize {
        let min = match codes.iter().min() {
            Some(&min) => min,
            None => return 1,
        };

        let mut cursor = self.empty_start;
        while let Some(free) = cursor {
            if free > min {
                let q = free - min;
                if codes.iter().all(|&code| self.is_vacant(q + code)) {
                    return q;
                }
            }
            cursor = self.free_next(free);
        }

        self.slots.len().saturating_sub(min).max(1)
    }

    /// Ids on the free list, in list order.
    #[cfg(test)]
    pub(crate) fn free_ids(&self) -> Vec<usize> {
        let mut ids = Vec::with_capacity(self.free());
        let mut cursor = self.empty_start;
        while let Some(id) = cursor {
            ids.push(id);
            cursor = self.free_next(id);
        }
        ids
    }

    /// Checks the transition, leaf and free-list invariants over the whole arena.
    pub(crate) fn validate(&self) -> Result<()> {
        let corrupted = |state: usize, reason: String| DatrieError::CorruptedState { state, reason };

        for (id, slot) in self.slots.iter().enumerate() {
            let state = match slot {
                Slot::Occupied(state) => state,
                _ => continue,
            };

            if state.base < 0 {
                if !state.arcs.is_empty() {
                    return Err(corrupted(id, "leaf state has outgoing arcs".to_string()));
                }
                if state.value.is_none() {
                    return Err(corrupted(id, "leaf state carries no value".to_string()));
                }
            }

            for &code in &state.arcs {
                let child = state.base.unsigned_abs() + code;
                if state.base <= 0 || self.check(child) != id || self.is_vacant(child) {
                    return Err(corrupted(id, format!("arc {code} does not reach a child")));
                }
            }

            if id != ROOT {
                let parent = state.check;
                let parent_base = self.base(parent);
                let owned = parent_base > 0
                    && id
                        .checked_sub(parent_base.unsigned_abs())
                        .is_some_and(|code| self.arcs(parent).binary_search(&code).is_ok());
                if !owned {
                    return Err(corrupted(id, format!("parent {parent} does not list this state")));
                }
            }
        }

        let mut prev = None;
        let mut count = 0;
        let mut cursor = self.empty_start;
        while let Some(id) = cursor {
            match self.slots.get(id) {
                Some(Slot::Free { prev: link, next }) => {
                    if *link != prev || prev.is_some_and(|p| p >= id) {
                        return Err(corrupted(id, "free list out of order".to_string()));
                    }
                    prev = Some(id);
                    cursor = *next;
                }
                _ => return Err(corrupted(id, "occupied slot on the free list".to_string())),
            }
            count += 1;
        }
        if prev != self.empty_end || count != self.free() {
            return Err(corrupted(0, "free list does not cover every vacant slot".to_string()));
        }

        Ok(())
    }
}
