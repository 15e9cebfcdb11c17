// Copyright (c) 2025 Dactrie Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Tail buffer: compressed storage for the suffixes of non-branching key chains.
//!
//! The buffer is a sequence of segments, each a key suffix followed by the stop
//! symbol. Deleted cells become tombstones (`None`). Position 0 is never used,
//! so a leaf can always store its segment start as a negative base.

use tracing::trace;

/// Suffix storage addressed by the negated base of leaf states.
#[derive(Debug, Clone)]
pub(crate) struct TailBuffer<S> {
    cells: Vec<Option<S>>,
    pos: usize,
    stop: S,
}

impl<S> TailBuffer<S>
where
    S: Copy + Eq,
{
    pub(crate) fn new(stop: S, capacity: usize) -> Self {
        let mut cells = Vec::with_capacity(capacity.max(1));
        cells.push(None);
        Self {
            cells,
            pos: 1,
            stop,
        }
    }

    /// First free position at the end of the buffer.
    pub(crate) fn cursor(&self) -> usize {
        self.pos
    }

    /// Number of cells, tombstones and the unused cell 0 included.
    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    /// Number of tombstoned cells below the cursor.
    pub(crate) fn tombstones(&self) -> usize {
        self.cells.iter().skip(1).filter(|cell| cell.is_none()).count()
    }

    fn segment(&self, pos: usize) -> impl Iterator<Item = S> + '_ {
        let stop = self.stop;
        self.cells
            .get(pos..)
            .unwrap_or(&[])
            .iter()
            .map_while(move |cell| match cell {
                Some(symbol) if *symbol != stop => Some(*symbol),
                _ => None,
            })
    }

    /// Symbols of the segment starting at `pos`, stop symbol excluded.
    pub(crate) fn read(&self, pos: usize) -> Vec<S> {
        self.segment(pos).collect()
    }

    /// Length of the segment starting at `pos`, stop symbol excluded.
    pub(crate) fn segment_len(&self, pos: usize) -> usize {
        self.segment(pos).count()
    }

    /// Whether the segment at `pos` equals `suffix` exactly.
    pub(crate) fn matches(&self, pos: usize, suffix: &[S]) -> bool {
        self.segment(pos).eq(suffix.iter().copied())
    }

    /// Whether the segment at `pos` is a prefix of `key`.
    pub(crate) fn is_prefix_of(&self, pos: usize, key: &[S]) -> bool {
        let len = self.segment_len(pos);
        len <= key.len() && self.matches(pos, &key[..len])
    }

    /// Stores `suffix` followed by the stop symbol and returns where it landed.
    ///
    /// At the cursor the segment is appended. Anywhere else it overwrites the
    /// segment already at `pos`, tombstoning the orphaned tail of the old one;
    /// if it does not fit there, the old segment is tombstoned and the suffix is
    /// appended instead.
    pub(crate) fn write(&mut self, pos: usize, suffix: &[S]) -> usize {
        if pos >= self.pos {
            return self.append(suffix);
        }

        let old_len = self.segment_len(pos);
        if suffix.len() > old_len {
            self.delete(pos, old_len + 1);
            return self.append(suffix);
        }

        for (cell, symbol) in self.cells[pos..].iter_mut().zip(suffix) {
            *cell = Some(*symbol);
        }
        let stop_at = pos + suffix.len();
        self.cells[stop_at] = Some(self.stop);
        for cell in &mut self.cells[stop_at + 1..=pos + old_len] {
            *cell = None;
        }
        trace!(pos, len = suffix.len(), "rewrote tail segment in place");
        pos
    }

    fn append(&mut self, suffix: &[S]) -> usize {
        let start = self.pos;
        self.cells.truncate(start);
        self.cells.extend(suffix.iter().copied().map(Some));
        self.cells.push(Some(self.stop));
        self.pos = self.cells.len();
        trace!(pos = start, len = suffix.len(), "appended tail segment");
        start
    }

    /// Tombstones `[pos, pos + length)`, retracting the cursor when the region reaches it.
    pub(crate) fn delete(&mut self, pos: usize, length: usize) {
        let end = (pos + length).min(self.cells.len());
        if pos >= end {
            return;
        }
        for cell in &mut self.cells[pos..end] {
            *cell = None;
        }
        if end >= self.pos {
            self.pos = pos;
            self.cells.truncate(pos);
        }
    }

    #[cfg(test)]
    pub(crate) fn cells(&self) -> &[Option<S>] {
        &self.cells
    }
}
