//! Least Recently Used (LRU) associative set.
//!
//! Lines are kept as a recency stack: the front is the Most Recently Used
//! line and the back is the Least Recently Used one. Every hit, read or
//! write, moves the line to the front; an insertion into a full set evicts
//! the back.
//!
//! A set holds only its way count and lines. Every lookup takes the owning
//! level's [`Geometry`], so a level with many sets stores it once.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `read()` / `write_back()`: O(W) where W is the number of ways
//!   - `insert_mru()`: O(1)
//! - **Space Complexity:** O(W) per set, only for resident lines
//! - **Hardware Equivalent:** Fully associative tag match plus a recency stack

use std::collections::VecDeque;

use super::{AssociativeSet, admit, remove};
use crate::common::Geometry;
use crate::core::units::cache::line::CacheLine;

/// One set of an LRU cache level.
#[derive(Clone, Debug)]
pub struct LruSet {
    ways: usize,
    /// Index 0 is MRU, last index is LRU.
    lines: VecDeque<CacheLine>,
}

impl LruSet {
    /// Creates an empty set with `ways` ways (at least one).
    pub fn new(ways: usize) -> Self {
        Self {
            ways: ways.max(1),
            lines: VecDeque::new(),
        }
    }

    /// Inserts `line` in the MRU position.
    ///
    /// The caller must ensure no line with the same tag is resident (look it
    /// up with [`LruSet::read`] or [`AssociativeSet::contains`] first).
    ///
    /// # Returns
    ///
    /// The evicted LRU line if the set was full, otherwise `None`.
    pub fn insert_mru(&mut self, geometry: &Geometry, line: CacheLine) -> Option<CacheLine> {
        debug_assert!(
            !self.contains(geometry, line.tag(geometry)),
            "duplicate tag inserted into LRU set"
        );
        admit(&mut self.lines, self.ways, line)
    }

    /// Looks up `tag`; on a hit promotes the line to MRU and returns a copy.
    ///
    /// A miss returns `None` and leaves the ordering untouched.
    pub fn read(&mut self, geometry: &Geometry, tag: u64) -> Option<CacheLine> {
        self.promote(geometry, tag, false)
    }

    /// Like [`LruSet::read`], but also marks the hit line dirty.
    pub fn write_back(&mut self, geometry: &Geometry, tag: u64) -> Option<CacheLine> {
        self.promote(geometry, tag, true)
    }

    /// Credits a demand hit to the resident line with `tag` if it was
    /// prefetched. The ordering is left untouched.
    ///
    /// # Returns
    ///
    /// `true` the first time a given prefetched line is credited.
    pub fn claim_prefetch(&mut self, geometry: &Geometry, tag: u64) -> bool {
        self.lines
            .iter_mut()
            .find(|line| line.matches(geometry, tag))
            .is_some_and(CacheLine::credit_prefetch)
    }

    /// The line that the next insertion into a full set would evict.
    pub fn lru(&self) -> Option<&CacheLine> {
        self.lines.back()
    }

    /// The most recently referenced line.
    pub fn mru(&self) -> Option<&CacheLine> {
        self.lines.front()
    }

    fn promote(&mut self, geometry: &Geometry, tag: u64, dirty: bool) -> Option<CacheLine> {
        let mut line = remove(&mut self.lines, geometry, tag)?;
        if dirty {
            line.mark_dirty(true);
        }
        self.lines.push_front(line);
        Some(line)
    }
}

impl AssociativeSet for LruSet {
    fn capacity(&self) -> usize {
        self.ways
    }

    fn lines(&self) -> &VecDeque<CacheLine> {
        &self.lines
    }

    fn take(&mut self, geometry: &Geometry, tag: u64) -> Option<CacheLine> {
        remove(&mut self.lines, geometry, tag)
    }
}
