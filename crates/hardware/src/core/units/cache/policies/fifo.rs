//! First-In, First-Out (FIFO) victim set.
//!
//! A single fully associative set that buffers lines evicted from L2. New
//! lines enter at the front; when the set is full the oldest line, at the
//! back, leaves. Lookups never reorder the set, and a hit removes the line
//! outright with [`VictimSet::take_block`] so it can be promoted back into L2.
//!
//! Being a single set, the victim cache keeps its own fully associative
//! geometry and offers address-based helpers on top of the tag-based trait.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `insert()`: O(1)
//!   - `take_block()`: O(V) where V is the number of entries
//! - **Hardware Equivalent:** CAM tag match plus a circular insertion pointer

use std::collections::VecDeque;

use super::{AssociativeSet, admit, remove};
use crate::common::Geometry;
use crate::core::units::cache::line::CacheLine;

/// The victim cache: one FIFO-ordered, fully associative set.
#[derive(Clone, Debug)]
pub struct VictimSet {
    geometry: Geometry,
    entries: usize,
    /// Index 0 is the newest line, last index the oldest.
    lines: VecDeque<CacheLine>,
}

impl VictimSet {
    /// Creates an empty victim set holding up to `entries` lines.
    ///
    /// # Arguments
    ///
    /// * `geometry` - Fully associative geometry (no index bits), see
    ///   [`Geometry::fully_associative`].
    /// * `entries` - Exact capacity, which need not be a power of two.
    pub fn new(geometry: Geometry, entries: usize) -> Self {
        debug_assert_eq!(geometry.index_bits(), 0, "victim set must be fully associative");
        Self {
            geometry,
            entries: entries.max(1),
            lines: VecDeque::with_capacity(entries.max(1)),
        }
    }

    /// Inserts `line` as the newest entry.
    ///
    /// # Returns
    ///
    /// The oldest entry if the set was full, otherwise `None`.
    pub fn insert(&mut self, line: CacheLine) -> Option<CacheLine> {
        debug_assert!(
            !self.holds(line.address()),
            "duplicate tag inserted into victim set"
        );
        admit(&mut self.lines, self.entries, line)
    }

    /// The entry the next insertion into a full set would evict.
    pub fn oldest(&self) -> Option<&CacheLine> {
        self.lines.back()
    }

    /// Fully associative geometry of the victim cache.
    #[inline]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Tag of `address` under the victim geometry (its block address).
    #[inline]
    pub const fn tag_of(&self, address: u64) -> u64 {
        self.geometry.tag(address)
    }

    /// Returns `true` if the block containing `address` is resident.
    pub fn holds(&self, address: u64) -> bool {
        self.contains(&self.geometry, self.tag_of(address))
    }

    /// Removes and returns the line holding the block of `address`.
    pub fn take_block(&mut self, address: u64) -> Option<CacheLine> {
        remove(&mut self.lines, &self.geometry, self.geometry.tag(address))
    }
}

impl AssociativeSet for VictimSet {
    fn capacity(&self) -> usize {
        self.entries
    }

    fn lines(&self) -> &VecDeque<CacheLine> {
        &self.lines
    }

    fn take(&mut self, geometry: &Geometry, tag: u64) -> Option<CacheLine> {
        remove(&mut self.lines, geometry, tag)
    }
}
