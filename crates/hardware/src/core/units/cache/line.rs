//! Cache line: the unit of storage moved between structures.
//!
//! A line stores only the full address it was filled for and its flags. Its
//! tag, index, byte offset and block address depend on the structure holding
//! it, so they are always derived through that structure's [`Geometry`].
//! "No line" is `Option::None`; there is no blank line value.

use crate::common::Geometry;

/// One block resident in (or in transit between) cache structures.
///
/// Lines are `Copy` for cheap hand-off, but each structure removes a line
/// before returning it as an eviction, so at most one container holds a
/// given block at a time. Derived `PartialEq` compares every field; set
/// membership compares tags only (see [`CacheLine::matches`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheLine {
    address: u64,
    dirty: bool,
    prefetched: bool,
    /// A demand hit has already been counted against this prefetch.
    credited: bool,
}

impl CacheLine {
    /// Creates a demand-filled line.
    ///
    /// # Arguments
    ///
    /// * `address` - Address of the access that caused the fill.
    /// * `dirty` - Whether the line differs from memory (a write fill).
    #[inline]
    pub const fn new(address: u64, dirty: bool) -> Self {
        Self {
            address,
            dirty,
            prefetched: false,
            credited: false,
        }
    }

    /// Creates a clean line brought in by the prefetcher.
    #[inline]
    pub const fn prefetched(address: u64) -> Self {
        Self {
            address,
            dirty: false,
            prefetched: true,
            credited: false,
        }
    }

    /// Full address the line was filled for.
    #[inline]
    pub const fn address(&self) -> u64 {
        self.address
    }

    /// Whether the line must be written back when evicted.
    #[inline]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the line was inserted by the prefetcher.
    #[inline]
    pub const fn is_prefetched(&self) -> bool {
        self.prefetched
    }

    /// Whether a demand hit has already been credited to this prefetch.
    #[inline]
    pub const fn is_credited(&self) -> bool {
        self.credited
    }

    /// Sets or clears the dirty flag.
    #[inline]
    pub const fn mark_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Sets or clears the prefetched flag.
    #[inline]
    pub const fn mark_prefetched(&mut self, prefetched: bool) {
        self.prefetched = prefetched;
    }

    /// Records that a demand hit used this prefetch.
    ///
    /// # Returns
    ///
    /// `true` only for the first demand hit on a prefetched line.
    #[inline]
    pub const fn credit_prefetch(&mut self) -> bool {
        let first = self.prefetched && !self.credited;
        self.credited |= self.prefetched;
        first
    }

    /// Returns a copy pointing at `block_address`, keeping the byte offset
    /// and every flag.
    #[inline]
    pub const fn with_block_address(self, geometry: &Geometry, block_address: u64) -> Self {
        Self {
            address: geometry.with_block_address(self.address, block_address),
            ..self
        }
    }

    /// Tag of the line under `geometry`.
    #[inline]
    pub const fn tag(&self, geometry: &Geometry) -> u64 {
        geometry.tag(self.address)
    }

    /// Set index of the line under `geometry`.
    #[inline]
    pub const fn index(&self, geometry: &Geometry) -> usize {
        geometry.index(self.address)
    }

    /// Byte offset of the line's address under `geometry`.
    #[inline]
    pub const fn byte_offset(&self, geometry: &Geometry) -> u64 {
        geometry.byte_offset(self.address)
    }

    /// Block address of the line under `geometry`.
    #[inline]
    pub const fn block_address(&self, geometry: &Geometry) -> u64 {
        geometry.block_address(self.address)
    }

    /// Set-membership equality: same tag under `geometry`.
    #[inline]
    pub const fn matches(&self, geometry: &Geometry, tag: u64) -> bool {
        self.tag(geometry) == tag
    }
}
