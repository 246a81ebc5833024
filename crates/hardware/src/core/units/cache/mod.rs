//! Set-Associative Cache Levels.
//!
//! This module implements one level of the hierarchy (L1 or L2) as an array
//! of LRU sets indexed by the decoded index bits, plus the line type and the
//! replacement policies shared with the victim cache. Every operation on a
//! level decodes the address once and then acts on exactly one set; sets
//! never interact.

/// Cache line type.
pub mod line;

/// Associative set policies (LRU, FIFO).
pub mod policies;

use tracing::trace;

use self::line::CacheLine;
use self::policies::{AssociativeSet, LruSet};
use crate::common::{AccessType, Geometry, LevelId};

/// One set-associative cache level with LRU replacement.
#[derive(Clone, Debug)]
pub struct CacheLevel {
    id: LevelId,
    geometry: Geometry,
    sets: Vec<LruSet>,
}

impl CacheLevel {
    /// Allocates `geometry.num_sets()` empty sets.
    ///
    /// # Arguments
    ///
    /// * `id` - Which level this is, for logging.
    /// * `geometry` - Validated geometry of the level.
    pub fn new(id: LevelId, geometry: Geometry) -> Self {
        let sets = vec![LruSet::new(geometry.ways()); geometry.num_sets()];
        Self { id, geometry, sets }
    }

    /// Which level this is.
    pub const fn id(&self) -> LevelId {
        self.id
    }

    /// Geometry of the level.
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// All sets, by index.
    pub fn sets(&self) -> &[LruSet] {
        &self.sets
    }

    /// Decodes `address` into `(set_index, tag)` for this level.
    ///
    /// The index is masked to `index_bits`, so it is always a valid position
    /// in `sets`.
    #[inline]
    pub const fn locate(&self, address: u64) -> (usize, u64) {
        (self.geometry.index(address), self.geometry.tag(address))
    }

    /// The set `address` maps to.
    pub fn set_for(&self, address: u64) -> &LruSet {
        &self.sets[self.geometry.index(address)]
    }

    /// Read lookup: on a hit the line becomes MRU and a copy is returned.
    pub fn read(&mut self, address: u64) -> Option<CacheLine> {
        let (index, tag) = self.locate(address);
        self.sets[index].read(&self.geometry, tag)
    }

    /// Write lookup: on a hit the line is marked dirty and becomes MRU.
    pub fn write_back(&mut self, address: u64) -> Option<CacheLine> {
        let (index, tag) = self.locate(address);
        self.sets[index].write_back(&self.geometry, tag)
    }

    /// Dispatches to [`CacheLevel::read`] or [`CacheLevel::write_back`].
    pub fn access(&mut self, address: u64, access: AccessType) -> Option<CacheLine> {
        match access {
            AccessType::Read => self.read(address),
            AccessType::Write => self.write_back(address),
        }
    }

    /// Inserts `line` as MRU of the set its address maps to.
    ///
    /// # Returns
    ///
    /// The LRU line of that set if it had to be evicted.
    pub fn insert(&mut self, line: CacheLine) -> Option<CacheLine> {
        let index = line.index(&self.geometry);
        let evicted = self.sets[index].insert_mru(&self.geometry, line);
        if let Some(victim) = &evicted {
            trace!(
                level = %self.id,
                set = index,
                dirty = victim.is_dirty(),
                "evict {:#x}",
                victim.address()
            );
        }
        evicted
    }

    /// Returns `true` if the block containing `address` is resident.
    pub fn contains(&self, address: u64) -> bool {
        let (index, tag) = self.locate(address);
        self.sets[index].contains(&self.geometry, tag)
    }

    /// Copy of the resident line for `address`, without touching recency.
    pub fn find(&self, address: u64) -> Option<CacheLine> {
        let (index, tag) = self.locate(address);
        self.sets[index].find(&self.geometry, tag)
    }

    /// Removes and returns the resident line for `address`.
    pub fn take(&mut self, address: u64) -> Option<CacheLine> {
        let (index, tag) = self.locate(address);
        self.sets[index].take(&self.geometry, tag)
    }

    /// Credits a demand hit on the resident line for `address` to the
    /// prefetcher, if that line was prefetched and not yet credited.
    ///
    /// # Returns
    ///
    /// `true` when this call is the line's first credited hit.
    pub fn claim_prefetch(&mut self, address: u64) -> bool {
        let (index, tag) = self.locate(address);
        self.sets[index].claim_prefetch(&self.geometry, tag)
    }

    /// Number of resident lines across all sets.
    pub fn resident_lines(&self) -> usize {
        self.sets.iter().map(AssociativeSet::len).sum()
    }

    /// Number of resident dirty lines across all sets.
    pub fn dirty_count(&self) -> usize {
        self.sets.iter().map(AssociativeSet::dirty_count).sum()
    }
}
