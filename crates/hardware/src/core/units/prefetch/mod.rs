//! Hardware prefetcher.
//!
//! This module contains the sequential prefetcher that runs after every L2
//! fill, and the narrow interface it uses to reach the level it fills. The
//! prefetcher never sees a level's sets directly: it can only ask whether a
//! block is already held and hand over a line to install.

/// Next-K-lines sequential prefetcher.
pub mod next_line;

pub use self::next_line::NextLinePrefetcher;

use crate::common::Geometry;
use crate::core::units::cache::CacheLevel;
use crate::core::units::cache::line::CacheLine;

/// Destination of prefetched lines.
///
/// Implemented by [`CacheLevel`] directly, and by wrappers that widen
/// [`PrefetchTarget::holds`] to cover neighbouring structures.
pub trait PrefetchTarget {
    /// Geometry used to derive block addresses and tags.
    fn geometry(&self) -> &Geometry;

    /// Returns `true` if the block containing `address` must not be prefetched
    /// because it is already held.
    fn holds(&self, address: u64) -> bool;

    /// Installs `line`, returning the line it displaced, if any.
    fn install(&mut self, line: CacheLine) -> Option<CacheLine>;
}

impl PrefetchTarget for CacheLevel {
    fn geometry(&self) -> &Geometry {
        Self::geometry(self)
    }

    fn holds(&self, address: u64) -> bool {
        self.contains(address)
    }

    fn install(&mut self, line: CacheLine) -> Option<CacheLine> {
        self.insert(line)
    }
}
