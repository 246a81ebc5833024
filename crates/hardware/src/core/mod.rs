//! Cache hierarchy building blocks.
//!
//! This module contains the structures of the simulated hierarchy. The
//! per-access protocol that ties them together lives in [`crate::sim`].

/// Cache levels, victim set and prefetcher.
pub mod units;

pub use self::units::cache::line::CacheLine;
pub use self::units::cache::policies::{AssociativeSet, LruSet, VictimSet};
pub use self::units::cache::CacheLevel;
pub use self::units::prefetch::{NextLinePrefetcher, PrefetchTarget};
