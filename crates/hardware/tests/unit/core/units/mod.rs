//! Tests for individual cache units.


/// The sequential prefetcher.
pub mod prefetch;
