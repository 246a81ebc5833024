//! Functional units of the memory hierarchy.
//!
//! This module contains the storage structures and the prefetcher that the
//! orchestrator in [`crate::sim`] coordinates: the set-associative levels,
//! the victim cache and the sequential prefetcher.

/// Cache levels, cache lines and associative set policies (LRU, FIFO).
pub mod cache;

/// Hardware prefetcher filling L2 with sequential blocks.
pub mod prefetch;
