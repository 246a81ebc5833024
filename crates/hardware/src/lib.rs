//! Trace-driven cache hierarchy simulator library.
//!
//! This crate implements a functional (hit/miss/eviction, not timing) model of:
//! 1. **Caches:** Two set-associative LRU levels (L1, L2) sharing one block size.
//! 2. **Victim cache:** A small fully associative FIFO buffer catching clean L2 evictions.
//! 3. **Prefetcher:** A sequential prefetcher that fills L2 after every L2 fill.
//! 4. **Simulation:** The per-access protocol, trace loading, configuration and statistics.

/// Common types and constants (address geometry, access kinds, errors).
pub mod common;
/// Simulator configuration (defaults, validation, JSON loading).
pub mod config;
/// Cache hierarchy structures (levels, lines, sets, prefetcher).
pub mod core;
/// Access protocol and trace ingestion.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `SimConfig::default()` or deserialize from JSON.
pub use crate::config::SimConfig;
/// Main simulator type; holds L1, L2, the victim cache and the prefetcher.
pub use crate::sim::Simulator;
/// Statistics sink lent to every access.
pub use crate::stats::CacheStats;
