//! Global Simulator Constants.
//!
//! This module defines the fixed limits shared by the decoder, the
//! configuration validator and the cache structures:
//! 1. **Address Constants:** Width of a simulated address.
//! 2. **Allocation Limits:** Upper bounds that keep a configuration allocatable.

/// Width of a simulated address in bits.
pub const ADDR_WIDTH: u32 = 64;

/// Largest index-field width a cache level may use.
///
/// Every set of a level is allocated up front, so `2^24` sets (16 Mi) is the
/// ceiling for a single level.
pub const MAX_INDEX_BITS: u32 = 24;

/// Largest number of entries the victim cache may hold.
pub const MAX_VICTIM_ENTRIES: u32 = 1 << 16;
