//! Cache Line Tests.
//!
//! Verifies line flags and the geometry-relative address fields.

use cachesim_core::common::{Geometry, LevelId};
use cachesim_core::core::CacheLine;

fn l1() -> Geometry {
    Geometry::new(LevelId::L1, 10, 5, 1).unwrap()
}

/// A demand fill carries the dirty flag it was given and is never prefetched.
#[test]
fn demand_line_flags() {
    let clean = CacheLine::new(0x40, false);
    assert!(!clean.is_dirty());
    assert!(!clean.is_prefetched());

    let dirty = CacheLine::new(0x40, true);
    assert!(dirty.is_dirty());
    assert_eq!(dirty.address(), 0x40);
}

/// Prefetched lines start clean.
#[test]
fn prefetched_line_is_clean() {
    let line = CacheLine::prefetched(0x1020);
    assert!(line.is_prefetched());
    assert!(!line.is_dirty());
}

/// Flags can be set and cleared in place.
#[test]
fn mark_flags() {
    let mut line = CacheLine::prefetched(0x80);
    line.mark_dirty(true);
    line.mark_prefetched(false);
    assert!(line.is_dirty());
    assert!(!line.is_prefetched());
    line.mark_dirty(false);
    assert!(!line.is_dirty());
}

/// Tag, index and offset are derived through the holding structure's geometry.
#[test]
fn fields_follow_geometry() {
    let g = l1();
    let line = CacheLine::new(0x1234, false);
    assert_eq!(line.tag(&g), 9);
    assert_eq!(line.index(&g), 1);
    assert_eq!(line.byte_offset(&g), 0x14);
    assert_eq!(line.block_address(&g), 0x91);
    assert!(line.matches(&g, 9));
    assert!(!line.matches(&g, 8));

    let victim = Geometry::fully_associative(LevelId::Victim, 4, 5).unwrap();
    assert_eq!(line.tag(&victim), 0x91);
    assert_eq!(line.index(&victim), 0);
}

/// Moving a line to another block keeps its byte offset and flags.
#[test]
fn with_block_address_keeps_offset_and_flags() {
    let g = l1();
    let mut line = CacheLine::new(0x1004, true);
    line.mark_prefetched(true);

    let moved = line.with_block_address(&g, 0x81);
    assert_eq!(moved.address(), 0x1024);
    assert!(moved.is_dirty());
    assert!(moved.is_prefetched());
}

/// A prefetched line credits exactly one demand hit; demand lines none.
#[test]
fn credit_prefetch_only_once() {
    let mut line = CacheLine::prefetched(0x200);
    assert!(!line.is_credited());
    assert!(line.credit_prefetch());
    assert!(line.is_credited());
    assert!(!line.credit_prefetch());
    assert!(line.is_prefetched());

    let mut demand = CacheLine::new(0x200, false);
    assert!(!demand.credit_prefetch());
    assert!(!demand.is_credited());
}

/// The credit survives a move, so a line cannot be credited twice by
/// passing through another structure.
#[test]
fn credit_survives_with_block_address() {
    let g = l1();
    let mut line = CacheLine::prefetched(0x1000);
    let _ = line.credit_prefetch();
    let moved = line.with_block_address(&g, 0x81);
    assert!(moved.is_credited());
}
