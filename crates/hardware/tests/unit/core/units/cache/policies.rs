//! Associative Set Policy Tests.
//!
//! Verifies the two replacement orders used by the hierarchy:
//! - `LruSet`: recency order, every hit promotes, insertion evicts the LRU line.
//! - `VictimSet`: insertion order, lookups never reorder, insertion evicts the oldest line.
//!
//! Both are checked against a plain `Vec` model under random operation
//! sequences, along with the capacity bound.

use std::collections::VecDeque;
use std::mem::size_of;

use cachesim_core::common::{Geometry, LevelId};
use cachesim_core::core::{AssociativeSet, CacheLine, LruSet, VictimSet};
use proptest::prelude::*;

/// Fully associative 4-way geometry of 32-byte blocks; tag `t` is block `t`.
fn g4() -> Geometry {
    Geometry::new(LevelId::L1, 7, 5, 2).unwrap()
}

fn four_way() -> LruSet {
    LruSet::new(g4().ways())
}

fn victim(entries: u32) -> VictimSet {
    VictimSet::new(
        Geometry::fully_associative(LevelId::Victim, entries, 5).unwrap(),
        entries as usize,
    )
}

fn block(tag: u64) -> CacheLine {
    CacheLine::new(tag << 5, false)
}

fn tags<S: AssociativeSet>(set: &S, g: &Geometry) -> Vec<u64> {
    set.lines().iter().map(|line| line.tag(g)).collect()
}

// ══════════════════════════════════════════════════════════
// 1. LRU set
// ══════════════════════════════════════════════════════════

/// Insertions fill the set without evicting, newest first.
#[test]
fn lru_fills_before_evicting() {
    let g = g4();
    let mut set = four_way();
    assert!(set.is_empty());
    for t in 0..4 {
        assert_eq!(set.insert_mru(&g, block(t)), None);
    }
    assert!(set.is_full());
    assert_eq!(tags(&set, &g), vec![3, 2, 1, 0]);
    assert_eq!(set.lru().map(|l| l.address()), Some(0));
    assert_eq!(set.mru().map(|l| l.address()), Some(3 << 5));
}

/// Inserting into a full set evicts the least recently used line.
#[test]
fn lru_evicts_least_recent() {
    let g = g4();
    let mut set = four_way();
    for t in 0..4 {
        let _ = set.insert_mru(&g, block(t));
    }
    assert_eq!(set.insert_mru(&g, block(4)), Some(block(0)));
    assert_eq!(set.len(), 4);
}

/// A read hit promotes the line so it survives the next eviction.
#[test]
fn lru_read_hit_promotes() {
    let g = g4();
    let mut set = four_way();
    for t in 0..4 {
        let _ = set.insert_mru(&g, block(t));
    }
    assert_eq!(set.read(&g, 0), Some(block(0)));
    assert_eq!(tags(&set, &g), vec![0, 3, 2, 1]);
    assert_eq!(set.insert_mru(&g, block(4)), Some(block(1)));
}

/// A write hit promotes the line and marks it dirty.
#[test]
fn lru_write_back_marks_dirty() {
    let g = g4();
    let mut set = four_way();
    let _ = set.insert_mru(&g, block(1));
    let _ = set.insert_mru(&g, block(2));

    let hit = set.write_back(&g, 1).unwrap();
    assert!(hit.is_dirty());
    assert_eq!(tags(&set, &g), vec![1, 2]);
    assert!(set.find(&g, 1).unwrap().is_dirty());
    assert_eq!(set.dirty_count(), 1);

    // A later read does not clean it.
    assert!(set.read(&g, 1).unwrap().is_dirty());
}

/// A miss returns `None` and leaves the order untouched.
#[test]
fn lru_miss_leaves_order() {
    let g = g4();
    let mut set = four_way();
    let _ = set.insert_mru(&g, block(1));
    let _ = set.insert_mru(&g, block(2));
    assert_eq!(set.read(&g, 7), None);
    assert_eq!(set.write_back(&g, 7), None);
    assert_eq!(tags(&set, &g), vec![2, 1]);
}

/// `find` and `contains` do not touch recency.
#[test]
fn lru_find_is_passive() {
    let g = g4();
    let mut set = four_way();
    for t in 0..4 {
        let _ = set.insert_mru(&g, block(t));
    }
    assert!(set.contains(&g, 0));
    assert_eq!(set.find(&g, 0), Some(block(0)));
    assert_eq!(set.insert_mru(&g, block(4)), Some(block(0)));
}

/// `take` removes the line and frees its way.
#[test]
fn lru_take_removes() {
    let g = g4();
    let mut set = four_way();
    for t in 0..4 {
        let _ = set.insert_mru(&g, block(t));
    }
    assert_eq!(set.take(&g, 2), Some(block(2)));
    assert!(!set.contains(&g, 2));
    assert_eq!(set.take(&g, 2), None);
    assert_eq!(set.insert_mru(&g, block(9)), None);
}

/// A direct-mapped set holds exactly one line.
#[test]
fn lru_direct_mapped() {
    let g = Geometry::new(LevelId::L2, 6, 5, 0).unwrap();
    let mut set = LruSet::new(g.ways());
    assert_eq!(set.capacity(), 1);
    assert_eq!(set.insert_mru(&g, CacheLine::new(0x00, true)), None);
    let evicted = set.insert_mru(&g, CacheLine::new(0x40, false)).unwrap();
    assert_eq!(evicted.address(), 0x00);
    assert!(evicted.is_dirty());
}

/// A set stores its way count and lines only; geometry comes from the level.
#[test]
fn lru_set_carries_no_geometry() {
    assert_eq!(LruSet::new(8).capacity(), 8);
    assert_eq!(LruSet::new(0).capacity(), 1);
    assert!(size_of::<LruSet>() <= size_of::<usize>() + size_of::<VecDeque<CacheLine>>());
}

/// The same set answers lookups under whichever geometry its level passes.
#[test]
fn lru_lookups_follow_given_geometry() {
    let narrow = g4();
    let wide = Geometry::new(LevelId::L2, 8, 6, 2).unwrap();
    let mut set = four_way();
    let _ = set.insert_mru(&narrow, CacheLine::new(0x40, false));
    assert!(set.contains(&narrow, 2));
    assert!(set.contains(&wide, 1));
    assert!(!set.contains(&wide, 2));
}

/// Only the first demand hit on a prefetched line is credited, and
/// crediting leaves recency alone.
#[test]
fn lru_claims_prefetch_once() {
    let g = g4();
    let mut set = four_way();
    let _ = set.insert_mru(&g, CacheLine::prefetched(1 << 5));
    let _ = set.insert_mru(&g, block(2));

    assert!(set.claim_prefetch(&g, 1));
    assert!(!set.claim_prefetch(&g, 1));
    assert_eq!(tags(&set, &g), vec![2, 1]);

    let line = set.find(&g, 1).unwrap();
    assert!(line.is_prefetched());
    assert!(line.is_credited());

    // Demand lines and absent tags are never credited.
    assert!(!set.claim_prefetch(&g, 2));
    assert!(!set.claim_prefetch(&g, 7));
}

/// `take` is the only removal path, and it keeps the policy order of the
/// remaining lines for both set kinds.
#[test]
fn take_keeps_remaining_order() {
    let g = g4();
    let mut lru = four_way();
    for t in 0..4 {
        let _ = lru.insert_mru(&g, block(t));
    }
    assert_eq!(AssociativeSet::take(&mut lru, &g, 2), Some(block(2)));
    assert_eq!(tags(&lru, &g), vec![3, 1, 0]);
    assert_eq!(lru.insert_mru(&g, block(8)), None);
    assert_eq!(lru.insert_mru(&g, block(9)), Some(block(0)));

    let mut vc = victim(3);
    let vg = *vc.geometry();
    for t in 0..3 {
        let _ = vc.insert(block(t));
    }
    assert_eq!(AssociativeSet::take(&mut vc, &vg, 1), Some(block(1)));
    assert_eq!(tags(&vc, &vg), vec![2, 0]);
    assert_eq!(vc.insert(block(5)), None);
    assert_eq!(vc.insert(block(6)), Some(block(0)));
}

// ══════════════════════════════════════════════════════════
// 2. FIFO victim set
// ══════════════════════════════════════════════════════════

/// Capacity is exactly the configured entry count, not a power of two.
#[test]
fn fifo_capacity_is_exact() {
    let set = victim(3);
    assert_eq!(set.capacity(), 3);
    assert_eq!(set.geometry().ways(), 4);
}

/// Eviction order equals insertion order.
#[test]
fn fifo_evicts_oldest() {
    let mut set = victim(3);
    let g = *set.geometry();
    for t in 0..3 {
        assert_eq!(set.insert(block(t)), None);
    }
    assert_eq!(set.oldest(), Some(&block(0)));
    assert_eq!(set.insert(block(3)), Some(block(0)));
    assert_eq!(set.insert(block(4)), Some(block(1)));
    assert_eq!(tags(&set, &g), vec![4, 3, 2]);
}

/// Lookups never reorder a FIFO set.
#[test]
fn fifo_lookup_does_not_reorder() {
    let mut set = victim(2);
    let g = *set.geometry();
    let _ = set.insert(block(0));
    let _ = set.insert(block(1));
    assert!(set.contains(&g, 0));
    assert_eq!(set.find(&g, 0), Some(block(0)));
    assert_eq!(set.insert(block(2)), Some(block(0)));
}

/// A hit is served by `take`, which removes the line outright.
#[test]
fn fifo_take_promotes_out() {
    let mut set = victim(2);
    let _ = set.insert(block(0));
    let _ = set.insert(CacheLine::new(1 << 5, true));

    assert!(set.holds(0x3F));
    let hit = set.take_block(0x3F).unwrap();
    assert!(hit.is_dirty());
    assert!(!set.holds(0x3F));
    assert_eq!(set.len(), 1);
    assert_eq!(set.insert(block(5)), None);
    assert_eq!(set.dirty_count(), 0);
}

/// Tags are whole block addresses.
#[test]
fn fifo_tag_is_block_address() {
    let set = victim(4);
    assert_eq!(set.tag_of(0x1234), 0x91);
}

// ══════════════════════════════════════════════════════════
// 3. Model equivalence
// ══════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug)]
enum Op {
    Read(u64),
    Write(u64),
    Insert(u64),
    Take(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u64..8).prop_map(Op::Read),
        (0u64..8).prop_map(Op::Write),
        (0u64..8).prop_map(Op::Insert),
        (0u64..8).prop_map(Op::Take),
    ]
}

proptest! {
    /// LRU matches a recency-list model: hits move to the front, inserts
    /// evict the back of a full set, and the set never exceeds its ways.
    #[test]
    fn lru_matches_model(ops in prop::collection::vec(op(), 0..200)) {
        let g = g4();
        let mut set = four_way();
        let mut model: Vec<u64> = Vec::new();

        for op in ops {
            match op {
                Op::Read(t) | Op::Write(t) => {
                    let hit = if matches!(op, Op::Read(_)) { set.read(&g, t) } else { set.write_back(&g, t) };
                    prop_assert_eq!(hit.is_some(), model.contains(&t));
                    if let Some(pos) = model.iter().position(|&m| m == t) {
                        let _ = model.remove(pos);
                        model.insert(0, t);
                    }
                }
                Op::Insert(t) => {
                    if model.contains(&t) {
                        continue;
                    }
                    let evicted = set.insert_mru(&g, block(t)).map(|l| l.address() >> 5);
                    let expected = if model.len() == 4 { model.pop() } else { None };
                    model.insert(0, t);
                    prop_assert_eq!(evicted, expected);
                }
                Op::Take(t) => {
                    let taken = set.take(&g, t).map(|l| l.address() >> 5);
                    let expected = model.iter().position(|&m| m == t).map(|pos| model.remove(pos));
                    prop_assert_eq!(taken, expected);
                }
            }
            prop_assert!(set.len() <= set.capacity());
            prop_assert_eq!(tags(&set, &g), model.clone());
        }
    }

    /// FIFO matches an insertion-order model regardless of lookups.
    #[test]
    fn fifo_matches_model(ops in prop::collection::vec(op(), 0..200), entries in 1u32..6) {
        let mut set = victim(entries);
        let g = *set.geometry();
        let mut model: Vec<u64> = Vec::new();
        let cap = entries as usize;

        for op in ops {
            match op {
                Op::Read(t) | Op::Write(t) => {
                    prop_assert_eq!(set.contains(&g, t), model.contains(&t));
                    prop_assert_eq!(set.find(&g, t).is_some(), model.contains(&t));
                }
                Op::Insert(t) => {
                    if model.contains(&t) {
                        continue;
                    }
                    let evicted = set.insert(block(t)).map(|l| l.address() >> 5);
                    let expected = if model.len() == cap { model.pop() } else { None };
                    model.insert(0, t);
                    prop_assert_eq!(evicted, expected);
                }
                Op::Take(t) => {
                    let taken = set.take(&g, t).map(|l| l.address() >> 5);
                    let expected = model.iter().position(|&m| m == t).map(|pos| model.remove(pos));
                    prop_assert_eq!(taken, expected);
                }
            }
            prop_assert!(set.len() <= cap);
            prop_assert_eq!(tags(&set, &g), model.clone());
        }
    }
}
