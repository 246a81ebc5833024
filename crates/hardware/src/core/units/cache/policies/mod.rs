//! Associative sets and their replacement policies.
//!
//! An associative set owns up to `capacity` lines in a policy-defined order,
//! always kept with the line to keep longest at the front and the next
//! eviction candidate at the back.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used, for the L1 and L2 sets.
//! - `Fifo`: First-In, First-Out, for the fully associative victim cache.

/// First-In, First-Out set used by the victim cache.
pub mod fifo;

/// Least Recently Used set used by L1 and L2.
pub mod lru;

use std::collections::VecDeque;

use super::line::CacheLine;
use crate::common::Geometry;

pub use fifo::VictimSet;
pub use lru::LruSet;

/// Common contract of every associative set.
///
/// Lookups are by tag under a caller-supplied geometry: sets do not carry
/// one, the owning level does. Resident lines are exposed read-only; the
/// only ways to change a set are its policy operations and [`take`].
///
/// [`take`]: AssociativeSet::take
pub trait AssociativeSet {
    /// Maximum number of resident lines.
    fn capacity(&self) -> usize;

    /// Resident lines, front (kept longest) to back (evicted next).
    fn lines(&self) -> &VecDeque<CacheLine>;

    /// Removes and returns the line with `tag` under `geometry`.
    fn take(&mut self, geometry: &Geometry, tag: u64) -> Option<CacheLine>;

    /// Number of resident lines.
    fn len(&self) -> usize {
        self.lines().len()
    }

    /// Returns `true` when no line is resident.
    fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }

    /// Returns `true` when the next insertion will evict.
    fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }

    /// Position of the line with `tag`, counted from the front.
    fn position(&self, geometry: &Geometry, tag: u64) -> Option<usize> {
        position_of(self.lines(), geometry, tag)
    }

    /// Returns `true` if a line with `tag` is resident.
    fn contains(&self, geometry: &Geometry, tag: u64) -> bool {
        self.position(geometry, tag).is_some()
    }

    /// Copy of the line with `tag`, without touching the ordering.
    fn find(&self, geometry: &Geometry, tag: u64) -> Option<CacheLine> {
        self.position(geometry, tag)
            .and_then(|pos| self.lines().get(pos).copied())
    }

    /// Number of resident dirty lines.
    fn dirty_count(&self) -> usize {
        self.lines().iter().filter(|line| line.is_dirty()).count()
    }
}

fn position_of(lines: &VecDeque<CacheLine>, geometry: &Geometry, tag: u64) -> Option<usize> {
    lines.iter().position(|line| line.matches(geometry, tag))
}

/// Removes the line with `tag` from `lines`, keeping the order of the rest.
fn remove(lines: &mut VecDeque<CacheLine>, geometry: &Geometry, tag: u64) -> Option<CacheLine> {
    let pos = position_of(lines, geometry, tag)?;
    lines.remove(pos)
}

/// Places `line` at the front of `lines`, first evicting the back line if
/// the set already holds `capacity` lines.
///
/// Both policies admit new lines this way; they differ only in whether hits
/// move a line back to the front.
fn admit(lines: &mut VecDeque<CacheLine>, capacity: usize, line: CacheLine) -> Option<CacheLine> {
    let evicted = if lines.len() >= capacity {
        lines.pop_back()
    } else {
        None
    };
    lines.push_front(line);
    evicted
}
