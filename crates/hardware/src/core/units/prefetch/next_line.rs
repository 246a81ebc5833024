//! Next-Line Prefetcher.
//!
//! A simple spatial prefetcher that, given the line just filled, installs the
//! next `degree` sequential blocks into the target level. This exploits the
//! spatial locality of sequential data arrays and instruction streams.
//!
//! Installing a block can push another line out of its set. Those lines are
//! collected in an eviction buffer that the caller drains with
//! [`NextLinePrefetcher::pop_eviction`] before the next prefetch.

use std::collections::VecDeque;

use tracing::trace;

use super::PrefetchTarget;
use crate::core::units::cache::line::CacheLine;

/// Next-Line Prefetcher state.
#[derive(Clone, Debug, Default)]
pub struct NextLinePrefetcher {
    /// Number of subsequent blocks to prefetch (prefetch degree).
    degree: u32,
    /// Lines displaced by the most recent prefetch, oldest first.
    evictions: VecDeque<CacheLine>,
}

impl NextLinePrefetcher {
    /// Creates a new Next-Line prefetcher.
    ///
    /// # Arguments
    ///
    /// * `degree` - The number of blocks to prefetch ahead; `0` disables it.
    pub fn new(degree: u32) -> Self {
        Self {
            degree,
            evictions: VecDeque::new(),
        }
    }

    /// Prefetch degree.
    pub const fn degree(&self) -> u32 {
        self.degree
    }

    /// Installs the `degree` blocks following `trigger` into `target`.
    ///
    /// For `i` in `1..=degree` the candidate is block
    /// `block_address(trigger) + i` with the trigger's byte offset, clean and
    /// flagged as prefetched. Candidates the target already holds are
    /// skipped, so a set never receives a duplicate tag. Displaced lines
    /// replace the contents of the eviction buffer.
    ///
    /// # Returns
    ///
    /// The number of lines actually installed.
    pub fn prefetch<T>(&mut self, trigger: &CacheLine, target: &mut T) -> u32
    where
        T: PrefetchTarget + ?Sized,
    {
        self.evictions.clear();

        let geometry = *target.geometry();
        let base = trigger.block_address(&geometry);
        let mut installed = 0;

        for i in 1..=u64::from(self.degree) {
            let block = base.wrapping_add(i);
            let candidate = CacheLine::prefetched(trigger.with_block_address(&geometry, block).address());

            if target.holds(candidate.address()) {
                continue;
            }

            trace!("prefetch {:#x}", candidate.address());
            if let Some(evicted) = target.install(candidate) {
                self.evictions.push_back(evicted);
            }
            installed += 1;
        }

        installed
    }

    /// Removes and returns the oldest buffered eviction.
    pub fn pop_eviction(&mut self) -> Option<CacheLine> {
        self.evictions.pop_front()
    }

    /// Returns `true` once every eviction of the last prefetch was drained.
    pub fn is_empty(&self) -> bool {
        self.evictions.is_empty()
    }

    /// Number of evictions still buffered.
    pub fn pending_evictions(&self) -> usize {
        self.evictions.len()
    }
}
