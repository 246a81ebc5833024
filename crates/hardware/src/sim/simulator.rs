//! Simulator: owns every structure of the hierarchy and resolves accesses.
//!
//! One call to [`Simulator::access`] runs the whole protocol for a single
//! trace record:
//! 1. **L1 lookup:** A hit (read, or write marking the line dirty) ends the access.
//! 2. **L2 lookup:** On an L2 hit the block is copied into L1.
//! 3. **Victim lookup:** On an L2 miss the victim cache is searched; a hit moves
//!    the line back into L2.
//! 4. **Memory fill:** Otherwise the block is fetched from memory into L2.
//! 5. **Prefetch:** Every L1 miss ends with the prefetcher filling L2 with
//!    the blocks that follow the one just brought in.
//!
//! Lines leaving L1 are written back if dirty and otherwise dropped. Lines
//! leaving L2 are written back if dirty and otherwise offered to the victim
//! cache, whose own oldest entry may leave in turn.

use tracing::{debug, info, trace};

use crate::common::{AccessType, ConfigError, Geometry, LevelId};
use crate::config::SimConfig;
use crate::core::units::cache::CacheLevel;
use crate::core::units::cache::line::CacheLine;
use crate::core::units::cache::policies::{AssociativeSet, VictimSet};
use crate::core::units::prefetch::{NextLinePrefetcher, PrefetchTarget};
use crate::stats::CacheStats;

/// L2 as seen by the prefetcher: a block parked in the victim cache counts
/// as held, so prefetching never duplicates it.
struct L2Window<'a> {
    l2: &'a mut CacheLevel,
    victim: Option<&'a VictimSet>,
}

impl PrefetchTarget for L2Window<'_> {
    fn geometry(&self) -> &Geometry {
        self.l2.geometry()
    }

    fn holds(&self, address: u64) -> bool {
        self.l2.contains(address)
            || self.victim.is_some_and(|vc| vc.holds(address))
    }

    fn install(&mut self, line: CacheLine) -> Option<CacheLine> {
        self.l2.insert(line)
    }
}

/// Top-level simulator: L1, L2, victim cache and prefetcher.
#[derive(Debug)]
pub struct Simulator {
    config: SimConfig,
    l1: CacheLevel,
    l2: CacheLevel,
    victim: Option<VictimSet>,
    prefetcher: NextLinePrefetcher,
    block_bytes: u64,
}

impl Simulator {
    /// Validates `config` and builds an empty hierarchy.
    ///
    /// Nothing is allocated unless every geometry is valid.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] reported by
    /// [`SimConfig::validate`].
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        let l1_geometry = config.l1_geometry()?;
        let l2_geometry = config.l2_geometry()?;
        let victim_geometry = config.victim_geometry()?;

        info!(
            l1_sets = l1_geometry.num_sets(),
            l1_ways = l1_geometry.ways(),
            l2_sets = l2_geometry.num_sets(),
            l2_ways = l2_geometry.ways(),
            block_bytes = l1_geometry.block_bytes(),
            victim_entries = config.v,
            prefetch_degree = config.k,
            "cache hierarchy initialized"
        );

        Ok(Self {
            config: *config,
            l1: CacheLevel::new(LevelId::L1, l1_geometry),
            l2: CacheLevel::new(LevelId::L2, l2_geometry),
            victim: victim_geometry.map(|g| VictimSet::new(g, config.v as usize)),
            prefetcher: NextLinePrefetcher::new(config.k),
            block_bytes: l1_geometry.block_bytes(),
        })
    }

    /// Configuration the simulator was built from.
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The L1 cache.
    pub const fn l1(&self) -> &CacheLevel {
        &self.l1
    }

    /// The L2 cache.
    pub const fn l2(&self) -> &CacheLevel {
        &self.l2
    }

    /// The victim cache, if configured.
    pub const fn victim(&self) -> Option<&VictimSet> {
        self.victim.as_ref()
    }

    /// The prefetcher.
    pub const fn prefetcher(&self) -> &NextLinePrefetcher {
        &self.prefetcher
    }

    /// Resolves one access, updating `stats` at every decision point.
    ///
    /// # Arguments
    ///
    /// * `address` - Byte address accessed.
    /// * `access` - Read or write.
    /// * `stats` - Statistics sink lent for the duration of the call.
    pub fn access(&mut self, address: u64, access: AccessType, stats: &mut CacheStats) {
        stats.record_access(access);

        if self.l1.access(address, access).is_some() {
            stats.l1_hits += 1;
            debug!("{access:?} {address:#x}: L1 hit");
            return;
        }
        stats.l1_misses += 1;

        let fetched = if let Some(line) = self.l2.access(address, access) {
            stats.l2_hits += 1;
            if self.l2.claim_prefetch(address) {
                stats.prefetch_hits += 1;
            }
            debug!("{access:?} {address:#x}: L2 hit");
            line
        } else {
            stats.l2_misses += 1;
            self.fill_l2(address, access, stats)
        };

        self.fill_l1(address, access, stats);
        self.prefetch(&fetched, stats);
    }

    /// Brings the block for `address` into L2, from the victim cache if it
    /// is parked there and from memory otherwise. Returns the installed line.
    fn fill_l2(&mut self, address: u64, access: AccessType, stats: &mut CacheStats) -> CacheLine {
        let promoted = self.victim.as_mut().and_then(|vc| {
            let hit = vc.take_block(address);
            if hit.is_some() {
                stats.vc_hits += 1;
            } else {
                stats.vc_misses += 1;
            }
            hit
        });

        let line = if let Some(mut line) = promoted {
            debug!("{access:?} {address:#x}: victim cache hit");
            if access.is_write() {
                line.mark_dirty(true);
            }
            line
        } else {
            debug!("{access:?} {address:#x}: filled from memory");
            stats.record_transfer(self.block_bytes);
            CacheLine::new(address, access.is_write())
        };

        if let Some(evicted) = self.l2.insert(line) {
            self.retire_l2_line(evicted, stats);
        }
        line
    }

    /// Copies the block for `address` into L1; a displaced dirty line is
    /// written back, a clean one is dropped.
    fn fill_l1(&mut self, address: u64, access: AccessType, stats: &mut CacheStats) {
        let line = CacheLine::new(address, access.is_write());
        if let Some(evicted) = self.l1.insert(line) {
            stats.l1_evictions += 1;
            if evicted.is_dirty() {
                trace!("L1 writeback {:#x}", evicted.address());
                stats.record_writeback();
            }
        }
    }

    /// Disposes of a line that left L2: dirty lines are written back, clean
    /// ones move into the victim cache when there is one.
    fn retire_l2_line(&mut self, line: CacheLine, stats: &mut CacheStats) {
        stats.l2_evictions += 1;
        if line.is_dirty() {
            trace!("L2 writeback {:#x}", line.address());
            stats.record_writeback();
            return;
        }

        let Some(vc) = self.victim.as_mut() else {
            return;
        };
        if let Some(old) = vc.insert(line) {
            stats.vc_evictions += 1;
            if old.is_dirty() {
                trace!("victim cache writeback {:#x}", old.address());
                stats.record_writeback();
            }
        }
    }

    /// Runs the prefetcher from `trigger` and drains every line it displaced.
    fn prefetch(&mut self, trigger: &CacheLine, stats: &mut CacheStats) {
        if self.prefetcher.degree() == 0 {
            return;
        }
        debug_assert!(self.prefetcher.is_empty(), "prefetch evictions left undrained");

        let mut window = L2Window {
            l2: &mut self.l2,
            victim: self.victim.as_ref(),
        };
        let issued = u64::from(self.prefetcher.prefetch(trigger, &mut window));
        stats.prefetch_issued += issued;
        stats.record_transfer(issued.saturating_mul(self.block_bytes));

        while let Some(evicted) = self.prefetcher.pop_eviction() {
            self.retire_l2_line(evicted, stats);
        }
    }

    /// Number of dirty lines resident in L1, L2 and the victim cache,
    /// each structure counted on its own.
    pub fn dirty_lines(&self) -> usize {
        self.l1.dirty_count()
            + self.l2.dirty_count()
            + self.victim.as_ref().map_or(0, AssociativeSet::dirty_count)
    }

    /// Ends the simulation, counting every resident dirty line as a pending
    /// writeback.
    pub fn finish(self, stats: &mut CacheStats) {
        let pending = self.dirty_lines() as u64;
        stats.pending_writebacks += pending;
        info!(
            accesses = stats.accesses,
            writebacks = stats.writebacks,
            pending_writebacks = pending,
            "simulation finished"
        );
    }
}
