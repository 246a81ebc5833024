//! Simulation statistics collection and reporting.
//!
//! This module tracks the functional metrics of a cache simulation. It provides:
//! 1. **Access mix:** Total accesses, reads and writes.
//! 2. **Per-structure outcomes:** Hits, misses and evictions for L1, L2 and the victim cache.
//! 3. **Memory traffic:** Writebacks, writebacks pending at shutdown and bytes fetched.
//! 4. **Prefetching:** Lines installed by the prefetcher and demand hits on them.
//!
//! The simulator increments these counters but never owns them; the driver
//! creates a `CacheStats`, lends it to every access and reports it at the end.

use std::io::{self, Write};

use serde::Serialize;

use crate::common::AccessType;

/// Simulation statistics structure tracking all cache metrics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Total accesses processed.
    pub accesses: u64,
    /// Read accesses.
    pub reads: u64,
    /// Write accesses.
    pub writes: u64,

    /// Accesses satisfied by L1.
    pub l1_hits: u64,
    /// Accesses that missed L1.
    pub l1_misses: u64,
    /// L1 misses satisfied by L2.
    pub l2_hits: u64,
    /// L1 misses that also missed L2.
    pub l2_misses: u64,
    /// L2 misses satisfied by the victim cache.
    pub vc_hits: u64,
    /// L2 misses that also missed the victim cache (only counted when one is configured).
    pub vc_misses: u64,

    /// Lines evicted from L1.
    pub l1_evictions: u64,
    /// Lines evicted from L2, by demand fills or by prefetches.
    pub l2_evictions: u64,
    /// Lines evicted from the victim cache.
    pub vc_evictions: u64,

    /// Dirty lines written back to memory on eviction.
    pub writebacks: u64,
    /// Dirty lines still resident when the simulation finished.
    pub pending_writebacks: u64,
    /// Bytes fetched from memory by demand fills and prefetches.
    pub bytes_transferred: u64,

    /// Lines installed into L2 by the prefetcher.
    pub prefetch_issued: u64,
    /// Prefetched lines that served at least one demand hit in L2; each
    /// prefetched line counts once, so this never exceeds `prefetch_issued`.
    pub prefetch_hits: u64,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"l1"`, `"l2"`, `"victim"`, `"memory"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "l1", "l2", "victim", "memory"];

/// `num / den`, or `0.0` when nothing was counted.
fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

impl CacheStats {
    /// Counts one access of the given kind.
    pub const fn record_access(&mut self, access: AccessType) {
        self.accesses += 1;
        match access {
            AccessType::Read => self.reads += 1,
            AccessType::Write => self.writes += 1,
        }
    }

    /// Counts one dirty line written back to memory.
    pub const fn record_writeback(&mut self) {
        self.writebacks += 1;
    }

    /// Counts `bytes` fetched from memory.
    pub const fn record_transfer(&mut self, bytes: u64) {
        self.bytes_transferred = self.bytes_transferred.saturating_add(bytes);
    }

    /// Fraction of accesses that missed L1.
    pub fn l1_miss_rate(&self) -> f64 {
        ratio(self.l1_misses, self.l1_hits + self.l1_misses)
    }

    /// Fraction of L2 lookups that missed L2.
    pub fn l2_miss_rate(&self) -> f64 {
        ratio(self.l2_misses, self.l2_hits + self.l2_misses)
    }

    /// Fraction of victim cache lookups that hit.
    pub fn vc_hit_rate(&self) -> f64 {
        ratio(self.vc_hits, self.vc_hits + self.vc_misses)
    }

    /// Fraction of prefetched lines that later served a demand hit.
    pub fn prefetch_accuracy(&self) -> f64 {
        ratio(self.prefetch_hits, self.prefetch_issued)
    }

    /// Writebacks on eviction plus writebacks pending at shutdown.
    pub const fn total_writebacks(&self) -> u64 {
        self.writebacks + self.pending_writebacks
    }

    /// Writes the requested report sections to `out`.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass
    /// an empty slice to write every section.
    ///
    /// # Errors
    ///
    /// Propagates any error from `out`.
    pub fn write_sections<W: Write>(&self, out: &mut W, sections: &[String]) -> io::Result<()> {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let level = |out: &mut W, name: &str, hits: u64, misses: u64, evictions: u64| -> io::Result<()> {
            writeln!(out, "{name}")?;
            writeln!(out, "  accesses               {}", hits + misses)?;
            writeln!(out, "  hits                   {hits}")?;
            writeln!(out, "  misses                 {misses}")?;
            writeln!(
                out,
                "  miss_rate              {:.4}",
                ratio(misses, hits + misses)
            )?;
            writeln!(out, "  evictions              {evictions}")?;
            writeln!(out, "----------------------------------------------------------")
        };

        writeln!(out, "==========================================================")?;
        writeln!(out, "CACHE SIMULATION STATISTICS")?;
        writeln!(out, "==========================================================")?;
        if want("summary") {
            writeln!(out, "accesses                 {}", self.accesses)?;
            writeln!(out, "reads                    {}", self.reads)?;
            writeln!(out, "writes                   {}", self.writes)?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("l1") {
            level(&mut *out, "L1", self.l1_hits, self.l1_misses, self.l1_evictions)?;
        }
        if want("l2") {
            level(&mut *out, "L2", self.l2_hits, self.l2_misses, self.l2_evictions)?;
        }
        if want("victim") {
            writeln!(out, "VICTIM CACHE")?;
            writeln!(out, "  hits                   {}", self.vc_hits)?;
            writeln!(out, "  misses                 {}", self.vc_misses)?;
            writeln!(out, "  hit_rate               {:.4}", self.vc_hit_rate())?;
            writeln!(out, "  evictions              {}", self.vc_evictions)?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("memory") {
            writeln!(out, "MEMORY TRAFFIC")?;
            writeln!(out, "  writebacks             {}", self.writebacks)?;
            writeln!(out, "  writebacks.pending     {}", self.pending_writebacks)?;
            writeln!(out, "  writebacks.total       {}", self.total_writebacks())?;
            writeln!(out, "  bytes_transferred      {}", self.bytes_transferred)?;
            writeln!(out, "  prefetch.issued        {}", self.prefetch_issued)?;
            writeln!(out, "  prefetch.hits          {}", self.prefetch_hits)?;
            writeln!(out, "  prefetch.accuracy      {:.4}", self.prefetch_accuracy())?;
        }
        writeln!(out, "==========================================================")
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout cannot be written.
    pub fn print_sections(&self, sections: &[String]) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.write_sections(&mut lock, sections)
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout cannot be written.
    pub fn print(&self) -> io::Result<()> {
        self.print_sections(&[])
    }
}
