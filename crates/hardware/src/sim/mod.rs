//! Simulation driver: the access protocol and trace ingestion.
//!
//! Provides the [`Simulator`] that resolves accesses against the hierarchy,
//! the trace reader that feeds it, and a helper that runs a whole trace.

/// The per-access protocol over L1, L2, the victim cache and the prefetcher.
pub mod simulator;

/// Trace record parsing and file loading.
pub mod trace;

pub use self::simulator::Simulator;
pub use self::trace::{TraceReader, TraceRecord, load_trace, parse_line};

use crate::common::SimError;
use crate::stats::CacheStats;

/// Feeds `records` to `sim` in order, stopping at the first error.
///
/// # Returns
///
/// The number of accesses processed.
///
/// # Errors
///
/// Returns the first error produced by `records`; accesses before it have
/// already been applied to `sim` and `stats`.
pub fn run_trace<I>(sim: &mut Simulator, records: I, stats: &mut CacheStats) -> Result<u64, SimError>
where
    I: IntoIterator<Item = Result<TraceRecord, SimError>>,
{
    let mut processed = 0;
    for record in records {
        let record = record?;
        sim.access(record.address, record.access, stats);
        processed += 1;
    }
    Ok(processed)
}
