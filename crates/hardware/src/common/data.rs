//! Access and Structure Identifiers.
//!
//! This module defines the small enums passed between the trace driver, the
//! orchestrator and the statistics sink:
//! 1. **Access Kind:** Whether a trace record reads or writes its block.
//! 2. **Structure Identity:** Which cache structure a geometry or error refers to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type of memory access operation.
///
/// A write marks the line it lands on dirty; a read leaves dirtiness untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    /// Data read access.
    Read,

    /// Data write access.
    Write,
}

impl AccessType {
    /// Returns `true` for [`AccessType::Write`].
    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }

    /// Maps the `is_write` flag of an access call onto an access kind.
    #[inline]
    pub const fn from_write_flag(is_write: bool) -> Self {
        if is_write { Self::Write } else { Self::Read }
    }
}

/// Identifies one structure of the simulated hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelId {
    /// First-level cache, consulted first on every access.
    L1,
    /// Second-level cache, filled from memory and by the prefetcher.
    L2,
    /// Fully associative FIFO buffer of lines evicted from L2.
    Victim,
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
            Self::Victim => write!(f, "victim cache"),
        }
    }
}
