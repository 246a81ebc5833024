//! Error types for configuration, trace ingestion and I/O.
//!
//! Only two things can go wrong in a simulation run:
//! 1. **Configuration:** A geometry that cannot be decoded or allocated. Fatal,
//!    and always reported before any structure is built.
//! 2. **Trace input:** A record that cannot be parsed, or a file that cannot be read.
//!
//! A lookup that finds nothing is not an error; it is the `None` arm of the
//! cache operations and drives the access protocol.

use std::io;
use std::num::ParseIntError;

use thiserror::Error;

use super::data::LevelId;

/// Invalid simulator geometry.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `c < s + b`: the index field would have a negative width.
    #[error("{level}: capacity 2^{c} bytes cannot hold 2^{s} ways of 2^{b}-byte blocks (need c >= s + b)")]
    DegenerateGeometry {
        /// Structure whose geometry is invalid.
        level: LevelId,
        /// log2 of the capacity in bytes.
        c: u32,
        /// log2 of the block size in bytes.
        b: u32,
        /// log2 of the associativity.
        s: u32,
    },

    /// `c` is wider than a 64-bit address.
    #[error("{level}: capacity 2^{c} bytes exceeds the 64-bit address space")]
    AddressTooWide {
        /// Structure whose geometry is invalid.
        level: LevelId,
        /// log2 of the capacity in bytes.
        c: u32,
    },

    /// The index field is too wide to allocate every set.
    #[error("{level}: {index_bits} index bits exceeds the limit of {max}")]
    TooManySets {
        /// Structure whose geometry is invalid.
        level: LevelId,
        /// Requested index width, `c - s - b`.
        index_bits: u32,
        /// Largest supported index width.
        max: u32,
    },

    /// The victim cache entry count is above the supported limit.
    #[error("victim cache with {entries} entries exceeds the limit of {max}")]
    VictimCacheTooLarge {
        /// Requested entry count.
        entries: u32,
        /// Largest supported entry count.
        max: u32,
    },
}

/// Malformed trace record.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TraceError {
    /// The access kind is neither `r` nor `w`.
    #[error("unknown access kind `{0}` (expected `r` or `w`)")]
    UnknownAccess(String),

    /// The record has an access kind but no address.
    #[error("missing address")]
    MissingAddress,

    /// The address is not a hexadecimal 64-bit value.
    #[error("invalid address `{text}`: {source}")]
    InvalidAddress {
        /// The offending token.
        text: String,
        /// Underlying integer parse failure.
        #[source]
        source: ParseIntError,
    },
}

/// Top-level error type for a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration rejected before the simulator was built.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Configuration file is not valid JSON for [`crate::config::SimConfig`].
    #[error("failed to parse configuration: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    /// A trace line could not be parsed.
    #[error("trace line {line}: {source}")]
    Trace {
        /// 1-based line number within the trace.
        line: usize,
        /// What was wrong with the line.
        #[source]
        source: TraceError,
    },

    /// Reading a trace or configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
