//! Memory Trace Loading.
//!
//! This module reads the access traces that drive a simulation. It provides:
//! 1. **Record parsing:** One `<op> <address>` record per line.
//! 2. **Streaming:** A line-by-line reader over any buffered source, so traces
//!    of any length are never held in memory.
//! 3. **File loading:** Opening a trace file from disk.
//!
//! # Format
//!
//! ```text
//! # comment
//! r 0x7fffe7cfe2a8
//! W 400a3c
//! ```
//!
//! `<op>` is `r`/`R` or `w`/`W`; the address is hexadecimal with an optional
//! `0x` prefix. Blank lines and `#` comments are skipped, and fields after
//! the address are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::common::{AccessType, SimError, TraceError};

/// One access from a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Read or write.
    pub access: AccessType,
    /// Byte address accessed.
    pub address: u64,
}

/// Parses one trace line.
///
/// # Returns
///
/// `Ok(None)` for blank and comment lines, `Ok(Some(record))` otherwise.
///
/// # Errors
///
/// Returns a [`TraceError`] if the access kind or the address is malformed.
pub fn parse_line(line: &str) -> Result<Option<TraceRecord>, TraceError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut fields = line.split_whitespace();
    let access = match fields.next() {
        Some("r" | "R") => AccessType::Read,
        Some("w" | "W") => AccessType::Write,
        Some(other) => return Err(TraceError::UnknownAccess(other.to_owned())),
        None => return Ok(None),
    };

    let text = fields.next().ok_or(TraceError::MissingAddress)?;
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    let address = u64::from_str_radix(digits, 16).map_err(|source| TraceError::InvalidAddress {
        text: text.to_owned(),
        source,
    })?;

    Ok(Some(TraceRecord { access, address }))
}

/// Streaming trace reader yielding one record per non-blank line.
#[derive(Debug)]
pub struct TraceReader<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered source.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, SimError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;
            match parse_line(&line) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(source) => {
                    return Some(Err(SimError::Trace {
                        line: self.line_no,
                        source,
                    }));
                }
            }
        }
    }
}

/// Opens a trace file for streaming.
///
/// # Errors
///
/// Returns [`SimError::Io`] if the file cannot be opened.
pub fn load_trace(path: impl AsRef<Path>) -> Result<TraceReader<BufReader<File>>, SimError> {
    let file = File::open(path)?;
    Ok(TraceReader::new(BufReader::new(file)))
}
