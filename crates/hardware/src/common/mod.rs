//! Common utilities and types used throughout the cache simulator.
//!
//! This module provides the building blocks shared by every structure of the
//! hierarchy. It includes:
//! 1. **Address Decoding:** The `(c, b, s)` geometry and tag/index/offset arithmetic.
//! 2. **Constants:** Address width and allocation limits.
//! 3. **Access Kinds:** Read/write classification and structure identifiers.
//! 4. **Error Handling:** Configuration, trace and I/O errors.

/// Address decomposition for set-associative structures.
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Access kind and structure identifiers.
pub mod data;

/// Error types.
pub mod error;

pub use addr::{Decoded, Geometry};
pub use data::{AccessType, LevelId};
pub use error::{ConfigError, SimError, TraceError};
