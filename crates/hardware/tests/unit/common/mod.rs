//! Tests for the shared address and error types.
