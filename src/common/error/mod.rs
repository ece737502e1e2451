//! Unified error types for the CGM codec.
//!
//! One error type covers the writer state machine, command framing, and the
//! interpreter, so callers handle a single `Result`.

// Submodule declarations
pub mod types;
pub mod conversions;

// Re-exports
pub use types::{Error, Result};
