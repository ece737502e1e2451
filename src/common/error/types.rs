//! Unified error types for CGM encoding and interpretation.
//!
//! Writer-side failures (state, parameter, size) are raised before a single
//! byte of the offending command reaches the output. Reader-side failures
//! stop the interpreter at the record where they were detected.
use thiserror::Error;

/// Main error type for CGM operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A command was issued while the writer was in the wrong lifecycle state
    #[error("{command}: call invoked in wrong state {state}")]
    State {
        command: &'static str,
        state: &'static str,
    },

    /// Payload exceeds what a single long-form partition can describe
    #[error("payload too large for single partition: opcode 0x{opcode:04X}, {len} octets")]
    PayloadTooLarge { opcode: u16, len: usize },

    /// A command argument lies outside its enumerated domain
    #[error("{command}: {reason}")]
    InvalidParameter {
        command: &'static str,
        reason: String,
    },

    /// The stream ended inside a header or payload
    #[error("Truncated stream at offset {offset}: need {needed} octets, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A length field or payload length that cannot be honoured
    #[error("Malformed length at offset {offset}: {reason}")]
    MalformedLength { offset: usize, reason: String },

    /// Option (de)serialization failure
    #[error("YAML error: {0}")]
    Yaml(String),
}

/// Result type for CGM operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error came from reading a stream rather than writing one.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Error::Truncated { .. } | Error::MalformedLength { .. })
    }
}
