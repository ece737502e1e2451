//! Error conversion implementations.
//!
//! This module contains conversions from internal error types to the
//! unified Error type.

use super::types::Error;
use crate::common::binary::BinaryError;

impl Error {
    /// Lift a payload-relative binary error into a stream-level decode error.
    ///
    /// `base` is the stream offset of the record's header word, the same
    /// offset the interpreter reports for every other error in that record.
    pub(crate) fn from_binary(err: BinaryError, base: usize) -> Self {
        match err {
            BinaryError::InsufficientData {
                expected,
                available,
            } => Error::MalformedLength {
                offset: base,
                reason: format!(
                    "payload of {} octets too short, {} needed",
                    available, expected
                ),
            },
            BinaryError::ParseError(msg) => Error::MalformedLength {
                offset: base,
                reason: msg,
            },
        }
    }
}
