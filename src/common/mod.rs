//! Common types, traits, and utilities shared by the CGM writer and interpreter.
//!
//! This module provides the error type, big-endian field readers, colour and
//! geometry types used by glyphs and by the wire encoding alike.

// Submodule declarations
pub mod binary;
pub mod error;
pub mod geometry;
pub mod style;

// Re-exports for convenience
pub use error::{Error, Result};
pub use geometry::{Bounds, Point};
pub use style::RGBColor;
