//! Common style types.
//!
//! This module provides the colour type shared by glyphs and CGM colour commands.

// Submodule declarations
pub mod color;

// Re-exports
pub use color::RGBColor;
