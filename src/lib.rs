//! nitf-cgm - Binary CGM encoding for whiteboard glyphs
//!
//! This library writes lists of whiteboard glyphs (lines, rectangles,
//! circles, ovals, polygons, text and arcs) as binary Computer Graphics
//! Metafiles in the NITF-CGM profile, and reads such metafiles back.
//!
//! # Features
//!
//! - **Stateful writer**: every CGM command of the profile, with lifecycle
//!   checks that reject out-of-order commands before anything is written
//! - **Interpreter**: a record walker that carries attribute state across
//!   primitives and reports unknown elements without stopping
//! - **Glyph mapping**: glyphs become attribute plus primitive command groups,
//!   and primitives become glyphs again
//! - **Configurable header**: metafile and picture descriptors from
//!   [`cgm::MetafileOptions`], loadable from YAML
//!
//! # Example - Encoding and decoding glyphs
//!
//! ```rust
//! use nitf_cgm::cgm::{self, Font, FontStyle, Glyph, Shape};
//! use nitf_cgm::{Point, RGBColor};
//!
//! # fn main() -> nitf_cgm::Result<()> {
//! let glyphs = vec![
//!     Glyph::new(
//!         Shape::Rect { corners: [Point::new(50, 50), Point::new(150, 120)] },
//!         2,
//!         RGBColor::GREEN,
//!     ),
//!     Glyph::new(
//!         Shape::text(Point::new(30, 40), "Hello", Font::new("TimesRoman", FontStyle::BOLD, 16)),
//!         1,
//!         RGBColor::RED,
//!     ),
//! ];
//!
//! let bytes = cgm::encode(&glyphs)?;
//! let decoded = cgm::decode(&bytes)?;
//! assert_eq!(decoded.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Writing commands directly
//!
//! ```rust
//! use nitf_cgm::cgm::CgmWriter;
//! use nitf_cgm::{Point, RGBColor};
//!
//! # fn main() -> nitf_cgm::Result<()> {
//! let mut writer = CgmWriter::new(Vec::new());
//! writer.beg_mf("Sketch")?;
//! writer.mf_version(1)?;
//! writer.beg_pic("Page 1")?;
//! writer.vdc_ext(0, 480, 640, 0)?;
//! writer.colr_mode(1)?;
//! writer.beg_pic_body()?;
//! writer.line_colr(RGBColor::BLUE)?;
//! writer.line(&[Point::new(0, 0), Point::new(100, 100)])?;
//! writer.end_pic()?;
//! writer.end_mf()?;
//! let bytes = writer.into_inner();
//! assert_eq!(&bytes[bytes.len() - 2..], &[0x00, 0x40]);
//! # Ok(())
//! # }
//! ```

/// Shared types: errors, binary field readers, colour and geometry.
pub mod common;

/// NITF-CGM writer, interpreter and glyph model
///
/// This module provides the command writer, the interpreter, and the
/// mapping between whiteboard glyphs and CGM elements.
pub mod cgm;

// Re-export commonly used types for convenience
pub use cgm::{Glyph, Metafile, MetafileOptions, Shape, decode, encode};
pub use common::{Bounds, Error, Point, RGBColor, Result};
