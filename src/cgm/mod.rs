//! NITF-CGM binary metafiles for whiteboard glyphs.
//!
//! This module writes glyph lists as binary Computer Graphics Metafiles in
//! the NITF-CGM profile and reads such metafiles back into glyphs.
//!
//! # Architecture
//!
//! - `constants`: element classes, opcodes and enumerated values
//! - `header`: command header framing (short and long form)
//! - `fields`: parameter list assembly
//! - `writer`: stateful command writer
//! - `fonts`: NITF-CGM font table and index mapping
//! - `glyph`: glyph and shape types
//! - `arc`: arc angle geometry
//! - `mapper`: glyph to command emission
//! - `interpreter`: record walker and attribute state
//! - `options`: metafile header options
//!
//! # Example
//!
//! ```rust
//! use nitf_cgm::cgm::{self, Glyph, Shape};
//! use nitf_cgm::common::{Point, RGBColor};
//!
//! let glyphs = vec![Glyph::new(
//!     Shape::Line { from: Point::new(10, 20), to: Point::new(30, 40) },
//!     2,
//!     RGBColor::BLUE,
//! )];
//! let bytes = cgm::encode(&glyphs)?;
//! let decoded = cgm::decode(&bytes)?;
//! assert_eq!(decoded[0].shape, glyphs[0].shape);
//! # Ok::<(), nitf_cgm::common::Error>(())
//! ```

pub mod arc;
pub mod constants;
pub mod fields;
pub mod fonts;
pub mod glyph;
pub mod header;
pub mod interpreter;
pub mod mapper;
pub mod options;
pub mod writer;

#[cfg(test)]
mod tests;

use std::path::Path;

use tracing::debug;

use crate::common::error::Result;

pub use fonts::{Font, FontStyle};
pub use glyph::{ArcClose, CircularArc, Glyph, Shape, TextRun};
pub use interpreter::{CgmInterpreter, DecodeWarning, Decoded, DecoderState};
pub use mapper::ToCgm;
pub use options::MetafileOptions;
pub use writer::{CgmWriter, VdcOrientation, WriterState};

/// A metafile being built one glyph at a time.
///
/// The header and picture descriptors are written on [`Metafile::open`];
/// glyphs go into a single picture until [`Metafile::finish`] closes it.
pub struct Metafile {
    writer: CgmWriter<Vec<u8>>,
    glyphs: usize,
}

impl Metafile {
    /// Start a metafile and open its picture body.
    pub fn open(options: &MetafileOptions) -> Result<Self> {
        let mut writer = CgmWriter::new(Vec::new());

        writer.beg_mf(&options.metafile_name)?;
        writer.mf_version(1)?;
        writer.mf_desc(&options.description)?;
        if options.font_list {
            writer.nitf_font_list()?;
        }
        if options.element_list {
            writer.mf_elem_list()?;
        }

        writer.beg_pic(&options.picture_name)?;
        let [x1, y1, x2, y2] = options.vdc_extent;
        writer.vdc_ext(x1, y1, x2, y2)?;
        writer.colr_mode(options.colour_mode)?;
        if let Some(mode) = options.edge_width_mode {
            writer.edge_width_mode(mode)?;
        }
        if let Some(mode) = options.line_width_mode {
            writer.line_width_mode(mode)?;
        }
        writer.beg_pic_body()?;

        Ok(Self { writer, glyphs: 0 })
    }

    /// Append one glyph.
    pub fn add(&mut self, glyph: &Glyph) -> Result<()> {
        glyph.to_cgm(&mut self.writer)?;
        self.glyphs += 1;
        Ok(())
    }

    /// Append glyphs in order.
    pub fn add_all<'g>(&mut self, glyphs: impl IntoIterator<Item = &'g Glyph>) -> Result<()> {
        for glyph in glyphs {
            self.add(glyph)?;
        }
        Ok(())
    }

    /// Number of glyphs added so far.
    pub fn len(&self) -> usize {
        self.glyphs
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs == 0
    }

    /// Close the picture and the metafile and return the encoded octets.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        self.writer.end_pic()?;
        self.writer.end_mf()?;
        debug!(glyphs = self.glyphs, "metafile finished");
        Ok(self.writer.into_inner())
    }
}

/// Encode glyphs with the default header.
pub fn encode(glyphs: &[Glyph]) -> Result<Vec<u8>> {
    encode_with(glyphs, &MetafileOptions::default())
}

/// Encode glyphs with the given header options.
pub fn encode_with(glyphs: &[Glyph], options: &MetafileOptions) -> Result<Vec<u8>> {
    let mut metafile = Metafile::open(options)?;
    metafile.add_all(glyphs)?;
    metafile.finish()
}

/// Decode every glyph in a metafile. Any framing or payload error fails the
/// whole decode; see [`decode_lenient`] to keep a partial result.
pub fn decode(data: &[u8]) -> Result<Vec<Glyph>> {
    let mut interpreter = CgmInterpreter::new(data);
    interpreter.run()?;
    Ok(interpreter.into_glyphs())
}

/// Decode as far as the stream allows.
pub fn decode_lenient(data: &[u8]) -> Decoded {
    CgmInterpreter::new(data).decode_lenient()
}

/// Encode glyphs and write the metafile to `path`.
pub fn write_file(path: impl AsRef<Path>, glyphs: &[Glyph], options: &MetafileOptions) -> Result<()> {
    let bytes = encode_with(glyphs, options)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Read and decode the metafile at `path`.
pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<Glyph>> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}
