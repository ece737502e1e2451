//! Glyph to command emission.
//!
//! Each glyph writes the attributes it needs and then its primitive, every
//! time, whether or not the attribute already holds that value. A glyph's
//! commands are staged together, so a glyph that fails leaves no attribute
//! commands behind. Line-like
//! shapes use the line attributes, closed shapes use the edge attributes
//! with an empty interior, and text uses the text attributes.

use std::io::Write;

use tracing::{debug, warn};

use super::arc::arc_vectors;
use super::constants::style;
use super::glyph::{Glyph, Shape, normalize_width};
use super::writer::{CgmWriter, ellipse_conjugates};
use crate::common::error::Result;

/// Something that can be written into a picture body.
pub trait ToCgm {
    fn to_cgm<W: Write>(&self, writer: &mut CgmWriter<W>) -> Result<()>;
}

impl ToCgm for Glyph {
    fn to_cgm<W: Write>(&self, writer: &mut CgmWriter<W>) -> Result<()> {
        writer.staged(|w| write_glyph(self, w))
    }
}

fn write_glyph<W: Write>(glyph: &Glyph, w: &mut CgmWriter<W>) -> Result<()> {
    let width = normalize_width(glyph.width) as i16;
    let argb = glyph.argb();

    match &glyph.shape {
        Shape::Line { from, to } => {
            line_attributes(w, width, argb)?;
            w.line(&[*from, *to])?;
        },
        Shape::Polyline { points } => {
            line_attributes(w, width, argb)?;
            w.line(points)?;
        },
        Shape::Polygon { points } => {
            line_attributes(w, width, argb)?;
            w.polygon(points)?;
        },
        Shape::Rect { corners } => {
            outline_attributes(w, width, argb)?;
            w.rect(*corners)?;
        },
        Shape::Circle { center, radius } => {
            outline_attributes(w, width, argb)?;
            w.circle(*center, *radius)?;
        },
        Shape::Oval { corners } => {
            outline_attributes(w, width, argb)?;
            w.ellipse_in(*corners)?;
        },
        Shape::Text(run) => {
            w.text_colr_argb(argb)?;
            w.char_ori_upright()?;
            w.text_font(&run.font.name, run.font.style)?;
            w.char_height(run.font.size)?;
            w.text(run.anchor, &run.content)?;
        },
        Shape::CircularArc(arc) => {
            line_attributes(w, width, argb)?;
            let (start, end) = arc_vectors(arc.start_angle, arc.delta_angle);
            w.arc_ctr(arc.center, start, end, arc.radius)?;
        },
        Shape::CircularArcClose { arc, close } => {
            w.edge_width(width)?;
            w.edge_type(style::SOLID)?;
            w.edge_colr_argb(argb)?;
            let (start, end) = arc_vectors(arc.start_angle, arc.delta_angle);
            w.arc_ctr_close(arc.center, start, end, arc.radius, close.code())?;
        },
        Shape::EllipticalArc {
            corners,
            start_angle,
            delta_angle,
        } => {
            line_attributes(w, width, argb)?;
            let (center, conj1, conj2) = ellipse_conjugates(*corners);
            let (start, end) = arc_vectors(*start_angle, *delta_angle);
            w.ellip_arc(center, conj1, conj2, start, end)?;
        },
        Shape::CrossRect { .. } => {
            warn!(key = glyph.key, "CrossRect has no CGM encoding, skipped");
            return Ok(());
        },
    }

    debug!(kind = glyph.shape.kind(), key = glyph.key, "glyph written");
    Ok(())
}

fn line_attributes<W: Write>(w: &mut CgmWriter<W>, width: i16, argb: u32) -> Result<()> {
    w.line_width(width)?;
    w.line_colr_argb(argb)
}

fn outline_attributes<W: Write>(w: &mut CgmWriter<W>, width: i16, argb: u32) -> Result<()> {
    w.int_style(style::EMPTY)?;
    w.edge_type(style::SOLID)?;
    w.edge_colr_argb(argb)?;
    w.edge_width(width)?;
    w.edge_vis(1)
}
