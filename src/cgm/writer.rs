//! CGM command writer.
//!
//! [`CgmWriter`] emits the NITF-CGM command set to any [`Write`] sink and
//! tracks where in the metafile structure it is. Every command checks the
//! lifecycle state first and is assembled completely before any octet
//! reaches the sink.
//!
//! A metafile is written in this order:
//!
//! ```text
//! BegMF  MFVersion MFDesc [FontList] [MFElemList]
//! BegPic VDCExt ColrMode [LineWidthMode] [EdgeWidthMode] [MarkerSizeMode]
//! BegPicBody  { attribute | primitive }*
//! EndPic
//! EndMF
//! ```

use std::io::Write;

use smallvec::smallvec;
use tracing::{debug, warn};

use super::constants::{TEXT_FINAL, op, style};
use super::fields::{Command, ShortParams};
use super::fonts::{FontStyle, NITF_CGM_FONTS, font_index};
use crate::common::error::{Error, Result};
use crate::common::{Point, RGBColor};

// =============================================================================
// Lifecycle
// =============================================================================

/// Position of the writer in the metafile structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    Null,
    MetafileHead,
    PictureHead,
    PictureBody,
    PictureClosed,
    MetafileClosed,
}

impl WriterState {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::MetafileHead => "METAFILE_HEAD",
            Self::PictureHead => "PICTURE_HEAD",
            Self::PictureBody => "PICTURE_BODY",
            Self::PictureClosed => "PICTURE_CLOSED",
            Self::MetafileClosed => "METAFILE_CLOSED",
        }
    }
}

/// Axis orientation selected by VDCExt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VdcOrientation {
    /// x grows right, y grows up
    RightUp,
    /// x grows right, y grows down
    RightDown,
    /// x grows left, y grows up
    LeftUp,
    /// x grows left, y grows down
    LeftDown,
}

impl VdcOrientation {
    /// Orientation of the extent from (x1, y1) to (x2, y2). A degenerate
    /// extent has none.
    pub fn of(x1: i16, y1: i16, x2: i16, y2: i16) -> Option<Self> {
        match (x1.cmp(&x2), y1.cmp(&y2)) {
            (std::cmp::Ordering::Less, std::cmp::Ordering::Less) => Some(Self::RightUp),
            (std::cmp::Ordering::Less, std::cmp::Ordering::Greater) => Some(Self::RightDown),
            (std::cmp::Ordering::Greater, std::cmp::Ordering::Less) => Some(Self::LeftUp),
            (std::cmp::Ordering::Greater, std::cmp::Ordering::Greater) => Some(Self::LeftDown),
            _ => None,
        }
    }

    /// Upright CharOri parameters (up x, up y, base x, base y).
    pub const fn char_orientation(self) -> [i16; 4] {
        match self {
            Self::RightUp => [0, 1, 1, 0],
            Self::RightDown => [0, -1, 1, 0],
            Self::LeftUp => [0, 1, -1, 0],
            Self::LeftDown => [0, -1, -1, 0],
        }
    }
}

/// Centre and conjugate diameter end points of the ellipse inscribed in the
/// box spanned by two corners.
pub fn ellipse_conjugates(corners: [Point; 2]) -> (Point, Point, Point) {
    let [p0, p1] = corners;
    let cx = ((i32::from(p0.x) + i32::from(p1.x)) / 2) as i16;
    let cy = ((i32::from(p0.y) + i32::from(p1.y)) / 2) as i16;
    let rx = (i32::from(p0.x) - i32::from(cx)).abs();
    let ry = (i32::from(p0.y) - i32::from(cy)).abs();
    (
        Point::new(cx, cy),
        Point::new((rx + i32::from(cx)) as i16, cy),
        Point::new(cx, (ry + i32::from(cy)) as i16),
    )
}

// =============================================================================
// Writer
// =============================================================================

/// Stateful NITF-CGM command writer.
pub struct CgmWriter<W: Write> {
    out: W,
    state: WriterState,
    orientation: Option<VdcOrientation>,
    /// Entries of the declared FontList, if one was written
    font_count: Option<usize>,
    commands: usize,
}

impl<W: Write> CgmWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            state: WriterState::Null,
            orientation: None,
            font_count: None,
            commands: 0,
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Orientation recorded by the last VDCExt.
    pub fn orientation(&self) -> Option<VdcOrientation> {
        self.orientation
    }

    /// Number of commands written so far.
    pub fn commands_written(&self) -> usize {
        self.commands
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Recover the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Run `f` against a scratch writer that starts from this writer's state.
    /// Its commands reach the sink only if `f` succeeds; on error nothing is
    /// written and the state is left as it was.
    pub fn staged<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut CgmWriter<Vec<u8>>) -> Result<()>,
    {
        let mut scratch = CgmWriter {
            out: Vec::new(),
            state: self.state,
            orientation: self.orientation,
            font_count: self.font_count,
            commands: 0,
        };
        f(&mut scratch)?;

        self.out.write_all(&scratch.out)?;
        self.state = scratch.state;
        self.orientation = scratch.orientation;
        self.font_count = scratch.font_count;
        self.commands += scratch.commands;
        Ok(())
    }

    fn require(&self, command: &'static str, allowed: &[WriterState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(Error::State {
                command,
                state: self.state.name(),
            })
        }
    }

    fn emit(&mut self, cmd: Command) -> Result<()> {
        let name = cmd.name();
        let bytes = cmd.finish()?;
        self.out.write_all(&bytes)?;
        self.commands += 1;
        debug!(command = name, octets = bytes.len(), "wrote command");
        Ok(())
    }

    fn body(&self, command: &'static str) -> Result<()> {
        self.require(command, &[WriterState::PictureBody])
    }

    // -------------------------------------------------------------------------
    // Delimiters and metafile descriptors
    // -------------------------------------------------------------------------

    /// Begin the metafile.
    pub fn beg_mf(&mut self, name: &str) -> Result<()> {
        self.require("BegMF", &[WriterState::Null])?;
        self.emit(Command::new("BegMF", op::BEG_MF).string(name)?)?;
        self.state = WriterState::MetafileHead;
        Ok(())
    }

    /// Metafile version. Only version 1 exists in this profile; other values
    /// are written as 1.
    pub fn mf_version(&mut self, version: i16) -> Result<()> {
        self.require("MFVersion", &[WriterState::MetafileHead])?;
        let version = if version == 1 {
            version
        } else {
            warn!(version, "MFVersion set to 1");
            1
        };
        self.emit(Command::new("MFVersion", op::MF_VERSION).short(version))
    }

    pub fn mf_desc(&mut self, description: &str) -> Result<()> {
        self.require("MFDesc", &[WriterState::MetafileHead])?;
        self.emit(Command::new("MFDesc", op::MF_DESC).string(description)?)
    }

    /// Declare the font list. Later TextFontIndex values are checked against
    /// its length.
    pub fn font_list<S: AsRef<str>>(&mut self, fonts: &[S]) -> Result<()> {
        self.require("FontList", &[WriterState::MetafileHead])?;
        self.emit(Command::new("FontList", op::FONT_LIST).strings(fonts)?)?;
        self.font_count = Some(fonts.len());
        Ok(())
    }

    /// Declare the NITF-CGM font table.
    pub fn nitf_font_list(&mut self) -> Result<()> {
        self.font_list(&NITF_CGM_FONTS)
    }

    /// Metafile element list: the drawing set plus the control set.
    pub fn mf_elem_list(&mut self) -> Result<()> {
        self.require("MFElemList", &[WriterState::MetafileHead])?;
        let params: ShortParams = smallvec![1, -1, 1];
        self.emit(Command::new("MFElemList", op::MF_ELEM_LIST).shorts(params))
    }

    pub fn beg_pic(&mut self, name: &str) -> Result<()> {
        self.require("BegPic", &[WriterState::MetafileHead])?;
        self.emit(Command::new("BegPic", op::BEG_PIC).string(name)?)?;
        self.state = WriterState::PictureHead;
        Ok(())
    }

    pub fn beg_pic_body(&mut self) -> Result<()> {
        self.require("BegPicBody", &[WriterState::PictureHead])?;
        self.emit(Command::new("BegPicBody", op::BEG_PIC_BODY))?;
        self.state = WriterState::PictureBody;
        Ok(())
    }

    pub fn end_pic(&mut self) -> Result<()> {
        self.require("EndPic", &[WriterState::PictureBody])?;
        self.emit(Command::new("EndPic", op::END_PIC))?;
        self.state = WriterState::PictureClosed;
        Ok(())
    }

    /// End the metafile and flush the sink.
    pub fn end_mf(&mut self) -> Result<()> {
        self.require("EndMF", &[WriterState::PictureClosed])?;
        self.emit(Command::new("EndMF", op::END_MF))?;
        self.out.flush()?;
        self.state = WriterState::MetafileClosed;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Picture descriptors
    // -------------------------------------------------------------------------

    /// VDC extent from (x1, y1) to (x2, y2). `(0, 480, 640, 0)` gives pixel
    /// coordinates with y pointing down.
    pub fn vdc_ext(&mut self, x1: i16, y1: i16, x2: i16, y2: i16) -> Result<()> {
        self.require("VDCExt", &[WriterState::PictureHead])?;
        self.emit(Command::new("VDCExt", op::VDC_EXT).shorts(smallvec![x1, y1, x2, y2]))?;
        self.orientation = VdcOrientation::of(x1, y1, x2, y2);
        if self.orientation.is_none() {
            warn!(x1, y1, x2, y2, "degenerate VDC extent");
        }
        Ok(())
    }

    pub fn colr_mode(&mut self, mode: i16) -> Result<()> {
        self.require("ColrMode", &[WriterState::PictureHead])?;
        self.emit(Command::new("ColrMode", op::COLR_MODE).short(mode))
    }

    pub fn line_width_mode(&mut self, mode: i16) -> Result<()> {
        self.require("LineWidthMode", &[WriterState::PictureHead])?;
        self.emit(Command::new("LineWidthMode", op::LINE_WIDTH_MODE).short(mode))
    }

    pub fn edge_width_mode(&mut self, mode: i16) -> Result<()> {
        self.require("EdgeWidthMode", &[WriterState::PictureHead])?;
        self.emit(Command::new("EdgeWidthMode", op::EDGE_WIDTH_MODE).short(mode))
    }

    pub fn marker_size_mode(&mut self, mode: i16) -> Result<()> {
        self.require("MarkerSizeMode", &[WriterState::PictureHead])?;
        self.emit(Command::new("MarkerSizeMode", op::MARKER_SIZE_MODE).short(mode))
    }

    // -------------------------------------------------------------------------
    // Primitives
    // -------------------------------------------------------------------------

    /// Final text at (x, y).
    pub fn text(&mut self, at: Point, s: &str) -> Result<()> {
        self.body("Text")?;
        self.emit(Command::new("Text", op::TEXT).text(at, TEXT_FINAL, s)?)
    }

    pub fn polygon(&mut self, points: &[Point]) -> Result<()> {
        self.body("Polygon")?;
        self.emit(Command::new("Polygon", op::POLYGON).points(points))
    }

    /// Polyline through `points`.
    pub fn line(&mut self, points: &[Point]) -> Result<()> {
        self.body("Line")?;
        self.emit(Command::new("Line", op::LINE).points(points))
    }

    /// Ellipse from its centre and the end points of two conjugate diameters.
    pub fn ellipse(&mut self, center: Point, conj1: Point, conj2: Point) -> Result<()> {
        self.body("Ellipse")?;
        self.emit(Command::new("Ellipse", op::ELLIPSE).points(&[center, conj1, conj2]))
    }

    /// Ellipse inscribed in the box spanned by two corners.
    pub fn ellipse_in(&mut self, corners: [Point; 2]) -> Result<()> {
        let (center, conj1, conj2) = ellipse_conjugates(corners);
        self.ellipse(center, conj1, conj2)
    }

    /// Elliptical arc from `start` to `end`, both direction vectors.
    pub fn ellip_arc(
        &mut self,
        center: Point,
        conj1: Point,
        conj2: Point,
        start: Point,
        end: Point,
    ) -> Result<()> {
        self.body("EllipArc")?;
        self.emit(
            Command::new("EllipArc", op::ELLIP_ARC).points(&[center, conj1, conj2, start, end]),
        )
    }

    /// Closed elliptical arc. `close_type` is PIE (0) or CHORD (1).
    pub fn ellip_arc_close(
        &mut self,
        center: Point,
        conj1: Point,
        conj2: Point,
        start: Point,
        end: Point,
        close_type: i16,
    ) -> Result<()> {
        self.body("EllipArcClose")?;
        self.emit(
            Command::new("EllipArcClose", op::ELLIP_ARC_CLOSE)
                .points(&[center, conj1, conj2, start, end])
                .short(close_type),
        )
    }

    /// Rectangle between two opposite corners.
    pub fn rect(&mut self, corners: [Point; 2]) -> Result<()> {
        self.body("Rect")?;
        self.emit(Command::new("Rect", op::RECT).points(&corners))
    }

    pub fn circle(&mut self, center: Point, radius: i16) -> Result<()> {
        self.body("Circle")?;
        self.emit(Command::new("Circle", op::CIRCLE).point(center).short(radius))
    }

    /// Circular arc from direction vector `start` to `end`.
    pub fn arc_ctr(&mut self, center: Point, start: Point, end: Point, radius: i16) -> Result<()> {
        self.body("ArcCtr")?;
        self.emit(
            Command::new("ArcCtr", op::ARC_CTR)
                .points(&[center, start, end])
                .short(radius),
        )
    }

    /// Closed circular arc. `close_type` is PIE (0) or CHORD (1).
    pub fn arc_ctr_close(
        &mut self,
        center: Point,
        start: Point,
        end: Point,
        radius: i16,
        close_type: i16,
    ) -> Result<()> {
        self.body("ArcCtrClose")?;
        self.emit(
            Command::new("ArcCtrClose", op::ARC_CTR_CLOSE)
                .points(&[center, start, end])
                .shorts(smallvec![radius, close_type]),
        )
    }

    // -------------------------------------------------------------------------
    // Colour attributes
    // -------------------------------------------------------------------------

    pub fn line_colr(&mut self, colour: RGBColor) -> Result<()> {
        self.body("LineColr")?;
        self.emit(Command::new("LineColr", op::LINE_COLR).rgb(colour))
    }

    /// LineColr from a packed `0xAARRGGBB` value.
    pub fn line_colr_argb(&mut self, argb: u32) -> Result<()> {
        self.body("LineColr")?;
        self.emit(Command::new("LineColr", op::LINE_COLR).argb(argb))
    }

    pub fn marker_colr(&mut self, colour: RGBColor) -> Result<()> {
        self.body("MarkerColr")?;
        self.emit(Command::new("MarkerColr", op::MARKER_COLR).rgb(colour))
    }

    pub fn marker_colr_argb(&mut self, argb: u32) -> Result<()> {
        self.body("MarkerColr")?;
        self.emit(Command::new("MarkerColr", op::MARKER_COLR).argb(argb))
    }

    pub fn text_colr(&mut self, colour: RGBColor) -> Result<()> {
        self.body("TextColr")?;
        self.emit(Command::new("TextColr", op::TEXT_COLR).rgb(colour))
    }

    pub fn text_colr_argb(&mut self, argb: u32) -> Result<()> {
        self.body("TextColr")?;
        self.emit(Command::new("TextColr", op::TEXT_COLR).argb(argb))
    }

    pub fn fill_colr(&mut self, colour: RGBColor) -> Result<()> {
        self.body("FillColr")?;
        self.emit(Command::new("FillColr", op::FILL_COLR).rgb(colour))
    }

    pub fn fill_colr_argb(&mut self, argb: u32) -> Result<()> {
        self.body("FillColr")?;
        self.emit(Command::new("FillColr", op::FILL_COLR).argb(argb))
    }

    pub fn edge_colr(&mut self, colour: RGBColor) -> Result<()> {
        self.body("EdgeColr")?;
        self.emit(Command::new("EdgeColr", op::EDGE_COLR).rgb(colour))
    }

    pub fn edge_colr_argb(&mut self, argb: u32) -> Result<()> {
        self.body("EdgeColr")?;
        self.emit(Command::new("EdgeColr", op::EDGE_COLR).argb(argb))
    }

    // -------------------------------------------------------------------------
    // Text attributes
    // -------------------------------------------------------------------------

    /// Character orientation from an up vector and a base vector.
    pub fn char_ori(&mut self, up: Point, base: Point) -> Result<()> {
        self.body("CharOri")?;
        self.emit(Command::new("CharOri", op::CHAR_ORI).points(&[up, base]))
    }

    /// Upright character orientation for the current VDC orientation.
    pub fn char_ori_upright(&mut self) -> Result<()> {
        self.body("CharOri")?;
        let orientation = self.orientation.ok_or_else(|| Error::InvalidParameter {
            command: "CharOri",
            reason: "no VDC orientation established".to_string(),
        })?;
        let params = ShortParams::from_buf(orientation.char_orientation());
        self.emit(Command::new("CharOri", op::CHAR_ORI).shorts(params))
    }

    /// Character height in pixels, baseline to capline.
    pub fn char_height(&mut self, height: i16) -> Result<()> {
        self.body("CharHeight")?;
        self.emit(Command::new("CharHeight", op::CHAR_HEIGHT).short(height))
    }

    /// Select a font by its one-based position in the declared font list, or
    /// in the NITF-CGM table when no list was declared.
    pub fn text_font_index(&mut self, index: i16) -> Result<()> {
        self.body("TextFontIndex")?;
        let max = self.font_count.unwrap_or(NITF_CGM_FONTS.len());
        if index < 1 || index as usize > max {
            return Err(Error::InvalidParameter {
                command: "TextFontIndex",
                reason: format!("font index {} out of range 1..={}", index, max),
            });
        }
        self.emit(Command::new("TextFontIndex", op::TEXT_FONT_INDEX).short(index))
    }

    /// Select a font by family name and style.
    pub fn text_font(&mut self, name: &str, style: FontStyle) -> Result<()> {
        self.body("TextFontIndex")?;
        let index = font_index(name, style);
        self.emit(Command::new("TextFontIndex", op::TEXT_FONT_INDEX).short(index))
    }

    // -------------------------------------------------------------------------
    // Line, marker and edge attributes
    // -------------------------------------------------------------------------

    /// Interior style, SOLID or EMPTY.
    pub fn int_style(&mut self, interior: i16) -> Result<()> {
        self.body("IntStyle")?;
        if interior != style::SOLID && interior != style::EMPTY {
            return Err(invalid_style("IntStyle", interior, "SOLID (1) or EMPTY (4)"));
        }
        self.emit(Command::new("IntStyle", op::INT_STYLE).short(interior))
    }

    /// Edge visibility. Any non-zero value turns edges on.
    pub fn edge_vis(&mut self, visible: i16) -> Result<()> {
        self.body("EdgeVis")?;
        let visible = i16::from(visible != 0);
        self.emit(Command::new("EdgeVis", op::EDGE_VIS).short(visible))
    }

    pub fn edge_type(&mut self, kind: i16) -> Result<()> {
        self.body("EdgeType")?;
        check_line_style("EdgeType", kind)?;
        self.emit(Command::new("EdgeType", op::EDGE_TYPE).short(kind))
    }

    pub fn marker_type(&mut self, kind: i16) -> Result<()> {
        self.body("MarkerType")?;
        check_line_style("MarkerType", kind)?;
        self.emit(Command::new("MarkerType", op::MARKER_TYPE).short(kind))
    }

    pub fn line_type(&mut self, kind: i16) -> Result<()> {
        self.body("LineType")?;
        check_line_style("LineType", kind)?;
        self.emit(Command::new("LineType", op::LINE_TYPE).short(kind))
    }

    pub fn edge_width(&mut self, width: i16) -> Result<()> {
        self.body("EdgeWidth")?;
        self.emit(Command::new("EdgeWidth", op::EDGE_WIDTH).short(width))
    }

    pub fn line_width(&mut self, width: i16) -> Result<()> {
        self.body("LineWidth")?;
        self.emit(Command::new("LineWidth", op::LINE_WIDTH).short(width))
    }

    pub fn marker_size(&mut self, size: i16) -> Result<()> {
        self.body("MarkerSize")?;
        self.emit(Command::new("MarkerSize", op::MARKER_SIZE).short(size))
    }
}

fn check_line_style(command: &'static str, kind: i16) -> Result<()> {
    if kind == style::SOLID || kind == style::DASHED {
        Ok(())
    } else {
        Err(invalid_style(command, kind, "SOLID (1) or DASHED (2)"))
    }
}

fn invalid_style(command: &'static str, value: i16, expected: &str) -> Error {
    Error::InvalidParameter {
        command,
        reason: format!("style {} is not {}", value, expected),
    }
}
