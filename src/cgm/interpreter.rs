//! CGM interpreter.
//!
//! Walks a binary metafile record by record, keeps the attribute state that
//! attribute elements set, and turns each primitive into a [`Glyph`] drawn
//! with the attributes in force at that point. Attribute state persists
//! until overwritten, so a primitive picks up whatever the stream last said
//! even if its own glyph did not write it.
//!
//! The walk runs from the first octet to the last. EndMF is only a marker,
//! so metafiles concatenated into one buffer decode as one glyph list.
//! Unknown elements are skipped and reported as [`DecodeWarning`]s. A
//! framing or payload error stops the walk; the glyphs decoded before it
//! stay available.

use tracing::{debug, warn};

use super::arc::find_arc_angles;
use super::constants::{ElementClass, op, style};
use super::fonts::{Font, FontStyle, family, font_from_index};
use super::glyph::{ArcClose, CircularArc, Glyph, Shape, TextRun, normalize_width};
use super::header::Record;
use crate::common::binary::{
    BinaryError, BinaryResult, read_cgm_string, read_i16_be, read_i16_pairs, read_u8,
};
use crate::common::error::{Error, Result};
use crate::common::{Point, RGBColor};

/// Gap between the Text anchor on the wire and the glyph anchor, on top of
/// the character height.
const TEXT_BASELINE_GAP: i32 = 5;

/// Something worth knowing that did not stop decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeWarning {
    /// An element this interpreter does not handle was skipped
    UnknownOpcode { offset: usize, opcode: u16 },
}

/// Attribute and descriptor state carried across records.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderState {
    pub metafile_name: Option<String>,
    pub description: Option<String>,
    pub picture_name: Option<String>,
    pub font_list: Vec<String>,
    pub vdc_extent: Option<[i16; 4]>,
    pub colour_mode: Option<i16>,
    /// EndMF elements seen so far
    pub metafiles_ended: usize,

    pub line_width: u16,
    pub line_color: RGBColor,
    pub line_type: i16,

    pub edge_width: u16,
    pub edge_color: RGBColor,
    pub edge_type: i16,
    pub edge_visible: bool,
    pub interior_style: i16,
    pub fill_color: RGBColor,

    pub text_color: RGBColor,
    pub font_name: &'static str,
    pub font_style: FontStyle,
    pub char_height: i16,
    /// Up vector then base vector
    pub char_orientation: [i16; 4],

    pub marker_type: i16,
    pub marker_size: i16,
    pub marker_color: RGBColor,
}

impl Default for DecoderState {
    fn default() -> Self {
        Self {
            metafile_name: None,
            description: None,
            picture_name: None,
            font_list: Vec::new(),
            vdc_extent: None,
            colour_mode: None,
            metafiles_ended: 0,
            line_width: 3,
            line_color: RGBColor::RED,
            line_type: style::SOLID,
            edge_width: 3,
            edge_color: RGBColor::RED,
            edge_type: style::SOLID,
            edge_visible: true,
            interior_style: style::EMPTY,
            fill_color: RGBColor::RED,
            text_color: RGBColor::RED,
            font_name: family::TIMES_ROMAN,
            font_style: FontStyle::BOLD,
            char_height: 16,
            char_orientation: [0, -1, 1, 0],
            marker_type: 1,
            marker_size: 3,
            marker_color: RGBColor::RED,
        }
    }
}

impl DecoderState {
    fn font(&self) -> Font {
        Font::new(self.font_name, self.font_style, self.char_height)
    }
}

/// Result of a lenient decode: everything recovered, plus the error that
/// ended it early, if any.
#[derive(Debug)]
pub struct Decoded {
    pub glyphs: Vec<Glyph>,
    pub warnings: Vec<DecodeWarning>,
    pub error: Option<Error>,
}

/// Binary CGM interpreter over a byte buffer.
pub struct CgmInterpreter<'a> {
    data: &'a [u8],
    offset: usize,
    state: DecoderState,
    glyphs: Vec<Glyph>,
    warnings: Vec<DecodeWarning>,
}

impl<'a> CgmInterpreter<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            state: DecoderState::default(),
            glyphs: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Interpret records until the end of the buffer.
    pub fn run(&mut self) -> Result<()> {
        while self.offset < self.data.len() {
            let (record, used) = Record::parse(self.data, self.offset)?;
            debug!(
                element = record.name().unwrap_or("?"),
                offset = record.offset,
                len = record.params.len(),
                "record"
            );
            self.apply(&record)?;
            self.offset += used;
        }
        Ok(())
    }

    /// Glyphs decoded so far.
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn into_glyphs(self) -> Vec<Glyph> {
        self.glyphs
    }

    pub fn warnings(&self) -> &[DecodeWarning] {
        &self.warnings
    }

    /// Current attribute and descriptor state.
    pub fn state(&self) -> &DecoderState {
        &self.state
    }

    /// Stream offset of the next record.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Run to completion and keep whatever was recovered.
    pub fn decode_lenient(mut self) -> Decoded {
        let error = self.run().err();
        Decoded {
            glyphs: self.glyphs,
            warnings: self.warnings,
            error,
        }
    }

    fn push(&mut self, shape: Shape, width: u16, color: RGBColor) {
        let key = self.glyphs.len() as i32 + 1;
        debug!(kind = shape.kind(), key, "glyph decoded");
        self.glyphs.push(Glyph::new(shape, width, color).with_key(key));
    }

    fn push_line(&mut self, shape: Shape) {
        self.push(shape, self.state.line_width, self.state.line_color);
    }

    fn push_edge(&mut self, shape: Shape) {
        self.push(shape, self.state.edge_width, self.state.edge_color);
    }

    fn apply(&mut self, record: &Record<'_>) -> Result<()> {
        let p = record.params;
        let at = record.offset;
        let lift = |e: BinaryError| Error::from_binary(e, at);

        match record.opcode {
            // Delimiters
            op::BEG_MF => {
                self.state.metafile_name = Some(read_cgm_string(p, 0).map_err(lift)?.0);
            },
            op::BEG_PIC => {
                self.state.picture_name = Some(read_cgm_string(p, 0).map_err(lift)?.0);
            },
            op::BEG_PIC_BODY | op::END_PIC => {},
            op::END_MF => {
                self.state.metafiles_ended += 1;
                debug!(offset = at, count = self.state.metafiles_ended, "end of metafile");
            },

            // Metafile descriptors
            op::MF_VERSION | op::MF_ELEM_LIST => {},
            op::MF_DESC => {
                self.state.description = Some(read_cgm_string(p, 0).map_err(lift)?.0);
            },
            op::FONT_LIST => self.state.font_list = read_string_list(p).map_err(lift)?,

            // Picture descriptors
            op::VDC_EXT => {
                let [(x1, y1), (x2, y2)] = pairs::<2>(p).map_err(lift)?;
                self.state.vdc_extent = Some([x1, y1, x2, y2]);
            },
            op::COLR_MODE => self.state.colour_mode = Some(read_i16_be(p, 0).map_err(lift)?),
            op::LINE_WIDTH_MODE | op::EDGE_WIDTH_MODE | op::MARKER_SIZE_MODE => {},

            // Attributes
            op::LINE_WIDTH => self.state.line_width = width(read_i16_be(p, 0).map_err(lift)?),
            op::LINE_COLR => self.state.line_color = colour(p).map_err(lift)?,
            op::LINE_TYPE => self.state.line_type = read_i16_be(p, 0).map_err(lift)?,
            op::EDGE_WIDTH => self.state.edge_width = width(read_i16_be(p, 0).map_err(lift)?),
            op::EDGE_COLR => self.state.edge_color = colour(p).map_err(lift)?,
            op::EDGE_TYPE => self.state.edge_type = read_i16_be(p, 0).map_err(lift)?,
            op::EDGE_VIS => self.state.edge_visible = read_i16_be(p, 0).map_err(lift)? != 0,
            op::INT_STYLE => self.state.interior_style = read_i16_be(p, 0).map_err(lift)?,
            op::FILL_COLR => self.state.fill_color = colour(p).map_err(lift)?,
            op::TEXT_COLR => self.state.text_color = colour(p).map_err(lift)?,
            op::CHAR_HEIGHT => self.state.char_height = read_i16_be(p, 0).map_err(lift)?,
            op::CHAR_ORI => {
                let [(ux, uy), (bx, by)] = pairs::<2>(p).map_err(lift)?;
                self.state.char_orientation = [ux, uy, bx, by];
            },
            op::TEXT_FONT_INDEX => {
                let (name, style) = font_from_index(read_i16_be(p, 0).map_err(lift)?);
                self.state.font_name = name;
                self.state.font_style = style;
            },
            op::MARKER_TYPE => self.state.marker_type = read_i16_be(p, 0).map_err(lift)?,
            op::MARKER_SIZE => self.state.marker_size = read_i16_be(p, 0).map_err(lift)?,
            op::MARKER_COLR => self.state.marker_color = colour(p).map_err(lift)?,

            // Primitives
            // two points are a Line, so a two-point Polyline comes back as one
            op::LINE => {
                let points = point_list(p).map_err(|reason| malformed(at, reason))?;
                let shape = if points.len() == 2 {
                    Shape::Line {
                        from: points[0],
                        to: points[1],
                    }
                } else {
                    Shape::Polyline { points }
                };
                self.push_line(shape);
            },
            op::POLYGON => {
                let points = point_list(p).map_err(|reason| malformed(at, reason))?;
                self.push_line(Shape::Polygon { points });
            },
            op::RECT => {
                let [a, b] = pairs::<2>(p).map_err(lift)?;
                self.push_edge(Shape::Rect {
                    corners: [a.into(), b.into()],
                });
            },
            op::CIRCLE => {
                let [center] = pairs::<1>(p).map_err(lift)?;
                let radius = read_i16_be(p, 4).map_err(lift)?;
                self.push_edge(Shape::Circle {
                    center: center.into(),
                    radius,
                });
            },
            op::ELLIPSE => {
                let [c, c1, c2] = pairs::<3>(p).map_err(lift)?;
                self.push_edge(Shape::Oval {
                    corners: ellipse_box(c.into(), c1.into(), c2.into()),
                });
            },
            op::ARC_CTR => {
                let arc = circular_arc(p).map_err(lift)?;
                self.push_line(Shape::CircularArc(arc));
            },
            op::ARC_CTR_CLOSE => {
                let arc = circular_arc(p).map_err(lift)?;
                let close = ArcClose::from_code(read_i16_be(p, 14).map_err(lift)?);
                self.push_edge(Shape::CircularArcClose { arc, close });
            },
            op::ELLIP_ARC => {
                let shape = elliptical_arc(p).map_err(lift)?;
                self.push_line(shape);
            },
            op::ELLIP_ARC_CLOSE => {
                // the close type has no place in a glyph and is dropped
                read_i16_be(p, 20).map_err(lift)?;
                let shape = elliptical_arc(p).map_err(lift)?;
                self.push_edge(shape);
            },
            op::TEXT => {
                let [(x, y)] = pairs::<1>(p).map_err(lift)?;
                let (content, _) = read_cgm_string(p, 6).map_err(lift)?;
                let y = i32::from(y) - i32::from(self.state.char_height) - TEXT_BASELINE_GAP;
                let anchor = Point::new(x, y.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16);
                let run = TextRun {
                    anchor,
                    content,
                    font: self.state.font(),
                };
                self.push(Shape::Text(run), 1, self.state.text_color);
            },

            opcode => {
                warn!(
                    offset = at,
                    opcode = format_args!("0x{:04X}", opcode),
                    class = ?ElementClass::of(opcode),
                    "unknown element skipped"
                );
                self.warnings.push(DecodeWarning::UnknownOpcode { offset: at, opcode });
            },
        }
        Ok(())
    }
}

fn malformed(offset: usize, reason: String) -> Error {
    Error::MalformedLength { offset, reason }
}

fn width(value: i16) -> u16 {
    normalize_width(value.max(1) as u16)
}

fn colour(p: &[u8]) -> BinaryResult<RGBColor> {
    Ok(RGBColor::new(read_u8(p, 0)?, read_u8(p, 1)?, read_u8(p, 2)?))
}

fn pairs<const N: usize>(p: &[u8]) -> BinaryResult<[(i16, i16); N]> {
    let list = read_i16_pairs(p, 0, N)?;
    let mut out = [(0, 0); N];
    out.copy_from_slice(&list);
    Ok(out)
}

fn point_list(p: &[u8]) -> std::result::Result<Vec<Point>, String> {
    if p.len() % 4 != 0 {
        return Err(format!("point list of {} octets is not a whole number of points", p.len()));
    }
    read_i16_pairs(p, 0, p.len() / 4)
        .map(|list| list.into_iter().map(Point::from).collect())
        .map_err(|e| e.to_string())
}

/// Strings of a FontList payload. A zero octet in the last position is read
/// as padding, so a list ending in an empty string loses that entry.
fn read_string_list(p: &[u8]) -> BinaryResult<Vec<String>> {
    let mut list = Vec::new();
    let mut pos = 0;
    // a trailing zero octet is padding, not an empty string
    while pos < p.len() && !(pos + 1 == p.len() && p[pos] == 0) {
        let (s, used) = read_cgm_string(p, pos)?;
        list.push(s);
        pos += used;
    }
    Ok(list)
}

fn circular_arc(p: &[u8]) -> BinaryResult<CircularArc> {
    let [center, start, end] = pairs::<3>(p)?;
    let radius = read_i16_be(p, 12)?;
    let angles = find_arc_angles(start.into(), end.into());
    Ok(CircularArc {
        center: center.into(),
        radius,
        start_angle: angles.start.round() as i32,
        delta_angle: angles.delta().round() as i32,
    })
}

fn elliptical_arc(p: &[u8]) -> BinaryResult<Shape> {
    let [c, c1, c2, start, end] = pairs::<5>(p)?;
    let angles = find_arc_angles(start.into(), end.into());
    Ok(Shape::EllipticalArc {
        corners: ellipse_box(c.into(), c1.into(), c2.into()),
        start_angle: angles.start.round() as i32,
        delta_angle: angles.delta().round() as i32,
    })
}

/// Bounding box of an axis-aligned ellipse, minimum corner first.
fn ellipse_box(center: Point, conj1: Point, conj2: Point) -> [Point; 2] {
    let far_x = 2 * i32::from(center.x) - i32::from(conj1.x);
    let far_y = 2 * i32::from(center.y) - i32::from(conj2.y);
    let (x0, x1) = min_max(far_x, i32::from(conj1.x));
    let (y0, y1) = min_max(far_y, i32::from(conj2.y));
    [Point::new(x0, y0), Point::new(x1, y1)]
}

fn min_max(a: i32, b: i32) -> (i16, i16) {
    let clamp = |v: i32| v.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
    (clamp(a.min(b)), clamp(a.max(b)))
}
