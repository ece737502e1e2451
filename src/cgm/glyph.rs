//! Whiteboard glyphs: the drawable shapes carried by a metafile.
//!
//! A [`Glyph`] pairs a [`Shape`] with the stroke attributes every shape
//! shares. Shapes store their geometry in the form the CGM primitive needs,
//! so the writer never has to guess intent from raw control points.

use serde::{Deserialize, Serialize};

use super::constants::close;
use super::fonts::Font;
use crate::common::{Bounds, Point, RGBColor};

/// How a closed circular arc is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArcClose {
    /// Two radii from the centre to the arc ends
    #[default]
    Pie,
    /// A chord joining the arc ends
    Chord,
}

impl ArcClose {
    /// Wire value of the close type.
    pub const fn code(self) -> i16 {
        match self {
            Self::Pie => close::PIE,
            Self::Chord => close::CHORD,
        }
    }

    /// Close type for a wire value. Anything other than a chord closes as a pie.
    pub const fn from_code(code: i16) -> Self {
        if code == close::CHORD {
            Self::Chord
        } else {
            Self::Pie
        }
    }
}

/// A circular arc in degrees, counter-clockwise on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CircularArc {
    pub center: Point,
    pub radius: i16,
    pub start_angle: i32,
    pub delta_angle: i32,
}

/// A run of text anchored at a point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRun {
    pub anchor: Point,
    pub content: String,
    pub font: Font,
}

/// Geometry of a glyph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Line { from: Point, to: Point },
    Polyline { points: Vec<Point> },
    Rect { corners: [Point; 2] },
    Circle { center: Point, radius: i16 },
    Oval { corners: [Point; 2] },
    Text(TextRun),
    Polygon { points: Vec<Point> },
    CircularArc(CircularArc),
    CircularArcClose { arc: CircularArc, close: ArcClose },
    EllipticalArc {
        corners: [Point; 2],
        start_angle: i32,
        delta_angle: i32,
    },
    /// Rectangle with both diagonals drawn. Has no CGM encoding.
    CrossRect { corners: [Point; 2] },
}

impl Shape {
    /// Circle through `rim` centred on `center`.
    pub fn circle(center: Point, rim: Point) -> Self {
        Self::Circle {
            center,
            radius: center.distance_to(rim),
        }
    }

    /// Circular arc whose radius reaches `rim`.
    pub fn circular_arc(center: Point, rim: Point, start_angle: i32, delta_angle: i32) -> Self {
        Self::CircularArc(CircularArc {
            center,
            radius: center.distance_to(rim),
            start_angle,
            delta_angle,
        })
    }

    /// Text with the given font.
    pub fn text(anchor: Point, content: impl Into<String>, font: Font) -> Self {
        Self::Text(TextRun {
            anchor,
            content: content.into(),
            font,
        })
    }

    /// Variant name, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Line { .. } => "Line",
            Self::Polyline { .. } => "Polyline",
            Self::Rect { .. } => "Rect",
            Self::Circle { .. } => "Circle",
            Self::Oval { .. } => "Oval",
            Self::Text(_) => "Text",
            Self::Polygon { .. } => "Polygon",
            Self::CircularArc(_) => "CircularArc",
            Self::CircularArcClose { .. } => "CircularArcClose",
            Self::EllipticalArc { .. } => "EllipticalArc",
            Self::CrossRect { .. } => "CrossRect",
        }
    }

    /// Defining points. Circles and circular arcs give the centre and the
    /// point one radius to its right.
    pub fn points(&self) -> Vec<Point> {
        match self {
            Self::Line { from, to } => vec![*from, *to],
            Self::Polyline { points } | Self::Polygon { points } => points.clone(),
            Self::Rect { corners }
            | Self::Oval { corners }
            | Self::CrossRect { corners }
            | Self::EllipticalArc { corners, .. } => corners.to_vec(),
            Self::Circle { center, radius } => vec![*center, center.offset(*radius, 0)],
            Self::CircularArc(arc) | Self::CircularArcClose { arc, .. } => {
                vec![arc.center, arc.center.offset(arc.radius, 0)]
            },
            Self::Text(run) => vec![run.anchor],
        }
    }

    /// Bounding box.
    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Circle { center, radius } => Bounds::around(*center, *radius),
            Self::CircularArc(arc) | Self::CircularArcClose { arc, .. } => {
                Bounds::around(arc.center, arc.radius)
            },
            _ => Bounds::enclosing(&self.points()),
        }
    }

    /// Move every point by (dx, dy).
    pub fn translate(&mut self, dx: i16, dy: i16) {
        let shift = |p: &mut Point| *p = p.offset(dx, dy);
        match self {
            Self::Line { from, to } => {
                shift(from);
                shift(to);
            },
            Self::Polyline { points } | Self::Polygon { points } => points.iter_mut().for_each(shift),
            Self::Rect { corners }
            | Self::Oval { corners }
            | Self::CrossRect { corners }
            | Self::EllipticalArc { corners, .. } => corners.iter_mut().for_each(shift),
            Self::Circle { center, .. } => shift(center),
            Self::CircularArc(arc) | Self::CircularArcClose { arc, .. } => shift(&mut arc.center),
            Self::Text(run) => shift(&mut run.anchor),
        }
    }
}

/// A drawable whiteboard element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Glyph {
    pub shape: Shape,
    /// Stroke width in pixels, at least 1
    pub width: u16,
    pub color: RGBColor,
    /// Identifier assigned by the owner of the glyph; 0 when unassigned
    pub key: i32,
}

impl Glyph {
    /// New glyph with an unassigned key. A zero width is stored as 1, and
    /// text is always stroked at width 1.
    pub fn new(shape: Shape, width: u16, color: RGBColor) -> Self {
        let width = match shape {
            Shape::Text(_) => 1,
            _ => normalize_width(width),
        };
        Self {
            shape,
            width,
            color,
            key: 0,
        }
    }

    pub fn with_key(mut self, key: i32) -> Self {
        self.key = key;
        self
    }

    /// Colour packed as `0xAARRGGBB`.
    #[inline]
    pub fn argb(&self) -> u32 {
        self.color.to_argb()
    }

    pub fn bounds(&self) -> Bounds {
        self.shape.bounds()
    }

    pub fn points(&self) -> Vec<Point> {
        self.shape.points()
    }

    pub fn translate(&mut self, dx: i16, dy: i16) {
        self.shape.translate(dx, dy);
    }

    /// Move the glyph so that its bounding box starts at (x, y).
    pub fn set_location(&mut self, x: i16, y: i16) {
        let b = self.bounds();
        self.translate(
            (i32::from(x) - b.x) as i16,
            (i32::from(y) - b.y) as i16,
        );
    }
}

/// Clamp a stroke width into the range the wire can carry.
pub fn normalize_width(width: u16) -> u16 {
    width.clamp(1, i16::MAX as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cgm::fonts::FontStyle;

    #[test]
    fn test_zero_width_is_one() {
        let g = Glyph::new(
            Shape::Line {
                from: Point::new(0, 0),
                to: Point::new(5, 5),
            },
            0,
            RGBColor::BLUE,
        );
        assert_eq!(g.width, 1);
        assert_eq!(g.argb(), 0xFF00_00FF);
    }

    #[test]
    fn test_circle_from_rim() {
        let shape = Shape::circle(Point::new(100, 100), Point::new(150, 100));
        assert_eq!(
            shape,
            Shape::Circle {
                center: Point::new(100, 100),
                radius: 50
            }
        );
        assert_eq!(shape.points(), vec![Point::new(100, 100), Point::new(150, 100)]);
        assert_eq!(shape.bounds(), Bounds::new(50, 50, 100, 100));
    }

    #[test]
    fn test_translate_and_set_location() {
        let mut g = Glyph::new(
            Shape::Polygon {
                points: vec![Point::new(10, 10), Point::new(50, 10), Point::new(30, 40)],
            },
            2,
            RGBColor::GREEN,
        );
        g.translate(5, -5);
        assert_eq!(g.bounds(), Bounds::new(15, 5, 40, 30));
        g.set_location(0, 0);
        assert_eq!(g.bounds(), Bounds::new(0, 0, 40, 30));
        assert_eq!(g.points()[2], Point::new(20, 30));
    }

    #[test]
    fn test_text_points() {
        let shape = Shape::text(
            Point::new(30, 40),
            "Hello",
            Font::new("Helvetica", FontStyle::ITALIC, 12),
        );
        assert_eq!(shape.points(), vec![Point::new(30, 40)]);
        assert_eq!(shape.kind(), "Text");
    }

    #[test]
    fn test_text_width_is_one() {
        let text = Shape::text(Point::new(0, 0), "x", Font::default());
        assert_eq!(Glyph::new(text, 3, RGBColor::RED).width, 1);
    }

    #[test]
    fn test_arc_close_codes() {
        assert_eq!(ArcClose::from_code(ArcClose::Chord.code()), ArcClose::Chord);
        assert_eq!(ArcClose::from_code(7), ArcClose::Pie);
    }
}
