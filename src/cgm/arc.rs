//! Arc angle geometry.
//!
//! Glyph arcs carry a start angle and a sweep in degrees, measured
//! counter-clockwise on screen. The wire carries direction vectors relative
//! to the arc centre in pixel coordinates, where y grows downward. The
//! interpreter reads the end vector as the start angle and the start vector
//! as the end angle, so the writer emits them in that crossed order.

use crate::common::Point;

/// Length of the direction vectors the writer emits.
pub const ARC_VECTOR_LENGTH: f64 = 1000.0;

/// Stand-in for a zero x component when taking the slope of a vertical vector.
const VERTICAL_DX: f64 = 0.00001;

/// Screen quadrant of a direction vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    /// Up and to the right
    First,
    /// Down and to the right
    Second,
    /// Down and to the left
    Third,
    /// Up and to the left
    Fourth,
}

impl Quadrant {
    /// Classify a vector in pixel coordinates. The axes belong to the
    /// quadrant whose test they satisfy first in the order below.
    pub fn of(dx: f64, dy: f64) -> Self {
        if dx < 0.0 && dy > 0.0 {
            Self::Third
        } else if dx <= 0.0 && dy <= 0.0 {
            Self::Fourth
        } else if dx > 0.0 && dy < 0.0 {
            Self::First
        } else {
            Self::Second
        }
    }
}

/// Angle in degrees, in (0, 360], of the vector (dx, dy) given in pixel
/// coordinates.
pub fn find_angle(dx: f64, dy: f64) -> f64 {
    let run = if dx == 0.0 { VERTICAL_DX } else { dx };
    let theta = (dy / run).abs().atan().to_degrees();
    match Quadrant::of(dx, dy) {
        Quadrant::First => theta,
        Quadrant::Second => 360.0 - theta,
        Quadrant::Third => 180.0 + theta,
        Quadrant::Fourth => 180.0 - theta,
    }
}

/// Start and end angles recovered from an arc's wire vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcAngles {
    pub start: f64,
    pub end: f64,
}

impl ArcAngles {
    /// Sweep from start to end.
    #[inline]
    pub fn delta(&self) -> f64 {
        self.end - self.start
    }
}

/// Recover glyph angles from the start and end vectors of an arc command.
///
/// The end vector gives the start angle and the start vector gives the end
/// angle. A start angle of 360 is folded to 0, and the end angle is lifted
/// by a full turn when it would otherwise precede the start.
///
/// Coincident vectors carry no sweep of their own. On the positive x axis
/// only the start folds, so they read as a 360 degree sweep from 0; in any
/// other direction they read as a zero sweep.
pub fn find_arc_angles(start_vec: Point, end_vec: Point) -> ArcAngles {
    let mut start = find_angle(f64::from(end_vec.x), f64::from(end_vec.y));
    let mut end = find_angle(f64::from(start_vec.x), f64::from(start_vec.y));
    if start == 360.0 {
        start = 0.0;
    }
    if start > end {
        end += 360.0;
    }
    ArcAngles { start, end }
}

/// Unit-length-scaled direction vector for an angle in degrees.
pub fn direction(angle: f64) -> Point {
    let rad = angle.to_radians();
    Point::new(
        (ARC_VECTOR_LENGTH * rad.cos()).round() as i16,
        -(ARC_VECTOR_LENGTH * rad.sin()).round() as i16,
    )
}

/// Start and end vectors to put on the wire for a glyph arc.
pub fn arc_vectors(start_angle: i32, delta_angle: i32) -> (Point, Point) {
    let start = f64::from(start_angle);
    let end = start + f64::from(delta_angle);
    (direction(end), direction(start))
}
