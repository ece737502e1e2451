//! Pixel-space geometry shared by glyphs and CGM primitives.
//!
//! Coordinates are signed 16-bit integers, the only integer precision the
//! NITF-CGM profile allows. Derived extents use `i32` so that spans across
//! the whole `i16` range do not overflow.

use serde::{Deserialize, Serialize};

/// A pixel coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

impl Point {
    #[inline]
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`, rounded to the nearest pixel.
    pub fn distance_to(&self, other: Point) -> i16 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        (dx * dx + dy * dy).sqrt().round().min(f64::from(i16::MAX)) as i16
    }

    /// Shift by (dx, dy), wrapping at the `i16` boundary like the wire type does.
    #[inline]
    pub const fn offset(&self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }
}

impl From<(i16, i16)> for Point {
    fn from((x, y): (i16, i16)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box given by its upper-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest box holding every point. An empty slice gives a zero box.
    pub fn enclosing(points: &[Point]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let (mut min_x, mut max_x) = (first.x, first.x);
        let (mut min_y, mut max_y) = (first.y, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        Self::new(
            i32::from(min_x),
            i32::from(min_y),
            i32::from(max_x) - i32::from(min_x),
            i32::from(max_y) - i32::from(min_y),
        )
    }

    /// Square box centred on `center` with half-side `radius`.
    pub fn around(center: Point, radius: i16) -> Self {
        let r = i32::from(radius);
        Self::new(i32::from(center.x) - r, i32::from(center.y) - r, 2 * r, 2 * r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_rounds() {
        assert_eq!(Point::new(100, 100).distance_to(Point::new(150, 100)), 50);
        // sqrt(2) * 10 = 14.14
        assert_eq!(Point::new(0, 0).distance_to(Point::new(10, 10)), 14);
        assert_eq!(Point::new(0, 0).distance_to(Point::new(3, 4)), 5);
    }

    #[test]
    fn test_enclosing() {
        let b = Bounds::enclosing(&[Point::new(10, 40), Point::new(-5, 20), Point::new(30, 25)]);
        assert_eq!(b, Bounds::new(-5, 20, 35, 20));
        assert_eq!(Bounds::enclosing(&[]), Bounds::default());
    }

    #[test]
    fn test_around() {
        assert_eq!(Bounds::around(Point::new(100, 100), 50), Bounds::new(50, 50, 100, 100));
    }
}
