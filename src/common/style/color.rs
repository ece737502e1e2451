use serde::{Deserialize, Serialize};
use std::fmt;

/// RGB color representation.
///
/// Represents a color using red, green, and blue components, each in the range 0-255.
/// Glyphs also carry the packed ARGB form, which is what the integer colour
/// commands put on the wire.
///
/// # Examples
///
/// ```rust
/// use nitf_cgm::common::RGBColor;
///
/// // Create a red color
/// let red = RGBColor::new(255, 0, 0);
/// assert_eq!(red.to_argb(), 0xFFFF_0000);
///
/// // Create from hex string
/// let blue = RGBColor::from_hex("0000FF").unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RGBColor {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl RGBColor {
    pub const RED: Self = Self::new(255, 0, 0);
    pub const GREEN: Self = Self::new(0, 255, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xAARRGGBB` integer. Alpha is ignored.
    ///
    /// ```rust
    /// use nitf_cgm::common::RGBColor;
    ///
    /// assert_eq!(RGBColor::from_argb(0x8012_3456), RGBColor::new(0x12, 0x34, 0x56));
    /// ```
    #[inline]
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Pack as `0xAARRGGBB` with an opaque alpha.
    #[inline]
    pub const fn to_argb(&self) -> u32 {
        0xFF00_0000 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Create an RGB color from a hex string.
    ///
    /// # Arguments
    ///
    /// * `hex` - Hex color string (e.g., "FF0000" or "#FF0000")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Self::new(r, g, b))
    }

    /// Convert to hex string (without # prefix).
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for RGBColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb_round_trip() {
        let c = RGBColor::new(0x12, 0xAB, 0xEF);
        assert_eq!(c.to_argb(), 0xFF12_ABEF);
        assert_eq!(RGBColor::from_argb(c.to_argb()), c);
    }

    #[test]
    fn test_hex() {
        assert_eq!(RGBColor::from_hex("#00FF00"), Some(RGBColor::GREEN));
        assert_eq!(RGBColor::RED.to_string(), "#FF0000");
        assert_eq!(RGBColor::from_hex("12345"), None);
    }
}
