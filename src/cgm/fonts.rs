//! NITF-CGM font table and text font index mapping.
//!
//! The profile names 28 fonts. The encoder turns a family name and a style
//! into a one-based index laid out as `family + style + 1`, where the family
//! offset is the position of the first table entry whose first five
//! characters match the name and the style offset follows
//! [`STYLE_ORDER`]. The interpreter maps an index back onto the three
//! families a whiteboard offers.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Font names of the NITF-CGM profile, in FontList order.
pub const NITF_CGM_FONTS: [&str; 28] = [
    "TIMES_ROMAN",
    "TIMES_ITALIC",
    "TIMES_BOLD",
    "TIMES_BOLD_ITALIC",
    "HELVETICA",
    "HELVETICA_OBLIQUE",
    "HELVETICA_BOLD",
    "HELVETICA_BOLD_OBLIQUE",
    "COURIER",
    "COURIER_BOLD",
    "COURIER_ITALIC",
    "COURIER_BOLD_ITALIC",
    "HERSHEY/CARTOGRAPHIC_ROMAN",
    "HERSHEY/CARTOGRAPHIC_GREEK",
    "HERSHEY/SIMPLEX_ROMAN",
    "HERSHEY/SIMPLEX_GREEK",
    "HERSHEY/SIMPLEX_SCRIPT",
    "HERSHEY/COMPLEX_ROMAN",
    "HERSHEY/COMPLEX_GREEK",
    "HERSHEY/COMPLEX_SCRIPT",
    "HERSHEY/COMPLEX_ITALIC",
    "HERSHEY/COMPLEX_CYRILLIC",
    "HERSHEY/DUPLEX_ROMAN",
    "HERSHEY/TRIPLEX_ROMAN",
    "HERSHEY/TRIPLEX_ITALIC",
    "HERSHEY/GOTHIC_GERMAN",
    "HERSHEY/GOTHIC_ENGLISH",
    "HERSHEY/GOTHIC_ITALIAN",
];

/// Characters compared when matching a family name against the table.
const MATCH_PREFIX: usize = 5;

bitflags! {
    /// Font style flags carried by text glyphs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct FontStyle: u8 {
        const BOLD = 0x01;
        const ITALIC = 0x02;
    }
}

impl FontStyle {
    pub const PLAIN: Self = Self::empty();
}

/// Style offsets within a family block.
pub const STYLE_ORDER: [FontStyle; 4] = [
    FontStyle::PLAIN,
    FontStyle::ITALIC,
    FontStyle::BOLD,
    FontStyle::BOLD.union(FontStyle::ITALIC),
];

/// Family names produced by the interpreter.
pub mod family {
    pub const TIMES_ROMAN: &str = "TimesRoman";
    pub const HELVETICA: &str = "Helvetica";
    pub const COURIER: &str = "Courier";
}

/// A text font: family name, style, and point size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Font {
    pub name: String,
    pub style: FontStyle,
    pub size: i16,
}

impl Font {
    pub fn new(name: impl Into<String>, style: FontStyle, size: i16) -> Self {
        Self {
            name: name.into(),
            style,
            size,
        }
    }

    /// TextFontIndex value for this font.
    pub fn index(&self) -> i16 {
        font_index(&self.name, self.style)
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new(family::TIMES_ROMAN, FontStyle::BOLD, 16)
    }
}

/// Position of the first table entry whose first five characters match
/// `name`, ignoring ASCII case.
pub fn family_offset(name: &str) -> Option<usize> {
    let prefix: Vec<char> = name.chars().take(MATCH_PREFIX).collect();
    if prefix.len() < MATCH_PREFIX {
        return None;
    }
    NITF_CGM_FONTS.iter().position(|entry| {
        entry
            .chars()
            .take(MATCH_PREFIX)
            .zip(&prefix)
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    })
}

/// Offset of a style within a family block.
pub fn style_offset(style: FontStyle) -> usize {
    STYLE_ORDER.iter().position(|s| *s == style).unwrap_or(0)
}

/// One-based TextFontIndex for a family name and style. An unknown family
/// falls back to the first table entry.
pub fn font_index(name: &str, style: FontStyle) -> i16 {
    let family = family_offset(name).unwrap_or_else(|| {
        warn!(font = name, "font not in NITF-CGM font list, using {}", NITF_CGM_FONTS[0]);
        0
    });
    (family + style_offset(style) + 1) as i16
}

/// Family and style for a TextFontIndex value.
pub fn font_from_index(index: i16) -> (&'static str, FontStyle) {
    let name = if index < 5 {
        family::TIMES_ROMAN
    } else if index < 9 {
        family::HELVETICA
    } else {
        family::COURIER
    };
    let style = match index {
        1 | 5 | 9 => FontStyle::PLAIN,
        2 | 6 | 10 => FontStyle::ITALIC,
        3 | 7 | 11 => FontStyle::BOLD,
        _ => FontStyle::BOLD | FontStyle::ITALIC,
    };
    (name, style)
}
