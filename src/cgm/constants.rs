//! CGM constants and enumerations
//!
//! Defines the element classes, the opcodes of the NITF-CGM subset, and the
//! enumerated parameter values used by the binary encoding.
//!
//! Each 16-bit opcode word holds the element class in bits 15-12, the element
//! id in bits 11-5, and the parameter length in bits 4-0. The constants below
//! carry class and id with a zero length field.

/// Build an opcode from element class and id.
#[inline]
pub const fn opcode(class: u16, id: u16) -> u16 {
    (class & 0x0F) << 12 | (id & 0x7F) << 5
}

/// Mask selecting class and id from a header word.
pub const OPCODE_MASK: u16 = 0xFFE0;

/// Mask selecting the 5-bit length field from a header word.
pub const LENGTH_MASK: u16 = 0x001F;

/// Length field value announcing a long-form header.
pub const LONG_FORM: u16 = 0x001F;

/// Largest payload (padding excluded) a short-form header can announce.
pub const MAX_SHORT_FORM_LEN: usize = 30;

/// Largest payload a single long-form partition may carry.
pub const MAX_PARTITION_LEN: usize = 32765;

/// Continuation flag in the long-form length word.
pub const PARTITION_FLAG: u16 = 0x8000;

/// Element classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ElementClass {
    Delimiter = 0,
    MetafileDescriptor = 1,
    PictureDescriptor = 2,
    Control = 3,
    Primitive = 4,
    Attribute = 5,
}

impl ElementClass {
    /// Class of an opcode or header word. Classes 6-15 are not used by NITF-CGM.
    pub const fn of(op: u16) -> Option<Self> {
        match op >> 12 {
            0 => Some(Self::Delimiter),
            1 => Some(Self::MetafileDescriptor),
            2 => Some(Self::PictureDescriptor),
            3 => Some(Self::Control),
            4 => Some(Self::Primitive),
            5 => Some(Self::Attribute),
            _ => None,
        }
    }
}

/// CGM opcodes (class | id, zero length field)
#[allow(dead_code)]
pub mod op {
    use super::opcode;

    // Class 0: delimiters
    pub const BEG_MF: u16 = opcode(0, 1);
    pub const END_MF: u16 = opcode(0, 2);
    pub const BEG_PIC: u16 = opcode(0, 3);
    pub const BEG_PIC_BODY: u16 = opcode(0, 4);
    pub const END_PIC: u16 = opcode(0, 5);

    // Class 1: metafile descriptors
    pub const MF_VERSION: u16 = opcode(1, 1);
    pub const MF_DESC: u16 = opcode(1, 2);
    pub const VDC_TYPE: u16 = opcode(1, 3);
    pub const INTEGER_PREC: u16 = opcode(1, 4);
    pub const REAL_PREC: u16 = opcode(1, 5);
    pub const INDEX_PREC: u16 = opcode(1, 6);
    pub const COLR_PREC: u16 = opcode(1, 7);
    pub const COLR_INDEX_PREC: u16 = opcode(1, 8);
    pub const MAX_COLR_INDEX: u16 = opcode(1, 9);
    pub const COLR_VALUE_EXT: u16 = opcode(1, 10);
    pub const MF_ELEM_LIST: u16 = opcode(1, 11);
    pub const BEG_MF_DEFAULTS: u16 = opcode(1, 12);
    pub const FONT_LIST: u16 = opcode(1, 13);

    // Class 2: picture descriptors
    pub const SCALE_MODE: u16 = opcode(2, 1);
    pub const COLR_MODE: u16 = opcode(2, 2);
    pub const LINE_WIDTH_MODE: u16 = opcode(2, 3);
    pub const MARKER_SIZE_MODE: u16 = opcode(2, 4);
    pub const EDGE_WIDTH_MODE: u16 = opcode(2, 5);
    pub const VDC_EXT: u16 = opcode(2, 6);
    pub const BACK_COLR: u16 = opcode(2, 7);

    // Class 4: graphical primitives
    pub const LINE: u16 = opcode(4, 1);
    pub const DISJT_LINE: u16 = opcode(4, 2);
    pub const MARKER: u16 = opcode(4, 3);
    pub const TEXT: u16 = opcode(4, 4);
    pub const RESTR_TEXT: u16 = opcode(4, 5);
    pub const APND_TEXT: u16 = opcode(4, 6);
    pub const POLYGON: u16 = opcode(4, 7);
    pub const POLYGON_SET: u16 = opcode(4, 8);
    pub const RECT: u16 = opcode(4, 11);
    pub const CIRCLE: u16 = opcode(4, 12);
    pub const ARC_3PT: u16 = opcode(4, 13);
    pub const ARC_3PT_CLOSE: u16 = opcode(4, 14);
    pub const ARC_CTR: u16 = opcode(4, 15);
    pub const ARC_CTR_CLOSE: u16 = opcode(4, 16);
    pub const ELLIPSE: u16 = opcode(4, 17);
    pub const ELLIP_ARC: u16 = opcode(4, 18);
    pub const ELLIP_ARC_CLOSE: u16 = opcode(4, 19);
    pub const ARC_CTR_REV: u16 = opcode(4, 20);

    // Class 5: attributes
    pub const LINE_INDEX: u16 = opcode(5, 1);
    pub const LINE_TYPE: u16 = opcode(5, 2);
    pub const LINE_WIDTH: u16 = opcode(5, 3);
    pub const LINE_COLR: u16 = opcode(5, 4);
    pub const MARKER_INDEX: u16 = opcode(5, 5);
    pub const MARKER_TYPE: u16 = opcode(5, 6);
    pub const MARKER_SIZE: u16 = opcode(5, 7);
    pub const MARKER_COLR: u16 = opcode(5, 8);
    pub const TEXT_INDEX: u16 = opcode(5, 9);
    pub const TEXT_FONT_INDEX: u16 = opcode(5, 10);
    pub const TEXT_COLR: u16 = opcode(5, 14);
    pub const CHAR_HEIGHT: u16 = opcode(5, 15);
    pub const CHAR_ORI: u16 = opcode(5, 16);
    pub const INT_STYLE: u16 = opcode(5, 22);
    pub const FILL_COLR: u16 = opcode(5, 23);
    pub const HATCH_INDEX: u16 = opcode(5, 24);
    pub const PAT_INDEX: u16 = opcode(5, 25);
    pub const EDGE_INDEX: u16 = opcode(5, 26);
    pub const EDGE_TYPE: u16 = opcode(5, 27);
    pub const EDGE_WIDTH: u16 = opcode(5, 28);
    pub const EDGE_COLR: u16 = opcode(5, 29);
    pub const EDGE_VIS: u16 = opcode(5, 30);
}

/// Interior, edge and line styles
pub mod style {
    pub const SOLID: i16 = 1;
    pub const DASHED: i16 = 2;
    pub const EMPTY: i16 = 4;
}

/// Close types for closed arcs
pub mod close {
    /// Two rays from the centre to the arc ends
    pub const PIE: i16 = 0;
    /// A chord joining the arc ends
    pub const CHORD: i16 = 1;
}

/// Colour selection modes (ColrMode)
pub mod colour_mode {
    pub const INDEXED: i16 = 0;
    pub const DIRECT: i16 = 1;
}

/// Width specification modes (LineWidthMode, EdgeWidthMode, MarkerSizeMode)
pub mod width_mode {
    pub const ABSOLUTE: i16 = 0;
    pub const SCALED: i16 = 1;
    pub const FRACTIONAL: i16 = 2;
    pub const MM: i16 = 3;
}

/// Text precision flag for the Text primitive: the string is final.
pub const TEXT_FINAL: i16 = 1;

static OPCODE_NAMES: phf::Map<u16, &'static str> = phf::phf_map! {
    0x0020u16 => "BegMF",
    0x0040u16 => "EndMF",
    0x0060u16 => "BegPic",
    0x0080u16 => "BegPicBody",
    0x00A0u16 => "EndPic",
    0x1020u16 => "MFVersion",
    0x1040u16 => "MFDesc",
    0x1160u16 => "MFElemList",
    0x1180u16 => "BegMFDefaults",
    0x11A0u16 => "FontList",
    0x2040u16 => "ColrMode",
    0x2060u16 => "LineWidthMode",
    0x2080u16 => "MarkerSizeMode",
    0x20A0u16 => "EdgeWidthMode",
    0x20C0u16 => "VDCExt",
    0x4020u16 => "Line",
    0x4080u16 => "Text",
    0x40E0u16 => "Polygon",
    0x4160u16 => "Rect",
    0x4180u16 => "Circle",
    0x41E0u16 => "ArcCtr",
    0x4200u16 => "ArcCtrClose",
    0x4220u16 => "Ellipse",
    0x4240u16 => "EllipArc",
    0x4260u16 => "EllipArcClose",
    0x5040u16 => "LineType",
    0x5060u16 => "LineWidth",
    0x5080u16 => "LineColr",
    0x50C0u16 => "MarkerType",
    0x50E0u16 => "MarkerSize",
    0x5100u16 => "MarkerColr",
    0x5140u16 => "TextFontIndex",
    0x51C0u16 => "TextColr",
    0x51E0u16 => "CharHeight",
    0x5200u16 => "CharOri",
    0x52C0u16 => "IntStyle",
    0x52E0u16 => "FillColr",
    0x5360u16 => "EdgeType",
    0x5380u16 => "EdgeWidth",
    0x53A0u16 => "EdgeColr",
    0x53C0u16 => "EdgeVis",
};

/// Mnemonic of an opcode known to this implementation.
pub fn opcode_name(op: u16) -> Option<&'static str> {
    OPCODE_NAMES.get(&(op & OPCODE_MASK)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_layout() {
        assert_eq!(op::BEG_MF, 0x0020);
        assert_eq!(op::MF_DESC, 0x1040);
        assert_eq!(op::VDC_EXT, 0x20C0);
        assert_eq!(op::ARC_CTR_CLOSE, 0x4200);
        assert_eq!(op::EDGE_VIS, 0x53C0);
    }

    #[test]
    fn test_element_class() {
        assert_eq!(ElementClass::of(op::END_PIC), Some(ElementClass::Delimiter));
        assert_eq!(ElementClass::of(op::FONT_LIST), Some(ElementClass::MetafileDescriptor));
        assert_eq!(ElementClass::of(op::ELLIPSE), Some(ElementClass::Primitive));
        assert_eq!(ElementClass::of(op::CHAR_ORI), Some(ElementClass::Attribute));
        assert_eq!(ElementClass::of(0x7000), None);
    }

    #[test]
    fn test_names_cover_used_opcodes() {
        for code in [
            op::BEG_MF,
            op::VDC_EXT,
            op::TEXT,
            op::ELLIP_ARC_CLOSE,
            op::TEXT_FONT_INDEX,
            op::EDGE_VIS,
        ] {
            assert!(opcode_name(code).is_some(), "0x{:04X}", code);
        }
        assert_eq!(opcode_name(op::CIRCLE | 0x0006), Some("Circle"));
        assert_eq!(opcode_name(op::ARC_3PT), None);
    }
}
