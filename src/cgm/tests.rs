//! End-to-end tests for the CGM writer and interpreter
//!
//! These tests encode glyph lists through the public API, decode the result,
//! and check both the recovered glyphs and the exact octets where the wire
//! layout matters.

use super::arc::Quadrant;
use super::constants::op;
use super::fields::Command;
use super::header::{CommandHeader, Record};
use super::*;
use crate::common::{Error, Point, RGBColor};
use proptest::prelude::*;
use tempfile::tempdir;

fn opcodes(data: &[u8]) -> Vec<u16> {
    let mut codes = Vec::new();
    let mut offset = 0;
    while offset < data.len() {
        let (record, used) = Record::parse(data, offset).unwrap();
        codes.push(record.opcode);
        offset += used;
    }
    codes
}

fn same_drawing(a: &Glyph, b: &Glyph) -> bool {
    a.shape == b.shape && a.width == b.width && a.color == b.color
}

#[test]
fn test_two_shape_scenario() {
    let glyphs = vec![
        Glyph::new(
            Shape::Line {
                from: Point::new(10, 10),
                to: Point::new(200, 200),
            },
            3,
            RGBColor::RED,
        ),
        Glyph::new(
            Shape::Rect {
                corners: [Point::new(50, 50), Point::new(150, 120)],
            },
            2,
            RGBColor::GREEN,
        ),
    ];

    let bytes = encode(&glyphs).unwrap();
    let decoded = decode(&bytes).unwrap();

    assert_eq!(decoded.len(), 2);
    assert!(same_drawing(&decoded[0], &glyphs[0]));
    assert!(same_drawing(&decoded[1], &glyphs[1]));
    assert_eq!((decoded[0].key, decoded[1].key), (1, 2));
}

#[test]
fn test_text_scenario() {
    let glyph = Glyph::new(
        Shape::text(
            Point::new(30, 40),
            "Hello",
            Font::new("TimesRoman", FontStyle::BOLD, 16),
        ),
        1,
        RGBColor::RED,
    );

    let bytes = encode(std::slice::from_ref(&glyph)).unwrap();
    let decoded = decode(&bytes).unwrap();

    let Shape::Text(run) = &decoded[0].shape else {
        panic!("expected text, got {:?}", decoded[0].shape);
    };
    assert_eq!(run.anchor, Point::new(30, 40 - 16 - 5));
    assert_eq!(run.content, "Hello");
    assert_eq!(run.font, Font::new("TimesRoman", FontStyle::BOLD, 16));
    assert_eq!(decoded[0].color, RGBColor::RED);
}

#[test]
fn test_text_attribute_order() {
    let glyph = Glyph::new(
        Shape::text(Point::new(0, 0), "x", Font::default()),
        1,
        RGBColor::BLACK,
    );
    let bytes = encode(&[glyph]).unwrap();
    let codes = opcodes(&bytes);
    let body = codes.iter().position(|&c| c == op::BEG_PIC_BODY).unwrap() + 1;
    assert_eq!(
        &codes[body..],
        &[
            op::TEXT_COLR,
            op::CHAR_ORI,
            op::TEXT_FONT_INDEX,
            op::CHAR_HEIGHT,
            op::TEXT,
            op::END_PIC,
            op::END_MF
        ]
    );
}

#[test]
fn test_stream_layout() {
    let bytes = encode(&[]).unwrap();
    assert_eq!(
        opcodes(&bytes),
        vec![
            op::BEG_MF,
            op::MF_VERSION,
            op::MF_DESC,
            op::BEG_PIC,
            op::VDC_EXT,
            op::COLR_MODE,
            op::EDGE_WIDTH_MODE,
            op::LINE_WIDTH_MODE,
            op::BEG_PIC_BODY,
            op::END_PIC,
            op::END_MF,
        ]
    );
    // "Whiteboard CGM" is 14 octets: length, text, pad
    assert_eq!(&bytes[..3], &[0x00, 0x30, 14]);
    assert_eq!(&bytes[bytes.len() - 4..], &[0x00, 0xA0, 0x00, 0x40]);
}

#[test]
fn test_optional_header_elements() {
    let options = MetafileOptions {
        font_list: true,
        element_list: true,
        edge_width_mode: None,
        line_width_mode: None,
        ..Default::default()
    };
    let bytes = encode_with(&[], &options).unwrap();
    let codes = opcodes(&bytes);
    assert!(codes.contains(&op::FONT_LIST));
    assert!(codes.contains(&op::MF_ELEM_LIST));
    assert!(!codes.contains(&op::LINE_WIDTH_MODE));

    let mut interpreter = CgmInterpreter::new(&bytes);
    interpreter.run().unwrap();
    let state = interpreter.state();
    assert_eq!(state.font_list.len(), 28);
    assert_eq!(state.font_list[4], "HELVETICA");
    assert_eq!(state.metafile_name.as_deref(), Some("Whiteboard CGM"));
    assert_eq!(state.picture_name.as_deref(), Some("Whiteboard Glyphs"));
    assert_eq!(state.vdc_extent, Some([0, 480, 640, 0]));
}

#[test]
fn test_attributes_written_every_time() {
    let line = Glyph::new(
        Shape::Line {
            from: Point::new(0, 0),
            to: Point::new(5, 5),
        },
        4,
        RGBColor::BLUE,
    );
    let bytes = encode(&[line.clone(), line.clone()]).unwrap();
    let codes = opcodes(&bytes);
    assert_eq!(codes.iter().filter(|&&c| c == op::LINE_WIDTH).count(), 2);
    assert_eq!(codes.iter().filter(|&&c| c == op::LINE_COLR).count(), 2);

    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.len(), 2);
    assert!(decoded.iter().all(|g| same_drawing(g, &line)));
}

#[test]
fn test_no_cross_contamination() {
    let glyphs = vec![
        Glyph::new(
            Shape::Polyline {
                points: vec![Point::new(0, 0), Point::new(5, 5), Point::new(9, 2)],
            },
            5,
            RGBColor::BLUE,
        ),
        Glyph::new(Shape::circle(Point::new(100, 100), Point::new(150, 100)), 2, RGBColor::GREEN),
        Glyph::new(
            Shape::Polygon {
                points: vec![Point::new(1, 1), Point::new(8, 1), Point::new(4, 6)],
            },
            1,
            RGBColor::new(10, 20, 30),
        ),
        Glyph::new(
            Shape::Oval {
                corners: [Point::new(10, 20), Point::new(50, 80)],
            },
            7,
            RGBColor::BLACK,
        ),
    ];
    let decoded = decode(&encode(&glyphs).unwrap()).unwrap();
    assert_eq!(decoded.len(), glyphs.len());
    for (got, want) in decoded.iter().zip(&glyphs) {
        assert!(same_drawing(got, want), "{got:?} != {want:?}");
    }
}

#[test]
fn test_circle_radius_from_wire() {
    let glyph = Glyph::new(Shape::circle(Point::new(100, 100), Point::new(150, 100)), 1, RGBColor::RED);
    let decoded = decode(&encode(&[glyph]).unwrap()).unwrap();
    assert_eq!(
        decoded[0].shape,
        Shape::Circle {
            center: Point::new(100, 100),
            radius: 50
        }
    );
}

#[test]
fn test_closed_arc_uses_edge_attributes() {
    let glyph = Glyph::new(
        Shape::CircularArcClose {
            arc: CircularArc {
                center: Point::new(200, 200),
                radius: 40,
                start_angle: 30,
                delta_angle: 60,
            },
            close: ArcClose::Chord,
        },
        6,
        RGBColor::new(1, 2, 3),
    );
    let bytes = encode(std::slice::from_ref(&glyph)).unwrap();
    let codes = opcodes(&bytes);
    let body = codes.iter().position(|&c| c == op::BEG_PIC_BODY).unwrap() + 1;
    assert_eq!(
        &codes[body..body + 4],
        &[op::EDGE_WIDTH, op::EDGE_TYPE, op::EDGE_COLR, op::ARC_CTR_CLOSE]
    );

    let decoded = decode(&bytes).unwrap();
    assert!(same_drawing(&decoded[0], &glyph));
}

#[test]
fn test_cross_rect_not_encoded() {
    let glyphs = vec![
        Glyph::new(
            Shape::CrossRect {
                corners: [Point::new(0, 0), Point::new(10, 10)],
            },
            1,
            RGBColor::RED,
        ),
        Glyph::new(
            Shape::Rect {
                corners: [Point::new(0, 0), Point::new(10, 10)],
            },
            1,
            RGBColor::RED,
        ),
    ];
    let decoded = decode(&encode(&glyphs).unwrap()).unwrap();
    assert_eq!(decoded.len(), 1);
    assert!(same_drawing(&decoded[0], &glyphs[1]));
}

#[test]
fn test_quadrant_tie_break() {
    // end vector on the positive y axis
    assert_eq!(Quadrant::of(0.0, 10.0), Quadrant::Second);
    assert!((arc::find_angle(0.0, 10.0) - 270.0).abs() < 0.001);
}

#[test]
fn test_truncated_stream_keeps_partial_result() {
    let glyphs = vec![
        Glyph::new(
            Shape::Line {
                from: Point::new(1, 1),
                to: Point::new(2, 2),
            },
            1,
            RGBColor::RED,
        ),
        Glyph::new(
            Shape::Polygon {
                points: vec![Point::new(0, 0), Point::new(9, 0), Point::new(9, 9)],
            },
            1,
            RGBColor::RED,
        ),
    ];
    let bytes = encode(&glyphs).unwrap();
    // cut inside the Polygon parameters (EndPic and EndMF take 4 octets)
    let cut = &bytes[..bytes.len() - 8];

    assert!(matches!(decode(cut), Err(Error::Truncated { .. })));

    let partial = decode_lenient(cut);
    assert_eq!(partial.glyphs.len(), 1);
    assert!(same_drawing(&partial.glyphs[0], &glyphs[0]));
    assert!(partial.error.is_some_and(|e| e.is_decode_error()));
}

#[test]
fn test_concatenated_metafiles_decode_in_full() {
    let line = Glyph::new(
        Shape::Line {
            from: Point::new(10, 10),
            to: Point::new(20, 20),
        },
        2,
        RGBColor::BLUE,
    );
    let rect = Glyph::new(
        Shape::Rect {
            corners: [Point::new(30, 30), Point::new(60, 50)],
        },
        4,
        RGBColor::GREEN,
    );
    let mut joined = encode(std::slice::from_ref(&line)).unwrap();
    joined.extend(encode(std::slice::from_ref(&rect)).unwrap());

    let decoded = decode(&joined).unwrap();
    assert_eq!(decoded.len(), 2);
    assert!(same_drawing(&decoded[0], &line));
    assert!(same_drawing(&decoded[1], &rect));
    assert_eq!(decoded[1].key, 2);

    let mut interp = CgmInterpreter::new(&joined);
    interp.run().unwrap();
    assert_eq!(interp.state().metafiles_ended, 2);
}

#[test]
fn test_two_point_polyline_decodes_as_line() {
    let glyph = Glyph::new(
        Shape::Polyline {
            points: vec![Point::new(5, 6), Point::new(70, 80)],
        },
        1,
        RGBColor::BLACK,
    );
    let decoded = decode(&encode(&[glyph]).unwrap()).unwrap();
    assert_eq!(
        decoded[0].shape,
        Shape::Line {
            from: Point::new(5, 6),
            to: Point::new(70, 80)
        }
    );
}

#[test]
fn test_text_glyph_width_survives_round_trip() {
    let glyph = Glyph::new(
        Shape::text(Point::new(30, 40), "w", Font::default()),
        3,
        RGBColor::RED,
    );
    assert_eq!(glyph.width, 1);
    let decoded = decode(&encode(std::slice::from_ref(&glyph)).unwrap()).unwrap();
    assert_eq!(decoded[0].width, glyph.width);
}

#[test]
fn test_incremental_metafile() {
    let mut metafile = Metafile::open(&MetafileOptions::default()).unwrap();
    assert!(metafile.is_empty());
    let glyph = Glyph::new(
        Shape::Rect {
            corners: [Point::new(5, 5), Point::new(25, 35)],
        },
        2,
        RGBColor::BLUE,
    );
    metafile.add(&glyph).unwrap();
    metafile.add_all([&glyph, &glyph]).unwrap();
    assert_eq!(metafile.len(), 3);

    let decoded = decode(&metafile.finish().unwrap()).unwrap();
    assert_eq!(decoded.len(), 3);
    assert_eq!(decoded.iter().map(|g| g.key).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn test_file_round_trip() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("board.cgm");
    let glyphs = vec![Glyph::new(
        Shape::Oval {
            corners: [Point::new(0, 0), Point::new(40, 20)],
        },
        3,
        RGBColor::new(200, 100, 50),
    )];

    write_file(&path, &glyphs, &MetafileOptions::default()).unwrap();
    let decoded = read_file(&path).unwrap();
    assert_eq!(decoded.len(), 1);
    assert!(same_drawing(&decoded[0], &glyphs[0]));

    assert!(matches!(
        read_file(dir.path().join("missing.cgm")),
        Err(Error::Io(_))
    ));
}

#[test]
fn test_options_from_file() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("options.yaml");
    std::fs::write(&path, "picture_name: Sketch\nvdc_extent: [0, 0, 640, 480]\n").unwrap();

    let options = MetafileOptions::load(&path).unwrap();
    let bytes = encode_with(&[], &options).unwrap();
    let mut interpreter = CgmInterpreter::new(&bytes);
    interpreter.run().unwrap();
    assert_eq!(interpreter.state().picture_name.as_deref(), Some("Sketch"));
    assert_eq!(interpreter.state().vdc_extent, Some([0, 0, 640, 480]));
}

// =============================================================================
// Property tests
// =============================================================================

fn point() -> impl Strategy<Value = Point> {
    (-2000i16..2000, -2000i16..2000).prop_map(|(x, y)| Point::new(x, y))
}

fn colour() -> impl Strategy<Value = RGBColor> {
    any::<(u8, u8, u8)>().prop_map(|(r, g, b)| RGBColor::new(r, g, b))
}

/// Box with even sides, minimum corner first, as the interpreter reports ovals.
fn even_box() -> impl Strategy<Value = [Point; 2]> {
    (point(), 1i16..500, 1i16..500).prop_map(|(p, rx, ry)| [p, Point::new(p.x + 2 * rx, p.y + 2 * ry)])
}

fn exact_shape() -> impl Strategy<Value = Shape> {
    prop_oneof![
        (point(), point()).prop_map(|(from, to)| Shape::Line { from, to }),
        prop::collection::vec(point(), 3..40).prop_map(|points| Shape::Polyline { points }),
        prop::collection::vec(point(), 1..40).prop_map(|points| Shape::Polygon { points }),
        (point(), point()).prop_map(|(a, b)| Shape::Rect { corners: [a, b] }),
        (point(), 0i16..1000).prop_map(|(center, radius)| Shape::Circle { center, radius }),
        even_box().prop_map(|corners| Shape::Oval { corners }),
    ]
}

fn angles_close(got: i32, want: i32) -> bool {
    (got - want).abs() <= 1
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_exact_shapes_round_trip(shape in exact_shape(), width in 1u16..1000, color in colour()) {
        let glyph = Glyph::new(shape, width, color);
        let decoded = decode(&encode(std::slice::from_ref(&glyph)).unwrap()).unwrap();
        prop_assert_eq!(decoded.len(), 1);
        prop_assert!(same_drawing(&decoded[0], &glyph), "{:?} != {:?}", decoded[0], glyph);
    }

    #[test]
    fn prop_circular_arc_round_trip(
        center in point(),
        radius in 1i16..1000,
        start in 0i32..360,
        delta in 1i32..360,
        closed in any::<bool>(),
    ) {
        let arc = CircularArc { center, radius, start_angle: start, delta_angle: delta };
        let shape = if closed {
            Shape::CircularArcClose { arc, close: ArcClose::Pie }
        } else {
            Shape::CircularArc(arc)
        };
        let glyph = Glyph::new(shape, 2, RGBColor::BLUE);
        let decoded = decode(&encode(std::slice::from_ref(&glyph)).unwrap()).unwrap();

        let got = match &decoded[0].shape {
            Shape::CircularArc(a) | Shape::CircularArcClose { arc: a, .. } => *a,
            other => return Err(TestCaseError::fail(format!("unexpected {other:?}"))),
        };
        prop_assert_eq!(got.center, center);
        prop_assert_eq!(got.radius, radius);
        prop_assert!(angles_close(got.start_angle, start), "start {} vs {}", got.start_angle, start);
        prop_assert!(angles_close(got.delta_angle, delta), "delta {} vs {}", got.delta_angle, delta);
    }

    #[test]
    fn prop_elliptical_arc_round_trip(corners in even_box(), start in 0i32..360, delta in 1i32..360) {
        let glyph = Glyph::new(
            Shape::EllipticalArc { corners, start_angle: start, delta_angle: delta },
            1,
            RGBColor::BLACK,
        );
        let decoded = decode(&encode(std::slice::from_ref(&glyph)).unwrap()).unwrap();
        let Shape::EllipticalArc { corners: got, start_angle, delta_angle } = decoded[0].shape else {
            return Err(TestCaseError::fail("expected elliptical arc"));
        };
        prop_assert_eq!(got, corners);
        prop_assert!(angles_close(start_angle, start));
        prop_assert!(angles_close(delta_angle, delta));
    }

    #[test]
    fn prop_string_commands_end_even(s in "[ -~]{0,255}") {
        let bytes = Command::new("MFDesc", op::MF_DESC).string(&s).unwrap().finish().unwrap();
        prop_assert_eq!(bytes.len() % 2, 0);

        let (header, header_len) = CommandHeader::parse(&bytes, 0).unwrap();
        prop_assert_eq!(header.length % 2, 0);
        prop_assert_eq!(header_len + header.length, bytes.len());
        prop_assert_eq!(header.length, s.len() + 1 + (1 - s.len() % 2));
    }

    #[test]
    fn prop_header_form_boundary(count in 0usize..200) {
        let points = vec![Point::new(1, 2); count];
        let bytes = Command::new("Line", op::LINE).points(&points).finish().unwrap();
        let expected_header = if count * 4 <= 30 { 2 } else { 4 };
        prop_assert_eq!(bytes.len(), expected_header + count * 4);

        let (record, used) = Record::parse(&bytes, 0).unwrap();
        prop_assert_eq!(used, bytes.len());
        prop_assert_eq!(record.params.len(), count * 4);
    }
}
