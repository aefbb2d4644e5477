use crate::strategies::document;
use fastrob_core::{Document, Error, Layer, Path, Point3};
use fastrob_gcode::{encode, reconstruct, MotionCommandStream};
use proptest::prelude::*;
use std::io::Write;

fn square_path(offset: f64, z: f64) -> Path {
    Path::new(vec![
        Point3::new(offset, offset, z),
        Point3::new(offset + 10.0, offset, z),
        Point3::new(offset + 10.0, offset + 10.0, z),
        Point3::new(offset, offset + 10.0, z),
    ])
}

fn two_by_two() -> Document {
    Document::new(vec![
        Layer::new(vec![square_path(0.0, 2.0), square_path(20.0, 2.0)]),
        Layer::new(vec![square_path(0.0, 4.0), square_path(20.0, 4.0)]),
    ])
}

#[test]
fn test_round_trip_two_layers_two_paths() {
    let doc = two_by_two();
    let stream = encode(&doc);
    assert_eq!(stream.len(), 16);
    assert_eq!(reconstruct(&stream), doc);
}

#[test]
fn test_round_trip_through_text() {
    let doc = two_by_two();
    let text = encode(&doc).to_gcode();
    assert_eq!(reconstruct(&MotionCommandStream::parse(&text)), doc);
}

#[test]
fn test_non_g_commands_are_ignored() {
    let text = "\
; generated by a slicer
M104 S200
G28
G1 Z2.000 F7800
G1 X0 Y0
G1 X10 Y0 E1.5
M106 S255
G1 X10 Y10 E1.5
G1 X50 Y50
G1 Z4.000
G1 X0 Y0
G1 X5 Y0 E0.5
T0
";
    let stream = MotionCommandStream::parse(text);
    assert!(stream.iter().all(|c| c.command.starts_with('G')));

    let doc = reconstruct(&stream);
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.layers()[0].paths()[0].len(), 3);
    assert_eq!(doc.layers()[1].paths()[0].len(), 2);
    assert_eq!(doc.layers()[1].paths()[0].points()[0], Point3::new(0.0, 0.0, 4.0));
    assert!(doc.is_z_monotonic());
}

#[test]
fn test_negative_extrusion_is_not_printing() {
    let text = "G1 Z1\nG1 X0 Y0\nG1 X5 Y0 E1\nG1 E-0.5\nG1 X9 Y9\nG1 X9 Y0 E1\n";
    let doc = reconstruct(&MotionCommandStream::parse(text));
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.layers()[0].len(), 2);
}

#[test]
fn test_z_change_inside_extrusion_run_closes_layer() {
    let text = "\
G1 Z1
G1 X0 Y0
G1 X5 Y0 E1
G1 X0 Y0
G1 X5 Y0 E1
G1 X5 Y5 Z2 E1
G1 X0 Y5 E1
";
    let doc = reconstruct(&MotionCommandStream::parse(text));

    // The layer closes on the Z move while the open run carries on into
    // the next layer, keeping the points it already holds.
    assert_eq!(doc.len(), 2);
    assert_eq!(
        doc.layers()[0].paths(),
        &[Path::new(vec![
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(5.0, 0.0, 1.0),
        ])]
    );
    assert_eq!(
        doc.layers()[1].paths(),
        &[Path::new(vec![
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(5.0, 0.0, 1.0),
            Point3::new(5.0, 5.0, 2.0),
            Point3::new(0.0, 5.0, 2.0),
        ])]
    );
}

#[test]
fn test_stream_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "G1 Z0.2\nG1 X1 Y1\nG1 X2 Y1 E0.1").unwrap();

    let stream = MotionCommandStream::from_file(file.path()).unwrap();
    assert_eq!(stream.len(), 3);
    assert_eq!(stream.commands()[2].line_number, 3);
}

#[test]
fn test_stream_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = MotionCommandStream::from_file(&dir.path().join("missing.gcode"));
    assert!(matches!(result, Err(Error::Io(_))));
}

proptest! {
    #[test]
    fn prop_encode_then_reconstruct_is_identity(doc in document(2)) {
        prop_assert_eq!(reconstruct(&encode(&doc)), doc);
    }
}
