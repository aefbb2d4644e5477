use crate::strategies::document;
use fastrob_core::{Document, Layer, Path, Point3};
use fastrob_gcode::{axis_offset, clamp, discretize, seam_shift};
use fastrob_geometry::CavalierGeometry;
use proptest::prelude::*;

fn closed_square(z: f64) -> Path {
    Path::new(vec![
        Point3::new(0.0, 0.0, z),
        Point3::new(10.0, 0.0, z),
        Point3::new(10.0, 10.0, z),
        Point3::new(0.0, 10.0, z),
        Point3::new(0.0, 0.0, z),
    ])
}

fn open_line(z: f64) -> Path {
    Path::new(vec![Point3::new(0.0, 0.0, z), Point3::new(10.0, 0.0, z)])
}

#[test]
fn test_discretize_bounds_gaps() {
    let doc = Document::new(vec![Layer::new(vec![closed_square(1.0)])]);
    let result = discretize(&doc, &CavalierGeometry::new(), 3.0);

    let points = result.flatten_points();
    assert_eq!(points.len(), 1 + 4 * 4);
    for pair in points.windows(2) {
        assert!(pair[0].distance_to(&pair[1]) <= 3.0 + 1e-9);
    }
    for vertex in doc.flatten_points() {
        assert!(points.contains(&vertex));
    }
}

#[test]
fn test_discretize_zero_is_noop() {
    let doc = Document::new(vec![Layer::new(vec![closed_square(1.0)])]);
    let geometry = CavalierGeometry::new();
    assert_eq!(discretize(&doc, &geometry, 0.0), doc);
    assert_eq!(discretize(&doc, &geometry, -2.0), doc);
    assert_eq!(discretize(&doc, &geometry, f64::NAN), doc);
}

#[test]
fn test_seam_shift_repeats_last_value() {
    let doc = Document::new(vec![
        Layer::new(vec![closed_square(1.0), open_line(1.0)]),
        Layer::new(vec![closed_square(2.0)]),
        Layer::new(vec![closed_square(3.0)]),
    ]);
    let result = seam_shift(&doc, &[0, 2]);

    assert_eq!(result.layers()[0], doc.layers()[0]);
    for layer in &result.layers()[1..] {
        let path = &layer.paths()[0];
        assert!(path.is_closed());
        assert_eq!((path.points()[0].x, path.points()[0].y), (10.0, 10.0));
    }
}

#[test]
fn test_seam_shift_keeps_point_set() {
    let doc = Document::new(vec![Layer::new(vec![closed_square(1.0), open_line(1.0)])]);
    let result = seam_shift(&doc, &[-3]);

    let shifted = &result.layers()[0].paths()[0];
    assert_eq!(shifted.len(), 5);
    for p in closed_square(1.0).iter() {
        assert!(shifted.points().contains(p));
    }
    assert_eq!(result.layers()[0].paths()[1], open_line(1.0));
    assert_eq!(seam_shift(&doc, &[]), doc);
}

#[test]
fn test_axis_offset_adds_lead_points() {
    let doc = Document::new(vec![Layer::new(vec![open_line(1.0)])]);
    let result = axis_offset(&doc, Point3::new(0.0, 0.0, 10.0));

    let path = &result.layers()[0].paths()[0];
    assert_eq!(path.len(), 4);
    assert_eq!(path.points()[0], Point3::new(0.0, 0.0, 11.0));
    assert_eq!(path.points()[3], Point3::new(10.0, 0.0, 11.0));
}

#[test]
fn test_clamp_zero_is_empty() {
    let doc = Document::new(vec![Layer::new(vec![closed_square(1.0)])]);
    assert!(clamp(&doc, 0).is_empty());
}

#[test]
fn test_clamp_crosses_layers() {
    let doc = Document::new(vec![
        Layer::new(vec![closed_square(1.0), open_line(1.0)]),
        Layer::new(vec![closed_square(2.0)]),
    ]);
    let result = clamp(&doc, 9);
    assert_eq!(result.len(), 2);
    assert_eq!(result.layers()[0], doc.layers()[0]);
    assert_eq!(result.layers()[1].paths()[0].len(), 2);
}

proptest! {
    #[test]
    fn prop_clamp_total_is_identity(doc in document(1)) {
        prop_assert_eq!(clamp(&doc, doc.point_count()), doc.clone());
        prop_assert_eq!(clamp(&doc, doc.point_count() + 5), doc);
    }

    #[test]
    fn prop_clamp_keeps_prefix(doc in document(1), n in 0usize..40) {
        let result = clamp(&doc, n);
        let expected = n.min(doc.point_count());
        prop_assert_eq!(result.point_count(), expected);
        prop_assert_eq!(&result.flatten_points()[..], &doc.flatten_points()[..expected]);
    }

    #[test]
    fn prop_axis_offset_zero_is_noop(doc in document(1)) {
        prop_assert_eq!(axis_offset(&doc, Point3::ORIGIN), doc);
    }

    #[test]
    fn prop_axis_offset_inverse(
        doc in document(1),
        (x, y, z) in (-20.0..20.0f64, -20.0..20.0f64, 0.5..20.0f64),
    ) {
        let offset = Point3::new(x, y, z);
        let result = axis_offset(&doc, offset);

        for (original, led) in doc.flatten_paths().into_iter().zip(result.flatten_paths()) {
            let points = led.points();
            prop_assert_eq!(points.len(), original.len() + 2);
            prop_assert_eq!(&points[1..points.len() - 1], original.points());

            let lead_in = points[0] - offset;
            let lead_out = points[points.len() - 1] - offset;
            prop_assert!(lead_in.distance_to(&original.points()[0]) < 1e-9);
            prop_assert!(lead_out.distance_to(&original.points()[original.len() - 1]) < 1e-9);
        }
    }
}
