use fastrob_core::{Document, Layer, Path, Point3};
use fastrob_gcode::{FilterMode, FilterSettings};

fn line(n: usize, z: f64) -> Path {
    (0..n).map(|i| Point3::new(i as f64, 0.0, z)).collect()
}

fn sample() -> Document {
    Document::new(vec![
        Layer::new(vec![line(3, 1.0), line(2, 1.0)]),
        Layer::new(vec![line(4, 2.0)]),
    ])
}

#[test]
fn test_none_exposes_everything() {
    let doc = sample();
    let view = FilterSettings::default().apply(&doc, Point3::ORIGIN);
    assert_eq!(view.document, doc);
    assert_eq!(view.points.len(), 9);
    assert_eq!(view.last_point, Point3::new(3.0, 0.0, 2.0));
}

#[test]
fn test_all_clamps_across_layers() {
    let doc = sample();
    let view = FilterSettings::new(FilterMode::All, 0, 5).apply(&doc, Point3::ORIGIN);
    assert_eq!(view.points.len(), 6);
    assert_eq!(view.document.len(), 2);
    assert_eq!(view.last_point, Point3::new(0.0, 0.0, 2.0));

    // past the end clamps to the last point
    let view = FilterSettings::new(FilterMode::All, 0, 100).apply(&doc, Point3::ORIGIN);
    assert_eq!(view.document, doc);
}

#[test]
fn test_layer_mode_clamps_indices() {
    let doc = sample();
    let view = FilterSettings::new(FilterMode::Layer, 7, 1).apply(&doc, Point3::ORIGIN);
    assert_eq!(view.document.len(), 1);
    assert_eq!(view.points, vec![Point3::new(0.0, 0.0, 2.0), Point3::new(1.0, 0.0, 2.0)]);

    let view = FilterSettings::new(FilterMode::Layer, 0, 99).apply(&doc, Point3::ORIGIN);
    assert_eq!(view.points.len(), 5);
}

#[test]
fn test_global_point_applies_placement() {
    let doc = sample();
    let placement = Point3::new(100.0, 50.0, 10.0);
    let view = FilterSettings::new(FilterMode::All, 0, 0).apply(&doc, placement);
    assert_eq!(view.last_point, Point3::new(0.0, 0.0, 1.0));
    assert_eq!(view.global_point, Point3::new(100.0, 50.0, 11.0));
}
