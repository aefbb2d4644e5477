use fastrob_core::{Document, Layer, Path, Point3};
use proptest::prelude::*;

pub fn point(z: f64) -> impl Strategy<Value = Point3> {
    (-100.0..100.0f64, -100.0..100.0f64).prop_map(move |(x, y)| Point3::new(x, y, z))
}

pub fn path(z: f64, min_points: usize) -> impl Strategy<Value = Path> {
    prop::collection::vec(point(z), min_points..8).prop_map(Path::new)
}

/// Planar layers at increasing heights, every path with at least `min_points`
pub fn document(min_points: usize) -> impl Strategy<Value = Document> {
    prop::collection::vec(1usize..4, 1..5).prop_flat_map(move |path_counts| {
        path_counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| {
                let z = (i + 1) as f64 * 2.0;
                prop::collection::vec(path(z, min_points), count..=count).prop_map(Layer::new)
            })
            .collect::<Vec<_>>()
            .prop_map(Document::new)
    })
}
