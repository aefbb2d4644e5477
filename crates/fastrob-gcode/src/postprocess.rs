//! Path post-processing
//!
//! Pure document transforms applied after reconstruction, in pipeline order:
//! [`discretize`], [`seam_shift`], [`axis_offset`]. [`clamp`] and
//! [`clamp_layer`] cut a document down to a point prefix for inspection.
//!
//! Every function borrows its input and returns a new document.

use fastrob_core::{Document, Layer, Path, Point3};
use fastrob_geometry::GeometryCollaborator;
use tracing::debug;

/// Resample every path so no two consecutive points are more than
/// `distance` apart. Non-positive or non-finite distances leave the document
/// unchanged.
pub fn discretize<G: GeometryCollaborator + ?Sized>(
    document: &Document,
    geometry: &G,
    distance: f64,
) -> Document {
    if distance <= 0.0 || !distance.is_finite() {
        return document.clone();
    }

    let result: Document = document
        .iter()
        .map(|layer| {
            layer
                .iter()
                .map(|path| Path::new(geometry.discretize(path.points(), distance)))
                .collect::<Layer>()
        })
        .collect();

    debug!(
        "Discretized {} points into {} at spacing {}",
        document.point_count(),
        result.point_count(),
        distance
    );
    result
}

/// Rotate the start of every closed path.
///
/// Layer `i` uses `shifts[i]`; layers past the end of `shifts` reuse its last
/// value. Negative shifts move the start backwards. Open paths are untouched.
pub fn seam_shift(document: &Document, shifts: &[i64]) -> Document {
    let Some(&last_shift) = shifts.last() else {
        return document.clone();
    };

    document
        .iter()
        .enumerate()
        .map(|(i, layer)| {
            let shift = shifts.get(i).copied().unwrap_or(last_shift);
            layer.iter().map(|path| shift_path(path, shift)).collect::<Layer>()
        })
        .collect()
}

/// Rotate one closed path; open paths are returned as they are.
pub fn shift_path(path: &Path, shift: i64) -> Path {
    if !path.is_closed() || path.len() < 3 {
        return path.clone();
    }

    // Drop the closing duplicate, rotate the loop, close it again
    let ring = &path.points()[..path.len() - 1];
    let start = shift.rem_euclid(ring.len() as i64) as usize;

    let mut points = Vec::with_capacity(path.len());
    points.extend_from_slice(&ring[start..]);
    points.extend_from_slice(&ring[..start]);
    points.push(ring[start]);
    Path::new(points)
}

/// Add a lead-in and a lead-out point to every path.
///
/// The new first point is the old first point plus `offset`, the new last
/// point the old last point plus `offset`. A zero offset is a no-op.
pub fn axis_offset(document: &Document, offset: Point3) -> Document {
    if offset.is_zero() {
        return document.clone();
    }

    document
        .iter()
        .map(|layer| {
            layer
                .iter()
                .map(|path| match (path.first(), path.last()) {
                    (Some(&first), Some(&last)) => {
                        let mut points = Vec::with_capacity(path.len() + 2);
                        points.push(first + offset);
                        points.extend_from_slice(path.points());
                        points.push(last + offset);
                        Path::new(points)
                    }
                    _ => path.clone(),
                })
                .collect::<Layer>()
        })
        .collect()
}

/// Prefix of the document holding exactly its first `n` points.
///
/// Layer structure is kept, layers with nothing consumed are omitted and the
/// first partially consumed path is truncated.
pub fn clamp(document: &Document, n: usize) -> Document {
    let mut remaining = n;
    let mut result = Document::default();

    for layer in document {
        if remaining == 0 {
            break;
        }
        let clamped = clamp_paths(layer.paths(), &mut remaining);
        if !clamped.is_empty() {
            result.push(clamped);
        }
    }
    result
}

/// Prefix of one layer holding exactly its first `n` points.
pub fn clamp_layer(layer: &Layer, n: usize) -> Layer {
    let mut remaining = n;
    clamp_paths(layer.paths(), &mut remaining)
}

fn clamp_paths(paths: &[Path], remaining: &mut usize) -> Layer {
    let mut layer = Layer::default();
    for path in paths {
        if *remaining == 0 {
            break;
        }
        if path.len() <= *remaining {
            *remaining -= path.len();
            layer.push(path.clone());
        } else {
            layer.push(Path::new(path.points()[..*remaining].to_vec()));
            *remaining = 0;
        }
    }
    layer
}
