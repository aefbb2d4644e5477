//! Geometry kernel seam.
//!
//! The toolpath generators only talk to [`GeometryCollaborator`]. The default
//! implementation, [`CavalierGeometry`], offsets with `cavalier_contours`,
//! slices meshes with [`Mesh3D::slice_at_z`], clips segments with an
//! even-odd scanline and resamples polylines linearly.

use crate::model3d::Mesh3D;
use crate::region::{regions_from_rings, Point2, Region, Ring, Segment2};
use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline};
use cavalier_contours::shape_algorithms::{Shape, ShapeOffsetOptions};
use fastrob_core::{GeometryError, Point3};
use std::panic;
use tracing::{debug, warn};

/// Operations the toolpath planner needs from a geometry kernel.
pub trait GeometryCollaborator {
    /// Cross-section of `mesh` with the horizontal plane at `height`.
    fn slice_plane(&self, mesh: &Mesh3D, height: f64) -> Vec<Region>;

    /// Inward offset of a region set by `distance`.
    ///
    /// An empty result is reported as [`GeometryError::Empty`].
    fn offset(&self, regions: &[Region], distance: f64) -> Result<Vec<Region>, GeometryError>;

    /// Parts of `segment` lying inside `region`, ordered and oriented along
    /// the segment's direction.
    fn intersect_segment(&self, segment: &Segment2, region: &Region) -> Vec<Segment2>;

    /// Resample a polyline so no two consecutive points are further apart
    /// than `max_spacing`.
    fn discretize(&self, points: &[Point3], max_spacing: f64) -> Vec<Point3>;
}

/// Geometry kernel backed by `cavalier_contours`.
#[derive(Debug, Clone)]
pub struct CavalierGeometry {
    /// Maximum chord deviation when flattening offset arcs
    pub arc_tolerance: f64,
}

impl CavalierGeometry {
    pub fn new() -> Self {
        Self {
            arc_tolerance: 0.01,
        }
    }

    pub fn with_arc_tolerance(mut self, tolerance: f64) -> Self {
        self.arc_tolerance = tolerance;
        self
    }

    fn ring_to_polyline(ring: &Ring) -> Polyline<f64> {
        let mut pline = Polyline::new();
        for p in ring.points() {
            pline.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
        }
        pline.set_is_closed(true);
        pline
    }

    /// Flatten a closed polyline, replacing bulge arcs with chords.
    fn polyline_to_ring(&self, pline: &Polyline<f64>) -> Ring {
        let count = pline.vertex_count();
        let mut points = Vec::with_capacity(count);

        for i in 0..count {
            let v1 = pline.at(i);
            let v2 = pline.at((i + 1) % count);
            points.push(Point2::new(v1.x, v1.y));

            if v1.bulge.abs() > 1e-9 {
                points.extend(self.arc_points(v1, v2));
            }
        }

        Ring::new(points)
    }

    /// Interior points of the arc from `v1` to `v2` described by `v1.bulge`.
    fn arc_points(&self, v1: PlineVertex<f64>, v2: PlineVertex<f64>) -> Vec<Point2> {
        let chord_len = ((v2.x - v1.x).powi(2) + (v2.y - v1.y).powi(2)).sqrt();
        if chord_len < 1e-9 {
            return Vec::new();
        }

        let theta = 4.0 * v1.bulge.atan();
        let radius = (chord_len / (2.0 * (theta / 2.0).sin())).abs();

        // Center lies on the chord's normal; past a half circle the cosine flips the side
        let dist_to_center = radius * (theta.abs() / 2.0).cos();
        let mx = (v1.x + v2.x) / 2.0;
        let my = (v1.y + v2.y) / 2.0;
        let nx = -(v2.y - v1.y) / chord_len;
        let ny = (v2.x - v1.x) / chord_len;
        let sign = if v1.bulge > 0.0 { 1.0 } else { -1.0 };
        let cx = mx + nx * dist_to_center * sign;
        let cy = my + ny * dist_to_center * sign;

        let start_angle = (v1.y - cy).atan2(v1.x - cx);
        let max_step = if radius > self.arc_tolerance {
            2.0 * (1.0 - self.arc_tolerance / radius).acos()
        } else {
            theta.abs()
        };
        let steps = ((theta.abs() / max_step.max(1e-3)).ceil() as usize).max(1);

        (1..steps)
            .map(|k| {
                let angle = start_angle + theta * k as f64 / steps as f64;
                Point2::new(cx + radius * angle.cos(), cy + radius * angle.sin())
            })
            .collect()
    }

    fn offset_region(&self, region: &Region, distance: f64) -> Result<Vec<Ring>, GeometryError> {
        let plines: Vec<Polyline<f64>> = region.rings().map(Self::ring_to_polyline).collect();

        let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            let shape = Shape::from_plines(plines);
            shape.parallel_offset(distance, ShapeOffsetOptions::default())
        }));

        match result {
            Ok(shape) => Ok(shape
                .ccw_plines
                .iter()
                .chain(shape.cw_plines.iter())
                .map(|indexed| self.polyline_to_ring(&indexed.polyline))
                .collect()),
            Err(_) => {
                warn!("Panic during parallel offset at distance {}", distance);
                Err(GeometryError::Degenerate {
                    distance,
                    reason: "offset kernel panicked".to_string(),
                })
            }
        }
    }
}

impl Default for CavalierGeometry {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryCollaborator for CavalierGeometry {
    fn slice_plane(&self, mesh: &Mesh3D, height: f64) -> Vec<Region> {
        regions_from_rings(mesh.slice_at_z(height))
    }

    fn offset(&self, regions: &[Region], distance: f64) -> Result<Vec<Region>, GeometryError> {
        if !distance.is_finite() {
            return Err(GeometryError::Degenerate {
                distance,
                reason: "distance is not finite".to_string(),
            });
        }
        if distance == 0.0 {
            return if regions.is_empty() {
                Err(GeometryError::Empty { distance })
            } else {
                Ok(regions.to_vec())
            };
        }

        let mut rings = Vec::new();
        for region in regions {
            rings.extend(self.offset_region(region, distance)?);
        }

        let result = regions_from_rings(rings);
        debug!(
            "Offset {} regions by {} into {} regions",
            regions.len(),
            distance,
            result.len()
        );

        if result.is_empty() {
            Err(GeometryError::Empty { distance })
        } else {
            Ok(result)
        }
    }

    fn intersect_segment(&self, segment: &Segment2, region: &Region) -> Vec<Segment2> {
        let length = segment.length();
        if length < 1e-12 {
            return Vec::new();
        }

        // Work in a frame where the segment runs along +X from the origin
        let angle = (segment.end.y - segment.start.y).atan2(segment.end.x - segment.start.x);
        let (sin_a, cos_a) = (-angle).sin_cos();
        let to_local = |p: &Point2| {
            let dx = p.x - segment.start.x;
            let dy = p.y - segment.start.y;
            Point2::new(dx * cos_a - dy * sin_a, dx * sin_a + dy * cos_a)
        };

        let mut crossings: Vec<f64> = Vec::new();
        for ring in region.rings() {
            for (a, b) in ring.edges() {
                let p1 = to_local(&a);
                let p2 = to_local(&b);
                if (p1.y <= 0.0 && p2.y > 0.0) || (p2.y <= 0.0 && p1.y > 0.0) {
                    let x = p1.x + (0.0 - p1.y) * (p2.x - p1.x) / (p2.y - p1.y);
                    crossings.push(x);
                }
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));
        if crossings.len() % 2 == 1 {
            warn!(
                "{}, ignoring the unpaired crossing",
                GeometryError::MalformedTopology {
                    crossings: crossings.len()
                }
            );
        }

        crossings
            .chunks_exact(2)
            .filter_map(|pair| {
                let from = pair[0].max(0.0);
                let to = pair[1].min(length);
                (to - from > 1e-9)
                    .then(|| Segment2::new(segment.point_at(from / length), segment.point_at(to / length)))
            })
            .collect()
    }

    fn discretize(&self, points: &[Point3], max_spacing: f64) -> Vec<Point3> {
        if max_spacing <= 0.0 || !max_spacing.is_finite() || points.len() < 2 {
            return points.to_vec();
        }

        let mut result = Vec::with_capacity(points.len());
        result.push(points[0]);
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let pieces = (a.distance_to(&b) / max_spacing).ceil().max(1.0) as usize;
            for k in 1..=pieces {
                result.push(a.lerp(&b, k as f64 / pieces as f64));
            }
        }
        result
    }
}
