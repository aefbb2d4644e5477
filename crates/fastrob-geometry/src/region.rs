//! Planar regions: rings, islands with holes, and line segments.
//!
//! Rings store their vertices without repeating the first one at the end.
//! A [`Region`] keeps its outer ring counter-clockwise and its holes
//! clockwise, which is the orientation the offset kernel expects.

use serde::{Deserialize, Serialize};

/// Vertices closer than this are merged when building rings
const VERTEX_TOLERANCE: f64 = 1e-9;

/// A point in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }

    /// Rotate around `center` by `angle_deg` (counter-clockwise positive).
    pub fn rotated(&self, center: Point2, angle_deg: f64) -> Point2 {
        let (sin_a, cos_a) = angle_deg.to_radians().sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Point2::new(
            center.x + dx * cos_a - dy * sin_a,
            center.y + dx * sin_a + dy * cos_a,
        )
    }

    pub fn lerp(&self, other: &Point2, t: f64) -> Point2 {
        Point2::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Axis aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox2 {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox2 {
    /// Bounding box of a point set, `None` when empty
    pub fn from_points<'a, I: IntoIterator<Item = &'a Point2>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in iter {
            bbox.min_x = bbox.min_x.min(p.x);
            bbox.min_y = bbox.min_y.min(p.y);
            bbox.max_x = bbox.max_x.max(p.x);
            bbox.max_y = bbox.max_y.max(p.y);
        }
        Some(bbox)
    }

    pub fn union(&self, other: &BoundingBox2) -> BoundingBox2 {
        BoundingBox2 {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// A straight segment in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment2 {
    pub start: Point2,
    pub end: Point2,
}

impl Segment2 {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn reversed(&self) -> Segment2 {
        Segment2::new(self.end, self.start)
    }

    pub fn rotated(&self, center: Point2, angle_deg: f64) -> Segment2 {
        Segment2::new(
            self.start.rotated(center, angle_deg),
            self.end.rotated(center, angle_deg),
        )
    }

    pub fn point_at(&self, t: f64) -> Point2 {
        self.start.lerp(&self.end, t)
    }
}

/// A closed loop of vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    points: Vec<Point2>,
}

impl Ring {
    /// Build a ring, merging repeated vertices and dropping an explicit
    /// closing vertex.
    pub fn new(points: Vec<Point2>) -> Self {
        let mut clean: Vec<Point2> = Vec::with_capacity(points.len());
        for p in points {
            if clean
                .last()
                .is_some_and(|last| last.distance_to(&p) < VERTEX_TOLERANCE)
            {
                continue;
            }
            clean.push(p);
        }
        while clean.len() > 1 {
            match (clean.first(), clean.last()) {
                (Some(first), Some(last)) if first.distance_to(last) < VERTEX_TOLERANCE => {
                    clean.pop();
                }
                _ => break,
            }
        }
        Self { points: clean }
    }

    /// Axis aligned rectangle, counter-clockwise
    pub fn rectangle(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(vec![
            Point2::new(min_x, min_y),
            Point2::new(max_x, min_y),
            Point2::new(max_x, max_y),
            Point2::new(min_x, max_y),
        ])
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Edges including the closing edge
    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Shoelace area, positive for counter-clockwise rings
    pub fn signed_area(&self) -> f64 {
        self.edges()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum::<f64>()
            * 0.5
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    pub fn reversed(&self) -> Ring {
        let mut points = self.points.clone();
        points.reverse();
        Ring { points }
    }

    /// Same ring with the requested orientation
    pub fn oriented(self, ccw: bool) -> Ring {
        if self.is_ccw() == ccw {
            self
        } else {
            self.reversed()
        }
    }

    pub fn rotated(&self, center: Point2, angle_deg: f64) -> Ring {
        Ring {
            points: self
                .points
                .iter()
                .map(|p| p.rotated(center, angle_deg))
                .collect(),
        }
    }

    pub fn bounding_box(&self) -> Option<BoundingBox2> {
        BoundingBox2::from_points(&self.points)
    }

    /// Even-odd point containment
    pub fn contains(&self, point: &Point2) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > point.y) != (b.y > point.y) {
                let x = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if point.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// First moment terms (sum of cross * (xi + xj), sum of cross * (yi + yj))
    fn moments(&self) -> (f64, f64) {
        self.edges().fold((0.0, 0.0), |(mx, my), (a, b)| {
            let cross = a.x * b.y - b.x * a.y;
            (mx + (a.x + b.x) * cross, my + (a.y + b.y) * cross)
        })
    }

    /// Closed vertex list, first point repeated at the end
    pub fn closed_points(&self) -> Vec<Point2> {
        let mut points = self.points.clone();
        if let Some(first) = self.points.first() {
            points.push(*first);
        }
        points
    }
}

/// One island: an outer boundary and the holes inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    outer: Ring,
    holes: Vec<Ring>,
}

impl Region {
    /// Build a region, normalizing ring orientation.
    pub fn new(outer: Ring, holes: Vec<Ring>) -> Self {
        Self {
            outer: outer.oriented(true),
            holes: holes.into_iter().map(|h| h.oriented(false)).collect(),
        }
    }

    pub fn from_outer(outer: Ring) -> Self {
        Self::new(outer, Vec::new())
    }

    pub fn outer(&self) -> &Ring {
        &self.outer
    }

    pub fn holes(&self) -> &[Ring] {
        &self.holes
    }

    /// Outer ring followed by the holes
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    /// Enclosed area (outer minus holes)
    pub fn area(&self) -> f64 {
        self.rings().map(Ring::signed_area).sum()
    }

    /// Area weighted centroid, holes subtracted
    pub fn centroid(&self) -> Point2 {
        let area = self.area();
        let (mx, my) = self.rings().fold((0.0, 0.0), |(ax, ay), ring| {
            let (mx, my) = ring.moments();
            (ax + mx, ay + my)
        });
        if area.abs() < f64::EPSILON {
            // Degenerate, fall back to the vertex average
            let n = self.outer.len().max(1) as f64;
            let (sx, sy) = self
                .outer
                .points()
                .iter()
                .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
            return Point2::new(sx / n, sy / n);
        }
        Point2::new(mx / (6.0 * area), my / (6.0 * area))
    }

    pub fn bounding_box(&self) -> Option<BoundingBox2> {
        self.outer.bounding_box()
    }

    pub fn contains(&self, point: &Point2) -> bool {
        self.outer.contains(point) && !self.holes.iter().any(|h| h.contains(point))
    }

    pub fn rotated(&self, center: Point2, angle_deg: f64) -> Region {
        Region {
            outer: self.outer.rotated(center, angle_deg),
            holes: self
                .holes
                .iter()
                .map(|h| h.rotated(center, angle_deg))
                .collect(),
        }
    }
}

/// Bounding box over every region of a set
pub fn bounding_box_of(regions: &[Region]) -> Option<BoundingBox2> {
    regions
        .iter()
        .filter_map(Region::bounding_box)
        .reduce(|a, b| a.union(&b))
}

/// Assemble loose rings into islands.
///
/// Rings are nested by containment: a ring inside an even number of other
/// rings is an outer boundary, a ring inside an odd number is a hole of its
/// innermost container.
pub fn regions_from_rings(rings: Vec<Ring>) -> Vec<Region> {
    let mut rings: Vec<Ring> = rings
        .into_iter()
        .filter(|r| r.len() >= 3 && r.area() > VERTEX_TOLERANCE)
        .collect();
    rings.sort_by(|a, b| b.area().total_cmp(&a.area()));

    let mut depths: Vec<usize> = Vec::with_capacity(rings.len());
    let mut region_of: Vec<Option<usize>> = Vec::with_capacity(rings.len());
    let mut outers: Vec<Ring> = Vec::new();
    let mut holes: Vec<Vec<Ring>> = Vec::new();

    for (i, ring) in rings.iter().enumerate() {
        let probe = ring.points()[0];
        let containers: Vec<usize> = (0..i).filter(|&j| rings[j].contains(&probe)).collect();
        let depth = containers.len();
        depths.push(depth);

        if depth % 2 == 0 {
            region_of.push(Some(outers.len()));
            outers.push(ring.clone());
            holes.push(Vec::new());
        } else {
            // innermost container is the last one, since rings are sorted by area
            let parent = containers
                .last()
                .and_then(|&j| if depths[j] % 2 == 0 { region_of[j] } else { None });
            if let Some(index) = parent {
                holes[index].push(ring.clone());
            }
            region_of.push(None);
        }
    }

    outers
        .into_iter()
        .zip(holes)
        .map(|(outer, holes)| Region::new(outer, holes))
        .collect()
}
