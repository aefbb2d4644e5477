//! # 3D Model Module
//!
//! Triangle meshes loaded from STL files and sliced into horizontal layers.
//!
//! Slicing classifies every vertex strictly above or not above the cutting
//! plane, so each triangle contributes either zero or exactly two crossing
//! points. Crossings are always interpolated from the lower vertex to the
//! upper one, which makes shared edges produce identical points and lets the
//! contour builder chain segments exactly.

use crate::region::{Point2, Ring};
use fastrob_core::GeometryError;
use nalgebra::{Matrix4, Point3, Vector3};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Segment end points closer than this are chained together
const CHAIN_TOLERANCE: f64 = 1e-7;

type Result<T> = std::result::Result<T, GeometryError>;

fn invalid_mesh(reason: String) -> GeometryError {
    GeometryError::InvalidMesh { reason }
}

/// A 3D triangle made up of three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle3D {
    pub vertices: [Point3<f64>; 3],
}

impl Triangle3D {
    pub fn new(v1: Point3<f64>, v2: Point3<f64>, v3: Point3<f64>) -> Self {
        Self {
            vertices: [v1, v2, v3],
        }
    }

    /// Face normal, zero for degenerate triangles
    pub fn normal(&self) -> Vector3<f64> {
        let edge1 = self.vertices[1] - self.vertices[0];
        let edge2 = self.vertices[2] - self.vertices[0];
        edge1.cross(&edge2).try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
    }

    pub fn z_range(&self) -> (f64, f64) {
        let zs = self.vertices.map(|v| v.z);
        (zs[0].min(zs[1]).min(zs[2]), zs[0].max(zs[1]).max(zs[2]))
    }

    /// Intersection with the horizontal plane at `z`
    ///
    /// Returns the crossing segment, or `None` when the plane misses the
    /// triangle or only touches it.
    pub fn intersect_plane_z(&self, z: f64) -> Option<(Point2, Point2)> {
        let mut crossings = Vec::with_capacity(2);
        for i in 0..3 {
            if let Some(p) =
                intersect_edge_with_plane_z(self.vertices[i], self.vertices[(i + 1) % 3], z)
            {
                crossings.push(p);
            }
        }
        match crossings.as_slice() {
            [a, b] if a.distance_to(b) > CHAIN_TOLERANCE => Some((*a, *b)),
            _ => None,
        }
    }
}

/// Crossing of an edge with the plane; vertices exactly on the plane count as above.
fn intersect_edge_with_plane_z(v1: Point3<f64>, v2: Point3<f64>, z: f64) -> Option<Point2> {
    let above1 = v1.z >= z;
    let above2 = v2.z >= z;
    if above1 == above2 {
        return None;
    }

    let (low, high) = if above1 { (v2, v1) } else { (v1, v2) };
    let t = (z - low.z) / (high.z - low.z);
    Some(Point2::new(
        low.x + t * (high.x - low.x),
        low.y + t * (high.y - low.y),
    ))
}

/// A 3D mesh model
#[derive(Debug, Clone)]
pub struct Mesh3D {
    pub triangles: Vec<Triangle3D>,
    pub bounds_min: Point3<f64>,
    pub bounds_max: Point3<f64>,
}

impl Mesh3D {
    pub fn new(triangles: Vec<Triangle3D>) -> Self {
        let mut mesh = Self {
            triangles,
            bounds_min: Point3::origin(),
            bounds_max: Point3::origin(),
        };
        mesh.calculate_bounds();
        mesh
    }

    pub fn from_stl_mesh(stl_mesh: &stl_io::IndexedMesh) -> Self {
        let vertex = |idx: usize| {
            stl_mesh
                .vertices
                .get(idx)
                .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        };

        let triangles = stl_mesh
            .faces
            .iter()
            .filter_map(|face| {
                Some(Triangle3D::new(
                    vertex(face.vertices[0])?,
                    vertex(face.vertices[1])?,
                    vertex(face.vertices[2])?,
                ))
            })
            .collect();

        Self::new(triangles)
    }

    /// Axis aligned box spanning `min`..`max`, twelve triangles
    pub fn cuboid(min: Point3<f64>, max: Point3<f64>) -> Self {
        let c = |x: bool, y: bool, z: bool| {
            Point3::new(
                if x { max.x } else { min.x },
                if y { max.y } else { min.y },
                if z { max.z } else { min.z },
            )
        };
        let quads = [
            [c(false, false, false), c(false, true, false), c(true, true, false), c(true, false, false)],
            [c(false, false, true), c(true, false, true), c(true, true, true), c(false, true, true)],
            [c(false, false, false), c(true, false, false), c(true, false, true), c(false, false, true)],
            [c(true, false, false), c(true, true, false), c(true, true, true), c(true, false, true)],
            [c(true, true, false), c(false, true, false), c(false, true, true), c(true, true, true)],
            [c(false, true, false), c(false, false, false), c(false, false, true), c(false, true, true)],
        ];
        let triangles = quads
            .iter()
            .flat_map(|q| {
                [
                    Triangle3D::new(q[0], q[1], q[2]),
                    Triangle3D::new(q[0], q[2], q[3]),
                ]
            })
            .collect();
        Self::new(triangles)
    }

    fn calculate_bounds(&mut self) {
        let mut vertices = self.triangles.iter().flat_map(|t| t.vertices.iter());
        let Some(first) = vertices.next() else {
            return;
        };

        let mut min = *first;
        let mut max = *first;
        for v in vertices {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            min.z = min.z.min(v.z);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
            max.z = max.z.max(v.z);
        }

        self.bounds_min = min;
        self.bounds_max = max;
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Transform the mesh using a 4x4 transformation matrix
    pub fn transform(&mut self, transform: &Matrix4<f64>) {
        for triangle in &mut self.triangles {
            for vertex in &mut triangle.vertices {
                *vertex = transform.transform_point(vertex);
            }
        }
        self.calculate_bounds();
    }

    /// Scale the mesh uniformly
    pub fn scale(&mut self, factor: f64) {
        self.transform(&Matrix4::new_scaling(factor));
    }

    /// Translate the mesh
    pub fn translate(&mut self, offset: Vector3<f64>) {
        self.transform(&Matrix4::new_translation(&offset));
    }

    /// Center the mesh over the origin and put it on the Z = 0 plane
    pub fn center_on_bed(&mut self) {
        let center = (self.bounds_min.coords + self.bounds_max.coords) * 0.5;
        self.translate(Vector3::new(-center.x, -center.y, -self.bounds_min.z));
    }

    /// Slice heights for a given layer height
    ///
    /// The first layer sits one layer height above the bottom of the mesh and
    /// the last one at or below its top.
    pub fn layer_heights(&self, layer_height: f64) -> Vec<f64> {
        if self.is_empty() || layer_height <= 0.0 || !layer_height.is_finite() {
            return Vec::new();
        }
        let z_min = self.bounds_min.z;
        let z_max = self.bounds_max.z;
        (1..)
            .map(|k| z_min + k as f64 * layer_height)
            .take_while(|z| *z <= z_max + 1e-9)
            .collect()
    }

    /// Slice the mesh at a specific Z height and return the closed contours
    pub fn slice_at_z(&self, z: f64) -> Vec<Ring> {
        let segments: Vec<(Point2, Point2)> = self
            .triangles
            .iter()
            .filter(|tri| {
                let (lo, hi) = tri.z_range();
                z >= lo && z <= hi
            })
            .filter_map(|tri| tri.intersect_plane_z(z))
            .collect();

        debug!("Found {} intersection segments at Z = {}", segments.len(), z);

        let contours = build_contours_from_segments(&segments);

        debug!("Built {} closed contours from slice", contours.len());

        contours
    }
}

/// Chain loose segments into closed rings.
///
/// Open chains (non-manifold meshes) are dropped.
pub fn build_contours_from_segments(segments: &[(Point2, Point2)]) -> Vec<Ring> {
    let mut used_segments = HashSet::new();
    let mut contours = Vec::new();
    let close = |a: &Point2, b: &Point2| a.distance_to(b) < CHAIN_TOLERANCE;

    for (i, &(start, end)) in segments.iter().enumerate() {
        if used_segments.contains(&i) {
            continue;
        }

        let mut contour_points = vec![start];
        let mut current_end = end;
        used_segments.insert(i);

        let mut found_connection = true;
        while found_connection && !close(&current_end, &start) {
            found_connection = false;

            for (j, &(seg_start, seg_end)) in segments.iter().enumerate() {
                if used_segments.contains(&j) {
                    continue;
                }

                let next = if close(&current_end, &seg_start) {
                    Some(seg_end)
                } else if close(&current_end, &seg_end) {
                    Some(seg_start)
                } else {
                    None
                };

                if let Some(next) = next {
                    contour_points.push(current_end);
                    current_end = next;
                    used_segments.insert(j);
                    found_connection = true;
                    break;
                }
            }
        }

        if contour_points.len() > 2 && close(&current_end, &start) {
            contours.push(Ring::new(contour_points));
        } else {
            debug!(
                "Dropping open contour with {} points",
                contour_points.len()
            );
        }
    }

    contours
}

/// Supported 3D file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model3DFormat {
    /// STL (STereoLithography) format
    Stl,
}

/// 3D model importer for converting 3D files to mesh representations
#[derive(Debug, Clone)]
pub struct Model3DImporter {
    pub scale: f64,
    pub center_model: bool,
}

impl Model3DImporter {
    pub fn new() -> Self {
        Self {
            scale: 1.0,
            center_model: false,
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_centering(mut self, center: bool) -> Self {
        self.center_model = center;
        self
    }

    /// Import 3D model from file path
    pub fn import_file(&self, path: &Path) -> Result<Mesh3D> {
        match self.detect_format(path)? {
            Model3DFormat::Stl => self.import_stl_file(path),
        }
    }

    /// Import STL from file path
    pub fn import_stl_file(&self, path: &Path) -> Result<Mesh3D> {
        debug!("Importing STL file: {}", path.display());

        let mut file = std::fs::File::open(path)
            .map_err(|e| invalid_mesh(format!("Failed to open STL file {}: {}", path.display(), e)))?;

        let stl = stl_io::read_stl(&mut file)
            .map_err(|e| invalid_mesh(format!("Failed to parse STL file {}: {}", path.display(), e)))?;

        self.finish(Mesh3D::from_stl_mesh(&stl))
    }

    /// Import STL from in-memory data (binary or ASCII)
    pub fn import_stl_data(&self, data: &[u8]) -> Result<Mesh3D> {
        debug!("Importing STL from memory ({} bytes)", data.len());

        let mut cursor = std::io::Cursor::new(data);
        let stl = stl_io::read_stl(&mut cursor)
            .map_err(|e| invalid_mesh(format!("Failed to parse STL data: {}", e)))?;

        self.finish(Mesh3D::from_stl_mesh(&stl))
    }

    fn finish(&self, mut mesh: Mesh3D) -> Result<Mesh3D> {
        debug!("STL contains {} faces", mesh.triangles.len());
        if mesh.is_empty() {
            return Err(invalid_mesh("STL contains no faces".to_string()));
        }
        if self.scale <= 0.0 || !self.scale.is_finite() {
            return Err(invalid_mesh(format!("Invalid scale factor {}", self.scale)));
        }

        if self.scale != 1.0 {
            debug!("Scaling mesh by factor {}", self.scale);
            mesh.scale(self.scale);
        }

        if self.center_model {
            mesh.center_on_bed();
        }

        debug!(
            "Final mesh bounds: {:?} to {:?}",
            mesh.bounds_min, mesh.bounds_max
        );
        Ok(mesh)
    }

    /// Detect file format from file extension
    fn detect_format(&self, path: &Path) -> Result<Model3DFormat> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase())
            .ok_or_else(|| {
                invalid_mesh(format!(
                    "Unable to determine file extension for: {}",
                    path.display()
                ))
            })?;

        match extension.as_str() {
            "stl" => Ok(Model3DFormat::Stl),
            _ => Err(invalid_mesh(format!("Unsupported 3D file format: .{}", extension))),
        }
    }
}

impl Default for Model3DImporter {
    fn default() -> Self {
        Self::new()
    }
}
