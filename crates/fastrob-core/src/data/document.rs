//! Layer → path → point document and its nested-array persistence.
//!
//! On disk a document is plain JSON: `[[[[x, y, z], ...], ...], ...]`, one array
//! level per layer, path and point. Anything with a different depth is rejected
//! when loading.

use super::Point3;
use crate::constants::CLOSED_TOLERANCE;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;
use tracing::debug;

/// One continuous stroke of the deposition head.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    points: Vec<Point3>,
}

impl Path {
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point3> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Point3> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point3> {
        self.points.last()
    }

    pub fn push(&mut self, point: Point3) {
        self.points.push(point);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point3> {
        self.points.iter()
    }

    /// A path is closed when its end points coincide within [`CLOSED_TOLERANCE`].
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 1 => {
                first.distance_to(last) < CLOSED_TOLERANCE
            }
            _ => false,
        }
    }

    /// Sum of the segment lengths
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum()
    }
}

impl From<Vec<Point3>> for Path {
    fn from(points: Vec<Point3>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Point3> for Path {
    fn from_iter<I: IntoIterator<Item = Point3>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Point3;
    type IntoIter = std::slice::Iter<'a, Point3>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// The paths printed at one height.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layer {
    paths: Vec<Path>,
}

impl Layer {
    pub fn new(paths: Vec<Path>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn into_paths(self) -> Vec<Path> {
        self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn push(&mut self, path: Path) {
        self.paths.push(path);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Path> {
        self.paths.iter()
    }

    /// Total number of points over all paths
    pub fn point_count(&self) -> usize {
        self.paths.iter().map(Path::len).sum()
    }

    /// All points of the layer in print order
    pub fn flatten_points(&self) -> Vec<Point3> {
        self.paths.iter().flat_map(|p| p.iter().copied()).collect()
    }

    /// Mean Z over every point, `None` for an empty layer
    pub fn mean_z(&self) -> Option<f64> {
        let count = self.point_count();
        if count == 0 {
            return None;
        }
        let sum: f64 = self.paths.iter().flat_map(|p| p.iter()).map(|p| p.z).sum();
        Some(sum / count as f64)
    }
}

impl From<Vec<Path>> for Layer {
    fn from(paths: Vec<Path>) -> Self {
        Self::new(paths)
    }
}

impl FromIterator<Path> for Layer {
    fn from_iter<I: IntoIterator<Item = Path>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Layer {
    type Item = &'a Path;
    type IntoIter = std::slice::Iter<'a, Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Complete toolpath: layers ordered by increasing Z.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    layers: Vec<Layer>,
}

impl Document {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn into_layers(self) -> Vec<Layer> {
        self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }

    pub fn path_count(&self) -> usize {
        self.layers.iter().map(Layer::len).sum()
    }

    pub fn point_count(&self) -> usize {
        self.layers.iter().map(Layer::point_count).sum()
    }

    /// Every path of every layer, layer boundaries removed
    pub fn flatten_paths(&self) -> Vec<&Path> {
        self.layers.iter().flat_map(|l| l.iter()).collect()
    }

    /// Every point in print order
    pub fn flatten_points(&self) -> Vec<Point3> {
        self.layers.iter().flat_map(Layer::flatten_points).collect()
    }

    pub fn last_point(&self) -> Option<Point3> {
        self.layers
            .iter()
            .rev()
            .flat_map(|l| l.iter().rev())
            .find_map(|p| p.last().copied())
    }

    /// Checks that layer heights never decrease.
    pub fn is_z_monotonic(&self) -> bool {
        let heights: Vec<f64> = self.layers.iter().filter_map(Layer::mean_z).collect();
        heights.windows(2).all(|w| w[1] + CLOSED_TOLERANCE >= w[0])
    }

    /// Serialize to the nested-array interchange form.
    pub fn to_nested_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the nested-array interchange form.
    ///
    /// Fails unless the input is exactly layer → path → `[x, y, z]`.
    pub fn from_nested_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the document to `path` as nested JSON arrays.
    pub fn save(&self, path: &FsPath) -> Result<()> {
        let json = self.to_nested_json()?;
        std::fs::write(path, json)?;
        debug!(
            "Saved document with {} layers to {}",
            self.len(),
            path.display()
        );
        Ok(())
    }

    /// Read a document previously written with [`Document::save`].
    pub fn load(path: &FsPath) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let document = Self::from_nested_json(&json)?;
        debug!(
            "Loaded document with {} layers from {}",
            document.len(),
            path.display()
        );
        Ok(document)
    }
}

impl From<Vec<Layer>> for Document {
    fn from(layers: Vec<Layer>) -> Self {
        Self::new(layers)
    }
}

impl FromIterator<Layer> for Document {
    fn from_iter<I: IntoIterator<Item = Layer>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}
