//! Path filter for progress inspection
//!
//! Cuts a document down to the points printed so far, either across the
//! whole document or within one layer.

use crate::postprocess::{clamp, clamp_layer};
use fastrob_core::{Document, Point3};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which part of the document the filter exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// The whole document
    #[default]
    None,
    /// The first `point_index + 1` points of the document
    All,
    /// The first `point_index + 1` points of layer `layer_index`
    Layer,
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterMode::None => write!(f, "None"),
            FilterMode::All => write!(f, "All"),
            FilterMode::Layer => write!(f, "Layer"),
        }
    }
}

/// Filter configuration.
///
/// Indices past the end are clamped to the last layer or point.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub mode: FilterMode,
    pub layer_index: usize,
    pub point_index: usize,
}

/// Result of filtering a document
#[derive(Debug, Clone, PartialEq)]
pub struct FilterView {
    /// The filtered document
    pub document: Document,
    /// Its points, flattened
    pub points: Vec<Point3>,
    /// Last point in document coordinates
    pub last_point: Point3,
    /// Last point moved by the placement
    pub global_point: Point3,
}

impl Default for FilterView {
    fn default() -> Self {
        Self {
            document: Document::default(),
            points: vec![Point3::ORIGIN],
            last_point: Point3::ORIGIN,
            global_point: Point3::ORIGIN,
        }
    }
}

impl FilterSettings {
    pub fn new(mode: FilterMode, layer_index: usize, point_index: usize) -> Self {
        Self {
            mode,
            layer_index,
            point_index,
        }
    }

    /// Filter `document`; `placement` translates the last point into global
    /// coordinates.
    pub fn apply(&self, document: &Document, placement: Point3) -> FilterView {
        let filtered = match self.mode {
            FilterMode::None => document.clone(),
            FilterMode::All => {
                let total = document.point_count();
                if total == 0 {
                    return FilterView::default();
                }
                clamp(document, self.point_index.min(total - 1) + 1)
            }
            FilterMode::Layer => {
                let Some(last_layer) = document.len().checked_sub(1) else {
                    return FilterView::default();
                };
                let layer = &document.layers()[self.layer_index.min(last_layer)];
                let total = layer.point_count();
                if total == 0 {
                    return FilterView::default();
                }
                let clamped = clamp_layer(layer, self.point_index.min(total - 1) + 1);
                Document::new(vec![clamped])
            }
        };

        let points = filtered.flatten_points();
        let Some(&last_point) = points.last() else {
            return FilterView::default();
        };

        debug!(
            "Filter {} exposes {} of {} points",
            self.mode,
            points.len(),
            document.point_count()
        );
        FilterView {
            document: filtered,
            points,
            last_point,
            global_point: placement + last_point,
        }
    }
}
