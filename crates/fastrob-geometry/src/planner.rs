//! # Native Toolpath Planner
//!
//! Builds a [`Document`] directly from a mesh, without an external slicing
//! engine: every layer height is sliced, offset into walls and a fill
//! boundary, and the fill boundary is rasterized with the zig-zag generator.
//!
//! The per-layer intermediates are kept in [`LayerPlan`]s so a rendering
//! layer can inspect shells and hatch lines.

use crate::collaborator::GeometryCollaborator;
use crate::contour::{offset_increments, offset_shells, LayerShells};
use crate::infill::{InfillParams, InfillResult, ZigZagInfill};
use crate::model3d::Mesh3D;
use crate::region::Region;
use fastrob_core::{Document, Layer};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Parameters for native toolpath planning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerParams {
    /// Distance between slicing planes
    pub layer_height: f64,
    /// Bead width; walls are spaced by it
    pub line_width: f64,
    /// Number of perimeter walls
    pub perimeters: u32,
    /// Infill raster angle in degrees
    pub fill_angle: f64,
    /// Infill density in percent; 0 disables infill
    pub fill_density: f64,
    /// Join hatch segments into serpentines
    pub continuous: bool,
}

impl Default for PlannerParams {
    fn default() -> Self {
        Self {
            layer_height: 2.0,
            line_width: 6.0,
            perimeters: 1,
            fill_angle: 45.0,
            fill_density: 100.0,
            continuous: true,
        }
    }
}

impl PlannerParams {
    /// Hatch spacing derived from line width and density, `None` when infill is off
    pub fn infill_spacing(&self) -> Option<f64> {
        if self.fill_density > 0.0 && self.line_width > 0.0 {
            Some(self.line_width * 100.0 / self.fill_density.min(100.0))
        } else {
            None
        }
    }
}

/// Everything computed for one slicing plane.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerPlan {
    /// Height of the slicing plane
    pub z: f64,
    /// Raw cross-section
    pub section: Vec<Region>,
    /// Walls and fill boundary
    pub shells: LayerShells,
    /// Infill and its hatch lines
    pub infill: InfillResult,
    /// Paths emitted for this layer: walls first, then infill
    pub layer: Layer,
}

/// Result of planning a whole mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolpathPlan {
    pub document: Document,
    pub layers: Vec<LayerPlan>,
}

/// Mesh to document planner
pub struct ToolpathPlanner<'a, G: GeometryCollaborator + ?Sized> {
    geometry: &'a G,
    params: PlannerParams,
}

impl<'a, G: GeometryCollaborator + ?Sized> ToolpathPlanner<'a, G> {
    pub fn new(geometry: &'a G, params: PlannerParams) -> Self {
        Self { geometry, params }
    }

    pub fn params(&self) -> &PlannerParams {
        &self.params
    }

    /// Plan every layer of `mesh`.
    ///
    /// Planes that cut nothing produce no layer.
    pub fn process_mesh(&self, mesh: &Mesh3D) -> ToolpathPlan {
        let heights = mesh.layer_heights(self.params.layer_height);
        info!(
            "Planning {} layers at {} mm layer height",
            heights.len(),
            self.params.layer_height
        );

        let mut plan = ToolpathPlan::default();
        for z in heights {
            let section = self.geometry.slice_plane(mesh, z);
            if section.is_empty() {
                debug!("Empty cross-section at Z={}, skipping", z);
                continue;
            }

            let layer_plan = self.process_section(z, section);
            if layer_plan.layer.is_empty() {
                continue;
            }
            plan.document.push(layer_plan.layer.clone());
            plan.layers.push(layer_plan);
        }

        info!(
            "Planned {} layers with {} paths",
            plan.document.len(),
            plan.document.path_count()
        );
        plan
    }

    /// Plan one cross-section at height `z`.
    pub fn process_section(&self, z: f64, section: Vec<Region>) -> LayerPlan {
        let increments = offset_increments(self.params.perimeters, self.params.line_width);
        let shells = offset_shells(self.geometry, &section, &increments);
        if let Some(err) = &shells.truncated {
            debug!("Layer at Z={} truncated: {}", z, err);
        }

        let infill = match (&shells.fill_boundary, self.params.infill_spacing()) {
            (Some(boundary), Some(spacing)) => {
                let params = InfillParams {
                    angle_deg: self.params.fill_angle,
                    spacing,
                    continuous: self.params.continuous,
                };
                ZigZagInfill::new(self.geometry, params).generate(boundary)
            }
            (None, Some(_)) => {
                warn!("No fill boundary at Z={}, layer gets walls only", z);
                InfillResult::default()
            }
            _ => InfillResult::default(),
        };

        let mut layer = Layer::default();
        for path in shells.wall_paths(z).into_iter().chain(infill.paths(z)) {
            if path.len() > 1 {
                layer.push(path);
            }
        }

        LayerPlan {
            z,
            section,
            shells,
            infill,
            layer,
        }
    }
}
