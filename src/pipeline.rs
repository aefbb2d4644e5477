//! # Recompute pipeline
//!
//! One synchronous pass from a mesh to a robot program:
//!
//! ```text
//! source (engine | native) ──> Document
//!   └── discretize ──> seam shift ──> axis offset
//!         └── compile ──> [write] ──> filter view
//! ```
//!
//! Pipeline-breaking failures (engine, mesh load, final write) reset every
//! output and are reported once through [`PipelineOutput::error`].
//! Recoverable geometry problems are absorbed by the stages themselves.

use fastrob_compiler::Compiler;
use fastrob_core::{Document, Error};
use fastrob_engine::SlicingEngine;
use fastrob_gcode::{axis_offset, discretize, reconstruct, seam_shift, FilterView};
use fastrob_geometry::{GeometryCollaborator, LayerPlan, Model3DImporter, ToolpathPlanner};
use fastrob_settings::{Config, Source};
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Everything one recompute produced
#[derive(Debug, Default)]
pub struct PipelineOutput {
    document: Document,
    compiled: String,
    layer_plans: Vec<LayerPlan>,
    view: FilterView,
    error: Option<Error>,
}

impl PipelineOutput {
    fn failed(error: Error) -> Self {
        error!("Recompute failed, outputs reset: {}", error);
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Post-processed document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Compiled program text
    pub fn compiled(&self) -> &str {
        &self.compiled
    }

    /// Per-layer shells and hatch lines; empty for the engine source
    pub fn layer_plans(&self) -> &[LayerPlan] {
        &self.layer_plans
    }

    /// Filtered view of the document
    pub fn view(&self) -> &FilterView {
        &self.view
    }

    /// The failure that reset this output
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Run the whole pipeline for `mesh` with `config`.
pub fn recompute(
    config: &Config,
    mesh: &Path,
    engine: &dyn SlicingEngine,
    geometry: &dyn GeometryCollaborator,
) -> PipelineOutput {
    info!("Recomputing {} from {} source", mesh.display(), config.source);

    let (raw, layer_plans) = match config.source {
        Source::Engine => match engine.slice(mesh, &config.engine) {
            Ok(stream) => {
                debug!("{} returned {} motion commands", engine.name(), stream.len());
                (reconstruct(&stream), Vec::new())
            }
            Err(e) => {
                debug!("{} reported a failure", engine.name());
                return PipelineOutput::failed(e.into());
            }
        },
        Source::Native => {
            let importer = Model3DImporter::new()
                .with_scale(config.native.scale)
                .with_centering(config.native.center_model);
            let loaded = match importer.import_file(mesh) {
                Ok(loaded) => loaded,
                Err(e) => return PipelineOutput::failed(e.into()),
            };
            let plan = ToolpathPlanner::new(geometry, config.planner_params()).process_mesh(&loaded);
            (plan.document, plan.layers)
        }
    };

    if raw.is_empty() {
        warn!("No layers produced for {}, outputs reset", mesh.display());
        return PipelineOutput::default();
    }

    let post = &config.postprocess;
    let document = discretize(&raw, geometry, post.discretize);
    let document = seam_shift(&document, &post.seam_shifts);
    let document = axis_offset(&document, post.axis_offset);

    let compiler = Compiler::new(config.compiler.clone());
    let compiled = compiler.compile(&document, post.has_lead());

    if !config.compiler.silent {
        if let Some(target) = &config.compiler.output_file {
            if let Err(e) = compiler.write_to(&compiled, target) {
                error!("Failed to write program to {}", target.display());
                return PipelineOutput::failed(e);
            }
        }
    }

    let view = config.filter.apply(&document, config.placement);

    info!(
        "Pipeline produced {} layers, {} paths, {} points",
        document.len(),
        document.path_count(),
        document.point_count()
    );

    PipelineOutput {
        document,
        compiled,
        layer_plans,
        view,
        error: None,
    }
}
