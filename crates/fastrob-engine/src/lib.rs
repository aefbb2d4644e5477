//! # fastrob Engine
//!
//! External slicing engine boundary. The pipeline hands a mesh path and an
//! [`EngineConfig`] to a [`SlicingEngine`] and gets back a motion command
//! stream or an [`EngineError`]; command line construction stays inside the
//! adapter.

pub mod config;
pub mod prusa;

pub use config::{EngineConfig, FillPattern};
pub use fastrob_core::EngineError;
pub use prusa::PrusaSlicerEngine;

use fastrob_gcode::MotionCommandStream;
use std::path::Path;

/// A slicer that turns a surface mesh into motion commands.
pub trait SlicingEngine {
    /// Human readable engine name
    fn name(&self) -> &str;

    /// Slice `mesh` with `config`, blocking until the engine is done.
    fn slice(&self, mesh: &Path, config: &EngineConfig) -> Result<MotionCommandStream, EngineError>;
}
