//! # fastrob
//!
//! Additive manufacturing toolpath planning and industrial robot code
//! generation.
//!
//! ## Architecture
//!
//! fastrob is organized as a workspace with multiple crates:
//!
//! 1. **fastrob-core** - Document data model, persistence, error taxonomy
//! 2. **fastrob-geometry** - Mesh slicing, contour offsets, zig-zag infill, native planner
//! 3. **fastrob-gcode** - Motion command tokenizer, path reconstruction, post-processing, filter
//! 4. **fastrob-engine** - External slicing engine boundary and PrusaSlicer adapter
//! 5. **fastrob-compiler** - KUKA KRL and ABB RAPID program generation
//! 6. **fastrob-settings** - Pipeline configuration and its persistence
//! 7. **fastrob** - The [`pipeline::recompute`] entry point and the command line tool

pub mod pipeline;

pub use fastrob_compiler::{Compiler, CompilerConfig, Machine, Orientation};
pub use fastrob_core::{Document, EngineError, Error, GeometryError, Layer, Path, Point3, Result};
pub use fastrob_engine::{EngineConfig, FillPattern, PrusaSlicerEngine, SlicingEngine};
pub use fastrob_gcode::{FilterMode, FilterSettings, FilterView, MotionCommandStream};
pub use fastrob_geometry::{CavalierGeometry, GeometryCollaborator, LayerPlan, ToolpathPlanner};
pub use fastrob_settings::{Config, SettingsError, Source};
pub use pipeline::{recompute, PipelineOutput};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Pretty formatted output on stderr, keeping stdout for program text
/// - RUST_LOG environment variable support, `info` when unset
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
