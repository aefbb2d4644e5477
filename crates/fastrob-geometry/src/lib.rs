//! # fastrob Geometry
//!
//! Planar and mesh geometry for native toolpath planning.
//!
//! ## Components
//!
//! - **Regions**: rings, holed regions and segments in the layer plane
//! - **Mesh import**: STL loading and horizontal plane slicing
//! - **Geometry collaborator**: the kernel seam (slice, offset, clip, resample)
//!   with a `cavalier_contours` backed implementation
//! - **Contour offsets**: walls and fill boundary of one cross-section
//! - **Zig-zag infill**: hatch lines, grouping and serpentine stitching
//! - **Planner**: mesh → [`fastrob_core::Document`] with per-layer intermediates
//!
//! ```text
//! Mesh3D ── slice_plane ──> Vec<Region>
//!   └── offset_shells ──> walls + fill boundary
//!         └── ZigZagInfill ──> infill paths
//! ```

pub mod collaborator;
pub mod contour;
pub mod infill;
pub mod model3d;
pub mod planner;
pub mod region;

pub use collaborator::{CavalierGeometry, GeometryCollaborator};
pub use contour::{offset_increments, offset_shells, shell_paths, LayerShells, Shell};
pub use infill::{
    group_by_count, hatch_positions, HatchGroup, HatchLine, InfillParams, InfillResult,
    ZigZagInfill, HATCH_OVERHANG, HATCH_SHRINK,
};
pub use model3d::{Mesh3D, Model3DFormat, Model3DImporter, Triangle3D};
pub use planner::{LayerPlan, PlannerParams, ToolpathPlan, ToolpathPlanner};
pub use region::{BoundingBox2, Point2, Region, Ring, Segment2};
