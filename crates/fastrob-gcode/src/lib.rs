//! # fastrob G-code
//!
//! Motion command handling between the slicing engine and the compiler:
//!
//! - **Tokenizer**: G-code text → [`MotionCommandStream`]
//! - **Reconstruction**: command stream → layer → path → point [`fastrob_core::Document`]
//! - **Post-processing**: discretize, seam shift, axis offset, clamp
//! - **Filter**: point-prefix views for progress inspection

pub mod command;
pub mod filter;
pub mod postprocess;
pub mod reconstruct;

pub use command::{parse_line, MotionCommand, MotionCommandStream};
pub use filter::{FilterMode, FilterSettings, FilterView};
pub use postprocess::{axis_offset, clamp, clamp_layer, discretize, seam_shift, shift_path};
pub use reconstruct::{encode, reconstruct, PathReconstructor};
