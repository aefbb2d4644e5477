//! # fastrob Compiler
//!
//! Turns a finished [`fastrob_core::Document`] into a robot program.
//!
//! Supported controllers:
//! - **KUKA** (KRL): `PTP {X, Y, Z, A, B, C}` and `LIN {…} C_DIS`
//! - **ABB** (RAPID): `MoveJ` / `MoveL` with quaternion orientation
//!
//! Any other machine name compiles to blank move lines.

pub mod compiler;
pub mod machine;

pub use compiler::{Compiler, CompilerConfig};
pub use machine::{Machine, MotionContext, Orientation, RapidParams};
