//! # fastrob Core
//!
//! Core types and errors for fastrob.
//! Provides the layer → path → point [`Document`] that every pipeline stage
//! consumes and produces, its nested-array persistence, and the shared
//! error taxonomy.

pub mod constants;
pub mod data;
pub mod error;

pub use data::{Document, Layer, Path, Point3};
pub use error::{EngineError, Error, GeometryError, Result};
