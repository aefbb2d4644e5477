//! Error handling for fastrob
//!
//! Provides the error taxonomy shared by every pipeline stage:
//! - Engine errors (external slicing engine failures)
//! - Geometry errors (degenerate offsets, malformed hatch topology, bad meshes)
//! - I/O errors (reading commands, writing machine code)
//!
//! Geometry errors are usually absorbed by the stage that raises them and only
//! logged; engine and I/O errors reset the pipeline outputs.

use thiserror::Error;

/// External slicing engine error type
///
/// Any of these aborts the current pipeline run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The engine executable could not be started
    #[error("Failed to launch slicing engine '{program}': {reason}")]
    Launch {
        /// The program that was invoked.
        program: String,
        /// The reason the launch failed.
        reason: String,
    },

    /// The engine reported an error on its error stream
    #[error("Slicing engine failed: {message}")]
    Failure {
        /// The engine's error stream, trimmed.
        message: String,
    },

    /// The engine exited cleanly but produced no motion command file
    #[error("Slicing engine produced no output at {path}")]
    MissingOutput {
        /// The expected output path.
        path: String,
    },
}

/// Geometry error type
///
/// Raised by the geometry collaborator and the toolpath generators.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// An offset collapsed or the offset kernel gave up
    #[error("Degenerate offset at distance {distance}: {reason}")]
    Degenerate {
        /// The accumulated offset distance.
        distance: f64,
        /// The reason reported by the kernel.
        reason: String,
    },

    /// An operation produced an empty region
    #[error("Offset at distance {distance} produced an empty region")]
    Empty {
        /// The accumulated offset distance.
        distance: f64,
    },

    /// A hatch segment crossed a region boundary an odd number of times
    #[error("Malformed topology: {crossings} boundary crossings")]
    MalformedTopology {
        /// Number of boundary crossings found.
        crossings: usize,
    },

    /// The input mesh cannot be sliced
    #[error("Invalid mesh: {reason}")]
    InvalidMesh {
        /// Why the mesh was rejected.
        reason: String,
    },
}

/// Main error type for fastrob
///
/// A unified error type that can represent any error from all stages.
#[derive(Error, Debug)]
pub enum Error {
    /// External slicing engine failure
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Geometry failure
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

}

impl Error {
    /// Check if this is an external engine failure
    pub fn is_engine_failure(&self) -> bool {
        matches!(self, Error::Engine(_))
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is a file I/O error
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
