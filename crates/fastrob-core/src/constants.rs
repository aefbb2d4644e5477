//! Numeric tolerances shared across crates.

/// Maximum end point distance for a path to count as closed
pub const CLOSED_TOLERANCE: f64 = 1e-6;

/// Default tool orientation (A, B, C) in degrees, tool pointing down
pub const DEFAULT_ORIENTATION: [f64; 3] = [0.0, 90.0, 0.0];
