//! Contour offset engine.
//!
//! Turns one layer's cross-section into inward shells. Offsets are
//! accumulated and requested one by one; the first empty or degenerate offset
//! ends the sequence for the layer.

use crate::collaborator::GeometryCollaborator;
use crate::region::Region;
use fastrob_core::{GeometryError, Path, Point3};
use tracing::{debug, warn};

/// A set of islands produced by one offset distance
pub type Shell = Vec<Region>;

/// Shells of one layer, outermost first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerShells {
    /// Perimeter contours
    pub walls: Vec<Shell>,
    /// Innermost surviving shell, rasterized by the infill generator
    pub fill_boundary: Option<Shell>,
    /// Why the sequence stopped early, if it did
    pub truncated: Option<GeometryError>,
}

impl LayerShells {
    /// Closed perimeter paths at height `z`, one per ring
    pub fn wall_paths(&self, z: f64) -> Vec<Path> {
        self.walls.iter().flat_map(|shell| shell_paths(shell, z)).collect()
    }
}

/// Default increments: walls one line width apart with the first centred
/// half a width inside the outline, then the fill boundary half a width
/// inside the last wall.
pub fn offset_increments(perimeters: u32, line_width: f64) -> Vec<f64> {
    let half = line_width / 2.0;
    let mut increments = Vec::with_capacity(perimeters as usize + 1);
    for i in 0..perimeters {
        increments.push(if i == 0 { half } else { line_width });
    }
    increments.push(half);
    increments
}

/// Offset `section` by the running sum of `increments`.
///
/// All but the last surviving offset become walls, the last one is the fill
/// boundary. When nothing survives the section itself is used as the only
/// wall and the layer gets no infill.
pub fn offset_shells<G: GeometryCollaborator + ?Sized>(
    geometry: &G,
    section: &[Region],
    increments: &[f64],
) -> LayerShells {
    let mut shells: Vec<Shell> = Vec::new();
    let mut truncated = None;
    let mut distance = 0.0;

    for increment in increments {
        distance += increment;
        match geometry.offset(section, distance) {
            Ok(shell) if !shell.is_empty() => shells.push(shell),
            Ok(_) => {
                truncated = Some(GeometryError::Empty { distance });
                break;
            }
            Err(err) => {
                debug!("Shell sequence stops: {}", err);
                truncated = Some(err);
                break;
            }
        }
    }

    match shells.pop() {
        Some(fill_boundary) => LayerShells {
            walls: shells,
            fill_boundary: Some(fill_boundary),
            truncated,
        },
        None => {
            if !section.is_empty() {
                warn!(
                    "Cross-section consumed by the first offset, using the outline as the only wall"
                );
            }
            LayerShells {
                walls: if section.is_empty() {
                    Vec::new()
                } else {
                    vec![section.to_vec()]
                },
                fill_boundary: None,
                truncated,
            }
        }
    }
}

/// Closed paths for every ring of a shell at height `z`
pub fn shell_paths(shell: &[Region], z: f64) -> Vec<Path> {
    shell
        .iter()
        .flat_map(|region| region.rings())
        .filter(|ring| ring.len() >= 2)
        .map(|ring| {
            ring.closed_points()
                .into_iter()
                .map(|p| Point3::new(p.x, p.y, z))
                .collect::<Path>()
        })
        .collect()
}
