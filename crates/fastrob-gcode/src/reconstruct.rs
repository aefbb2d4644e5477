//! Path reconstruction
//!
//! Rebuilds the layer → path → point [`Document`] from a flat motion command
//! stream. Two signals segment the stream and are evaluated on every command:
//!
//! - extrusion edges: a path starts at the travel move right before an
//!   extrusion run and ends at the run's last extruding move;
//! - Z changes: a command that sets Z closes the current layer once it holds
//!   at least one path.

use crate::command::{MotionCommand, MotionCommandStream};
use fastrob_core::{Document, Layer, Path, Point3};
use tracing::debug;

/// Segmentation state machine.
#[derive(Debug, Clone, Default)]
pub struct PathReconstructor {
    position: Point3,
    path: Path,
    layer: Layer,
    document: Document,
}

impl PathReconstructor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tool position
    pub fn position(&self) -> Point3 {
        self.position
    }

    /// Feed one command; `next` is the command that follows it, if any.
    pub fn step(&mut self, command: &MotionCommand, next: Option<&MotionCommand>) {
        let mut layer_change = false;
        if let Some(x) = command.x {
            self.position.x = x;
        }
        if let Some(y) = command.y {
            self.position.y = y;
        }
        if let Some(z) = command.z {
            self.position.z = z;
            layer_change = true;
        }

        let extruding = command.is_extruding();
        let next_extruding = next.is_some_and(MotionCommand::is_extruding);

        if extruding || next_extruding {
            self.path.push(self.position);
        }

        if !(extruding && next_extruding) && self.path.len() > 1 {
            self.layer.push(std::mem::take(&mut self.path));
        }

        // Also fires inside an extrusion run; the open path then carries over
        // into the next layer.
        if layer_change && !self.layer.is_empty() {
            self.document.push(std::mem::take(&mut self.layer));
        }
    }

    /// Flush the trailing path and layer and return the document.
    pub fn finish(mut self) -> Document {
        if self.path.len() > 1 {
            self.layer.push(std::mem::take(&mut self.path));
        }
        if !self.layer.is_empty() {
            self.document.push(std::mem::take(&mut self.layer));
        }
        self.document
    }
}

/// Rebuild a document from a command stream.
pub fn reconstruct(stream: &MotionCommandStream) -> Document {
    let commands = stream.commands();
    let mut reconstructor = PathReconstructor::new();
    for (index, command) in commands.iter().enumerate() {
        reconstructor.step(command, commands.get(index + 1));
    }

    let document = reconstructor.finish();
    debug!(
        "Reconstructed {} layers, {} paths, {} points from {} commands",
        document.len(),
        document.path_count(),
        document.point_count(),
        commands.len()
    );
    document
}

/// Encode a document as a command stream that [`reconstruct`] turns back into it.
///
/// Each layer starts with a Z move, each path with a travel to its first
/// point followed by extruding moves through the rest. Exact for layers whose
/// points share one Z height.
pub fn encode(document: &Document) -> MotionCommandStream {
    let mut commands = Vec::with_capacity(document.point_count() + document.len());
    let mut z = None;

    for layer in document {
        for (path_index, path) in layer.iter().enumerate() {
            for (i, point) in path.iter().enumerate() {
                let mut command = MotionCommand::new(if i == 0 { "G0" } else { "G1" })
                    .with_x(point.x)
                    .with_y(point.y);
                let layer_start = path_index == 0 && i == 0;
                if layer_start || z != Some(point.z) {
                    command = command.with_z(point.z);
                    z = Some(point.z);
                }
                if i > 0 {
                    command = command.with_e(1.0);
                }
                commands.push(command);
            }
        }
    }

    MotionCommandStream::new(commands)
}
