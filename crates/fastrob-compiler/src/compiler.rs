//! Machine code compiler
//!
//! Walks a post-processed [`Document`] and emits one move per point through the
//! configured machine's templates, with custom command lines at path starts
//! and ends and a blank line after every path.

use crate::machine::{Machine, MotionContext, Orientation, RapidParams};
use fastrob_core::{Document, Path as ToolPath, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Compiler configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Target controller
    pub machine: Machine,
    /// Program file written by [`Compiler::execute`]
    pub output_file: Option<PathBuf>,
    /// Compile without writing
    pub silent: bool,
    /// Lines emitted at the start of every path
    pub start_commands: Vec<String>,
    /// Lines emitted at the end of every path
    pub end_commands: Vec<String>,
    pub orientation: Orientation,
    pub rapid: RapidParams,
}

/// Document to robot program compiler
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Program lines for `document`.
    ///
    /// With `has_lead` every path is expected to carry a synthetic lead-in and
    /// lead-out point: the first two and the last point become
    /// point-to-point moves. Paths shorter than four points use the plain
    /// rules.
    pub fn compile_lines(&self, document: &Document, has_lead: bool) -> Vec<String> {
        let machine = &self.config.machine;
        if !machine.is_supported() {
            warn!("Unsupported machine '{}', emitting empty moves", machine);
        }

        let ctx = MotionContext {
            orientation: self.config.orientation,
            rapid: &self.config.rapid,
        };

        let mut lines = Vec::with_capacity(document.point_count() + document.path_count());
        for layer in document {
            for path in layer {
                if has_lead && path.len() >= 4 {
                    self.emit_with_lead(path, &ctx, &mut lines);
                } else {
                    self.emit_plain(path, &ctx, &mut lines);
                }
                lines.push(String::new());
            }
        }
        lines
    }

    fn emit_plain(&self, path: &ToolPath, ctx: &MotionContext<'_>, lines: &mut Vec<String>) {
        let machine = &self.config.machine;
        let last = path.len().saturating_sub(1);

        for (i, point) in path.iter().enumerate() {
            if i == 0 {
                lines.push(machine.ptp(point, ctx));
                lines.extend(self.config.start_commands.iter().cloned());
            } else {
                lines.push(machine.lin(point, ctx));
                if i == last {
                    lines.extend(self.config.end_commands.iter().cloned());
                }
            }
        }
    }

    fn emit_with_lead(&self, path: &ToolPath, ctx: &MotionContext<'_>, lines: &mut Vec<String>) {
        let machine = &self.config.machine;
        let last = path.len() - 1;

        for (i, point) in path.iter().enumerate() {
            match i {
                0 => lines.push(machine.ptp(point, ctx)),
                1 => {
                    // Point 0 is the synthetic lead-in; the real path starts here.
                    lines.push(machine.ptp(point, ctx));
                    lines.extend(self.config.start_commands.iter().cloned());
                }
                i if i == last => {
                    lines.extend(self.config.end_commands.iter().cloned());
                    lines.push(machine.ptp(point, ctx));
                }
                _ => lines.push(machine.lin(point, ctx)),
            }
        }
    }

    /// Program text for `document`, one line per entry.
    pub fn compile(&self, document: &Document, has_lead: bool) -> String {
        let lines = self.compile_lines(document, has_lead);
        let mut program = lines.join("\n");
        if !lines.is_empty() {
            program.push('\n');
        }
        debug!(
            "Compiled {} paths into {} lines for {}",
            document.path_count(),
            lines.len(),
            self.config.machine
        );
        program
    }

    /// Write `program` to `path`.
    pub fn write_to(&self, program: &str, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(program.as_bytes())?;
        writer.flush()?;
        info!("Wrote {} bytes of {} code to {}", program.len(), self.config.machine, path.display());
        Ok(())
    }

    /// Compile and, unless silent or no output file is configured, write the
    /// program. Write failures are logged, never returned.
    pub fn execute(&self, document: &Document, has_lead: bool) -> String {
        let program = self.compile(document, has_lead);

        if self.config.silent {
            debug!("Silent compile, nothing written");
            return program;
        }
        match &self.config.output_file {
            Some(path) => {
                if let Err(e) = self.write_to(&program, path) {
                    error!("Failed to write program to {}: {}", path.display(), e);
                }
            }
            None => debug!("No output file configured, nothing written"),
        }
        program
    }
}
