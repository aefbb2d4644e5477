//! PrusaSlicer command line adapter

use crate::config::EngineConfig;
use crate::SlicingEngine;
use fastrob_core::EngineError;
use fastrob_gcode::MotionCommandStream;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, error, info};

/// Runs the PrusaSlicer console binary as a blocking child process.
#[derive(Debug, Clone, Default)]
pub struct PrusaSlicerEngine;

impl PrusaSlicerEngine {
    pub fn new() -> Self {
        Self
    }

    fn command(&self, mesh: &Path, config: &EngineConfig) -> Command {
        let mut command = Command::new(&config.executable);
        command.args(&config.base_args).args(config.args(mesh));
        command
    }
}

impl SlicingEngine for PrusaSlicerEngine {
    fn name(&self) -> &str {
        "PrusaSlicer"
    }

    fn slice(&self, mesh: &Path, config: &EngineConfig) -> Result<MotionCommandStream, EngineError> {
        let program = config.executable.display().to_string();
        let output_path: PathBuf = config.output_path(mesh);

        info!("Slicing {} with {}", mesh.display(), program);
        debug!("Engine arguments: {:?}", config.args(mesh));

        let output = self
            .command(mesh, config)
            .output()
            .map_err(|e| EngineError::Launch {
                program: program.clone(),
                reason: e.to_string(),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !stderr.is_empty() {
            error!("{} reported: {}", program, stderr);
            return Err(EngineError::Failure { message: stderr });
        }
        if !output.status.success() {
            error!("{} exited with {}", program, output.status);
            return Err(EngineError::Failure {
                message: format!("{} exited with {}", program, output.status),
            });
        }

        let stream = MotionCommandStream::from_file(&output_path).map_err(|e| {
            debug!("Reading {} failed: {}", output_path.display(), e);
            EngineError::MissingOutput {
                path: output_path.display().to_string(),
            }
        })?;

        info!(
            "Engine produced {} motion commands in {}",
            stream.len(),
            output_path.display()
        );
        Ok(stream)
    }
}
