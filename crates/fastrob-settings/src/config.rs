//! Configuration for a full pipeline run
//!
//! One [`Config`] carries everything `recompute` needs: where the raw
//! document comes from, the slicing parameters, post-processing, the path
//! filter and the compiler target. Files are JSON or TOML, picked by
//! extension.

use crate::error::{SettingsError, SettingsResult};
use fastrob_compiler::CompilerConfig;
use fastrob_core::Point3;
use fastrob_engine::EngineConfig;
use fastrob_gcode::FilterSettings;
use fastrob_geometry::PlannerParams;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Where the raw document comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// External slicing engine, reconstructed from its motion commands
    #[default]
    Engine,
    /// Built-in contour and zig-zag planner
    Native,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Engine => write!(f, "engine"),
            Self::Native => write!(f, "native"),
        }
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "engine" => Ok(Self::Engine),
            "native" => Ok(Self::Native),
            _ => Err(format!("Unknown source: {}", s)),
        }
    }
}

/// Settings only the native planner uses.
///
/// Layer height, bead width, perimeters, angle and density are shared with
/// the engine and read from [`EngineConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeSettings {
    /// Join hatch segments into serpentines
    pub continuous: bool,
    /// Uniform scale applied on mesh import
    pub scale: f64,
    /// Center the mesh on the XY origin with its base at Z = 0
    pub center_model: bool,
}

impl Default for NativeSettings {
    fn default() -> Self {
        Self {
            continuous: true,
            scale: 1.0,
            center_model: false,
        }
    }
}

/// Post-processing applied to the raw document, in field order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessSettings {
    /// Maximum point spacing; 0 disables resampling
    pub discretize: f64,
    /// Seam shift per layer; the last value repeats
    pub seam_shifts: Vec<i64>,
    /// Lead-in/lead-out displacement; zero disables it
    pub axis_offset: Point3,
}

impl Default for PostProcessSettings {
    fn default() -> Self {
        Self {
            discretize: 0.0,
            seam_shifts: Vec::new(),
            axis_offset: Point3::new(0.0, 0.0, 10.0),
        }
    }
}

impl PostProcessSettings {
    /// Whether every path carries synthetic lead-in and lead-out points
    pub fn has_lead(&self) -> bool {
        !self.axis_offset.is_zero()
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub source: Source,
    /// Translation of the document into global coordinates
    pub placement: Point3,
    /// Slicing parameters, shared by both sources
    pub engine: EngineConfig,
    pub native: NativeSettings,
    pub postprocess: PostProcessSettings,
    pub filter: FilterSettings,
    pub compiler: CompilerConfig,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/fastrob/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("fastrob").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("No configuration directory on this platform".into())
            })
    }

    /// Native planner parameters derived from the shared slicing settings
    pub fn planner_params(&self) -> PlannerParams {
        PlannerParams {
            layer_height: self.engine.layer_height,
            line_width: self.engine.seam_width,
            perimeters: self.engine.perimeters,
            fill_angle: self.engine.fill_angle,
            fill_density: f64::from(self.engine.fill_density),
            continuous: self.native.continuous,
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("Failed to write {}: {}", path.display(), e))
        })?;

        debug!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let engine = &self.engine;
        if engine.layer_height <= 0.0 || engine.layer_height.is_nan() {
            return Err(SettingsError::invalid("engine.layer_height", "must be > 0"));
        }
        if engine.seam_width <= 0.0 || engine.seam_width.is_nan() {
            return Err(SettingsError::invalid("engine.seam_width", "must be > 0"));
        }
        if engine.fill_density > 100 {
            return Err(SettingsError::invalid(
                "engine.fill_density",
                format!("{}% exceeds 100%", engine.fill_density),
            ));
        }
        if !engine.fill_angle.is_finite() {
            return Err(SettingsError::invalid("engine.fill_angle", "must be finite"));
        }
        if engine.anchor_max < 0.0 {
            return Err(SettingsError::invalid("engine.anchor_max", "must be >= 0"));
        }
        if let Some(overlap) = engine.overlap {
            if overlap <= 0.0 || overlap > 100.0 || overlap.is_nan() {
                return Err(SettingsError::invalid(
                    "engine.overlap",
                    "must be in (0, 100]",
                ));
            }
        }
        if engine.executable.as_os_str().is_empty() {
            return Err(SettingsError::invalid("engine.executable", "must not be empty"));
        }

        if self.native.scale <= 0.0 || self.native.scale.is_nan() {
            return Err(SettingsError::invalid("native.scale", "must be > 0"));
        }

        if self.postprocess.discretize < 0.0 || self.postprocess.discretize.is_nan() {
            return Err(SettingsError::invalid(
                "postprocess.discretize",
                "must be >= 0",
            ));
        }

        Ok(())
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(format!(
                "{} (config file must be .json or .toml)",
                other.unwrap_or("no extension")
            ))),
        }
    }
}
