//! Slicing engine configuration
//!
//! Flat parameters handed to the external engine, and their translation into
//! command line arguments.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Infill pattern understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillPattern {
    #[default]
    Rectilinear,
    AlignedRectilinear,
    Grid,
    Triangles,
    Stars,
    Cubic,
    Line,
    Concentric,
    Honeycomb,
    #[serde(rename = "3dhoneycomb")]
    Honeycomb3d,
    Gyroid,
    HilbertCurve,
    ArchimedeanChords,
    Conspiratorial,
    AdaptiveCubic,
    SupportCubic,
    Lightning,
}

impl FillPattern {
    /// Every pattern, in the engine's documentation order
    pub const ALL: [FillPattern; 17] = [
        Self::Rectilinear,
        Self::AlignedRectilinear,
        Self::Grid,
        Self::Triangles,
        Self::Stars,
        Self::Cubic,
        Self::Line,
        Self::Concentric,
        Self::Honeycomb,
        Self::Honeycomb3d,
        Self::Gyroid,
        Self::HilbertCurve,
        Self::ArchimedeanChords,
        Self::Conspiratorial,
        Self::AdaptiveCubic,
        Self::SupportCubic,
        Self::Lightning,
    ];

    /// Name passed on the engine command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rectilinear => "rectilinear",
            Self::AlignedRectilinear => "alignedrectilinear",
            Self::Grid => "grid",
            Self::Triangles => "triangles",
            Self::Stars => "stars",
            Self::Cubic => "cubic",
            Self::Line => "line",
            Self::Concentric => "concentric",
            Self::Honeycomb => "honeycomb",
            Self::Honeycomb3d => "3dhoneycomb",
            Self::Gyroid => "gyroid",
            Self::HilbertCurve => "hilbertcurve",
            Self::ArchimedeanChords => "archimedeanchords",
            Self::Conspiratorial => "conspiratorial",
            Self::AdaptiveCubic => "adaptivecubic",
            Self::SupportCubic => "supportcubic",
            Self::Lightning => "lightning",
        }
    }
}

impl fmt::Display for FillPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FillPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| format!("Unknown fill pattern: {}", s))
    }
}

/// Parameters for one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine executable, looked up on `PATH` when not absolute
    pub executable: PathBuf,
    /// Arguments placed before the generated ones (e.g. a wrapper invocation)
    pub base_args: Vec<String>,
    pub layer_height: f64,
    /// Bead width, used as nozzle diameter and extrusion width
    pub seam_width: f64,
    pub perimeters: u32,
    pub fill_pattern: FillPattern,
    /// Infill density in percent
    pub fill_density: u32,
    /// Infill angle in degrees
    pub fill_angle: f64,
    /// Maximum infill anchor length
    pub anchor_max: f64,
    /// Bead overlap in percent; derives nozzle and extrusion width from the
    /// layer height when set
    pub overlap: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("prusa-slicer-console"),
            base_args: Vec::new(),
            layer_height: 2.0,
            seam_width: 6.0,
            perimeters: 1,
            fill_pattern: FillPattern::Rectilinear,
            fill_density: 100,
            fill_angle: 45.0,
            anchor_max: 10.0,
            overlap: None,
        }
    }
}

impl EngineConfig {
    /// Nozzle diameter and extrusion width
    pub fn widths(&self) -> (f64, f64) {
        match self.overlap {
            Some(overlap) => {
                let nozzle = overlap / 100.0 * self.seam_width;
                let extrusion = nozzle + self.layer_height * (1.0 - PI / 4.0);
                (nozzle, extrusion)
            }
            None => (self.seam_width, self.seam_width),
        }
    }

    /// Where the engine writes the motion commands for `mesh`
    pub fn output_path(&self, mesh: &Path) -> PathBuf {
        mesh.with_extension("gcode")
    }

    /// Engine arguments for slicing `mesh`, without the base arguments
    pub fn args(&self, mesh: &Path) -> Vec<String> {
        let (nozzle, extrusion) = self.widths();
        let h = self.layer_height.to_string();

        let options: [(&str, String); 15] = [
            ("--nozzle-diameter", nozzle.to_string()),
            ("--first-layer-height", h.clone()),
            ("--layer-height", h),
            ("--first-layer-extrusion-width", extrusion.to_string()),
            ("--extrusion-width", extrusion.to_string()),
            ("--solid-layers", "0".to_string()),
            ("--perimeters", self.perimeters.to_string()),
            ("--fill-pattern", self.fill_pattern.to_string()),
            ("--infill-overlap", "50%".to_string()),
            ("--fill-density", format!("{}%", self.fill_density)),
            ("--fill-angle", self.fill_angle.to_string()),
            ("--infill-anchor-max", self.anchor_max.to_string()),
            ("--skirts", "0".to_string()),
            ("--filament-retract-length", "0".to_string()),
            ("--output", self.output_path(mesh).display().to_string()),
        ];

        let mut args = vec!["--export-gcode".to_string(), "--dont-arrange".to_string()];
        for (flag, value) in options {
            args.push(flag.to_string());
            args.push(value);
        }
        args.push(mesh.display().to_string());
        args
    }
}
