//! Machine motion templates
//!
//! Each supported controller gets a point-to-point and a linear move
//! template. Coordinates are printed with three decimals.

use fastrob_core::constants::DEFAULT_ORIENTATION;
use fastrob_core::Point3;
use nalgebra::UnitQuaternion;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tool orientation as KUKA A/B/C angles in degrees (rotations about Z, Y, X)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Default for Orientation {
    fn default() -> Self {
        let [a, b, c] = DEFAULT_ORIENTATION;
        Self { a, b, c }
    }
}

impl Orientation {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Unit quaternion `[w, x, y, z]` of the ZYX rotation
    pub fn quaternion(&self) -> [f64; 4] {
        let rotation = UnitQuaternion::from_euler_angles(
            self.c.to_radians(),
            self.b.to_radians(),
            self.a.to_radians(),
        );
        let q = rotation.quaternion();
        [q.w, q.i, q.j, q.k]
    }
}

/// Settings for the ABB RAPID templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RapidParams {
    /// Speed data, e.g. `v100`
    pub speed: String,
    /// Zone data for linear moves, e.g. `z1`
    pub zone: String,
    /// Tool data name
    pub tool: String,
}

impl Default for RapidParams {
    fn default() -> Self {
        Self {
            speed: "v100".to_string(),
            zone: "z1".to_string(),
            tool: "tool0".to_string(),
        }
    }
}

/// Everything a template needs besides the target point
#[derive(Debug, Clone, PartialEq)]
pub struct MotionContext<'a> {
    pub orientation: Orientation,
    pub rapid: &'a RapidParams,
}

/// Target controller
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Machine {
    /// KUKA KRL
    #[default]
    Kuka,
    /// ABB RAPID
    Abb,
    /// Any other identifier; produces empty move lines
    Unsupported(String),
}

impl Machine {
    /// Identifiers with a template
    pub const SUPPORTED: [&'static str; 2] = ["KUKA", "ABB"];

    /// Case-insensitive lookup; unknown names are kept as [`Machine::Unsupported`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_uppercase().as_str() {
            "KUKA" => Self::Kuka,
            "ABB" => Self::Abb,
            _ => Self::Unsupported(name.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Kuka => "KUKA",
            Self::Abb => "ABB",
            Self::Unsupported(name) => name,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    /// Point-to-point move to `point`
    pub fn ptp(&self, point: &Point3, ctx: &MotionContext<'_>) -> String {
        match self {
            Self::Kuka => format!("PTP {}", kuka_frame(point, &ctx.orientation)),
            Self::Abb => format!(
                "MoveJ {},{},fine,{};",
                rapid_target(point, &ctx.orientation),
                ctx.rapid.speed,
                ctx.rapid.tool
            ),
            Self::Unsupported(_) => String::new(),
        }
    }

    /// Linear move to `point` with path blending
    pub fn lin(&self, point: &Point3, ctx: &MotionContext<'_>) -> String {
        match self {
            Self::Kuka => format!("LIN {} C_DIS", kuka_frame(point, &ctx.orientation)),
            Self::Abb => format!(
                "MoveL {},{},{},{};",
                rapid_target(point, &ctx.orientation),
                ctx.rapid.speed,
                ctx.rapid.zone,
                ctx.rapid.tool
            ),
            Self::Unsupported(_) => String::new(),
        }
    }
}

fn kuka_frame(p: &Point3, o: &Orientation) -> String {
    format!(
        "{{X {:.3}, Y {:.3}, Z {:.3}, A {:.3}, B {:.3}, C {:.3}}}",
        p.x, p.y, p.z, o.a, o.b, o.c
    )
}

fn rapid_target(p: &Point3, o: &Orientation) -> String {
    let [q1, q2, q3, q4] = o.quaternion();
    format!(
        "[[{:.3},{:.3},{:.3}],[{:.6},{:.6},{:.6},{:.6}],[0,0,0,0],[9E+09,9E+09,9E+09,9E+09,9E+09,9E+09]]",
        p.x, p.y, p.z, q1, q2, q3, q4
    )
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Machine {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl From<String> for Machine {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<Machine> for String {
    fn from(machine: Machine) -> Self {
        machine.name().to_string()
    }
}
