//! Zone-relative artwork placement.

use crate::constants::{DEFAULT_SCALE, MAX_SCALE, MIN_SCALE};
use serde::{Deserialize, Serialize};

/// Normalized transform of an artwork inside its print zone.
///
/// `u`/`v` locate the artwork center with a top-left origin: `v` grows
/// downward, the opposite of texture space. Scales are fractions of the zone
/// and rotation accumulates without wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub u: f64,
    pub v: f64,
    pub u_scale: f64,
    pub v_scale: f64,
    pub rotation_rad: f64,
}

impl Placement {
    pub fn new(u: f64, v: f64, u_scale: f64, v_scale: f64, rotation_rad: f64) -> Self {
        Self {
            u,
            v,
            u_scale,
            v_scale,
            rotation_rad,
        }
    }

    /// Default footprint centered at `(u, v)`.
    pub fn at(u: f64, v: f64) -> Self {
        Self::new(u, v, DEFAULT_SCALE, DEFAULT_SCALE, 0.0)
    }

    /// Rotation in degrees.
    pub fn rotation_deg(&self) -> f64 {
        self.rotation_rad.to_degrees()
    }

    /// Axis-aligned extent of the unrotated artwork.
    pub fn bounds(&self) -> PlacementBounds {
        PlacementBounds {
            left: self.u - self.u_scale * 0.5,
            right: self.u + self.u_scale * 0.5,
            top: self.v - self.v_scale * 0.5,
            bottom: self.v + self.v_scale * 0.5,
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::at(0.5, 0.5)
    }
}

/// Edges of a placement in zone-relative coordinates (v downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementBounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// Corner handle of the artwork box, in screen orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Sign of the outward direction along x and y (screen y down).
    pub fn outward(&self) -> (f64, f64) {
        match self {
            Self::TopLeft => (-1.0, -1.0),
            Self::TopRight => (1.0, -1.0),
            Self::BottomLeft => (-1.0, 1.0),
            Self::BottomRight => (1.0, 1.0),
        }
    }
}

/// Clamps a scale into the supported footprint range.
pub fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}
