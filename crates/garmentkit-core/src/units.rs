//! Value types for texture space and physical print sizes.
//!
//! UV coordinates follow the texture convention: `u` grows to the right and
//! `v` grows upward. Print sizes are centimetres.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in texture (UV) space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Uv {
    pub u: f64,
    pub v: f64,
}

impl Uv {
    pub const fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }

    /// Squared distance to another UV point.
    pub fn distance_squared(&self, other: &Uv) -> f64 {
        let du = self.u - other.u;
        let dv = self.v - other.v;
        du * du + dv * dv
    }
}

impl fmt::Display for Uv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}, {:.3}", self.u, self.v)
    }
}

/// Physical size of a print zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneSizeCm {
    pub width: f64,
    pub height: f64,
}

impl ZoneSizeCm {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Height divided by width, guarded against a zero width.
    pub fn aspect(&self) -> f64 {
        self.height / self.width.max(1e-6)
    }
}

impl Default for ZoneSizeCm {
    fn default() -> Self {
        Self::new(30.0, 40.0)
    }
}

/// Unprintable border inside a zone, in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafeMarginsCm {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl SafeMarginsCm {
    pub const fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    pub const fn uniform(margin: f64) -> Self {
        Self::new(margin, margin, margin, margin)
    }
}

impl Default for SafeMarginsCm {
    fn default() -> Self {
        Self::new(3.0, 2.0, 2.0, 2.0)
    }
}
