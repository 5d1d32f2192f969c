//! Center and grid snapping of a placement.

use garmentkit_core::constants::CENTER_SNAP_EPSILON;
use garmentkit_core::{Placement, ZoneSizeCm};
use serde::{Deserialize, Serialize};

/// Keyboard modifiers held during a pointer gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub space: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        alt: false,
        space: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }
}

/// Snapping behaviour for drags and clicks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapOptions {
    pub center: bool,
    pub grid: bool,
    pub grid_cm: f64,
    /// Holding Shift bypasses both snaps.
    pub shift_disables: bool,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self {
            center: true,
            grid: false,
            grid_cm: 1.0,
            shift_disables: true,
        }
    }
}

impl SnapOptions {
    pub fn disabled() -> Self {
        Self {
            center: false,
            grid: false,
            ..Self::default()
        }
    }
}

/// Snaps the center of `placement`.
///
/// Center snap pulls `u`/`v` to exactly 0.5 when within
/// [`CENTER_SNAP_EPSILON`]. Grid snap rounds the centimetre position
/// (measured from the top-left, as in [`crate::placement::placement_to_cm`])
/// to the nearest multiple of `grid_cm`.
pub fn apply_snap(placement: Placement, options: &SnapOptions, zone_cm: ZoneSizeCm, modifiers: Modifiers) -> Placement {
    if options.shift_disables && modifiers.shift {
        return placement;
    }

    let mut p = placement;

    if options.center {
        if (p.u - 0.5).abs() < CENTER_SNAP_EPSILON {
            p.u = 0.5;
        }
        if (p.v - 0.5).abs() < CENTER_SNAP_EPSILON {
            p.v = 0.5;
        }
    }

    if options.grid && options.grid_cm > 0.0 {
        let snap = |cm: f64| (cm / options.grid_cm).round() * options.grid_cm;
        let w = zone_cm.width.max(1e-6);
        let h = zone_cm.height.max(1e-6);
        let x = snap(p.u * w);
        let y = snap(p.v * h);
        p.u = (x / w).clamp(0.0, 1.0);
        p.v = (y / h).clamp(0.0, 1.0);
    }

    p
}
