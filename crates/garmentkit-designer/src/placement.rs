//! # Placement Model
//!
//! Per-zone draft state (artwork, placement, lock) and the operations that
//! edit it. Every mutating method returns whether anything changed so the
//! zone manager can run its sync pipeline and notify observers once.
//!
//! Placement coordinates are zone-relative with a top-left origin; see
//! [`garmentkit_core::Placement`].

use crate::artwork::Artwork;
use crate::snap::Modifiers;
use garmentkit_core::constants::{
    RESIZE_FACTOR_MAX, RESIZE_FACTOR_MIN, RESIZE_SENSITIVITY, UPLOAD_FIT_MARGIN,
};
use garmentkit_core::{clamp_scale, Corner, Placement, PlacementError, Uv, ZoneRect, ZoneSizeCm};
use std::f64::consts::PI;

/// Lifecycle of a zone draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    Empty,
    Editing,
    Locked,
}

/// In-progress artwork for one zone.
#[derive(Debug, Clone, Default)]
pub struct ZoneDraft {
    pub artwork: Option<Artwork>,
    pub placement: Option<Placement>,
    pub locked: bool,
}

impl ZoneDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DraftState {
        if self.locked {
            DraftState::Locked
        } else if self.artwork.is_none() && self.placement.is_none() {
            DraftState::Empty
        } else {
            DraftState::Editing
        }
    }

    pub fn has_image(&self) -> bool {
        self.artwork.is_some()
    }

    pub fn has_placement(&self) -> bool {
        self.placement.is_some()
    }

    /// Image aspect (height over width), if an image is set.
    pub fn aspect(&self) -> Option<f64> {
        self.artwork.as_ref().map(Artwork::aspect)
    }

    /// Replaces the image. The placement is untouched.
    pub fn set_image(&mut self, artwork: Artwork) -> bool {
        self.artwork = Some(artwork);
        true
    }

    pub fn set_placement(&mut self, placement: Placement) -> bool {
        if self.placement == Some(placement) {
            return false;
        }
        self.placement = Some(placement);
        true
    }

    /// Drops image and placement.
    pub fn clear(&mut self) -> bool {
        let changed = self.artwork.is_some() || self.placement.is_some();
        self.artwork = None;
        self.placement = None;
        changed
    }

    /// Moves the placement center to an absolute UV hit.
    ///
    /// Creates a default placement when none exists.
    pub fn place_at_uv(&mut self, hit: Uv, rect: &ZoneRect) -> bool {
        let u = (rect.unwrap_u(hit.u) - rect.u_min) / rect.u_span().max(1e-6);
        let v = (rect.v_max - hit.v) / rect.v_span().max(1e-6);
        match self.placement.as_mut() {
            Some(p) => {
                let changed = p.u != u || p.v != v;
                p.u = u;
                p.v = v;
                changed
            }
            None => {
                self.placement = Some(Placement::at(u, v));
                true
            }
        }
    }

    /// Multiplies both scales by `factor`, clamping each independently.
    pub fn scale_by(&mut self, factor: f64) -> bool {
        let Some(p) = self.placement.as_mut() else {
            return false;
        };
        let before = (p.u_scale, p.v_scale);
        p.u_scale = clamp_scale(p.u_scale * factor);
        p.v_scale = clamp_scale(p.v_scale * factor);
        before != (p.u_scale, p.v_scale)
    }

    pub fn rotate_by_deg(&mut self, deg: f64) -> bool {
        let Some(p) = self.placement.as_mut() else {
            return false;
        };
        p.rotation_rad += deg * PI / 180.0;
        deg != 0.0
    }

    /// Sets the printed width in centimetres, keeping the image ratio.
    pub fn apply_width_cm(&mut self, width_cm: f64, zone_cm: ZoneSizeCm) -> Result<bool, PlacementError> {
        if !width_cm.is_finite() || width_cm <= 0.0 {
            return Err(PlacementError::InvalidWidth { width_cm });
        }
        let aspect = self.aspect().ok_or(PlacementError::NoImage)?;
        let p = self.placement.as_mut().ok_or(PlacementError::NoPlacement)?;
        let before = *p;
        p.u_scale = cm_to_placement_width(width_cm, zone_cm);
        p.v_scale = clamp_scale(p.u_scale * aspect);
        Ok(before != *p)
    }

    /// Centers the artwork with no rotation and the largest footprint that
    /// fits inside `margin` of the zone on both axes.
    pub fn center_and_fit(&mut self, margin: f64) -> bool {
        let Some(aspect) = self.aspect() else {
            return false;
        };
        let aspect = aspect.max(1e-6);
        let best = margin.min(margin / aspect);
        let fitted = Placement::new(0.5, 0.5, clamp_scale(best), clamp_scale(best * aspect), 0.0);
        self.set_placement(fitted)
    }

    pub fn center_and_fit_default(&mut self) -> bool {
        self.center_and_fit(UPLOAD_FIT_MARGIN)
    }

    /// Applies a corner-handle resize relative to the scales at gesture start.
    pub fn resize_from_corner(&mut self, start: &Placement, corner: Corner, dx: f64, dy: f64, modifiers: Modifiers) -> bool {
        if self.placement.is_none() {
            return false;
        }
        let (u_scale, v_scale) = resize_from_corner(start, corner, dx, dy, modifiers);
        let Some(p) = self.placement.as_mut() else {
            return false;
        };
        let changed = p.u_scale != u_scale || p.v_scale != v_scale;
        p.u_scale = u_scale;
        p.v_scale = v_scale;
        changed
    }
}

/// New scales for a corner drag of `(dx, dy)` pixels.
///
/// Dragging a corner outward grows that axis. Shift keeps the ratio the
/// artwork had when the gesture started; Alt averages both factors.
pub fn resize_from_corner(start: &Placement, corner: Corner, dx: f64, dy: f64, modifiers: Modifiers) -> (f64, f64) {
    let (ox, oy) = corner.outward();
    let factor = |d: f64| (1.0 + d * RESIZE_SENSITIVITY).clamp(RESIZE_FACTOR_MIN, RESIZE_FACTOR_MAX);
    let mut sx = factor(dx * ox);
    let mut sy = factor(dy * oy);

    if modifiers.shift {
        sy = sx;
    }
    if modifiers.alt {
        let uniform = (sx + sy) * 0.5;
        sx = uniform;
        sy = uniform;
    }

    (clamp_scale(start.u_scale * sx), clamp_scale(start.v_scale * sy))
}

/// Printed size and position of a placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementCm {
    pub width_cm: f64,
    pub height_cm: f64,
    /// Center, from the zone's left edge.
    pub x_cm: f64,
    /// Center, from the zone's top edge.
    pub y_cm: f64,
}

pub fn placement_to_cm(p: &Placement, zone_cm: ZoneSizeCm) -> PlacementCm {
    PlacementCm {
        width_cm: p.u_scale * zone_cm.width,
        height_cm: p.v_scale * zone_cm.height,
        x_cm: p.u * zone_cm.width,
        y_cm: p.v * zone_cm.height,
    }
}

pub fn cm_to_placement_width(width_cm: f64, zone_cm: ZoneSizeCm) -> f64 {
    clamp_scale(width_cm / zone_cm.width.max(1e-6))
}
