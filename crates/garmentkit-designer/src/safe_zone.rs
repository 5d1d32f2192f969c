//! Safe printable area inside a zone.

use garmentkit_core::{Placement, PlacementBounds, SafeMarginsCm, ZoneRect, ZoneSizeCm};

/// Safe rectangle in zone-relative coordinates (`v` top-down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeRect {
    pub u_min: f64,
    pub u_max: f64,
    pub v_min: f64,
    pub v_max: f64,
}

impl SafeRect {
    /// Insets the unit zone by `margins` measured against `size_cm`.
    ///
    /// Margins larger than the zone collapse the rectangle to the center
    /// line on that axis.
    pub fn from_margins(size_cm: ZoneSizeCm, margins: SafeMarginsCm) -> Self {
        let w = size_cm.width.max(1e-6);
        let h = size_cm.height.max(1e-6);
        let (u_min, u_max) = collapse((margins.left / w).clamp(0.0, 1.0), (1.0 - margins.right / w).clamp(0.0, 1.0));
        let (v_min, v_max) = collapse((margins.top / h).clamp(0.0, 1.0), (1.0 - margins.bottom / h).clamp(0.0, 1.0));
        Self {
            u_min,
            u_max,
            v_min,
            v_max,
        }
    }

    pub fn width(&self) -> f64 {
        self.u_max - self.u_min
    }

    pub fn height(&self) -> f64 {
        self.v_max - self.v_min
    }

    /// The safe rectangle in absolute UV, inside `zone`.
    pub fn to_abs(&self, zone: &ZoneRect) -> ZoneRect {
        let u_span = zone.u_span();
        let v_span = zone.v_span();
        let wrap = |u: f64| if u >= 1.0 { u - 1.0 } else { u };
        ZoneRect::new(
            wrap(zone.u_min + self.u_min * u_span),
            wrap(zone.u_min + self.u_max * u_span),
            zone.v_max - self.v_max * v_span,
            zone.v_max - self.v_min * v_span,
            format!("{}-safe", zone.name),
            zone.side,
        )
    }
}

fn collapse(lo: f64, hi: f64) -> (f64, f64) {
    if lo > hi {
        let mid = (lo + hi) * 0.5;
        (mid, mid)
    } else {
        (lo, hi)
    }
}

pub fn placement_bounds(p: &Placement) -> PlacementBounds {
    p.bounds()
}

/// Edge tolerance for containment checks.
const INSIDE_EPSILON: f64 = 1e-9;

pub fn is_placement_inside_safe(p: &Placement, safe: &SafeRect) -> bool {
    let b = p.bounds();
    b.left >= safe.u_min - INSIDE_EPSILON
        && b.right <= safe.u_max + INSIDE_EPSILON
        && b.top >= safe.v_min - INSIDE_EPSILON
        && b.bottom <= safe.v_max + INSIDE_EPSILON
}

/// Moves (and if needed shrinks) a placement so its box fits in `safe`.
pub fn clamp_placement_to_safe(p: Placement, safe: &SafeRect) -> Placement {
    let mut out = p;
    out.u_scale = out.u_scale.min(safe.width());
    out.v_scale = out.v_scale.min(safe.height());
    let half_w = out.u_scale * 0.5;
    let half_h = out.v_scale * 0.5;
    out.u = clamp_between(out.u, safe.u_min + half_w, safe.u_max - half_w);
    out.v = clamp_between(out.v, safe.v_min + half_h, safe.v_max - half_h);
    out
}

/// `x.clamp(lo, hi)` that settles on the midpoint when rounding leaves
/// `lo > hi`.
pub(crate) fn clamp_between(x: f64, lo: f64, hi: f64) -> f64 {
    if lo > hi {
        (lo + hi) * 0.5
    } else {
        x.clamp(lo, hi)
    }
}
