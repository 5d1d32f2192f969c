//! Status text shown next to the 3D view.

use crate::safe_zone::{is_placement_inside_safe, SafeRect};
use crate::zones::uv_to_print_cm;
use garmentkit_core::{Placement, Uv, ZoneRect, ZoneSizeCm};
use std::fmt::Write;

pub const SAFE_AREA_WARNING: &str = "WARNING: artwork extends outside the safe area";

/// Builds the multi-line HUD text.
///
/// `hit_uv` is the UV under the last 3D pointer event, if any. A placement
/// that leaves `safe` gets a warning line; it never blocks editing.
pub fn render_hud(
    hit_uv: Option<Uv>,
    placement: Option<&Placement>,
    rect: &ZoneRect,
    size_cm: ZoneSizeCm,
    safe: &SafeRect,
    locked: bool,
) -> String {
    let Some(p) = placement else {
        return match hit_uv {
            Some(uv) => format!("UV: {:.3}, {:.3}\n(no placement yet)", uv.u, uv.v),
            None => "Ready.".to_string(),
        };
    };

    let mut out = String::new();
    match hit_uv {
        Some(uv) => {
            let (x_cm, y_cm) = uv_to_print_cm(uv, rect, size_cm);
            let _ = writeln!(out, "UV: {:.3}, {:.3}", uv.u, uv.v);
            let _ = writeln!(out, "PRINT cm: x={:.2}, y={:.2}", x_cm, y_cm);
        }
        None => out.push_str("UV: -\n"),
    }
    let _ = writeln!(out, "Artwork:");
    let _ = writeln!(out, "  center: u={:.4}, v={:.4}", p.u, p.v);
    let _ = writeln!(out, "  size:   uS={:.4}, vS={:.4}", p.u_scale, p.v_scale);
    let _ = writeln!(out, "  rot:    {:.1}°", p.rotation_deg());
    if !is_placement_inside_safe(p, safe) {
        let _ = writeln!(out, "{}", SAFE_AREA_WARNING);
    }
    let _ = write!(
        out,
        "Mode: {} (Shift=snap off | Shift=ratio-lock on resize | Alt=uniform)",
        if locked { "LOCKED" } else { "EDIT" }
    );
    out
}

/// Label drawn in the editor for the active zone.
pub fn zone_label(size_cm: ZoneSizeCm) -> String {
    format!("PRINT ZONE: {}×{} cm", size_cm.width, size_cm.height)
}
