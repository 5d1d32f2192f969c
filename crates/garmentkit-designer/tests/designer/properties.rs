//! Property tests for placement geometry.

use garmentkit_core::{Placement, SafeMarginsCm, ZoneKey, ZoneRect, ZoneSide, ZoneSizeCm};
use garmentkit_designer::{
    clamp_placement_to_safe, is_placement_inside_safe, EditorAction, EditorZone, Modifiers, PointerButton,
    SafeRect, SnapOptions, UvEditor, ZoneDraft,
};
use garmentkit_visualizer::rel_to_abs_uv;
use proptest::prelude::*;

fn front_rect() -> ZoneRect {
    ZoneRect::new(0.05, 0.45, 0.3, 0.9, "PRINT_ZONE_FRONT", ZoneSide::Front)
}

fn placement() -> impl Strategy<Value = Placement> {
    (-0.5f64..1.5, -0.5f64..1.5, 0.05f64..1.2, 0.05f64..1.2, -3.2f64..3.2)
        .prop_map(|(u, v, us, vs, r)| Placement::new(u, v, us, vs, r))
}

proptest! {
    #[test]
    fn clamped_placement_fits_safe_area(
        p in placement(),
        top in 0.0f64..20.0,
        bottom in 0.0f64..20.0,
        left in 0.0f64..15.0,
        right in 0.0f64..15.0,
    ) {
        let safe = SafeRect::from_margins(ZoneSizeCm::new(30.0, 40.0), SafeMarginsCm::new(top, bottom, left, right));
        let clamped = clamp_placement_to_safe(p, &safe);
        prop_assert!(is_placement_inside_safe(&clamped, &safe));
        prop_assert_eq!(clamped.rotation_rad, p.rotation_rad);
    }

    #[test]
    fn editor_drag_stays_in_zone(
        start in placement().prop_map(|mut p| {
            p.u = 0.5;
            p.v = 0.5;
            p.u_scale = p.u_scale.min(1.0);
            p.v_scale = p.v_scale.min(1.0);
            p.rotation_rad = 0.0;
            p
        }),
        grab_fu in -0.45f64..0.45,
        grab_fv in -0.45f64..0.45,
        to_x in -400.0f64..1200.0,
        to_y in -400.0f64..1200.0,
    ) {
        let mut editor = UvEditor::new(800.0, 800.0);
        editor.snap = SnapOptions::disabled();
        let rect = front_rect();
        editor.set_active_zone(EditorZone {
            key: ZoneKey::Front,
            rect: rect.clone(),
            size_cm: ZoneSizeCm::new(30.0, 40.0),
            safe: SafeRect::from_margins(ZoneSizeCm::new(30.0, 40.0), SafeMarginsCm::uniform(2.0)),
        });

        let grab_u = start.u + grab_fu * start.u_scale;
        let grab_v = start.v + grab_fv * start.v_scale;
        let (grab_x, grab_y) = editor
            .viewport()
            .uv_to_pixel(rect.u_min + grab_u * rect.u_span(), rect.v_max - grab_v * rect.v_span());
        prop_assert_eq!(
            editor.pointer_down(grab_x, grab_y, PointerButton::Primary, Modifiers::NONE, Some(&start)),
            EditorAction::BeginDrag
        );
        match editor.pointer_move(to_x, to_y, Modifiers::NONE, Some(&start)) {
            EditorAction::Move(moved) => {
                let b = moved.bounds();
                prop_assert!(b.left >= -1e-9 && b.right <= 1.0 + 1e-9);
                prop_assert!(b.top >= -1e-9 && b.bottom <= 1.0 + 1e-9);
            }
            other => prop_assert!(false, "unexpected action {:?}", other),
        }
    }

    #[test]
    fn place_at_relative_uv_round_trips(u in 0.0f64..1.0, v in 0.0f64..1.0) {
        let rect = front_rect();
        let mut draft = ZoneDraft::new();
        draft.place_at_uv(rel_to_abs_uv(u, v, &rect), &rect);
        let p = draft.placement.unwrap();
        prop_assert!((p.u - u).abs() < 1e-3);
        prop_assert!((p.v - v).abs() < 1e-3);
    }
}
