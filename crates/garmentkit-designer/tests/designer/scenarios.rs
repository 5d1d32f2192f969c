//! End-to-end placement flows on the demo garment.

use crate::support::{art, camera, loaded_manager};
use garmentkit_core::constants::MAX_SCALE;
use garmentkit_core::{Uv, ZoneKey, ZoneRect, ZoneSide};
use garmentkit_designer::{
    EditorAction, ExportOptions, Modifiers, PointerButton, UploadOutcome, UvEditor, ZoneDraft,
};
use garmentkit_visualizer::Ray;
use nalgebra::Point3;

#[test]
fn test_simple_placement_maps_hit_to_zone_center() {
    let rect = ZoneRect::new(0.25, 0.75, 0.2, 0.85, "PRINT_ZONE_FRONT", ZoneSide::Front);
    let mut draft = ZoneDraft::new();
    draft.place_at_uv(Uv::new(0.5, 0.525), &rect);
    let p = draft.placement.unwrap();
    assert!((p.u - 0.5).abs() < 1e-9);
    assert!((p.v - 0.5).abs() < 1e-9);
    assert_eq!((p.u_scale, p.v_scale, p.rotation_rad), (0.3, 0.3, 0.0));
}

#[test]
fn test_upload_centers_and_poses() {
    let mut m = loaded_manager();
    let outcome = m.upload_image(art(200, 100), &camera()).unwrap();
    assert_eq!(outcome, UploadOutcome::PosedByUv);

    let record = m.active_record().unwrap();
    let p = record.draft.placement.unwrap();
    assert_eq!((p.u, p.v), (0.5, 0.5));
    assert!((p.u_scale - 0.92).abs() < 1e-12);
    assert!((p.v_scale - 0.46).abs() < 1e-12);
    let pose = record.pose.as_ref().unwrap();
    assert!(pose.position.x.abs() < 1e-9);
    assert!(pose.position.y.abs() < 1e-9);
}

#[test]
fn test_click_on_garment_moves_artwork() {
    let mut m = loaded_manager();
    m.upload_image(art(64, 64), &camera()).unwrap();

    // upper-left quarter of the front panel
    let ray = Ray::between(camera().eye(), Point3::new(-0.15, 0.2, 0.15));
    assert!(m.place_from_ray(&ray).unwrap());
    assert!(m.is_dragging());

    let record = m.active_record().unwrap();
    let p = record.draft.placement.unwrap();
    assert!((p.u - 0.25).abs() < 1e-9);
    assert!((p.v - 0.25).abs() < 1e-9);
    let hit = record.last_hit.unwrap();
    assert!((hit.u - 0.15).abs() < 1e-9);
    assert!((hit.v - 0.75).abs() < 1e-9);

    let drag = Ray::between(camera().eye(), Point3::new(0.15, -0.2, 0.15));
    assert!(m.drag_from_ray(&drag));
    let p = m.active_record().unwrap().draft.placement.unwrap();
    assert!((p.u - 0.75).abs() < 1e-9);
    assert!((p.v - 0.75).abs() < 1e-9);

    m.end_drag();
    assert!(!m.drag_from_ray(&ray));
}

#[test]
fn test_repeated_scaling_clamps() {
    let mut m = loaded_manager();
    m.upload_image(art(64, 64), &camera()).unwrap();
    for _ in 0..3 {
        m.scale_by(2.0).unwrap();
    }
    let p = m.active_record().unwrap().draft.placement.unwrap();
    assert_eq!(p.u_scale, MAX_SCALE);
    assert_eq!(p.v_scale, MAX_SCALE);
    assert!(!m.scale_by(2.0).unwrap());
}

#[test]
fn test_wheel_over_3d_view_scales() {
    let mut m = loaded_manager();
    m.upload_image(art(64, 64), &camera()).unwrap();
    m.apply_width_cm(15.0).unwrap();
    m.wheel_scale(1.0).unwrap();
    let p = m.active_record().unwrap().draft.placement.unwrap();
    assert!((p.u_scale - 0.5 * 0.95).abs() < 1e-12);
    m.wheel_scale(-1.0).unwrap();
    let p = m.active_record().unwrap().draft.placement.unwrap();
    assert!((p.u_scale - 0.5 * 0.95 * 1.05).abs() < 1e-12);
}

#[test]
fn test_editor_drag_snaps_to_center() {
    let mut m = loaded_manager();
    m.upload_image(art(64, 64), &camera()).unwrap();
    m.apply_width_cm(9.0).unwrap();

    let mut editor = UvEditor::new(600.0, 600.0);
    editor.set_zones(m.zone_outlines());
    editor.set_active_zone(m.editor_zone().unwrap());

    let rect = m.active_record().unwrap().rect.clone();
    let to_pixel = |editor: &UvEditor, u: f64, v: f64| {
        editor
            .viewport()
            .uv_to_pixel(rect.u_min + u * rect.u_span(), rect.v_max - v * rect.v_span())
    };

    let start = m.active_record().unwrap().draft.placement.unwrap();
    let (px, py) = to_pixel(&editor, 0.5, 0.5);
    let action = editor.pointer_down(px, py, PointerButton::Primary, Modifiers::NONE, Some(&start));
    assert_eq!(action, EditorAction::BeginDrag);
    m.apply_editor_action(action).unwrap();
    assert!(m.is_dragging());

    let (px, py) = to_pixel(&editor, 0.49, 0.3);
    let action = editor.pointer_move(px, py, Modifiers::NONE, Some(&start));
    assert!(m.apply_editor_action(action).unwrap());
    let p = m.active_record().unwrap().draft.placement.unwrap();
    assert_eq!(p.u, 0.5);
    assert!((p.v - 0.3).abs() < 1e-9);

    let (px, py) = to_pixel(&editor, 0.47, 0.3);
    let action = editor.pointer_move(px, py, Modifiers::NONE, Some(&start));
    m.apply_editor_action(action).unwrap();
    let p = m.active_record().unwrap().draft.placement.unwrap();
    assert!((p.u - 0.47).abs() < 1e-9);

    m.apply_editor_action(editor.pointer_up()).unwrap();
    assert!(!m.is_dragging());
}

#[test]
fn test_editor_keys_rotate() {
    let mut m = loaded_manager();
    m.upload_image(art(64, 64), &camera()).unwrap();
    let mut editor = UvEditor::new(300.0, 300.0);
    editor.set_active_zone(m.editor_zone().unwrap());

    m.apply_editor_action(editor.key('r')).unwrap();
    m.apply_editor_action(editor.key('r')).unwrap();
    m.apply_editor_action(editor.key('e')).unwrap();
    let p = m.active_record().unwrap().draft.placement.unwrap();
    assert!((p.rotation_deg() - 5.0).abs() < 1e-9);
}

#[test]
fn test_rotated_export_reports_degrees() {
    let dir = tempfile::tempdir().unwrap();
    let mut m = loaded_manager();
    m.upload_image(art(32, 32), &camera()).unwrap();
    m.rotate_by_deg(90.0).unwrap();

    let options = ExportOptions {
        template_px: 64,
        ..ExportOptions::default()
    };
    let report = m.export_zone(ZoneKey::Front, dir.path(), &options).unwrap();
    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&report.json_path).unwrap()).unwrap();
    assert!((json["placement"]["rotationDeg"].as_f64().unwrap() - 90.0).abs() < 1e-9);
}
