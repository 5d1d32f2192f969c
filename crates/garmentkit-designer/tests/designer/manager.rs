//! Zone manager pipeline, lifecycle and decal bookkeeping.

use crate::support::{art, camera, loaded_manager, manager, stray_island_scene, uvless_scene, EventLog, Events};
use garmentkit_core::{Corner, Placement, PlacementError, ProductSpec, ZoneKey};
use garmentkit_designer::{
    DraftState, EditorAction, ManagerOptions, Modifiers, UploadOutcome, ZoneEvent, ZoneManager, SAFE_AREA_WARNING,
};
use garmentkit_visualizer::{demo_garment, Ray};
use nalgebra::Point3;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_edits_before_load_are_noops() {
    let mut m = manager();
    assert!(!m.is_loaded());
    assert_eq!(m.scale_by(2.0), Ok(false));
    assert_eq!(m.rotate_by_deg(5.0), Ok(false));
    assert_eq!(m.set_active(ZoneKey::Back), Ok(false));
    assert_eq!(m.upload_image(art(4, 4), &camera()), Err(PlacementError::ModelNotLoaded));
    assert_eq!(m.submit(), Err(PlacementError::ModelNotLoaded));
    assert_eq!(m.apply_width_cm(10.0), Err(PlacementError::ModelNotLoaded));
    assert!(!m.unlock());
    assert!(m.on_animation_frame().rebuilt.is_empty());
    assert!(m.backend().textures.is_empty());
    assert!(m.export_zone(ZoneKey::Front, std::path::Path::new("."), &Default::default()).is_err());
}

#[test]
fn test_load_builds_every_zone() {
    let m = loaded_manager();
    assert!(m.is_loaded());
    assert_eq!(m.active(), ZoneKey::Front);
    for zone in ZoneKey::ALL {
        let record = m.record(zone).unwrap();
        assert_eq!(record.rect.name, zone.mesh_name());
        assert_eq!(m.state(zone), Some(DraftState::Empty));
    }
}

#[test]
fn test_rebuilds_collapse_per_frame() {
    let mut m = loaded_manager();
    m.upload_image(art(64, 64), &camera()).unwrap();
    for _ in 0..3 {
        m.scale_by(1.05).unwrap();
    }
    m.rotate_by_deg(5.0).unwrap();

    let frame = m.on_animation_frame();
    assert_eq!(frame.rebuilt, vec![ZoneKey::Front]);
    assert!(frame.redraw);
    assert_eq!(m.backend().built.len(), 1);
    assert!(m.active_record().unwrap().has_decal());

    assert!(m.on_animation_frame().rebuilt.is_empty());

    m.rotate_by_deg(5.0).unwrap();
    m.on_animation_frame();
    assert_eq!(m.backend().built.len(), 2);
    // the first decal is disposed once its replacement exists
    assert_eq!(m.backend().disposed, vec![1]);
}

#[test]
fn test_decal_size_follows_placement() {
    let mut m = loaded_manager();
    m.upload_image(art(100, 50), &camera()).unwrap();
    m.apply_width_cm(15.0).unwrap();
    m.on_animation_frame();
    let size = m.active_record().unwrap().decal_size().unwrap();
    assert!((size.width - 0.35).abs() < 1e-9);
    assert!((size.height - 0.175).abs() < 1e-9);
    assert_eq!(size.depth, 1.1);
}

#[test]
fn test_upload_replaces_texture() {
    let mut m = loaded_manager();
    m.upload_image(art(8, 8), &camera()).unwrap();
    m.upload_image(art(8, 16), &camera()).unwrap();
    assert_eq!(m.backend().textures, vec![ZoneKey::Front, ZoneKey::Front]);
    assert_eq!(m.backend().textures_disposed, vec![ZoneKey::Front, ZoneKey::Front]);
    assert!((m.active_record().unwrap().draft.aspect().unwrap() - 2.0).abs() < 1e-12);
}

#[test]
fn test_submit_lock_unlock_cycle() {
    let mut m = loaded_manager();
    assert_eq!(m.submit(), Err(PlacementError::NoImage));

    m.upload_image(art(32, 32), &camera()).unwrap();
    m.submit().unwrap();
    assert_eq!(m.state(ZoneKey::Front), Some(DraftState::Locked));

    let locked = Err(PlacementError::ZoneLocked {
        zone: ZoneKey::Front.to_string(),
    });
    assert_eq!(m.scale_by(2.0), locked);
    assert_eq!(m.rotate_by_deg(5.0), locked);
    assert_eq!(m.apply_editor_action(EditorAction::RotateBy(5.0)), locked);
    let ray = Ray::between(camera().eye(), Point3::new(0.0, 0.0, 0.15));
    assert_eq!(m.place_from_ray(&ray), locked);
    assert!(m.begin_resize(Corner::TopLeft).is_err());

    assert!(m.unlock());
    assert!(!m.unlock());
    assert_eq!(m.state(ZoneKey::Front), Some(DraftState::Editing));
    assert_eq!(m.scale_by(0.5), Ok(true));
}

#[test]
fn test_upload_after_submit_unlocks_and_clears_decal() {
    let mut m = loaded_manager();
    m.upload_image(art(32, 32), &camera()).unwrap();
    m.submit().unwrap();
    m.on_animation_frame();
    assert!(m.active_record().unwrap().has_decal());

    m.upload_image(art(16, 16), &camera()).unwrap();
    assert_eq!(m.state(ZoneKey::Front), Some(DraftState::Editing));
    assert_eq!(m.backend().disposed, vec![1]);
    assert!(!m.active_record().unwrap().has_decal());

    m.on_animation_frame();
    assert!(m.active_record().unwrap().has_decal());
}

#[test]
fn test_pick_on_stray_island_is_outside_zone() {
    let mut m = manager();
    m.load_model(&stray_island_scene());
    let rect = m.active_record().unwrap().rect.clone();
    assert!((rect.u_max - 0.4).abs() < 1e-9);

    m.upload_image(art(32, 32), &camera()).unwrap();
    let before = m.active_record().unwrap().draft.placement;

    let ray = Ray::between(camera().eye(), Point3::new(0.6, 0.0, 0.15));
    assert_eq!(
        m.place_from_ray(&ray),
        Err(PlacementError::OutsideZone {
            zone: ZoneKey::Front.to_string()
        })
    );
    assert_eq!(m.active_record().unwrap().draft.placement, before);
    assert!(!m.is_dragging());
}

#[test]
fn test_click_without_image_is_rejected() {
    let mut m = loaded_manager();
    let ray = Ray::between(camera().eye(), Point3::new(0.0, 0.0, 0.15));
    assert_eq!(m.place_from_ray(&ray), Err(PlacementError::NoImage));
    let miss = Ray::new(camera().eye(), nalgebra::Vector3::new(0.0, 1.0, 0.0));
    assert_eq!(m.place_from_ray(&miss), Ok(false));
}

#[test]
fn test_zone_switch_ignored_while_dragging() {
    let mut m = loaded_manager();
    m.upload_image(art(32, 32), &camera()).unwrap();
    let ray = Ray::between(camera().eye(), Point3::new(0.0, 0.0, 0.15));
    m.place_from_ray(&ray).unwrap();

    assert_eq!(m.set_active(ZoneKey::Back), Ok(false));
    assert_eq!(m.active(), ZoneKey::Front);

    m.end_drag();
    assert_eq!(m.set_active(ZoneKey::Back), Ok(true));
    assert_eq!(m.active(), ZoneKey::Back);
    assert_eq!(m.state(ZoneKey::Back), Some(DraftState::Empty));
}

#[test]
fn test_unknown_zone_is_rejected() {
    let mut product = ProductSpec::tshirt();
    product.zones.retain(|z| z.key == ZoneKey::Front);
    let mut m = ZoneManager::new(
        crate::support::RecordingBackend::default(),
        product,
        ManagerOptions::default(),
    );
    m.load_model(&demo_garment());
    assert_eq!(
        m.set_active(ZoneKey::Back),
        Err(PlacementError::UnknownZone {
            zone: ZoneKey::Back.to_string()
        })
    );
}

#[test]
fn test_observer_notified_once_per_call() {
    let events: Events = Rc::new(RefCell::new(Vec::new()));
    let mut m = manager();
    m.add_observer(Box::new(EventLog(Rc::clone(&events))));

    m.load_model(&demo_garment());
    m.upload_image(art(32, 32), &camera()).unwrap();
    m.scale_by(0.5).unwrap();
    m.submit().unwrap();
    // locked: rejected without notification
    let _ = m.scale_by(0.5);
    m.unlock();

    assert_eq!(
        *events.borrow(),
        vec![
            (ZoneKey::Front, ZoneEvent::ModelLoaded),
            (ZoneKey::Front, ZoneEvent::ImageChanged),
            (ZoneKey::Front, ZoneEvent::PlacementChanged),
            (ZoneKey::Front, ZoneEvent::Locked),
            (ZoneKey::Front, ZoneEvent::Unlocked),
        ]
    );
}

#[test]
fn test_uvless_zone_needs_click() {
    let mut m = manager();
    m.load_model(&uvless_scene());
    let outcome = m.upload_image(art(32, 32), &camera()).unwrap();
    assert_eq!(outcome, UploadOutcome::NeedsClick);
    assert!(m.active_record().unwrap().pose.is_none());
    assert!(m.on_animation_frame().rebuilt.is_empty());
    assert_eq!(
        m.submit(),
        Err(PlacementError::PoseUnresolved {
            zone: ZoneKey::Front.to_string()
        })
    );
}

#[test]
fn test_corner_resize_uses_gesture_start() {
    let mut m = loaded_manager();
    m.upload_image(art(32, 32), &camera()).unwrap();
    m.apply_width_cm(12.0).unwrap();
    assert!(m.begin_resize(Corner::BottomRight).unwrap());

    m.resize_corner(100.0, 100.0, Modifiers::NONE).unwrap();
    m.resize_corner(200.0, 200.0, Modifiers::NONE).unwrap();
    let p = m.active_record().unwrap().draft.placement.unwrap();
    assert!((p.u_scale - 0.4 * 1.3).abs() < 1e-9);

    // a resize counts as a drag for zone switching
    assert_eq!(m.set_active(ZoneKey::Back), Ok(false));
    m.end_resize();
    assert_eq!(m.resize_corner(10.0, 10.0, Modifiers::NONE), Ok(false));
}

#[test]
fn test_overlay_and_hud_follow_active_zone() {
    let mut m = loaded_manager();
    assert!(m.overlay_box(&camera()).is_none());
    assert_eq!(m.hud(), "Ready.");

    m.upload_image(art(32, 32), &camera()).unwrap();
    let overlay = m.overlay_box(&camera()).unwrap();
    assert!((overlay.center_x - 400.0).abs() < 1e-6);
    assert!((overlay.center_y - 400.0).abs() < 1e-6);
    assert!(overlay.width >= 60.0);
    assert!(m.hud().contains("Mode: EDIT"));
}

#[test]
fn test_out_of_safe_placement_warns_and_clamps() {
    let mut m = loaded_manager();
    m.upload_image(art(64, 64), &camera()).unwrap();
    m.on_animation_frame();

    let edge = Placement::new(0.02, 0.5, 0.5, 0.5, 0.0);
    assert_eq!(m.apply_editor_action(EditorAction::Move(edge)), Ok(true));
    assert_eq!(m.is_inside_safe(), Some(false));
    assert!(m.hud().contains(SAFE_AREA_WARNING));

    assert_eq!(m.clamp_to_safe(), Ok(true));
    assert_eq!(m.is_inside_safe(), Some(true));
    assert!(!m.hud().contains(SAFE_AREA_WARNING));
    let p = m.active_record().unwrap().draft.placement.unwrap();
    assert_eq!(p.u_scale, 0.5);
    assert!(p.u > edge.u);
    assert_eq!(m.clamp_to_safe(), Ok(false));
    assert_eq!(m.on_animation_frame().rebuilt, vec![ZoneKey::Front]);

    m.submit().unwrap();
    assert_eq!(
        m.clamp_to_safe(),
        Err(PlacementError::ZoneLocked {
            zone: ZoneKey::Front.to_string()
        })
    );
}

#[test]
fn test_safe_check_needs_placement() {
    let m = loaded_manager();
    assert_eq!(m.is_inside_safe(), None);
}
