use garmentkit_core::{Placement, ZoneKey, ZoneRect, ZoneSide};
use garmentkit_visualizer::{demo_garment, demo_zone_uv, rel_to_abs_uv, resync, SceneNode};
use nalgebra::Vector3;

fn front_rect() -> ZoneRect {
    let (lo, hi) = demo_zone_uv(ZoneKey::Front);
    ZoneRect::new(lo.u, hi.u, lo.v, hi.v, "front", ZoneSide::Front)
}

#[test]
fn test_resync_is_idempotent() {
    let scene = demo_garment();
    let front = scene.find(ZoneKey::Front.mesh_name()).unwrap();
    let placement = Placement::at(0.4, 0.6);

    let first = resync(front, &front_rect(), &placement).unwrap();
    let second = resync(front, &front_rect(), &placement).unwrap();
    assert_eq!(first.position, second.position);
    assert_eq!(first.base_orientation, second.base_orientation);
    assert!(first.approx_eq(&second, 1e-9));
}

#[test]
fn test_front_pose_faces_into_garment() {
    let scene = demo_garment();
    let front = scene.find(ZoneKey::Front.mesh_name()).unwrap();
    let pose = resync(front, &front_rect(), &Placement::default()).unwrap();
    // forward axis is opposite the +Z surface normal
    assert!((pose.forward() + Vector3::z()).norm() < 1e-9);
    // placement center maps to panel center
    assert!(pose.position.x.abs() < 1e-9);
    assert!(pose.position.y.abs() < 1e-9);
}

#[test]
fn test_top_of_zone_is_top_of_panel() {
    let scene = demo_garment();
    let front = scene.find(ZoneKey::Front.mesh_name()).unwrap();
    let high = resync(front, &front_rect(), &Placement::at(0.5, 0.1)).unwrap();
    let low = resync(front, &front_rect(), &Placement::at(0.5, 0.9)).unwrap();
    assert!(high.position.y > low.position.y);
}

#[test]
fn test_uv_outside_panel_uses_fallback() {
    let scene = demo_garment();
    let front = scene.find(ZoneKey::Front.mesh_name()).unwrap();
    // rect larger than the panel's UV island
    let rect = ZoneRect::new(0.0, 0.5, 0.25, 0.95, "front", ZoneSide::Front);
    let uv = rel_to_abs_uv(0.0, 0.0, &rect);
    assert!(uv.u < 0.05);
    assert!(resync(front, &rect, &Placement::at(0.0, 0.0)).is_some());
}

#[test]
fn test_resync_without_uv_is_none() {
    let bare = SceneNode::group("empty");
    assert!(resync(&bare, &front_rect(), &Placement::default()).is_none());
}

#[test]
fn test_rotation_rolls_about_forward_axis() {
    let scene = demo_garment();
    let front = scene.find(ZoneKey::Front.mesh_name()).unwrap();
    let pose = resync(front, &front_rect(), &Placement::default()).unwrap();
    let rolled = pose.orientation_with_rotation(std::f64::consts::FRAC_PI_2);
    assert!(((rolled * Vector3::z()) - pose.forward()).norm() < 1e-9);
    let x0 = pose.base_orientation * Vector3::x();
    let x1 = rolled * Vector3::x();
    assert!(x0.dot(&x1).abs() < 1e-9);
}
