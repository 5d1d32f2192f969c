use garmentkit_core::{Placement, Uv, ZoneKey, ZoneRect, ZoneSide};
use garmentkit_visualizer::{
    demo_garment, demo_zone_uv, pick_by_uv, raycast, resync, uv_panel, uv_quad, PickOptions, Ray, SceneNode,
};
use nalgebra::{Matrix4, Point3, Vector3};

#[test]
fn test_pick_respects_world_matrix() {
    let mesh = uv_quad(
        "moved",
        Point3::new(-0.5, -0.5, 0.0),
        Vector3::x(),
        Vector3::y(),
        Uv::new(0.0, 0.0),
        Uv::new(1.0, 1.0),
    )
    .with_world(Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0)));
    let scene = SceneNode::from_mesh(mesh);

    let hit = pick_by_uv(&scene, Uv::new(0.5, 0.5), &PickOptions::default()).unwrap();
    assert!(hit.point_local.coords.norm() < 1e-9);
    assert!((hit.point - Point3::new(1.0, 2.0, 3.0)).norm() < 1e-9);
}

#[test]
fn test_pick_finds_each_demo_zone() {
    let scene = demo_garment();
    for zone in ZoneKey::ALL {
        let node = scene.find(zone.mesh_name()).unwrap();
        let (lo, hi) = demo_zone_uv(zone);
        let center = Uv::new((lo.u + hi.u) * 0.5, (lo.v + hi.v) * 0.5);
        let hit = pick_by_uv(node, center, &PickOptions::exact()).unwrap();
        assert_eq!(hit.object.name, zone.mesh_name());
        assert!(hit.exact);
    }
}

#[test]
fn test_gap_in_atlas_still_resolves() {
    // between the left and right sleeve islands
    let scene = demo_garment();
    let hit = pick_by_uv(&scene, Uv::new(0.25, 0.1), &PickOptions::default()).unwrap();
    assert!(!hit.exact);
}

#[test]
fn test_ray_and_uv_pick_agree() {
    let scene = demo_garment();
    let front = scene.find(ZoneKey::Front.mesh_name()).unwrap();
    let ray = Ray::between(Point3::new(0.1, 0.2, 3.0), Point3::new(0.1, 0.2, 0.0));
    let ray_hit = raycast(front, &ray).unwrap();
    let uv = ray_hit.uv.unwrap();

    let uv_hit = pick_by_uv(front, uv, &PickOptions::exact()).unwrap();
    assert!((uv_hit.point - ray_hit.point).norm() < 1e-9);
}

/// 64×64 quads over UV 0.1..0.9, so each UV edge is 0.0125 long.
fn dense_front() -> SceneNode {
    SceneNode::from_mesh(uv_panel(
        "PRINT_ZONE_FRONT",
        Point3::new(-0.3, -0.4, 0.15),
        Vector3::new(0.6, 0.0, 0.0),
        Vector3::new(0.0, 0.8, 0.0),
        Uv::new(0.1, 0.1),
        Uv::new(0.9, 0.9),
        64,
        64,
    ))
}

#[test]
fn test_exact_pick_on_dense_panel() {
    let scene = dense_front();
    let hit = pick_by_uv(&scene, Uv::new(0.7321, 0.4137), &PickOptions::exact()).unwrap();
    assert!(hit.exact);
    assert!((hit.uv.u - 0.7321).abs() < 1e-9);
    assert!((hit.uv.v - 0.4137).abs() < 1e-9);
    assert!((hit.point - Point3::new(0.174075, -0.0863, 0.15)).norm() < 1e-9);
}

#[test]
fn test_resync_on_dense_panel_is_not_snapped_to_vertices() {
    let scene = dense_front();
    let rect = ZoneRect::new(0.1, 0.9, 0.1, 0.9, "PRINT_ZONE_FRONT", ZoneSide::Front);
    let placement = Placement::at(0.790125, 0.607875);
    let pose = resync(&scene, &rect, &placement).unwrap();
    assert!((pose.position - Point3::new(0.174075, -0.0863, 0.15)).norm() < 1e-9);
}
