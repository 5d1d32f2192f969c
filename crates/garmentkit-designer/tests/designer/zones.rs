//! Zone rectangles computed from garment scenes.

use crate::support::stray_island_scene;
use garmentkit_core::{ProductSpec, Uv, ZoneKey};
use garmentkit_designer::ZoneRegistry;
use garmentkit_visualizer::{demo_garment, demo_zone_uv, uv_quad, SceneNode};
use nalgebra::{Point3, Vector3};

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
}

#[test]
fn test_demo_garment_rects_match_panels() {
    let registry = ZoneRegistry::with_default_threshold(&demo_garment(), &ProductSpec::tshirt());
    assert_eq!(registry.len(), 4);
    for zone in ZoneKey::ALL {
        let (lo, hi) = demo_zone_uv(zone);
        let rect = registry.rect(zone).unwrap();
        assert_close(rect.u_min, lo.u);
        assert_close(rect.u_max, hi.u);
        assert_close(rect.v_min, lo.v);
        assert_close(rect.v_max, hi.v);
        assert!(!rect.crosses_seam());
        assert_eq!(rect.side, zone.side());
        assert!(registry.get(zone).unwrap().mesh.is_some());
    }
}

#[test]
fn test_zone_at_finds_owner() {
    let registry = ZoneRegistry::with_default_threshold(&demo_garment(), &ProductSpec::tshirt());
    assert_eq!(registry.zone_at(Uv::new(0.2, 0.5)), Some(ZoneKey::Front));
    assert_eq!(registry.zone_at(Uv::new(0.7, 0.5)), Some(ZoneKey::Back));
    assert_eq!(registry.zone_at(Uv::new(0.1, 0.1)), Some(ZoneKey::LeftArm));
    assert_eq!(registry.zone_at(Uv::new(0.4, 0.1)), Some(ZoneKey::RightArm));
    assert_eq!(registry.zone_at(Uv::new(0.5, 0.95)), None);
}

#[test]
fn test_seam_crossing_zone_is_folded() {
    let left = uv_quad(
        "seam-left",
        Point3::new(-0.2, -0.2, 0.15),
        Vector3::new(0.2, 0.0, 0.0),
        Vector3::new(0.0, 0.4, 0.0),
        Uv::new(0.92, 0.3),
        Uv::new(0.99, 0.7),
    );
    let right = uv_quad(
        "seam-right",
        Point3::new(0.0, -0.2, 0.15),
        Vector3::new(0.2, 0.0, 0.0),
        Vector3::new(0.0, 0.4, 0.0),
        Uv::new(0.01, 0.3),
        Uv::new(0.08, 0.7),
    );
    let scene = SceneNode::group("Garment").with_child(
        SceneNode::group(ZoneKey::Back.mesh_name())
            .with_child(SceneNode::from_mesh(left))
            .with_child(SceneNode::from_mesh(right)),
    );

    let registry = ZoneRegistry::with_default_threshold(&scene, &ProductSpec::tshirt());
    let rect = registry.rect(ZoneKey::Back).unwrap();
    assert!(rect.crosses_seam());
    assert_close(rect.u_min, 0.92);
    assert_close(rect.u_max, 0.08);
    assert_close(rect.u_span(), 0.16);
    assert!(rect.contains(Uv::new(0.0, 0.5), 0.0));
    assert!(rect.contains(Uv::new(0.95, 0.5), 0.0));
    assert!(!rect.contains(Uv::new(0.5, 0.5), 0.0));
    assert_eq!(registry.zone_at(Uv::new(0.0, 0.5)), Some(ZoneKey::Back));
}

#[test]
fn test_stray_vertices_are_trimmed() {
    let registry = ZoneRegistry::with_default_threshold(&stray_island_scene(), &ProductSpec::tshirt());
    let rect = registry.rect(ZoneKey::Front).unwrap();
    assert_close(rect.u_min, 0.1);
    assert_close(rect.u_max, 0.4);
    assert!(!rect.crosses_seam());

    // zones absent from the scene get the fallback rectangle
    let back = registry.rect(ZoneKey::Back).unwrap();
    assert_eq!(back.name, "fallback");
    assert_close(back.u_min, 0.25);
    assert_close(back.u_max, 0.75);
    assert!(registry.get(ZoneKey::Back).unwrap().mesh.is_none());
}
