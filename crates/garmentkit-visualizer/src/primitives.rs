//! Procedural garment geometry.
//!
//! Used when no model file is available and throughout the tests. The demo
//! garment is a box-like torso with four flat print panels, each a separate
//! mesh named after its zone.

use crate::mesh::{Mesh, SceneNode};
use garmentkit_core::{Uv, ZoneKey};
use nalgebra::{Point3, Vector3};

/// A flat panel spanning `x_axis` by `y_axis` from `origin`, subdivided into
/// `cols` by `rows` quads. UVs run linearly from `uv_min` at the origin to
/// `uv_max` at the opposite corner, so the front face normal is
/// `x_axis × y_axis`.
pub fn uv_panel(
    name: &str,
    origin: Point3<f64>,
    x_axis: Vector3<f64>,
    y_axis: Vector3<f64>,
    uv_min: Uv,
    uv_max: Uv,
    cols: usize,
    rows: usize,
) -> Mesh {
    let cols = cols.max(1);
    let rows = rows.max(1);
    let mut positions = Vec::with_capacity((cols + 1) * (rows + 1));
    let mut uvs = Vec::with_capacity(positions.capacity());

    for j in 0..=rows {
        let t = j as f64 / rows as f64;
        for i in 0..=cols {
            let s = i as f64 / cols as f64;
            positions.push(origin + x_axis * s + y_axis * t);
            uvs.push(Uv::new(
                uv_min.u + (uv_max.u - uv_min.u) * s,
                uv_min.v + (uv_max.v - uv_min.v) * t,
            ));
        }
    }

    let stride = (cols + 1) as u32;
    let mut indices = Vec::with_capacity(cols * rows * 6);
    for j in 0..rows as u32 {
        for i in 0..cols as u32 {
            let a = j * stride + i;
            let b = a + 1;
            let c = a + stride + 1;
            let d = a + stride;
            indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }

    Mesh::new(name, positions).with_uv(uvs).with_indices(indices)
}

/// Single-quad panel.
pub fn uv_quad(
    name: &str,
    origin: Point3<f64>,
    x_axis: Vector3<f64>,
    y_axis: Vector3<f64>,
    uv_min: Uv,
    uv_max: Uv,
) -> Mesh {
    uv_panel(name, origin, x_axis, y_axis, uv_min, uv_max, 1, 1)
}

/// UV footprint of each zone panel on the demo garment atlas.
pub fn demo_zone_uv(zone: ZoneKey) -> (Uv, Uv) {
    match zone {
        ZoneKey::Front => (Uv::new(0.05, 0.30), Uv::new(0.45, 0.90)),
        ZoneKey::Back => (Uv::new(0.55, 0.30), Uv::new(0.95, 0.90)),
        ZoneKey::LeftArm => (Uv::new(0.05, 0.04), Uv::new(0.20, 0.22)),
        ZoneKey::RightArm => (Uv::new(0.30, 0.04), Uv::new(0.45, 0.22)),
    }
}

/// Builds the demo t-shirt: a body mesh plus one panel per print zone.
///
/// Front faces +Z, back faces -Z, left sleeve faces -X and right sleeve +X.
pub fn demo_garment() -> SceneNode {
    let half_w = 0.3;
    let half_d = 0.15;
    let body = uv_panel(
        "BODY",
        Point3::new(-half_w, -0.45, half_d - 0.001),
        Vector3::new(2.0 * half_w, 0.0, 0.0),
        Vector3::new(0.0, 0.9, 0.0),
        Uv::new(0.5, 0.0),
        Uv::new(1.0, 0.25),
        4,
        4,
    );

    let panel = |zone: ZoneKey, origin: Point3<f64>, x: Vector3<f64>, y: Vector3<f64>| {
        let (lo, hi) = demo_zone_uv(zone);
        SceneNode::from_mesh(uv_panel(zone.mesh_name(), origin, x, y, lo, hi, 2, 2))
    };

    SceneNode::group("Garment")
        .with_child(SceneNode::from_mesh(body))
        .with_child(panel(
            ZoneKey::Front,
            Point3::new(-0.3, -0.4, half_d),
            Vector3::new(0.6, 0.0, 0.0),
            Vector3::new(0.0, 0.8, 0.0),
        ))
        .with_child(panel(
            ZoneKey::Back,
            Point3::new(0.3, -0.4, -half_d),
            Vector3::new(-0.6, 0.0, 0.0),
            Vector3::new(0.0, 0.8, 0.0),
        ))
        .with_child(panel(
            ZoneKey::LeftArm,
            Point3::new(-0.55, 0.1, -0.1),
            Vector3::new(0.0, 0.0, 0.2),
            Vector3::new(0.0, 0.24, 0.0),
        ))
        .with_child(panel(
            ZoneKey::RightArm,
            Point3::new(0.55, 0.1, 0.1),
            Vector3::new(0.0, 0.0, -0.2),
            Vector3::new(0.0, 0.24, 0.0),
        ))
}
