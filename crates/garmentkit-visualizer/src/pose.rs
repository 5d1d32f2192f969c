//! # Pose Synchronizer
//!
//! Converts a zone-relative placement into absolute UV, resolves that UV on
//! the zone mesh, and derives the world pose a decal is projected from.
//!
//! Zone-relative `v` grows downward while texture `v` grows upward, so the
//! conversions flip `v` against the zone's `v_max`.

use crate::mesh::{Mesh, SceneNode};
use crate::raycast::RayHit;
use crate::uv_pick::{pick_by_uv, PickOptions, UvHit};
use garmentkit_core::constants::UV_EDGE_EPSILON;
use garmentkit_core::{Placement, Uv, ZoneRect};
use nalgebra::{Matrix3, Point3, Rotation3, UnitQuaternion, Vector3};
use std::rc::{Rc, Weak};
use tracing::{debug, warn};

/// Neighbour offsets tried, in order, on each axis of the fallback grid.
const GRID_STEPS: [f64; 5] = [0.0, 1.0, -1.0, 2.0, -2.0];
/// Zone-relative distance between fallback grid samples.
const GRID_STEP: f64 = 0.04;

/// World-space anchor of a decal.
#[derive(Debug, Clone)]
pub struct Pose {
    pub object: Weak<Mesh>,
    pub position: Point3<f64>,
    pub base_orientation: UnitQuaternion<f64>,
}

impl Pose {
    /// Base orientation rolled about its local Z axis.
    pub fn orientation_with_rotation(&self, rotation_rad: f64) -> UnitQuaternion<f64> {
        final_orientation(&self.base_orientation, rotation_rad)
    }

    /// Local Z axis in world space. Points away from the surface normal.
    pub fn forward(&self) -> Vector3<f64> {
        self.base_orientation * Vector3::z()
    }

    /// The anchored mesh, if it is still alive.
    pub fn mesh(&self) -> Option<Rc<Mesh>> {
        self.object.upgrade()
    }

    /// Same anchor, position and orientation, within `eps`.
    pub fn approx_eq(&self, other: &Pose, eps: f64) -> bool {
        Weak::ptr_eq(&self.object, &other.object)
            && (self.position - other.position).norm() <= eps
            && self.base_orientation.angle_to(&other.base_orientation) <= eps
    }
}

/// Zone-relative coordinates to absolute UV.
pub fn rel_to_abs_uv(p_u: f64, p_v: f64, rect: &ZoneRect) -> Uv {
    let mut u = rect.u_min + p_u * rect.u_span();
    if u >= 1.0 {
        u -= 1.0;
    }
    let v = rect.v_max - p_v * rect.v_span();
    Uv::new(
        u.clamp(UV_EDGE_EPSILON, 1.0 - UV_EDGE_EPSILON),
        v.clamp(UV_EDGE_EPSILON, 1.0 - UV_EDGE_EPSILON),
    )
}

/// Absolute UV to zone-relative coordinates (`v` downward). Not clamped.
pub fn abs_to_rel_uv(uv: Uv, rect: &ZoneRect) -> (f64, f64) {
    let u_span = rect.u_span().max(1e-9);
    let v_span = rect.v_span().max(1e-9);
    (
        (rect.unwrap_u(uv.u) - rect.u_min) / u_span,
        (rect.v_max - uv.v) / v_span,
    )
}

/// Rotation whose local Z axis points from `target` towards `eye`.
pub fn look_at_orientation(eye: &Point3<f64>, target: &Point3<f64>, up: &Vector3<f64>) -> UnitQuaternion<f64> {
    let mut z = eye - target;
    if z.norm_squared() == 0.0 {
        z.z = 1.0;
    }
    z.normalize_mut();

    let mut x = up.cross(&z);
    if x.norm_squared() == 0.0 {
        // up is parallel to z
        if (up.z.abs() - 1.0).abs() < f64::EPSILON {
            z.x += 0.0001;
        } else {
            z.z += 0.0001;
        }
        z.normalize_mut();
        x = up.cross(&z);
    }
    x.normalize_mut();
    let y = z.cross(&x);

    let basis = Matrix3::from_columns(&[x, y, z]);
    UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(basis))
}

/// `base` followed by a roll of `rotation_rad` about the local Z axis.
pub fn final_orientation(base: &UnitQuaternion<f64>, rotation_rad: f64) -> UnitQuaternion<f64> {
    base * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), rotation_rad)
}

fn pose_from_surface(mesh: &Rc<Mesh>, point: Point3<f64>, face_normal: &Vector3<f64>) -> Pose {
    let normal = mesh.direction_to_world(face_normal);
    let target = point + normal;
    Pose {
        object: Rc::downgrade(mesh),
        position: point,
        base_orientation: look_at_orientation(&point, &target, &Vector3::y()),
    }
}

pub fn pose_from_uv_hit(hit: &UvHit) -> Pose {
    pose_from_surface(&hit.object, hit.point, &hit.face_normal)
}

pub fn pose_from_ray_hit(hit: &RayHit) -> Pose {
    pose_from_surface(&hit.object, hit.point, &hit.face_normal)
}

/// Resolves the pose of `placement` on the zone mesh.
///
/// Tries an exact pick at the placement center, then a grid of nearby
/// samples, then the nearest-triangle fallback. Returns `None` when the zone
/// mesh carries no usable UVs; callers keep their previous pose.
pub fn resync(zone_mesh: &SceneNode, rect: &ZoneRect, placement: &Placement) -> Option<Pose> {
    let preferred = rel_to_abs_uv(placement.u, placement.v, rect);
    let exact = PickOptions::exact();

    if let Some(hit) = pick_by_uv(zone_mesh, preferred, &exact) {
        debug!("Resync '{}' at UV ({})", rect.name, preferred);
        return Some(pose_from_uv_hit(&hit));
    }

    for dy in GRID_STEPS {
        for dx in GRID_STEPS {
            if dx == 0.0 && dy == 0.0 {
                continue;
            }
            let pu = (placement.u + dx * GRID_STEP).clamp(0.0, 1.0);
            let pv = (placement.v + dy * GRID_STEP).clamp(0.0, 1.0);
            let uv = rel_to_abs_uv(pu, pv, rect);
            if let Some(hit) = pick_by_uv(zone_mesh, uv, &exact) {
                debug!("Resync '{}' via grid sample ({})", rect.name, uv);
                return Some(pose_from_uv_hit(&hit));
            }
        }
    }

    match pick_by_uv(zone_mesh, preferred, &PickOptions::default()) {
        Some(hit) => {
            debug!("Resync '{}' via nearest triangle ({})", rect.name, hit.uv);
            Some(pose_from_uv_hit(&hit))
        }
        None => {
            warn!("Resync failed for zone '{}' at UV ({})", rect.name, preferred);
            None
        }
    }
}
