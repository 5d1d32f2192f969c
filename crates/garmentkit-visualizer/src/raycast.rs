//! Ray picking against the garment scene, and the orbit camera that
//! produces rays from screen pixels.

use crate::mesh::{Mesh, SceneNode};
use crate::uv_pick::Barycentric;
use garmentkit_core::Uv;
use nalgebra::{Isometry3, Perspective3, Point3, Vector3};
use std::rc::Rc;
use tracing::debug;

const RAY_EPSILON: f64 = 1e-8;

/// A half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self {
            origin,
            direction: direction.try_normalize(1e-12).unwrap_or_else(|| -Vector3::z()),
        }
    }

    /// Ray from `from` towards `to`.
    pub fn between(from: Point3<f64>, to: Point3<f64>) -> Self {
        Self::new(from, to - from)
    }

    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }

    /// Ray through pixel `(px, py)` of the camera's viewport.
    pub fn from_screen(camera: &CameraRig, px: f64, py: f64) -> Self {
        camera.ray_from_screen(px, py)
    }
}

/// Orbit camera around a target, Y-up.
#[derive(Debug, Clone, Copy)]
pub struct CameraRig {
    pub target: Point3<f64>,
    pub distance: f64,
    pub yaw: f64,   // radians
    pub pitch: f64, // radians
    pub fov: f64,   // degrees
    pub up: Vector3<f64>,
    pub aspect_ratio: f64,
    pub near: f64,
    pub far: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            target: Point3::origin(),
            distance: 2.5,
            yaw: 0.0,
            pitch: 0.0,
            fov: 35.0,
            up: Vector3::y(),
            aspect_ratio: 1.0,
            near: 0.01,
            far: 100.0,
            viewport_width: 800.0,
            viewport_height: 800.0,
            min_distance: 0.3,
            max_distance: 20.0,
        }
    }
}

impl CameraRig {
    pub fn new(target: Point3<f64>, distance: f64) -> Self {
        Self {
            target,
            distance,
            ..Default::default()
        }
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width.max(1.0);
        self.viewport_height = height.max(1.0);
        self.aspect_ratio = self.viewport_width / self.viewport_height;
    }

    pub fn orbit(&mut self, delta_yaw: f64, delta_pitch: f64) {
        self.yaw += delta_yaw;
        self.pitch += delta_pitch;

        let limit = 89.0f64.to_radians();
        self.pitch = self.pitch.clamp(-limit, limit);
    }

    pub fn zoom(&mut self, delta: f64) {
        self.distance = (self.distance - delta).clamp(self.min_distance, self.max_distance);
    }

    /// Eye position. Yaw 0 and pitch 0 look down -Z from +Z.
    pub fn eye(&self) -> Point3<f64> {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let offset = Vector3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance;
        self.target + offset
    }

    /// Places the eye explicitly, deriving yaw, pitch and distance.
    pub fn look_from(&mut self, eye: Point3<f64>) {
        let offset = eye - self.target;
        let distance = offset.norm();
        if distance < 1e-9 {
            return;
        }
        self.distance = distance;
        self.pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        self.yaw = offset.x.atan2(offset.z);
    }

    fn view(&self) -> Isometry3<f64> {
        Isometry3::look_at_rh(&self.eye(), &self.target, &self.up)
    }

    fn projection(&self) -> Perspective3<f64> {
        Perspective3::new(self.aspect_ratio, self.fov.to_radians(), self.near, self.far)
    }

    pub fn ray_from_screen(&self, px: f64, py: f64) -> Ray {
        let x = px / self.viewport_width * 2.0 - 1.0;
        let y = 1.0 - py / self.viewport_height * 2.0;
        let proj = self.projection();
        let inv_view = self.view().inverse();
        let near = inv_view.transform_point(&proj.unproject_point(&Point3::new(x, y, -1.0)));
        let far = inv_view.transform_point(&proj.unproject_point(&Point3::new(x, y, 1.0)));
        Ray::between(near, far)
    }

    /// Projects a world point to pixel coordinates. `None` when behind the eye.
    pub fn project(&self, world: &Point3<f64>) -> Option<(f64, f64)> {
        let view_point = self.view().transform_point(world);
        if view_point.z >= 0.0 {
            return None;
        }
        let ndc = self.projection().project_point(&view_point);
        Some((
            (ndc.x + 1.0) * 0.5 * self.viewport_width,
            (1.0 - ndc.y) * 0.5 * self.viewport_height,
        ))
    }
}

/// Nearest intersection of a ray with the scene.
#[derive(Debug, Clone)]
pub struct RayHit {
    pub object: Rc<Mesh>,
    pub point: Point3<f64>,
    pub distance: f64,
    pub uv: Option<Uv>,
    /// Unit face normal in local space.
    pub face_normal: Vector3<f64>,
    pub barycentric: Barycentric,
}

/// Möller–Trumbore ray-triangle intersection. Returns `(t, u, v)` where
/// `u`/`v` weight `v1`/`v2`.
pub fn ray_triangle_intersection(
    origin: &Point3<f64>,
    dir: &Vector3<f64>,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
) -> Option<(f64, f64, f64)> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = dir.cross(&edge2);
    let a = edge1.dot(&h);
    if a.abs() < RAY_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * dir.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t > RAY_EPSILON).then_some((t, u, v))
}

/// Casts `ray` against every triangle under `root`, in world space.
pub fn raycast(root: &SceneNode, ray: &Ray) -> Option<RayHit> {
    let mut closest: Option<(f64, &Rc<Mesh>, [usize; 3], Barycentric)> = None;

    for mesh in root.meshes() {
        for tri in mesh.triangles() {
            let [ia, ib, ic] = tri;
            let v0 = mesh.to_world(&mesh.positions[ia]);
            let v1 = mesh.to_world(&mesh.positions[ib]);
            let v2 = mesh.to_world(&mesh.positions[ic]);
            if let Some((t, u, v)) = ray_triangle_intersection(&ray.origin, &ray.direction, &v0, &v1, &v2) {
                if closest.as_ref().is_none_or(|(best, ..)| t < *best) {
                    closest = Some((t, mesh, tri, Barycentric::new(1.0 - u - v, u, v)));
                }
            }
        }
    }

    let (t, mesh, tri, bc) = closest?;
    let [ia, ib, ic] = tri;
    let uvs = mesh.uv.as_deref().or(mesh.uv2.as_deref());
    let uv = uvs.and_then(|uvs| Some(bc.interpolate_uv(*uvs.get(ia)?, *uvs.get(ib)?, *uvs.get(ic)?)));
    let (pa, pb, pc) = (&mesh.positions[ia], &mesh.positions[ib], &mesh.positions[ic]);
    let face_normal = (pb - pa).cross(&(pc - pa)).try_normalize(1e-12).unwrap_or_else(Vector3::z);

    debug!("Ray hit '{}' at t={:.4}", mesh.name, t);
    Some(RayHit {
        object: Rc::clone(mesh),
        point: ray.at(t),
        distance: t,
        uv,
        face_normal,
        barycentric: bc,
    })
}
