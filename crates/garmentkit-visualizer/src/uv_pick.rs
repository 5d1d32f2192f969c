//! # UV Geometry Picker
//!
//! Finds the surface point of a mesh hierarchy whose texture coordinate
//! matches a target UV. The search works per triangle in UV space using 2D
//! barycentric coordinates, then interpolates the 3D position with the same
//! weights.
//!
//! When no triangle contains the target (UV islands leave gaps, and zone
//! edges are frequently hit) the picker falls back to the nearest point on
//! any UV-carrying triangle, so a caller almost always gets a hit.

use crate::mesh::{Mesh, SceneNode, UvChannel};
use garmentkit_core::Uv;
use nalgebra::{Point3, Vector3};
use std::rc::Rc;
use tracing::{debug, warn};

/// `d00 * d11 - d01²` equals `d00 * d11 * sin²θ` for the corner angle θ, so
/// degeneracy is judged relative to the edge lengths.
const DEGENERATE_SIN2: f64 = 1e-12;
const WEIGHT_TOLERANCE: f64 = -1e-5;
const AABB_EPSILON: f64 = 1e-6;

/// Barycentric weights for vertices `a`, `b`, `c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barycentric {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Barycentric {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    fn accepted(&self) -> bool {
        self.a >= WEIGHT_TOLERANCE && self.b >= WEIGHT_TOLERANCE && self.c >= WEIGHT_TOLERANCE
    }

    /// Clamps each weight into `[0, 1]` and renormalizes.
    fn clamped(&self) -> Option<Self> {
        let a = self.a.clamp(0.0, 1.0);
        let b = self.b.clamp(0.0, 1.0);
        let c = self.c.clamp(0.0, 1.0);
        let sum = a + b + c;
        if sum <= f64::EPSILON {
            return None;
        }
        Some(Self::new(a / sum, b / sum, c / sum))
    }

    pub fn interpolate_point(&self, pa: &Point3<f64>, pb: &Point3<f64>, pc: &Point3<f64>) -> Point3<f64> {
        Point3::from(pa.coords * self.a + pb.coords * self.b + pc.coords * self.c)
    }

    pub fn interpolate_uv(&self, a: Uv, b: Uv, c: Uv) -> Uv {
        Uv::new(
            a.u * self.a + b.u * self.b + c.u * self.c,
            a.v * self.a + b.v * self.b + c.v * self.c,
        )
    }
}

/// Options for [`pick_by_uv`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickOptions {
    /// Pin the search to one channel. `None` tries the primary channel and
    /// then a second pass over `uv2`.
    pub channel: Option<UvChannel>,
    /// Also compute the world-space normal.
    pub world_normal: bool,
    /// Fall back to the nearest triangle when no triangle contains the target.
    pub nearest_fallback: bool,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            channel: None,
            world_normal: false,
            nearest_fallback: true,
        }
    }
}

impl PickOptions {
    /// Only accept triangles that actually contain the target.
    pub fn exact() -> Self {
        Self {
            nearest_fallback: false,
            ..Self::default()
        }
    }

    pub fn with_channel(mut self, channel: UvChannel) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn with_world_normal(mut self) -> Self {
        self.world_normal = true;
        self
    }
}

/// Result of a UV pick.
#[derive(Debug, Clone)]
pub struct UvHit {
    pub object: Rc<Mesh>,
    /// World-space surface point.
    pub point: Point3<f64>,
    pub point_local: Point3<f64>,
    /// UV at the returned point. Equals the target for exact hits.
    pub uv: Uv,
    pub barycentric: Barycentric,
    /// Unit face normal in local space.
    pub face_normal: Vector3<f64>,
    pub normal_world: Option<Vector3<f64>>,
    /// `false` when produced by the nearest-triangle fallback.
    pub exact: bool,
}

/// 2D barycentric coordinates of `p` in triangle `(a, b, c)`.
///
/// Returns `None` for a degenerate triangle. Weights may be negative when
/// `p` lies outside.
pub fn barycentric_uv(a: Uv, b: Uv, c: Uv, p: Uv) -> Option<Barycentric> {
    let v0 = (b.u - a.u, b.v - a.v);
    let v1 = (c.u - a.u, c.v - a.v);
    let v2 = (p.u - a.u, p.v - a.v);

    let d00 = v0.0 * v0.0 + v0.1 * v0.1;
    let d01 = v0.0 * v1.0 + v0.1 * v1.1;
    let d11 = v1.0 * v1.0 + v1.1 * v1.1;
    let d20 = v2.0 * v0.0 + v2.1 * v0.1;
    let d21 = v2.0 * v1.0 + v2.1 * v1.1;

    let denom = d00 * d11 - d01 * d01;
    if denom.abs() <= DEGENERATE_SIN2 * d00 * d11 {
        return None;
    }
    let b_w = (d11 * d20 - d01 * d21) / denom;
    let c_w = (d00 * d21 - d01 * d20) / denom;
    Some(Barycentric::new(1.0 - b_w - c_w, b_w, c_w))
}

fn outside_aabb(a: Uv, b: Uv, c: Uv, p: Uv) -> bool {
    let min_u = a.u.min(b.u).min(c.u) - AABB_EPSILON;
    let max_u = a.u.max(b.u).max(c.u) + AABB_EPSILON;
    let min_v = a.v.min(b.v).min(c.v) - AABB_EPSILON;
    let max_v = a.v.max(b.v).max(c.v) + AABB_EPSILON;
    p.u < min_u || p.u > max_u || p.v < min_v || p.v > max_v
}

/// Channel used for a mesh in the primary pass: the requested one when the
/// mesh has a primary channel, else `uv2`.
fn resolve_channel(mesh: &Mesh, requested: UvChannel) -> Option<&[Uv]> {
    if mesh.uv.is_some() {
        mesh.channel(requested)
    } else {
        mesh.uv2.as_deref()
    }
}

fn uv_bounds(uvs: &[Uv]) -> Option<(Uv, Uv)> {
    let first = *uvs.first()?;
    Some(uvs.iter().fold((first, first), |(lo, hi), uv| {
        (
            Uv::new(lo.u.min(uv.u), lo.v.min(uv.v)),
            Uv::new(hi.u.max(uv.u), hi.v.max(uv.v)),
        )
    }))
}

fn tri_uvs(uvs: &[Uv], tri: [usize; 3]) -> Option<[Uv; 3]> {
    Some([*uvs.get(tri[0])?, *uvs.get(tri[1])?, *uvs.get(tri[2])?])
}

fn face_normal(pa: &Point3<f64>, pb: &Point3<f64>, pc: &Point3<f64>) -> Vector3<f64> {
    (pb - pa)
        .cross(&(pc - pa))
        .try_normalize(1e-12)
        .unwrap_or_else(Vector3::z)
}

fn build_hit(mesh: &Rc<Mesh>, tri: [usize; 3], bc: Barycentric, uv: Uv, world_normal: bool, exact: bool) -> UvHit {
    let [ia, ib, ic] = tri;
    let (pa, pb, pc) = (&mesh.positions[ia], &mesh.positions[ib], &mesh.positions[ic]);
    let point_local = bc.interpolate_point(pa, pb, pc);
    let normal = face_normal(pa, pb, pc);
    UvHit {
        object: Rc::clone(mesh),
        point: mesh.to_world(&point_local),
        point_local,
        uv,
        barycentric: bc,
        face_normal: normal,
        normal_world: world_normal.then(|| mesh.normal_to_world(&normal)),
        exact,
    }
}

/// Exact search on one mesh using the given UV set.
pub fn pick_on_mesh(mesh: &Rc<Mesh>, uvs: &[Uv], target: Uv, world_normal: bool) -> Option<UvHit> {
    let (lo, hi) = uv_bounds(uvs)?;
    if target.u < lo.u - AABB_EPSILON
        || target.u > hi.u + AABB_EPSILON
        || target.v < lo.v - AABB_EPSILON
        || target.v > hi.v + AABB_EPSILON
    {
        return None;
    }

    for tri in mesh.triangles() {
        let Some([a, b, c]) = tri_uvs(uvs, tri) else {
            continue;
        };
        if outside_aabb(a, b, c, target) {
            continue;
        }
        let Some(bc) = barycentric_uv(a, b, c, target) else {
            continue;
        };
        if bc.accepted() {
            return Some(build_hit(mesh, tri, bc, target, world_normal, true));
        }
    }
    None
}

/// Closest point to `target` over every UV-carrying triangle of `meshes`.
pub fn nearest_on_meshes(meshes: &[&Rc<Mesh>], target: Uv, channel: UvChannel, world_normal: bool) -> Option<UvHit> {
    let mut best: Option<(f64, &Rc<Mesh>, [usize; 3], Barycentric, Uv)> = None;

    for &mesh in meshes {
        let Some(uvs) = resolve_channel(mesh, channel) else {
            continue;
        };
        for tri in mesh.triangles() {
            let Some([a, b, c]) = tri_uvs(uvs, tri) else {
                continue;
            };
            let bc = match barycentric_uv(a, b, c, target).and_then(|bc| bc.clamped()) {
                Some(bc) => bc,
                None => nearest_vertex(a, b, c, target),
            };
            let q = bc.interpolate_uv(a, b, c);
            let d = q.distance_squared(&target);
            if best.as_ref().is_none_or(|(best_d, ..)| d < *best_d) {
                best = Some((d, mesh, tri, bc, q));
            }
        }
    }

    let (d, mesh, tri, bc, q) = best?;
    debug!(
        "UV pick fallback on '{}': target ({}) nearest ({}) dist {:.5}",
        mesh.name,
        target,
        q,
        d.sqrt()
    );
    Some(build_hit(mesh, tri, bc, q, world_normal, false))
}

fn nearest_vertex(a: Uv, b: Uv, c: Uv, p: Uv) -> Barycentric {
    let da = a.distance_squared(&p);
    let db = b.distance_squared(&p);
    let dc = c.distance_squared(&p);
    if da <= db && da <= dc {
        Barycentric::new(1.0, 0.0, 0.0)
    } else if db <= dc {
        Barycentric::new(0.0, 1.0, 0.0)
    } else {
        Barycentric::new(0.0, 0.0, 1.0)
    }
}

/// Finds the surface point of `root` whose UV equals `target`.
pub fn pick_by_uv(root: &SceneNode, target: Uv, options: &PickOptions) -> Option<UvHit> {
    let meshes = root.meshes();
    let requested = options.channel.unwrap_or(UvChannel::Primary);

    for mesh in &meshes {
        let Some(uvs) = resolve_channel(mesh, requested) else {
            continue;
        };
        if let Some(hit) = pick_on_mesh(mesh, uvs, target, options.world_normal) {
            debug!("UV pick hit '{}' at ({})", mesh.name, target);
            return Some(hit);
        }
    }

    if options.channel.is_none() {
        for mesh in &meshes {
            let Some(uvs) = mesh.uv2.as_deref() else {
                continue;
            };
            if let Some(hit) = pick_on_mesh(mesh, uvs, target, options.world_normal) {
                debug!("UV pick hit '{}' on uv2 at ({})", mesh.name, target);
                return Some(hit);
            }
        }
    }

    if !meshes.iter().any(|m| m.has_uv()) {
        warn!("UV pick: no mesh under '{}' carries texture coordinates", root.name);
        return None;
    }

    if options.nearest_fallback {
        return nearest_on_meshes(&meshes, target, requested, options.world_normal);
    }

    debug!("UV pick miss at ({})", target);
    None
}
