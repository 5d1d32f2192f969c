//! # Garment Mesh Module
//!
//! Indexed triangle meshes with one or two UV channels, arranged in a named
//! scene tree. Geometry is stored in local space; each mesh carries its own
//! world matrix.

use garmentkit_core::Uv;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};
use std::rc::Rc;

/// Texture coordinate set of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UvChannel {
    Primary,
    Secondary,
}

/// A triangle mesh with optional UV channels.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub positions: Vec<Point3<f64>>,
    pub uv: Option<Vec<Uv>>,
    pub uv2: Option<Vec<Uv>>,
    /// Triangle list. `None` means consecutive vertex triples.
    pub indices: Option<Vec<u32>>,
    pub world: Matrix4<f64>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, positions: Vec<Point3<f64>>) -> Self {
        Self {
            name: name.into(),
            positions,
            uv: None,
            uv2: None,
            indices: None,
            world: Matrix4::identity(),
        }
    }

    pub fn with_uv(mut self, uv: Vec<Uv>) -> Self {
        self.uv = Some(uv);
        self
    }

    pub fn with_uv2(mut self, uv2: Vec<Uv>) -> Self {
        self.uv2 = Some(uv2);
        self
    }

    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = Some(indices);
        self
    }

    pub fn with_world(mut self, world: Matrix4<f64>) -> Self {
        self.world = world;
        self
    }

    pub fn channel(&self, channel: UvChannel) -> Option<&[Uv]> {
        match channel {
            UvChannel::Primary => self.uv.as_deref(),
            UvChannel::Secondary => self.uv2.as_deref(),
        }
    }

    pub fn has_uv(&self) -> bool {
        self.uv.is_some() || self.uv2.is_some()
    }

    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    /// Vertex indices of triangle `i`, or `None` if any index is out of range.
    pub fn triangle(&self, i: usize) -> Option<[usize; 3]> {
        let tri = match &self.indices {
            Some(indices) => {
                let base = i * 3;
                let slice = indices.get(base..base + 3)?;
                [slice[0] as usize, slice[1] as usize, slice[2] as usize]
            }
            None => [i * 3, i * 3 + 1, i * 3 + 2],
        };
        if tri.iter().all(|&idx| idx < self.positions.len()) {
            Some(tri)
        } else {
            None
        }
    }

    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        (0..self.triangle_count()).filter_map(move |i| self.triangle(i))
    }

    pub fn to_world(&self, local: &Point3<f64>) -> Point3<f64> {
        self.world.transform_point(local)
    }

    /// Transforms a direction by the linear part of the world matrix and
    /// renormalizes it.
    pub fn direction_to_world(&self, dir: &Vector3<f64>) -> Vector3<f64> {
        let linear: Matrix3<f64> = self.world.fixed_view::<3, 3>(0, 0).into_owned();
        (linear * dir).try_normalize(1e-12).unwrap_or(*dir)
    }

    /// Inverse transpose of the linear part, for transforming normals.
    pub fn normal_matrix(&self) -> Matrix3<f64> {
        let linear: Matrix3<f64> = self.world.fixed_view::<3, 3>(0, 0).into_owned();
        linear
            .try_inverse()
            .map(|inv| inv.transpose())
            .unwrap_or_else(Matrix3::identity)
    }

    pub fn normal_to_world(&self, normal: &Vector3<f64>) -> Vector3<f64> {
        (self.normal_matrix() * normal)
            .try_normalize(1e-12)
            .unwrap_or(*normal)
    }

    /// World-space bounding box.
    pub fn world_bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut iter = self.positions.iter().map(|p| self.to_world(p));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| {
            (
                Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            )
        }))
    }
}

/// A node of the garment scene tree.
#[derive(Debug, Clone, Default)]
pub struct SceneNode {
    pub name: String,
    pub mesh: Option<Rc<Mesh>>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mesh: None,
            children: Vec::new(),
        }
    }

    pub fn from_mesh(mesh: Mesh) -> Self {
        Self {
            name: mesh.name.clone(),
            mesh: Some(Rc::new(mesh)),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    /// All meshes in depth-first pre-order.
    pub fn meshes(&self) -> Vec<&Rc<Mesh>> {
        let mut out = Vec::new();
        self.collect_meshes(&mut out);
        out
    }

    fn collect_meshes<'a>(&'a self, out: &mut Vec<&'a Rc<Mesh>>) {
        if let Some(mesh) = &self.mesh {
            out.push(mesh);
        }
        for child in &self.children {
            child.collect_meshes(out);
        }
    }

    /// First node with the given name, depth-first.
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    pub fn world_bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        self.meshes()
            .into_iter()
            .filter_map(|m| m.world_bounds())
            .reduce(|(amin, amax), (bmin, bmax)| {
                (
                    Point3::new(amin.x.min(bmin.x), amin.y.min(bmin.y), amin.z.min(bmin.z)),
                    Point3::new(amax.x.max(bmax.x), amax.y.max(bmax.y), amax.z.max(bmax.z)),
                )
            })
    }
}
