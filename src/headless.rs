//! Decal backend for running the pipeline without a renderer.

use garmentkit_core::ZoneKey;
use garmentkit_visualizer::{DecalBackend, DecalSize, Pose};
use image::RgbaImage;
use nalgebra::{Point3, UnitQuaternion};
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::debug;

/// A decal the headless backend is holding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadlessDecal {
    pub zone: ZoneKey,
    pub position: Point3<f64>,
    pub size: DecalSize,
}

/// Keeps decal and texture bookkeeping in memory.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next: u64,
    decals: BTreeMap<u64, HeadlessDecal>,
    textures: BTreeMap<ZoneKey, (u32, u32)>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decals currently attached, oldest first.
    pub fn live_decals(&self) -> impl Iterator<Item = &HeadlessDecal> {
        self.decals.values()
    }

    pub fn texture_size(&self, zone: ZoneKey) -> Option<(u32, u32)> {
        self.textures.get(&zone).copied()
    }
}

impl DecalBackend for HeadlessBackend {
    type Handle = u64;

    fn build_decal(
        &mut self,
        zone: ZoneKey,
        pose: &Pose,
        size: DecalSize,
        _orientation: UnitQuaternion<f64>,
    ) -> Option<u64> {
        self.next += 1;
        debug!(
            "Decal #{} for {} at ({:.3}, {:.3}, {:.3}) size {:.3}x{:.3}",
            self.next, zone, pose.position.x, pose.position.y, pose.position.z, size.width, size.height
        );
        self.decals.insert(
            self.next,
            HeadlessDecal {
                zone,
                position: pose.position,
                size,
            },
        );
        Some(self.next)
    }

    fn dispose_decal(&mut self, handle: u64) {
        self.decals.remove(&handle);
    }

    fn upload_texture(&mut self, zone: ZoneKey, image: &Rc<RgbaImage>) {
        self.textures.insert(zone, image.dimensions());
    }

    fn dispose_texture(&mut self, zone: ZoneKey) {
        self.textures.remove(&zone);
    }
}
