//! Decal sizing and the renderer-facing decal backend.

use crate::pose::Pose;
use garmentkit_core::constants::{DECAL_DEPTH, DECAL_MAX_SIZE, DECAL_MIN_SIZE};
use garmentkit_core::ZoneKey;
use image::RgbaImage;
use nalgebra::UnitQuaternion;
use std::rc::Rc;
use tracing::debug;

/// World-space extent of a projected decal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecalSize {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// Decal extent for a placement scale.
///
/// `aspect` is image height over width. Both sides are clamped to the
/// supported decal range.
pub fn decal_size_for(u_scale: f64, aspect: f64, world_zone_width: f64) -> DecalSize {
    let width = (u_scale * world_zone_width).clamp(DECAL_MIN_SIZE, DECAL_MAX_SIZE);
    let height = (width * aspect).clamp(DECAL_MIN_SIZE, DECAL_MAX_SIZE);
    DecalSize {
        width,
        height,
        depth: DECAL_DEPTH,
    }
}

/// Host renderer operations needed to show decals.
pub trait DecalBackend {
    type Handle;

    /// Projects a decal mesh at `pose`. `None` when the renderer cannot
    /// build one (e.g. the anchor mesh was dropped).
    fn build_decal(
        &mut self,
        zone: ZoneKey,
        pose: &Pose,
        size: DecalSize,
        orientation: UnitQuaternion<f64>,
    ) -> Option<Self::Handle>;

    fn dispose_decal(&mut self, handle: Self::Handle);

    fn upload_texture(&mut self, zone: ZoneKey, image: &Rc<RgbaImage>);

    fn dispose_texture(&mut self, zone: ZoneKey);
}

/// The one decal mesh a zone may have attached.
#[derive(Debug)]
pub struct DecalSlot<H> {
    handle: Option<H>,
    size: Option<DecalSize>,
}

impl<H> Default for DecalSlot<H> {
    fn default() -> Self {
        Self {
            handle: None,
            size: None,
        }
    }
}

impl<H> DecalSlot<H> {
    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    pub fn size(&self) -> Option<DecalSize> {
        self.size
    }

    /// Builds a new decal, then disposes the old one before attaching.
    ///
    /// When the backend fails to build, the previous decal stays attached.
    pub fn rebuild<B>(&mut self, backend: &mut B, zone: ZoneKey, pose: &Pose, size: DecalSize, rotation_rad: f64) -> bool
    where
        B: DecalBackend<Handle = H>,
    {
        let orientation = pose.orientation_with_rotation(rotation_rad);
        let Some(handle) = backend.build_decal(zone, pose, size, orientation) else {
            debug!("Decal build for {} returned nothing", zone);
            return false;
        };
        if let Some(old) = self.handle.take() {
            backend.dispose_decal(old);
        }
        self.handle = Some(handle);
        self.size = Some(size);
        true
    }

    /// Disposes the attached decal, if any.
    pub fn clear<B>(&mut self, backend: &mut B)
    where
        B: DecalBackend<Handle = H>,
    {
        if let Some(old) = self.handle.take() {
            backend.dispose_decal(old);
        }
        self.size = None;
    }
}
