//! Screen-space handle box drawn over the 3D view around the active decal.

use crate::decal::DecalSize;
use crate::pose::Pose;
use crate::raycast::CameraRig;
use garmentkit_core::Corner;
use nalgebra::Vector3;

const MIN_BOX_PX: f64 = 60.0;
const HANDLE_MIN_PX: f64 = 10.0;
const HANDLE_MAX_PX: f64 = 22.0;

/// Rotated box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayBox {
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation_rad: f64,
    pub handle_px: f64,
}

impl OverlayBox {
    /// Projects the decal's half-extents to find the on-screen box.
    pub fn from_pose(camera: &CameraRig, pose: &Pose, size: DecalSize, rotation_rad: f64) -> Option<Self> {
        let (cx, cy) = camera.project(&pose.position)?;
        let q = pose.orientation_with_rotation(rotation_rad);
        let right = pose.position + (q * Vector3::x()) * (size.width * 0.5);
        let up = pose.position + (q * Vector3::y()) * (size.height * 0.5);
        let (rx, ry) = camera.project(&right)?;
        let (ux, uy) = camera.project(&up)?;

        let width = ((rx - cx).hypot(ry - cy) * 2.0).max(MIN_BOX_PX);
        let height = ((ux - cx).hypot(uy - cy) * 2.0).max(MIN_BOX_PX);
        Some(Self {
            center_x: cx,
            center_y: cy,
            width,
            height,
            rotation_rad,
            handle_px: (width.min(height) * 0.1).clamp(HANDLE_MIN_PX, HANDLE_MAX_PX),
        })
    }

    /// Pixel position of a corner handle.
    pub fn corner_position(&self, corner: Corner) -> (f64, f64) {
        let (ox, oy) = corner.outward();
        let lx = ox * self.width * 0.5;
        let ly = oy * self.height * 0.5;
        let (sin, cos) = self.rotation_rad.sin_cos();
        (
            self.center_x + lx * cos - ly * sin,
            self.center_y + lx * sin + ly * cos,
        )
    }

    /// Corner handle under the pointer, if any.
    pub fn handle_at(&self, px: f64, py: f64) -> Option<Corner> {
        let reach = self.handle_px;
        Corner::ALL.into_iter().find(|&corner| {
            let (hx, hy) = self.corner_position(corner);
            (px - hx).abs() <= reach && (py - hy).abs() <= reach
        })
    }
}
