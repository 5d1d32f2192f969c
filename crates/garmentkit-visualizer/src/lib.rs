//! # GarmentKit Visualizer
//!
//! The 3D side of the customizer: garment mesh scene, UV-space geometry
//! picking, ray picking, decal pose synchronization and the decal backend
//! seam implemented by the host renderer.

pub mod decal;
pub mod frame;
pub mod mesh;
pub mod overlay;
pub mod pose;
pub mod primitives;
pub mod raycast;
pub mod uv_pick;

pub use decal::{decal_size_for, DecalBackend, DecalSize, DecalSlot};
pub use frame::FrameScheduler;
pub use mesh::{Mesh, SceneNode, UvChannel};
pub use overlay::OverlayBox;
pub use pose::{
    abs_to_rel_uv, final_orientation, look_at_orientation, pose_from_ray_hit, pose_from_uv_hit,
    rel_to_abs_uv, resync, Pose,
};
pub use primitives::{demo_garment, demo_zone_uv, uv_panel, uv_quad};
pub use raycast::{raycast, ray_triangle_intersection, CameraRig, Ray, RayHit};
pub use uv_pick::{barycentric_uv, nearest_on_meshes, pick_by_uv, pick_on_mesh, Barycentric, PickOptions, UvHit};
