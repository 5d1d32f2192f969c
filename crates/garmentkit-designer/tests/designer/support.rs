#![allow(dead_code)]

use garmentkit_core::{ProductSpec, Uv, ZoneKey};
use garmentkit_designer::{Artwork, ManagerOptions, ZoneEvent, ZoneManager, ZoneObserver};
use garmentkit_visualizer::{demo_garment, uv_panel, uv_quad, CameraRig, DecalBackend, DecalSize, Pose, SceneNode};
use image::{Rgba, RgbaImage};
use nalgebra::{Point3, UnitQuaternion, Vector3};
use std::cell::RefCell;
use std::rc::Rc;

/// Backend that records every call and hands out numbered handles.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    next: u32,
    pub built: Vec<(ZoneKey, u32)>,
    pub sizes: Vec<DecalSize>,
    pub disposed: Vec<u32>,
    pub textures: Vec<ZoneKey>,
    pub textures_disposed: Vec<ZoneKey>,
}

impl DecalBackend for RecordingBackend {
    type Handle = u32;

    fn build_decal(
        &mut self,
        zone: ZoneKey,
        _pose: &Pose,
        size: DecalSize,
        _orientation: UnitQuaternion<f64>,
    ) -> Option<u32> {
        self.next += 1;
        self.built.push((zone, self.next));
        self.sizes.push(size);
        Some(self.next)
    }

    fn dispose_decal(&mut self, handle: u32) {
        self.disposed.push(handle);
    }

    fn upload_texture(&mut self, zone: ZoneKey, _image: &Rc<RgbaImage>) {
        self.textures.push(zone);
    }

    fn dispose_texture(&mut self, zone: ZoneKey) {
        self.textures_disposed.push(zone);
    }
}

pub type Events = Rc<RefCell<Vec<(ZoneKey, ZoneEvent)>>>;

pub struct EventLog(pub Events);

impl ZoneObserver for EventLog {
    fn zone_changed(&mut self, zone: ZoneKey, event: ZoneEvent) {
        self.0.borrow_mut().push((zone, event));
    }
}

pub fn art(width: u32, height: u32) -> Artwork {
    Artwork::new(RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255])))
}

pub fn camera() -> CameraRig {
    CameraRig::default()
}

pub fn manager() -> ZoneManager<RecordingBackend> {
    ZoneManager::new(RecordingBackend::default(), ProductSpec::tshirt(), ManagerOptions::default())
}

pub fn loaded_manager() -> ZoneManager<RecordingBackend> {
    let mut m = manager();
    m.load_model(&demo_garment());
    m
}

/// Front zone made of a dense panel plus a small stray UV island to its
/// right, far outside the panel's UV range.
pub fn stray_island_scene() -> SceneNode {
    let main = uv_panel(
        "front-main",
        Point3::new(-0.3, -0.4, 0.15),
        Vector3::new(0.6, 0.0, 0.0),
        Vector3::new(0.0, 0.8, 0.0),
        Uv::new(0.1, 0.3),
        Uv::new(0.4, 0.9),
        20,
        20,
    );
    let stray = uv_quad(
        "front-stray",
        Point3::new(0.5, -0.1, 0.15),
        Vector3::new(0.2, 0.0, 0.0),
        Vector3::new(0.0, 0.2, 0.0),
        Uv::new(0.8, 0.5),
        Uv::new(0.9, 0.6),
    );
    SceneNode::group("Garment").with_child(
        SceneNode::group(ZoneKey::Front.mesh_name())
            .with_child(SceneNode::from_mesh(main))
            .with_child(SceneNode::from_mesh(stray)),
    )
}

/// Front zone mesh without any UVs.
pub fn uvless_scene() -> SceneNode {
    let mut mesh = uv_quad(
        ZoneKey::Front.mesh_name(),
        Point3::new(-0.3, -0.4, 0.15),
        Vector3::new(0.6, 0.0, 0.0),
        Vector3::new(0.0, 0.8, 0.0),
        Uv::new(0.0, 0.0),
        Uv::new(1.0, 1.0),
    );
    mesh.uv = None;
    SceneNode::group("Garment").with_child(SceneNode::from_mesh(mesh))
}
