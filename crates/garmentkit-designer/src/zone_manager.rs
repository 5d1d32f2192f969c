//! # Zone Manager
//!
//! Coordinates the 2D placement model, the 3D pose, and the decal backend
//! for every print zone of a loaded garment.
//!
//! Each zone has exactly one [`ZoneRecord`]. Every edit runs the same
//! ordered pipeline:
//!
//! 1. mutate the placement
//! 2. resync the pose (the previous pose survives a failed resync)
//! 3. schedule a decal rebuild for the next animation frame
//! 4. schedule a 2D redraw
//! 5. notify observers once
//!
//! Until [`ZoneManager::load_model`] has run, edits are no-ops or return
//! [`PlacementError::ModelNotLoaded`].

use crate::artwork::Artwork;
use crate::export::{write_export, ExportOptions, ExportReport, ExportRequest};
use crate::hud::render_hud;
use crate::placement::{DraftState, ZoneDraft};
use crate::safe_zone::{clamp_placement_to_safe, is_placement_inside_safe, SafeRect};
use crate::snap::Modifiers;
use crate::uv_canvas::{EditorAction, EditorZone};
use crate::zones::ZoneRegistry;
use garmentkit_core::constants::{
    UPLOAD_FIT_MARGIN, UV_WRAP_SPAN_THRESHOLD, WHEEL_SCALE_DOWN, WHEEL_SCALE_UP, WORLD_ZONE_WIDTH,
};
use garmentkit_core::{Corner, ExportError, Placement, PlacementError, ProductSpec, Uv, ZoneKey, ZoneRect, ZoneSpec};
use garmentkit_visualizer::{
    decal_size_for, pose_from_ray_hit, raycast, resync, CameraRig, DecalBackend, DecalSize, DecalSlot,
    FrameScheduler, OverlayBox, Pose, Ray, SceneNode,
};
use nalgebra::center;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Tunables that are fixed for the lifetime of a manager.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManagerOptions {
    /// Trimmed U-span above which a zone is treated as crossing the seam.
    pub wrap_threshold: f64,
    /// World width that a full-zone placement (`u_scale = 1`) maps to.
    pub world_zone_width: f64,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            wrap_threshold: UV_WRAP_SPAN_THRESHOLD,
            world_zone_width: WORLD_ZONE_WIDTH,
        }
    }
}

/// What changed, as reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneEvent {
    ModelLoaded,
    ActiveChanged,
    ImageChanged,
    PlacementChanged,
    Locked,
    Unlocked,
}

/// Receives one notification per state-changing manager call.
pub trait ZoneObserver {
    fn zone_changed(&mut self, zone: ZoneKey, event: ZoneEvent);
}

/// How an upload ended up positioned in 3D.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The fitted placement resolved on the zone mesh.
    PosedByUv,
    /// Resync failed; a camera ray towards the zone center placed it.
    AutoPlaced,
    /// No pose could be found; the user has to click the garment.
    NeedsClick,
}

/// Decals rebuilt by one animation frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    pub rebuilt: Vec<ZoneKey>,
    pub redraw: bool,
}

/// Canonical state of one print zone.
#[derive(Debug)]
pub struct ZoneRecord<H> {
    pub spec: ZoneSpec,
    pub rect: ZoneRect,
    pub safe: SafeRect,
    pub mesh: Option<SceneNode>,
    pub draft: ZoneDraft,
    pub pose: Option<Pose>,
    /// UV under the last 3D pick in this zone.
    pub last_hit: Option<Uv>,
    decal: DecalSlot<H>,
}

impl<H> ZoneRecord<H> {
    pub fn has_decal(&self) -> bool {
        self.decal.is_attached()
    }

    pub fn decal_size(&self) -> Option<DecalSize> {
        self.decal.size()
    }

    /// Resolves the pose for the current placement. Keeps the old pose and
    /// returns `false` when that fails.
    fn resync_pose(&mut self) -> bool {
        let (Some(mesh), Some(placement)) = (self.mesh.as_ref(), self.draft.placement.as_ref()) else {
            return false;
        };
        match resync(mesh, &self.rect, placement) {
            Some(pose) => {
                self.pose = Some(pose);
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ResizeGesture {
    corner: Corner,
    start: Placement,
}

/// Owns every zone record and drives the sync pipeline.
pub struct ZoneManager<B: DecalBackend> {
    backend: B,
    product: ProductSpec,
    options: ManagerOptions,
    zones: BTreeMap<ZoneKey, ZoneRecord<B::Handle>>,
    active: ZoneKey,
    dragging: bool,
    resize: Option<ResizeGesture>,
    scheduler: FrameScheduler,
    observers: Vec<Box<dyn ZoneObserver>>,
}

impl<B: DecalBackend> ZoneManager<B> {
    pub fn new(backend: B, product: ProductSpec, options: ManagerOptions) -> Self {
        let active = product.zones.first().map(|z| z.key).unwrap_or(ZoneKey::Front);
        Self {
            backend,
            product,
            options,
            zones: BTreeMap::new(),
            active,
            dragging: false,
            resize: None,
            scheduler: FrameScheduler::new(),
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn ZoneObserver>) {
        self.observers.push(observer);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn product(&self) -> &ProductSpec {
        &self.product
    }

    pub fn is_loaded(&self) -> bool {
        !self.zones.is_empty()
    }

    pub fn active(&self) -> ZoneKey {
        self.active
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn record(&self, zone: ZoneKey) -> Option<&ZoneRecord<B::Handle>> {
        self.zones.get(&zone)
    }

    pub fn active_record(&self) -> Option<&ZoneRecord<B::Handle>> {
        self.zones.get(&self.active)
    }

    pub fn state(&self, zone: ZoneKey) -> Option<DraftState> {
        self.zones.get(&zone).map(|r| r.draft.state())
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    fn notify(&mut self, zone: ZoneKey, event: ZoneEvent) {
        for observer in self.observers.iter_mut() {
            observer.zone_changed(zone, event);
        }
    }

    /// Active record that accepts edits.
    fn editable(&mut self) -> Result<Option<&mut ZoneRecord<B::Handle>>, PlacementError> {
        let zone = self.active;
        match self.zones.get_mut(&zone) {
            None => Ok(None),
            Some(r) if r.draft.locked => Err(PlacementError::ZoneLocked { zone: zone.to_string() }),
            Some(r) => Ok(Some(r)),
        }
    }

    /// Steps 2 to 5 of the pipeline for the active zone.
    fn sync_active(&mut self, event: ZoneEvent, resync_pose: bool) {
        let zone = self.active;
        let has_pose = match self.zones.get_mut(&zone) {
            Some(record) => {
                if resync_pose && !record.resync_pose() {
                    debug!("Resync for {} failed, keeping previous pose", zone);
                }
                record.pose.is_some()
            }
            None => false,
        };
        if has_pose {
            self.scheduler.request_rebuild(zone);
        }
        self.scheduler.request_redraw();
        self.notify(zone, event);
    }

    /// Builds the zone records from a garment scene.
    ///
    /// Replaces any previously loaded model and disposes its decals.
    pub fn load_model(&mut self, root: &SceneNode) {
        for (zone, mut record) in std::mem::take(&mut self.zones) {
            record.decal.clear(&mut self.backend);
            self.backend.dispose_texture(zone);
        }
        self.dragging = false;
        self.resize = None;

        let registry = ZoneRegistry::from_scene(root, &self.product, self.options.wrap_threshold);
        for (zone, entry) in registry.into_entries() {
            let safe = SafeRect::from_margins(entry.spec.size_cm, entry.spec.margins_cm);
            self.zones.insert(
                zone,
                ZoneRecord {
                    spec: entry.spec,
                    rect: entry.rect,
                    safe,
                    mesh: entry.mesh,
                    draft: ZoneDraft::new(),
                    pose: None,
                    last_hit: None,
                    decal: DecalSlot::default(),
                },
            );
        }

        if !self.zones.contains_key(&self.active) {
            if let Some(first) = self.zones.keys().next() {
                self.active = *first;
            }
        }
        info!("Model loaded with {} print zones, active {}", self.zones.len(), self.active);
        self.scheduler.request_redraw();
        self.notify(self.active, ZoneEvent::ModelLoaded);
    }

    /// Switches the zone being edited. Ignored while a drag is in progress.
    pub fn set_active(&mut self, zone: ZoneKey) -> Result<bool, PlacementError> {
        if !self.is_loaded() {
            return Ok(false);
        }
        if !self.zones.contains_key(&zone) {
            return Err(PlacementError::UnknownZone { zone: zone.to_string() });
        }
        if self.dragging || self.resize.is_some() {
            info!("Ignoring switch to {} while dragging", zone);
            return Ok(false);
        }
        if zone == self.active {
            return Ok(false);
        }
        self.active = zone;
        self.scheduler.request_redraw();
        self.notify(zone, ZoneEvent::ActiveChanged);
        Ok(true)
    }

    /// Decodes image bytes and uploads them to the active zone.
    pub fn upload_image_bytes(&mut self, bytes: &[u8], camera: &CameraRig) -> Result<UploadOutcome, PlacementError> {
        if !self.is_loaded() {
            return Err(PlacementError::ModelNotLoaded);
        }
        let artwork = Artwork::decode(bytes)?;
        self.upload_image(artwork, camera)
    }

    /// Sets the active zone's artwork, fitted and centered.
    ///
    /// A locked zone is unlocked and its committed decal removed. The pose
    /// comes from the fitted placement, or failing that from a camera ray
    /// aimed at the zone mesh's center.
    pub fn upload_image(&mut self, artwork: Artwork, camera: &CameraRig) -> Result<UploadOutcome, PlacementError> {
        let zone = self.active;
        let Some(record) = self.zones.get_mut(&zone) else {
            return Err(PlacementError::ModelNotLoaded);
        };

        record.draft.locked = false;
        record.decal.clear(&mut self.backend);
        self.scheduler.cancel_rebuild(zone);
        self.backend.dispose_texture(zone);
        self.backend.upload_texture(zone, &artwork.image);
        info!("Uploaded {}x{} artwork to {}", artwork.width(), artwork.height(), zone);

        record.draft.set_image(artwork);
        record.draft.center_and_fit(UPLOAD_FIT_MARGIN);

        let outcome = if record.resync_pose() {
            UploadOutcome::PosedByUv
        } else if auto_place(record, camera) {
            UploadOutcome::AutoPlaced
        } else {
            warn!("No pose for {} after upload; waiting for a click", zone);
            record.pose = None;
            UploadOutcome::NeedsClick
        };

        if record.pose.is_some() {
            self.scheduler.request_rebuild(zone);
        }
        self.scheduler.request_redraw();
        self.notify(zone, ZoneEvent::ImageChanged);
        Ok(outcome)
    }

    /// Places the artwork where a 3D pointer ray hits the active zone mesh
    /// and starts a drag.
    ///
    /// A miss is `Ok(false)`. A hit outside the zone rectangle is rejected.
    pub fn place_from_ray(&mut self, ray: &Ray) -> Result<bool, PlacementError> {
        let zone = self.active;
        if self.resize.is_some() {
            return Ok(false);
        }
        let Some(record) = self.editable()? else {
            return Ok(false);
        };
        let Some((uv, pose)) = hit_zone(record, ray) else {
            return Ok(false);
        };
        if !record.rect.contains(uv, 0.0) {
            return Err(PlacementError::OutsideZone { zone: zone.to_string() });
        }
        if !record.draft.has_image() {
            return Err(PlacementError::NoImage);
        }

        record.draft.place_at_uv(uv, &record.rect);
        record.last_hit = Some(uv);
        record.pose = Some(pose);
        self.dragging = true;
        self.sync_active(ZoneEvent::PlacementChanged, false);
        Ok(true)
    }

    /// Follows a 3D drag started by [`Self::place_from_ray`]. Misses and
    /// hits outside the zone are ignored.
    pub fn drag_from_ray(&mut self, ray: &Ray) -> bool {
        if !self.dragging || self.resize.is_some() {
            return false;
        }
        let Ok(Some(record)) = self.editable() else {
            return false;
        };
        let Some((uv, pose)) = hit_zone(record, ray) else {
            return false;
        };
        if !record.rect.contains(uv, 0.0) {
            return false;
        }
        let moved = record.draft.place_at_uv(uv, &record.rect);
        record.last_hit = Some(uv);
        record.pose = Some(pose);
        self.sync_active(ZoneEvent::PlacementChanged, false);
        moved
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    pub fn scale_by(&mut self, factor: f64) -> Result<bool, PlacementError> {
        let Some(record) = self.editable()? else {
            return Ok(false);
        };
        if !record.draft.scale_by(factor) {
            return Ok(false);
        }
        self.sync_active(ZoneEvent::PlacementChanged, true);
        Ok(true)
    }

    /// Wheel over the 3D view: scroll down shrinks, scroll up grows.
    pub fn wheel_scale(&mut self, delta_y: f64) -> Result<bool, PlacementError> {
        if delta_y == 0.0 {
            return Ok(false);
        }
        self.scale_by(if delta_y > 0.0 { WHEEL_SCALE_DOWN } else { WHEEL_SCALE_UP })
    }

    pub fn rotate_by_deg(&mut self, deg: f64) -> Result<bool, PlacementError> {
        let Some(record) = self.editable()? else {
            return Ok(false);
        };
        if !record.draft.rotate_by_deg(deg) {
            return Ok(false);
        }
        self.sync_active(ZoneEvent::PlacementChanged, true);
        Ok(true)
    }

    /// Sets the printed width of the active artwork in centimetres.
    pub fn apply_width_cm(&mut self, width_cm: f64) -> Result<bool, PlacementError> {
        let Some(record) = self.editable()? else {
            return Err(PlacementError::ModelNotLoaded);
        };
        let size_cm = record.spec.size_cm;
        if !record.draft.apply_width_cm(width_cm, size_cm)? {
            return Ok(false);
        }
        self.sync_active(ZoneEvent::PlacementChanged, true);
        Ok(true)
    }

    /// Pulls the active artwork back inside its safe area, shrinking it
    /// first when it is larger than the safe rectangle.
    pub fn clamp_to_safe(&mut self) -> Result<bool, PlacementError> {
        let Some(record) = self.editable()? else {
            return Ok(false);
        };
        let Some(placement) = record.draft.placement else {
            return Ok(false);
        };
        let clamped = clamp_placement_to_safe(placement, &record.safe);
        if !record.draft.set_placement(clamped) {
            return Ok(false);
        }
        debug!("Clamped {} into its safe area", record.rect.name);
        self.sync_active(ZoneEvent::PlacementChanged, true);
        Ok(true)
    }

    /// Whether the active artwork sits inside its safe area. `None` without
    /// a placement.
    pub fn is_inside_safe(&self) -> Option<bool> {
        let record = self.active_record()?;
        let placement = record.draft.placement.as_ref()?;
        Some(is_placement_inside_safe(placement, &record.safe))
    }

    /// Starts a corner-handle resize of the active artwork.
    pub fn begin_resize(&mut self, corner: Corner) -> Result<bool, PlacementError> {
        let Some(record) = self.editable()? else {
            return Ok(false);
        };
        let (Some(start), true) = (record.draft.placement, record.pose.is_some()) else {
            return Ok(false);
        };
        self.resize = Some(ResizeGesture { corner, start });
        Ok(true)
    }

    /// Applies the pointer delta since [`Self::begin_resize`].
    pub fn resize_corner(&mut self, dx: f64, dy: f64, modifiers: Modifiers) -> Result<bool, PlacementError> {
        let Some(gesture) = self.resize else {
            return Ok(false);
        };
        let Some(record) = self.editable()? else {
            return Ok(false);
        };
        if !record
            .draft
            .resize_from_corner(&gesture.start, gesture.corner, dx, dy, modifiers)
        {
            return Ok(false);
        }
        self.sync_active(ZoneEvent::PlacementChanged, true);
        Ok(true)
    }

    pub fn end_resize(&mut self) {
        self.resize = None;
    }

    /// Runs an action produced by the 2D editor.
    pub fn apply_editor_action(&mut self, action: EditorAction) -> Result<bool, PlacementError> {
        match action {
            EditorAction::None => Ok(false),
            EditorAction::ViewChanged => {
                self.scheduler.request_redraw();
                Ok(false)
            }
            EditorAction::BeginDrag => {
                if self.editable()?.is_none() {
                    return Ok(false);
                }
                self.dragging = true;
                Ok(false)
            }
            EditorAction::EndDrag => {
                self.dragging = false;
                Ok(false)
            }
            EditorAction::RotateBy(deg) => self.rotate_by_deg(deg),
            EditorAction::Place(placement) | EditorAction::Move(placement) => {
                let Some(record) = self.editable()? else {
                    return Ok(false);
                };
                if !record.draft.has_image() {
                    return Err(PlacementError::NoImage);
                }
                if !record.draft.set_placement(placement) {
                    return Ok(false);
                }
                self.sync_active(ZoneEvent::PlacementChanged, true);
                Ok(true)
            }
        }
    }

    /// Commits the active zone and locks it against edits.
    ///
    /// Requires an image, a placement, and a pose that resolves now.
    pub fn submit(&mut self) -> Result<(), PlacementError> {
        let zone = self.active;
        let Some(record) = self.zones.get_mut(&zone) else {
            return Err(PlacementError::ModelNotLoaded);
        };
        if record.draft.locked {
            return Ok(());
        }
        if !record.draft.has_image() {
            return Err(PlacementError::NoImage);
        }
        if !record.draft.has_placement() {
            return Err(PlacementError::NoPlacement);
        }
        if !record.resync_pose() {
            return Err(PlacementError::PoseUnresolved { zone: zone.to_string() });
        }

        record.draft.locked = true;
        self.dragging = false;
        self.resize = None;
        self.scheduler.request_rebuild(zone);
        self.scheduler.request_redraw();
        info!("Submitted {}", zone);
        self.notify(zone, ZoneEvent::Locked);
        Ok(())
    }

    /// Returns the active zone to editing.
    pub fn unlock(&mut self) -> bool {
        let zone = self.active;
        let Some(record) = self.zones.get_mut(&zone) else {
            return false;
        };
        if !record.draft.locked {
            return false;
        }
        record.draft.locked = false;
        self.scheduler.request_redraw();
        self.notify(zone, ZoneEvent::Unlocked);
        true
    }

    /// Rebuilds every decal requested since the last frame, once each, from
    /// the pose current at this moment.
    pub fn on_animation_frame(&mut self) -> FrameOutcome {
        let (zones, redraw) = self.scheduler.begin_frame();
        let mut rebuilt = Vec::new();
        for zone in zones {
            let Some(record) = self.zones.get_mut(&zone) else {
                continue;
            };
            let (Some(pose), Some(placement), Some(aspect)) =
                (record.pose.as_ref(), record.draft.placement, record.draft.aspect())
            else {
                continue;
            };
            let size = decal_size_for(placement.u_scale, aspect, self.options.world_zone_width);
            if record
                .decal
                .rebuild(&mut self.backend, zone, pose, size, placement.rotation_rad)
            {
                rebuilt.push(zone);
            }
        }
        if !rebuilt.is_empty() {
            debug!("Frame {} rebuilt {:?}", self.scheduler.frame_count(), rebuilt);
        }
        FrameOutcome { rebuilt, redraw }
    }

    /// Writes the print template and job for `zone` into `dir`.
    pub fn export_zone(&self, zone: ZoneKey, dir: &Path, options: &ExportOptions) -> garmentkit_core::Result<ExportReport> {
        if !self.is_loaded() {
            return Err(PlacementError::ModelNotLoaded.into());
        }
        let record = self
            .zones
            .get(&zone)
            .ok_or_else(|| PlacementError::UnknownZone { zone: zone.to_string() })?;
        let (Some(artwork), Some(placement)) = (record.draft.artwork.as_ref(), record.draft.placement.as_ref()) else {
            return Err(ExportError::NothingToExport { zone: zone.to_string() }.into());
        };
        let request = ExportRequest {
            zone,
            rect: &record.rect,
            zone_cm: record.spec.size_cm,
            safe: &record.safe,
            artwork,
            placement,
        };
        write_export(dir, request, options)
    }

    /// Binding for the 2D editor of the active zone.
    pub fn editor_zone(&self) -> Option<EditorZone> {
        let record = self.active_record()?;
        Some(EditorZone {
            key: self.active,
            rect: record.rect.clone(),
            size_cm: record.spec.size_cm,
            safe: record.safe,
        })
    }

    /// Every zone rectangle, for the editor's background outlines.
    pub fn zone_outlines(&self) -> Vec<(ZoneKey, ZoneRect)> {
        self.zones.iter().map(|(k, r)| (*k, r.rect.clone())).collect()
    }

    /// Handle box around the active decal, in screen pixels.
    pub fn overlay_box(&self, camera: &CameraRig) -> Option<OverlayBox> {
        let record = self.active_record()?;
        let pose = record.pose.as_ref()?;
        let placement = record.draft.placement?;
        let size = decal_size_for(placement.u_scale, record.draft.aspect()?, self.options.world_zone_width);
        OverlayBox::from_pose(camera, pose, size, placement.rotation_rad)
    }

    /// HUD text for the active zone.
    pub fn hud(&self) -> String {
        match self.active_record() {
            Some(r) => render_hud(
                r.last_hit,
                r.draft.placement.as_ref(),
                &r.rect,
                r.spec.size_cm,
                &r.safe,
                r.draft.locked,
            ),
            None => "Loading.".to_string(),
        }
    }
}

/// Ray hit on a record's zone mesh with its UV and surface pose.
fn hit_zone<H>(record: &ZoneRecord<H>, ray: &Ray) -> Option<(Uv, Pose)> {
    let hit = raycast(record.mesh.as_ref()?, ray)?;
    let uv = hit.uv?;
    Some((uv, pose_from_ray_hit(&hit)))
}

/// Casts a ray from the camera towards the center of the zone mesh and
/// places the artwork at the hit.
fn auto_place<H>(record: &mut ZoneRecord<H>, camera: &CameraRig) -> bool {
    let Some(mesh) = record.mesh.as_ref() else {
        return false;
    };
    let Some((lo, hi)) = mesh.world_bounds() else {
        return false;
    };
    let ray = Ray::between(camera.eye(), center(&lo, &hi));
    let Some((uv, pose)) = hit_zone(record, &ray) else {
        return false;
    };
    record.draft.place_at_uv(uv, &record.rect);
    record.last_hit = Some(uv);
    record.pose = Some(pose);
    debug!("Auto-placed on {} at UV ({})", record.rect.name, uv);
    true
}
