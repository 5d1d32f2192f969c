//! UV editor canvas.
//! Renders the print zones and the active artwork in texture space using
//! tiny-skia, and turns pointer/keyboard input into [`EditorAction`]s for
//! the zone manager.
//!
//! Features:
//! - Zone outlines with the active zone highlighted
//! - Safe-area tint and outline, turning to a warning outline when the
//!   artwork leaves the safe area
//! - Artwork drawn with its center, scale and rotation, clipped to the zone
//! - Drag, click-to-place, pan and zoom-to-cursor

use crate::artwork::Artwork;
use crate::safe_zone::{clamp_between, is_placement_inside_safe, SafeRect};
use crate::snap::{apply_snap, Modifiers, SnapOptions};
use crate::viewport::Viewport;
use garmentkit_core::constants::ROTATE_STEP_DEG;
use garmentkit_core::{Placement, ZoneKey, ZoneRect, ZoneSizeCm};
use image::RgbaImage;
use std::rc::Rc;
use tiny_skia::{
    Color, FillRule, FilterQuality, IntSize, Mask, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};
use tracing::{debug, trace};

const WHEEL_ZOOM_OUT: f64 = 0.9;
const WHEEL_ZOOM_IN: f64 = 1.1;

/// Colors and line widths used by [`UvEditor::render`].
#[derive(Debug, Clone, Copy)]
pub struct EditorStyle {
    pub background: Color,
    pub zone_fill: Color,
    pub zone_stroke: Color,
    pub active_stroke: Color,
    pub safe_tint: Color,
    pub safe_stroke: Color,
    /// Safe outline while the artwork is outside it.
    pub safe_warning: Color,
    pub stroke_width: f32,
}

impl Default for EditorStyle {
    fn default() -> Self {
        Self {
            background: Color::from_rgba8(52, 73, 94, 255),
            zone_fill: Color::from_rgba8(255, 255, 255, 24),
            zone_stroke: Color::from_rgba8(149, 165, 166, 255),
            active_stroke: Color::from_rgba8(52, 152, 219, 255),
            safe_tint: Color::from_rgba8(231, 76, 60, 48),
            safe_stroke: Color::from_rgba8(46, 204, 113, 255),
            safe_warning: Color::from_rgba8(231, 76, 60, 255),
            stroke_width: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// What a pointer or key event asks the zone manager to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorAction {
    None,
    /// Click on an empty zone: create this placement.
    Place(Placement),
    BeginDrag,
    /// Drag update with the new (clamped, snapped) placement.
    Move(Placement),
    EndDrag,
    RotateBy(f64),
    /// Pan or zoom changed; only a redraw is needed.
    ViewChanged,
}

/// The zone the editor is currently bound to.
#[derive(Debug, Clone)]
pub struct EditorZone {
    pub key: ZoneKey,
    pub rect: ZoneRect,
    pub size_cm: ZoneSizeCm,
    pub safe: SafeRect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Drag { grab_u: f64, grab_v: f64 },
    Pan { last_x: f64, last_y: f64 },
}

/// 2D placement editor over the garment's UV layout.
#[derive(Debug)]
pub struct UvEditor {
    viewport: Viewport,
    pub style: EditorStyle,
    pub snap: SnapOptions,
    zones: Vec<(ZoneKey, ZoneRect)>,
    active: Option<EditorZone>,
    backdrop: Option<Pixmap>,
    artwork_cache: Option<(Rc<RgbaImage>, Pixmap)>,
    gesture: Gesture,
}

impl UvEditor {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            style: EditorStyle::default(),
            snap: SnapOptions::default(),
            zones: Vec::new(),
            active: None,
            backdrop: None,
            artwork_cache: None,
            gesture: Gesture::Idle,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.set_canvas_size(width, height);
        if let Some(zone) = &self.active {
            self.viewport.fit_to_zone(&zone.rect);
        }
    }

    /// Every zone outline drawn behind the active one.
    pub fn set_zones(&mut self, zones: Vec<(ZoneKey, ZoneRect)>) {
        self.zones = zones;
    }

    /// Binds the editor to a zone and fits the view to it.
    pub fn set_active_zone(&mut self, zone: EditorZone) {
        self.viewport.fit_to_zone(&zone.rect);
        debug!("Editor bound to {} ({})", zone.key, self.viewport);
        self.active = Some(zone);
        self.gesture = Gesture::Idle;
    }

    pub fn active_zone(&self) -> Option<&EditorZone> {
        self.active.as_ref()
    }

    /// Texture template shown under the zones, stretched over the unit square.
    pub fn set_backdrop(&mut self, image: Option<&RgbaImage>) {
        self.backdrop = image.and_then(pixmap_from_image);
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Drag { .. })
    }

    /// Zone-relative coordinates (top-left origin) under a pixel.
    pub fn pixel_to_placement(&self, px: f64, py: f64) -> Option<(f64, f64)> {
        let zone = self.active.as_ref()?;
        let uv = self.viewport.pixel_to_uv(px, py);
        let rect = &zone.rect;
        let u = (uv.u - rect.u_min) / rect.u_span().max(1e-6);
        let v = (rect.v_max - uv.v) / rect.v_span().max(1e-6);
        Some((u, v))
    }

    /// On-screen center, size and rotation of a placement's artwork box.
    fn artwork_box(&self, p: &Placement) -> Option<(f64, f64, f64, f64)> {
        let zone = self.active.as_ref()?;
        let rect = &zone.rect;
        let u = rect.u_min + p.u * rect.u_span();
        let v = rect.v_max - p.v * rect.v_span();
        let (cx, cy) = self.viewport.uv_to_pixel(u, v);
        let zoom = self.viewport.zoom();
        Some((cx, cy, p.u_scale * rect.u_span() * zoom, p.v_scale * rect.v_span() * zoom))
    }

    /// Whether the pixel lies inside the artwork's rotated box.
    pub fn hit_test_artwork(&self, px: f64, py: f64, placement: &Placement) -> bool {
        let Some((cx, cy, w, h)) = self.artwork_box(placement) else {
            return false;
        };
        let (sin, cos) = placement.rotation_rad.sin_cos();
        let dx = px - cx;
        let dy = py - cy;
        let local_x = dx * cos + dy * sin;
        let local_y = -dx * sin + dy * cos;
        local_x.abs() <= w * 0.5 && local_y.abs() <= h * 0.5
    }

    pub fn pointer_down(
        &mut self,
        px: f64,
        py: f64,
        button: PointerButton,
        modifiers: Modifiers,
        placement: Option<&Placement>,
    ) -> EditorAction {
        let Some(size_cm) = self.active.as_ref().map(|z| z.size_cm) else {
            return EditorAction::None;
        };

        if modifiers.space || button != PointerButton::Primary {
            self.gesture = Gesture::Pan { last_x: px, last_y: py };
            return EditorAction::None;
        }

        let Some((u, v)) = self.pixel_to_placement(px, py) else {
            return EditorAction::None;
        };

        match placement {
            None => {
                let placed = Placement::at(u.clamp(0.0, 1.0), v.clamp(0.0, 1.0));
                EditorAction::Place(apply_snap(placed, &self.snap, size_cm, modifiers))
            }
            Some(p) if self.hit_test_artwork(px, py, p) => {
                self.gesture = Gesture::Drag {
                    grab_u: u - p.u,
                    grab_v: v - p.v,
                };
                trace!("Drag started with grab offset ({:.4}, {:.4})", u - p.u, v - p.v);
                EditorAction::BeginDrag
            }
            Some(_) => {
                trace!("Press at ({:.1}, {:.1}) missed the artwork", px, py);
                EditorAction::None
            }
        }
    }

    pub fn pointer_move(&mut self, px: f64, py: f64, modifiers: Modifiers, placement: Option<&Placement>) -> EditorAction {
        match self.gesture {
            Gesture::Idle => EditorAction::None,
            Gesture::Pan { last_x, last_y } => {
                self.viewport.pan_by_pixels(px - last_x, py - last_y);
                self.gesture = Gesture::Pan { last_x: px, last_y: py };
                EditorAction::ViewChanged
            }
            Gesture::Drag { grab_u, grab_v } => {
                let (Some(p), Some((u, v)), Some(zone)) =
                    (placement, self.pixel_to_placement(px, py), self.active.as_ref())
                else {
                    return EditorAction::None;
                };
                let half_w = p.u_scale * 0.5;
                let half_h = p.v_scale * 0.5;
                let mut moved = *p;
                moved.u = clamp_between(u - grab_u, half_w, 1.0 - half_w);
                moved.v = clamp_between(v - grab_v, half_h, 1.0 - half_h);
                EditorAction::Move(apply_snap(moved, &self.snap, zone.size_cm, modifiers))
            }
        }
    }

    pub fn pointer_up(&mut self) -> EditorAction {
        let was = std::mem::replace(&mut self.gesture, Gesture::Idle);
        match was {
            Gesture::Drag { .. } => EditorAction::EndDrag,
            _ => EditorAction::None,
        }
    }

    /// Zooms towards the cursor. Positive `delta_y` (scroll down) zooms out.
    pub fn wheel(&mut self, px: f64, py: f64, delta_y: f64) -> EditorAction {
        if delta_y == 0.0 {
            return EditorAction::None;
        }
        let factor = if delta_y > 0.0 { WHEEL_ZOOM_OUT } else { WHEEL_ZOOM_IN };
        self.viewport.zoom_at_pixel(px, py, factor);
        EditorAction::ViewChanged
    }

    /// `E` rotates counter-clockwise, `R` clockwise.
    pub fn key(&mut self, key: char) -> EditorAction {
        match key.to_ascii_lowercase() {
            'e' => EditorAction::RotateBy(-ROTATE_STEP_DEG),
            'r' => EditorAction::RotateBy(ROTATE_STEP_DEG),
            _ => EditorAction::None,
        }
    }

    /// Draws the editor. `None` when the canvas has no area.
    pub fn render(&mut self, placement: Option<&Placement>, artwork: Option<&Artwork>) -> Option<Pixmap> {
        let width = self.viewport.canvas_width().round() as u32;
        let height = self.viewport.canvas_height().round() as u32;
        let mut pixmap = Pixmap::new(width, height)?;
        pixmap.fill(self.style.background);

        if let Some(backdrop) = &self.backdrop {
            let (left, top) = self.viewport.uv_to_pixel(0.0, 1.0);
            let zoom = self.viewport.zoom();
            let transform = Transform::from_translate(left as f32, top as f32).pre_scale(
                (zoom / backdrop.width() as f64) as f32,
                (zoom / backdrop.height() as f64) as f32,
            );
            pixmap.draw_pixmap(0, 0, backdrop.as_ref(), &bilinear(), transform, None);
        }

        let active_key = self.active.as_ref().map(|z| z.key);
        for (key, rect) in &self.zones {
            if Some(*key) != active_key {
                self.draw_zone(&mut pixmap, rect, false);
            }
        }

        let Some(zone) = self.active.clone() else {
            return Some(pixmap);
        };
        self.draw_zone(&mut pixmap, &zone.rect, true);
        let outside = placement.is_some_and(|p| !is_placement_inside_safe(p, &zone.safe));
        self.draw_safe_area(&mut pixmap, &zone, outside);

        if let (Some(p), Some(art)) = (placement, artwork) {
            self.draw_artwork(&mut pixmap, &zone, p, art);
        }
        Some(pixmap)
    }

    /// Zone rectangle in pixels, unwrapped across the seam.
    fn zone_pixel_rect(&self, rect: &ZoneRect, u0: f64, u1: f64, v0: f64, v1: f64) -> Option<Rect> {
        let (left, top) = self.viewport.uv_to_pixel(rect.u_min + u0 * rect.u_span(), rect.v_max - v0 * rect.v_span());
        let (right, bottom) =
            self.viewport.uv_to_pixel(rect.u_min + u1 * rect.u_span(), rect.v_max - v1 * rect.v_span());
        Rect::from_ltrb(left as f32, top as f32, right as f32, bottom as f32)
    }

    fn draw_zone(&self, pixmap: &mut Pixmap, rect: &ZoneRect, active: bool) {
        let Some(r) = self.zone_pixel_rect(rect, 0.0, 1.0, 0.0, 1.0) else {
            return;
        };
        let path = PathBuilder::from_rect(r);
        let mut paint = Paint::default();
        paint.anti_alias = true;
        paint.set_color(self.style.zone_fill);
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);

        paint.set_color(if active { self.style.active_stroke } else { self.style.zone_stroke });
        let stroke = Stroke {
            width: if active { self.style.stroke_width * 1.5 } else { self.style.stroke_width },
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    fn draw_safe_area(&self, pixmap: &mut Pixmap, zone: &EditorZone, outside: bool) {
        let s = zone.safe;
        let mut paint = Paint::default();
        paint.anti_alias = true;
        paint.set_color(self.style.safe_tint);

        // tint the margin strips between the zone edge and the safe rect
        let strips = [
            (0.0, 1.0, 0.0, s.v_min),
            (0.0, 1.0, s.v_max, 1.0),
            (0.0, s.u_min, s.v_min, s.v_max),
            (s.u_max, 1.0, s.v_min, s.v_max),
        ];
        for (u0, u1, v0, v1) in strips {
            if let Some(r) = self.zone_pixel_rect(&zone.rect, u0, u1, v0, v1) {
                pixmap.fill_rect(r, &paint, Transform::identity(), None);
            }
        }

        if let Some(r) = self.zone_pixel_rect(&zone.rect, s.u_min, s.u_max, s.v_min, s.v_max) {
            let (color, width) = if outside {
                (self.style.safe_warning, self.style.stroke_width * 1.5)
            } else {
                (self.style.safe_stroke, self.style.stroke_width)
            };
            paint.set_color(color);
            let stroke = Stroke {
                width,
                ..Default::default()
            };
            pixmap.stroke_path(&PathBuilder::from_rect(r), &paint, &stroke, Transform::identity(), None);
        }
    }

    fn draw_artwork(&mut self, pixmap: &mut Pixmap, zone: &EditorZone, p: &Placement, artwork: &Artwork) {
        let Some((cx, cy, w, h)) = self.artwork_box(p) else {
            return;
        };

        let cached = matches!(&self.artwork_cache, Some((img, _)) if Rc::ptr_eq(img, &artwork.image));
        if !cached {
            self.artwork_cache = pixmap_from_image(&artwork.image).map(|pm| (Rc::clone(&artwork.image), pm));
        }
        let Some((_, art)) = &self.artwork_cache else {
            return;
        };

        let clip = self.zone_pixel_rect(&zone.rect, 0.0, 1.0, 0.0, 1.0).and_then(|r| {
            let mut mask = Mask::new(pixmap.width(), pixmap.height())?;
            mask.fill_path(&PathBuilder::from_rect(r), FillRule::Winding, true, Transform::identity());
            Some(mask)
        });

        let transform = artwork_transform(cx, cy, w, h, p.rotation_rad, art.width() as f64, art.height() as f64);
        pixmap.draw_pixmap(0, 0, art.as_ref(), &bilinear(), transform, clip.as_ref());
    }
}

fn bilinear() -> PixmapPaint {
    PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..Default::default()
    }
}

/// Places an `img_w × img_h` image centered at `(cx, cy)`, scaled to
/// `w × h` pixels and rotated clockwise on screen by `rotation_rad`.
pub(crate) fn artwork_transform(cx: f64, cy: f64, w: f64, h: f64, rotation_rad: f64, img_w: f64, img_h: f64) -> Transform {
    Transform::from_translate(cx as f32, cy as f32)
        .pre_rotate(rotation_rad.to_degrees() as f32)
        .pre_scale((w / img_w.max(1.0)) as f32, (h / img_h.max(1.0)) as f32)
        .pre_translate(-(img_w * 0.5) as f32, -(img_h * 0.5) as f32)
}

/// Converts straight-alpha RGBA into a premultiplied pixmap.
pub(crate) fn pixmap_from_image(image: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(image.width(), image.height())?;
    let mut data = Vec::with_capacity(image.as_raw().len());
    for px in image.pixels() {
        let [r, g, b, a] = px.0;
        let premul = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        data.extend_from_slice(&[premul(r), premul(g), premul(b), a]);
    }
    Pixmap::from_vec(data, size)
}
