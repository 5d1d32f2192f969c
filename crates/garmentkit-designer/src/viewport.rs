//! Viewport and coordinate transformation for the UV editor canvas.
//!
//! Maps between pixel coordinates (screen space, y down) and absolute UV
//! coordinates (texture space, v up). Zoom is measured in pixels per UV unit
//! and is limited relative to the zoom that fits the active zone.

use std::fmt;

use garmentkit_core::constants::{EDITOR_ZOOM_MAX, EDITOR_ZOOM_MIN, VIEW_PADDING};
use garmentkit_core::{Uv, ZoneRect};

/// Zoom and pan state of the 2D editor.
#[derive(Debug, Clone)]
pub struct Viewport {
    zoom: f64,
    /// Zoom at which the fitted bounds fill the canvas.
    fit_zoom: f64,
    pan_x: f64,
    pan_y: f64,
    canvas_width: f64,
    canvas_height: f64,
}

impl Viewport {
    /// Creates a viewport showing the whole unit UV square.
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        let mut viewport = Self {
            zoom: 1.0,
            fit_zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            canvas_width,
            canvas_height,
        };
        viewport.fit_to_bounds(0.0, 0.0, 1.0, 1.0, VIEW_PADDING);
        viewport
    }

    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    /// Sets the canvas dimensions (typically called when the host resizes).
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    /// Pixels per UV unit.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Zoom relative to the last fit (1.0 = fitted).
    pub fn relative_zoom(&self) -> f64 {
        self.zoom / self.fit_zoom
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.fit_zoom * EDITOR_ZOOM_MIN, self.fit_zoom * EDITOR_ZOOM_MAX)
    }

    pub fn pan_x(&self) -> f64 {
        self.pan_x
    }

    pub fn pan_y(&self) -> f64 {
        self.pan_y
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan_x = x;
        self.pan_y = y;
    }

    /// Pans by a pixel delta (screen y down).
    pub fn pan_by_pixels(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y -= dy;
    }

    /// Converts pixel coordinates to absolute UV.
    ///
    /// ```text
    /// u = (pixel_x - pan_x) / zoom
    /// v = (canvas_height - pixel_y - pan_y) / zoom
    /// ```
    pub fn pixel_to_uv(&self, pixel_x: f64, pixel_y: f64) -> Uv {
        let u = (pixel_x - self.pan_x) / self.zoom;
        let v = (self.canvas_height - pixel_y - self.pan_y) / self.zoom;
        Uv::new(u, v)
    }

    /// Converts absolute UV to pixel coordinates.
    pub fn uv_to_pixel(&self, u: f64, v: f64) -> (f64, f64) {
        let pixel_x = u * self.zoom + self.pan_x;
        let pixel_y = self.canvas_height - (v * self.zoom + self.pan_y);
        (pixel_x, pixel_y)
    }

    /// Fits a UV box into the canvas, reserving `padding` of each side.
    ///
    /// The resulting zoom becomes the reference for the relative zoom limits.
    pub fn fit_to_bounds(&mut self, min_u: f64, min_v: f64, max_u: f64, max_v: f64, padding: f64) {
        if min_u >= max_u || min_v >= max_v {
            return;
        }

        let width = max_u - min_u;
        let height = max_v - min_v;

        let padding_factor = 1.0 - (padding * 2.0);
        let zoom_x = (self.canvas_width * padding_factor) / width;
        let zoom_y = (self.canvas_height * padding_factor) / height;
        let new_zoom = zoom_x.min(zoom_y);
        if !(new_zoom > 0.0) || !new_zoom.is_finite() {
            return;
        }

        let content_pixel_width = width * new_zoom;
        let content_pixel_height = height * new_zoom;
        let left = self.canvas_width / 2.0 - content_pixel_width / 2.0;
        let top = self.canvas_height / 2.0 - content_pixel_height / 2.0;

        self.zoom = new_zoom;
        self.fit_zoom = new_zoom;
        self.pan_x = left - min_u * new_zoom;
        self.pan_y = self.canvas_height - top - content_pixel_height - min_v * new_zoom;
    }

    /// Fits a zone rectangle with the default padding. Seam-crossing zones
    /// are shown unwrapped, extending past `u = 1`.
    pub fn fit_to_zone(&mut self, rect: &ZoneRect) {
        self.fit_to_bounds(
            rect.u_min,
            rect.v_min,
            rect.u_min + rect.u_span(),
            rect.v_max,
            VIEW_PADDING,
        );
    }

    /// Zooms about a UV point, keeping its screen position fixed.
    ///
    /// The zoom is clamped to the relative limits around the fit zoom.
    pub fn zoom_to_point(&mut self, point: Uv, new_zoom: f64) {
        let new_zoom = self.clamp_zoom(new_zoom);
        let (pixel_x, pixel_y) = self.uv_to_pixel(point.u, point.v);
        self.zoom = new_zoom;
        self.pan_x = pixel_x - point.u * new_zoom;
        self.pan_y = self.canvas_height - pixel_y - point.v * new_zoom;
    }

    /// Multiplies the zoom by `factor` about a pixel position.
    pub fn zoom_at_pixel(&mut self, pixel_x: f64, pixel_y: f64, factor: f64) {
        let anchor = self.pixel_to_uv(pixel_x, pixel_y);
        self.zoom_to_point(anchor, self.zoom * factor);
    }

    /// Centers the viewport on a UV coordinate.
    pub fn center_on(&mut self, u: f64, v: f64) {
        self.pan_x = self.canvas_width / 2.0 - u * self.zoom;
        self.pan_y = self.canvas_height / 2.0 - v * self.zoom;
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1024.0, 1024.0)
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | Pan: ({:.1}, {:.1})",
            self.relative_zoom(),
            self.pan_x,
            self.pan_y
        )
    }
}
