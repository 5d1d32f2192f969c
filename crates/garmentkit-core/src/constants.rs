//! Shared numeric constants.
//!
//! Values here are defaults; anything a product owner may want to tune is also
//! exposed through `garmentkit-settings`.

/// Export resolution recorded in print jobs.
pub const DEFAULT_DPI: u32 = 300;

/// Width in pixels of the baked print template.
pub const DEFAULT_TEMPLATE_PX: u32 = 4096;

/// Projection depth of a decal box in world units.
pub const DECAL_DEPTH: f64 = 1.1;

/// World-space width that a full zone (u_scale = 1.0) roughly spans.
pub const WORLD_ZONE_WIDTH: f64 = 0.7;

/// Bounds for a decal edge length in world units.
pub const DECAL_MIN_SIZE: f64 = 0.05;
pub const DECAL_MAX_SIZE: f64 = 1.5;

/// Artwork footprint limits as a fraction of the zone.
pub const MIN_SCALE: f64 = 0.05;
pub const MAX_SCALE: f64 = 1.2;

/// Footprint of a placement created by a direct click.
pub const DEFAULT_SCALE: f64 = 0.3;

/// Fraction of the zone used when fitting a fresh upload.
pub const UPLOAD_FIT_MARGIN: f64 = 0.92;

/// Distance from the zone center (normalized) within which center snap engages.
pub const CENTER_SNAP_EPSILON: f64 = 0.02;

/// Absolute UV values are kept this far away from 0 and 1.
pub const UV_EDGE_EPSILON: f64 = 1e-4;

/// Trimmed U-span above which a zone island is assumed to cross the 0/1 seam.
pub const UV_WRAP_SPAN_THRESHOLD: f64 = 0.7;

/// Percentiles used to trim stray zone UVs.
pub const ZONE_PERCENTILE_LOW: f64 = 0.02;
pub const ZONE_PERCENTILE_HIGH: f64 = 0.98;

/// Fraction of the editor canvas reserved as padding around the active zone.
pub const VIEW_PADDING: f64 = 0.05;

/// Rotation applied per E/R key press, in degrees.
pub const ROTATE_STEP_DEG: f64 = 5.0;

/// Wheel scale factors (shrink, grow).
pub const WHEEL_SCALE_DOWN: f64 = 0.95;
pub const WHEEL_SCALE_UP: f64 = 1.05;

/// Editor zoom limits, relative to the fitted zoom.
pub const EDITOR_ZOOM_MIN: f64 = 0.2;
pub const EDITOR_ZOOM_MAX: f64 = 5.0;

/// Scale change per pixel of corner-handle drag.
pub const RESIZE_SENSITIVITY: f64 = 0.0015;

/// Per-gesture limits on the corner resize factor.
pub const RESIZE_FACTOR_MIN: f64 = 0.2;
pub const RESIZE_FACTOR_MAX: f64 = 5.0;
