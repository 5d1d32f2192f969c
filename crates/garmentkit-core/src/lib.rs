//! # GarmentKit Core
//!
//! Core types, constants, and error handling shared by every GarmentKit crate.
//! Provides the UV and centimetre value types, print zone identities, zone
//! rectangles, and the unified error taxonomy.

pub mod constants;
pub mod error;
pub mod placement;
pub mod units;
pub mod zone;

pub use error::{Error, ExportError, PlacementError, Result};
pub use placement::{clamp_scale, Corner, Placement, PlacementBounds};
pub use units::{SafeMarginsCm, Uv, ZoneSizeCm};
pub use zone::{ProductSpec, ZoneKey, ZoneRect, ZoneSide, ZoneSpec};
