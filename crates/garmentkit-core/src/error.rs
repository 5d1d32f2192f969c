//! Error handling for GarmentKit
//!
//! Provides error types for the interactive boundary:
//! - Placement errors (user input rejected before any state changes)
//! - Export errors (baking and serializing print jobs)
//!
//! Expected misses inside the hot path (a UV pick that found nothing, a zone
//! that is not loaded yet) are modelled as `Option`, not as errors.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Placement error type
///
/// Raised when a user action is rejected. A rejected action never leaves
/// partial state behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    /// No model has been loaded, so no zone rectangles exist yet
    #[error("No garment model loaded yet")]
    ModelNotLoaded,

    /// The zone key is not part of the loaded product
    #[error("Unknown print zone: {zone}")]
    UnknownZone {
        /// The zone key that was requested.
        zone: String,
    },

    /// The action needs artwork but none has been uploaded
    #[error("Upload an image first")]
    NoImage,

    /// The action needs a placement but none exists
    #[error("Place artwork first")]
    NoPlacement,

    /// The zone was submitted and is frozen until unlocked
    #[error("Zone {zone} is locked; unlock it to edit")]
    ZoneLocked {
        /// The locked zone.
        zone: String,
    },

    /// A width in centimetres was zero, negative, or not a number
    #[error("Invalid artwork width: {width_cm} cm")]
    InvalidWidth {
        /// The rejected width.
        width_cm: f64,
    },

    /// The placement could not be resolved to a point on the mesh
    #[error("Could not resolve a surface pose for zone {zone}")]
    PoseUnresolved {
        /// The zone whose pose failed.
        zone: String,
    },

    /// A 3D pick landed outside the active print zone
    #[error("Outside print zone {zone}; place inside the print zone")]
    OutsideZone {
        /// The active zone.
        zone: String,
    },

    /// Uploaded bytes could not be decoded as an image
    #[error("Failed to decode image: {reason}")]
    ImageDecode {
        /// The decoder message.
        reason: String,
    },
}

/// Export error type
///
/// Represents failures while baking the print template or writing artifacts.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Zone has no image or placement to export
    #[error("Nothing to export for zone {zone}")]
    NothingToExport {
        /// The zone being exported.
        zone: String,
    },

    /// The raster surface could not be created
    #[error("Raster error: {reason}")]
    Raster {
        /// The reason the raster failed.
        reason: String,
    },

    /// PNG encoding failed
    #[error("Encode error: {reason}")]
    Encode {
        /// The encoder message.
        reason: String,
    },

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main error type for GarmentKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Placement error
    #[error(transparent)]
    Placement(#[from] PlacementError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this error was a rejected user action
    pub fn is_placement_error(&self) -> bool {
        matches!(self, Error::Placement(_))
    }

    /// Check if this is an export error
    pub fn is_export_error(&self) -> bool {
        matches!(self, Error::Export(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_error_display() {
        let err = PlacementError::ZoneLocked {
            zone: "front".to_string(),
        };
        assert_eq!(err.to_string(), "Zone front is locked; unlock it to edit");

        let err = PlacementError::InvalidWidth { width_cm: -2.0 };
        assert_eq!(err.to_string(), "Invalid artwork width: -2 cm");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = PlacementError::NoImage.into();
        assert!(err.is_placement_error());
        assert!(!err.is_export_error());

        let err: Error = ExportError::NothingToExport {
            zone: "back".to_string(),
        }
        .into();
        assert!(err.is_export_error());

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
