//! Uploaded artwork images.

use garmentkit_core::PlacementError;
use image::RgbaImage;
use std::path::Path;
use std::rc::Rc;
use tracing::info;

/// A decoded artwork image, shared with the renderer's texture upload.
#[derive(Debug, Clone)]
pub struct Artwork {
    pub image: Rc<RgbaImage>,
}

impl Artwork {
    pub fn new(image: RgbaImage) -> Self {
        Self { image: Rc::new(image) }
    }

    /// Decodes PNG or JPEG bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, PlacementError> {
        let decoded = image::load_from_memory(bytes).map_err(|e| PlacementError::ImageDecode {
            reason: e.to_string(),
        })?;
        let rgba = decoded.into_rgba8();
        info!("Decoded artwork {}x{}", rgba.width(), rgba.height());
        Ok(Self::new(rgba))
    }

    pub fn open(path: &Path) -> Result<Self, PlacementError> {
        let decoded = image::open(path).map_err(|e| PlacementError::ImageDecode {
            reason: format!("{}: {}", path.display(), e),
        })?;
        Ok(Self::new(decoded.into_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Height over width.
    pub fn aspect(&self) -> f64 {
        self.image.height() as f64 / (self.image.width() as f64).max(1e-6)
    }
}
