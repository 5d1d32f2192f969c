//! Configuration and settings management for GarmentKit
//!
//! Provides configuration file handling, validation, and conversion into the
//! option structs the designer consumes. Supports JSON and TOML file formats
//! stored in the platform config directory.
//!
//! Configuration is organized into logical sections:
//! - Product catalog (zones, physical sizes, safe margins)
//! - Zone detection (seam wrap threshold)
//! - Decal sizing
//! - Export defaults (DPI, template width, output directory)
//! - Snapping defaults

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
use garmentkit_core::constants::{DEFAULT_DPI, DEFAULT_TEMPLATE_PX, UV_WRAP_SPAN_THRESHOLD, WORLD_ZONE_WIDTH};
use garmentkit_core::{ProductSpec, ZoneKey, ZoneSpec};
use garmentkit_designer::{ExportOptions, ManagerOptions, SnapOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Largest template width accepted from configuration.
pub const MAX_TEMPLATE_PX: u32 = 16384;

/// Zone rectangle detection settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneSettings {
    /// Trimmed U-span above which a zone is treated as crossing the seam
    pub wrap_threshold: f64,
}

impl Default for ZoneSettings {
    fn default() -> Self {
        Self {
            wrap_threshold: UV_WRAP_SPAN_THRESHOLD,
        }
    }
}

/// Decal sizing settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecalSettings {
    /// World width of a placement spanning the whole zone
    pub world_zone_width: f64,
}

impl Default for DecalSettings {
    fn default() -> Self {
        Self {
            world_zone_width: WORLD_ZONE_WIDTH,
        }
    }
}

/// Print export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Resolution recorded in the print job
    pub dpi: u32,
    /// Template width in pixels; height follows the zone aspect
    pub template_px: u32,
    /// Default output directory
    pub output_directory: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            template_px: DEFAULT_TEMPLATE_PX,
            output_directory: PathBuf::from("."),
        }
    }
}

/// Snapping defaults for the 2D editor.
pub type SnapSettings = SnapOptions;

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Product and its print zones
    pub product: ProductSpec,
    /// Zone detection
    pub zones: ZoneSettings,
    /// Decal sizing
    pub decal: DecalSettings,
    /// Export defaults
    pub export: ExportSettings,
    /// Snapping defaults
    pub snap: SnapSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            product: ProductSpec::tshirt(),
            zones: ZoneSettings::default(),
            decal: DecalSettings::default(),
            export: ExportSettings::default(),
            snap: SnapSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> ConfigResult<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config file location, e.g. `~/.config/garmentkit/config.toml`.
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no platform config directory".to_string())
        })?;
        Ok(dir.join("garmentkit").join("config.toml"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.product.zones.is_empty() {
            return Err(ConfigError::NoZones(self.product.id.clone()));
        }

        let mut seen = BTreeSet::new();
        for zone in &self.product.zones {
            if !seen.insert(zone.key) {
                return Err(ConfigError::DuplicateZone(zone.key.to_string()));
            }
            validate_zone(zone)?;
        }

        let wrap = self.zones.wrap_threshold;
        if wrap.is_nan() || wrap <= 0.0 || wrap > 1.0 {
            return Err(ConfigError::out_of_range("zones.wrap_threshold", wrap));
        }

        let width = self.decal.world_zone_width;
        if !(width.is_finite() && width > 0.0) {
            return Err(ConfigError::out_of_range("decal.world_zone_width", width));
        }

        if self.export.dpi == 0 {
            return Err(ConfigError::out_of_range("export.dpi", self.export.dpi));
        }
        if self.export.template_px == 0 || self.export.template_px > MAX_TEMPLATE_PX {
            return Err(ConfigError::out_of_range(
                "export.template_px",
                self.export.template_px,
            ));
        }

        if !(self.snap.grid_cm.is_finite() && self.snap.grid_cm > 0.0) {
            return Err(ConfigError::out_of_range("snap.grid_cm", self.snap.grid_cm));
        }

        Ok(())
    }

    /// Size and margins of one product zone
    pub fn zone(&self, key: ZoneKey) -> Option<&ZoneSpec> {
        self.product.zone(key)
    }

    pub fn manager_options(&self) -> ManagerOptions {
        ManagerOptions {
            wrap_threshold: self.zones.wrap_threshold,
            world_zone_width: self.decal.world_zone_width,
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            product_id: self.product.id.clone(),
            dpi: self.export.dpi,
            template_px: self.export.template_px,
        }
    }

    pub fn snap_options(&self) -> SnapOptions {
        self.snap
    }
}

fn validate_zone(zone: &ZoneSpec) -> ConfigResult<()> {
    let size = zone.size_cm;
    if size.width.is_nan() || size.height.is_nan() || size.width <= 0.0 || size.height <= 0.0 {
        return Err(ConfigError::out_of_range(
            &format!("product.zones.{}.size_cm", zone.key),
            format!("{}x{}", size.width, size.height),
        ));
    }
    let m = zone.margins_cm;
    if [m.top, m.bottom, m.left, m.right].iter().any(|v| v.is_nan() || *v < 0.0) {
        return Err(ConfigError::out_of_range(
            &format!("product.zones.{}.margins_cm", zone.key),
            format!("{}/{}/{}/{}", m.top, m.bottom, m.left, m.right),
        ));
    }
    Ok(())
}
