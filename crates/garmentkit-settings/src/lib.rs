//! GarmentKit Settings Crate
//!
//! Handles application configuration: the product zone catalog, export and
//! decal tunables, and snapping defaults, persisted as JSON or TOML.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{Config, DecalSettings, ExportSettings, SnapSettings, ZoneSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
pub use persistence::SettingsPersistence;
