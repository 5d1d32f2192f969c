//! Settings Persistence
//!
//! Ties a [`Config`] to the file it came from so callers can edit and save
//! without tracking the path themselves.

use crate::config::Config;
use crate::error::SettingsResult;
use std::path::{Path, PathBuf};
use tracing::info;

/// Config bound to its backing file
#[derive(Debug, Clone)]
pub struct SettingsPersistence {
    path: PathBuf,
    config: Config,
}

impl SettingsPersistence {
    /// Loads `path`, or starts from defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        let config = if path.exists() {
            Config::load_from_file(path)?
        } else {
            info!("No config at {}, using defaults", path.display());
            Config::default()
        };
        Ok(Self {
            path: path.to_path_buf(),
            config,
        })
    }

    /// Same as [`Self::load_or_default`] for the platform config file.
    pub fn open_default() -> SettingsResult<Self> {
        Self::load_or_default(&Config::default_path()?)
    }

    /// Writes the config back to its file.
    pub fn save(&self) -> SettingsResult<()> {
        self.config.save_to_file(&self.path)?;
        info!("Saved config to {}", self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get reference to config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get mutable reference to config
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Validate settings
    pub fn validate(&self) -> SettingsResult<()> {
        Ok(self.config.validate()?)
    }
}
