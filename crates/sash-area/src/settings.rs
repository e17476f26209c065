// Editor area settings, stored in the platform config dir:
// e.g. ~/.config/sash/settings.json on Linux.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sash_layout::DEFAULT_MIN_FRACTION;

use crate::session::{read_json, write_json, SessionError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSettings {
    /// Suffixes (".py", ".txt") of external files the area accepts on drop.
    #[serde(default)]
    pub file_drop_extensions: Vec<String>,
    /// Pointer travel, Manhattan distance in pixels, before a tab press
    /// becomes a drag.
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f32,
    /// Smallest share of a split either side keeps while its handle is dragged.
    #[serde(default = "default_min_split_fraction")]
    pub min_split_fraction: f32,
}

fn default_drag_threshold() -> f32 {
    10.0
}

fn default_min_split_fraction() -> f32 {
    DEFAULT_MIN_FRACTION
}

impl Default for AreaSettings {
    fn default() -> Self {
        Self {
            file_drop_extensions: Vec::new(),
            drag_threshold: default_drag_threshold(),
            min_split_fraction: default_min_split_fraction(),
        }
    }
}

impl AreaSettings {
    pub fn accepts_file(&self, path: &Path) -> bool {
        let name = path.to_string_lossy();
        self.file_drop_extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}

fn settings_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("sash").join("settings.json"))
}

pub fn load_settings_from(path: &Path) -> Result<AreaSettings, SessionError> {
    read_json(path)
}

pub fn save_settings_to(path: &Path, settings: &AreaSettings) -> Result<(), SessionError> {
    write_json(path, settings)
}

/// Settings from the config dir, or defaults when missing or unreadable.
pub fn load_settings() -> AreaSettings {
    let Some(path) = settings_path() else {
        return AreaSettings::default();
    };
    if !path.exists() {
        return AreaSettings::default();
    }
    match load_settings_from(&path) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Failed to load {}: {}", path.display(), e);
            AreaSettings::default()
        }
    }
}

pub fn save_settings(settings: &AreaSettings) {
    let Some(path) = settings_path() else {
        log::warn!("Cannot determine settings path");
        return;
    };
    if let Err(e) = save_settings_to(&path, settings) {
        log::error!("Failed to save settings: {}", e);
    }
}
