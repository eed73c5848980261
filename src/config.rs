//! Tool settings
//!
//! Stored as JSON under the platform config directory. A missing file is
//! created with defaults on first load.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::{config, fonts};

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory holding persisted theme records
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,
    #[serde(default)]
    pub fonts: FontSettings,
}

/// Web-font stylesheet settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSettings {
    #[serde(default = "default_css_base")]
    pub css_base: String,
    #[serde(default = "default_weights")]
    pub weights: Vec<u16>,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn config_root() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(config::APP_DIR);
    path
}

fn default_store_dir() -> PathBuf {
    config_root().join(config::STORE_DIR)
}

fn default_css_base() -> String {
    fonts::CSS_BASE.to_string()
}

fn default_weights() -> Vec<u16> {
    fonts::WEIGHTS.to_vec()
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            css_base: default_css_base(),
            weights: default_weights(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            store_dir: default_store_dir(),
            fonts: FontSettings::default(),
        }
    }
}

impl Settings {
    pub fn path() -> PathBuf {
        config_root().join(config::FILENAME)
    }

    /// Load settings from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    /// Load settings from `path`, writing defaults there if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "Settings file not found, creating default");
            let settings = Settings::default();
            settings.save_to(path)?;
            return Ok(settings);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings JSON from {}", path.display()))?;

        info!(path = %path.display(), store_dir = %settings.store_dir.display(), "Loaded settings");
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        info!(path = %path.display(), "Saved settings");
        Ok(())
    }
}
