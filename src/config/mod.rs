//! Configuration module
//!
//! Handles loading and saving launcher settings. The installed executable
//! path is not kept here; see [`crate::core::store`].

mod schema;

pub use schema::{InstallSettings, LaunchConfig, NetworkConfig, Settings};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Get the configuration directory path
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".zaplaunch")
}

/// Get the settings file path
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load settings from the default location
pub fn load() -> Result<Settings> {
    load_from(&config_path())
}

/// Load settings from `path`, writing defaults there if it does not exist
pub fn load_from(path: &Path) -> Result<Settings> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Invalid settings file {:?}", path))?;
        Ok(settings)
    } else {
        let settings = Settings::default();
        save_to(&settings, path)?;
        Ok(settings)
    }
}

/// Save settings to `path`
pub fn save_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content)?;

    tracing::info!("Settings saved to {:?}", path);
    Ok(())
}
