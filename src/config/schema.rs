//! Configuration schema
//!
//! Defines the structure of the settings file.

use crate::util::download::FetchMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub install: InstallSettings,

    #[serde(default)]
    pub launch: LaunchConfig,
}

/// Network settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Download the archive from here instead of the platform default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_url: Option<String>,

    /// User-Agent sent with the download request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Body transfer strategy
    #[serde(default)]
    pub fetch_mode: FetchMode,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            archive_url: None,
            user_agent: default_user_agent(),
            fetch_mode: FetchMode::default(),
        }
    }
}

/// Install location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallSettings {
    /// Directory receiving the archive and extracted files
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
}

impl Default for InstallSettings {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
        }
    }
}

/// Game launch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Collect game output instead of sharing the terminal
    #[serde(default = "default_true")]
    pub capture_output: bool,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            capture_output: true,
        }
    }
}

// Default value functions for serde
fn default_user_agent() -> String {
    format!("zaplaunch/{}", env!("CARGO_PKG_VERSION"))
}
fn default_work_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_true() -> bool {
    true
}
