//! zaplaunch library root
//!
//! Re-exports core functionality for external use.

pub mod config;
pub mod core;
pub mod util;

pub use config::Settings;
pub use crate::core::install::{InstallOutcome, Installer};
pub use crate::core::launch::{LaunchOutcome, Launcher, WaitMode};
pub use crate::core::platform::PlatformProfile;
pub use crate::core::store::{ConfigStore, StoredPath};
