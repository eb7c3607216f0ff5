//! CLI module
//!
//! Command-line front end for zaplaunch.

mod args;

pub use args::{Args, Commands};

use crate::config::Settings;
use crate::core::gpu;
use crate::core::install::{InstallOutcome, Installer};
use crate::core::launch::{LaunchOutcome, Launcher, WaitMode};
use crate::core::platform::{GpuProbe, PlatformProfile};
use crate::core::store::{ConfigStore, StoredPath};
use crate::util::download::Fetcher;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Settings and state shared by every command
pub struct Session {
    pub settings: Settings,
    pub store: ConfigStore,
    pub work_dir: PathBuf,
}

impl Session {
    pub fn new(settings: Settings, work_dir: Option<PathBuf>) -> Self {
        let work_dir = work_dir.unwrap_or_else(|| settings.install.work_dir.clone());
        Self {
            settings,
            store: ConfigStore::default(),
            work_dir,
        }
    }

    /// Host profile with any configured URL override applied
    fn profile(&self) -> Result<PlatformProfile> {
        let profile = PlatformProfile::detect()?;
        Ok(match &self.settings.network.archive_url {
            Some(url) => profile.with_archive_url(url.clone()),
            None => profile,
        })
    }

    fn wait_mode(&self, no_capture: bool) -> WaitMode {
        if no_capture || !self.settings.launch.capture_output {
            WaitMode::Inherit
        } else {
            WaitMode::Capture
        }
    }
}

/// Show the saved executable and GPU support
pub fn status(session: &Session) -> Result<()> {
    match session.store.load() {
        StoredPath::Valid(path) => {
            println!("✅ Found saved executable:");
            println!("   {}", path.display());
        }
        StoredPath::Invalid { reason } => {
            println!("⚠️  The Zap Launcher configuration is incorrect ({}).", reason);
            println!("   Please reinstall or select the executable manually.");
        }
        StoredPath::None => {
            println!("📦 No game installed or path found.");
            println!("   Use 'zaplaunch install' or 'zaplaunch select <path>'.");
        }
    }

    gpu_check()
}

/// Download, extract and register the game
pub async fn install(session: &Session, launch_after: bool) -> Result<()> {
    let profile = session.profile()?;
    tracing::info!(
        "Installing {} build from {}",
        profile.kind,
        profile.archive_url
    );
    let network = &session.settings.network;
    let fetcher = Fetcher::new(&network.user_agent, network.fetch_mode)?;

    let installer = Installer::new(&fetcher, &session.store, &session.work_dir);
    let outcome = installer
        .install(&profile, |msg| println!("   {}", msg))
        .await
        .context("Could not save the install location")?;

    match outcome {
        InstallOutcome::Success { path } => {
            println!("✅ Eaglercraft installed successfully!");
            println!("   Executable: {}", path.display());
            if launch_after {
                return tokio::task::block_in_place(|| launch_path(session, &path, false));
            }
            Ok(())
        }
        InstallOutcome::DownloadFailed { cause } => {
            anyhow::bail!("Download failed: {}", cause)
        }
        InstallOutcome::ExtractFailed { cause } => {
            anyhow::bail!("Extraction failed: {}", cause)
        }
        InstallOutcome::ExecutableNotFound => {
            anyhow::bail!(
                "Could not find the Eaglercraft executable. Try 'zaplaunch select <path>'."
            )
        }
    }
}

/// Launch the saved executable
pub fn launch(session: &Session, no_capture: bool) -> Result<()> {
    match session.store.load() {
        StoredPath::Valid(path) => launch_path(session, &path, no_capture),
        StoredPath::Invalid { reason } => {
            anyhow::bail!(
                "Saved executable is unusable ({}). Reinstall or select it again.",
                reason
            )
        }
        StoredPath::None => {
            anyhow::bail!(
                "Game executable not found. Use 'zaplaunch install' or 'zaplaunch select'."
            )
        }
    }
}

fn launch_path(session: &Session, path: &Path, no_capture: bool) -> Result<()> {
    println!("🚀 Launching Eaglercraft...");

    let launcher = Launcher::new(session.wait_mode(no_capture));
    let report = launcher.run(path, |_| {});
    match &report.outcome {
        LaunchOutcome::Launched => {
            println!("🎮 Game exited normally.");
            Ok(())
        }
        LaunchOutcome::Crashed { exit_code } => {
            if let Some(tail) = report.stderr_tail(20) {
                eprintln!("--- game stderr ---");
                eprintln!("{}", tail);
            }
            anyhow::bail!("Game crashed (exit code {}).", exit_code)
        }
        LaunchOutcome::LaunchFailed { cause } => {
            anyhow::bail!("Error launching game: {}", cause)
        }
    }
}

/// Record a manually chosen executable
pub fn select(session: &Session, path: &Path) -> Result<()> {
    let path = session
        .store
        .select(path)
        .context("No valid file selected")?;

    println!("📁 Executable set to:");
    println!("   {}", path.display());
    Ok(())
}

/// Warn about graphics adapters the game is known to struggle on
pub fn gpu_check() -> Result<()> {
    let probe: GpuProbe = match PlatformProfile::detect() {
        Ok(profile) => profile.gpu_probe,
        Err(unsupported) => match unsupported.gpu_probe {
            Some(probe) => probe,
            None => {
                tracing::debug!("No GPU probe for this host");
                return Ok(());
            }
        },
    };

    let info = gpu::probe(&probe);
    if let Some(keyword) = gpu::unsupported_keyword(&info) {
        tracing::debug!("Matched unsupported GPU keyword {:?}", keyword);
        println!("⚠️  Your graphics card is not supported, your game might crash or be laggy.");
    }

    Ok(())
}
