//! Install orchestration
//!
//! Download, extract, locate, remember. Each stage failure ends the install
//! with its own outcome; earlier artifacts stay on disk for inspection.

use crate::core::extract::{self, ExtractError};
use crate::core::locate;
use crate::core::platform::{EXTRACT_DIR_NAME, PlatformProfile};
use crate::core::store::{ConfigStore, ConfigWriteError};
use crate::util::download::{FetchError, Fetcher};
use std::path::PathBuf;

/// Result of an install attempt
#[derive(Debug)]
pub enum InstallOutcome {
    Success { path: PathBuf },
    DownloadFailed { cause: FetchError },
    ExtractFailed { cause: ExtractError },
    ExecutableNotFound,
}

impl InstallOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InstallOutcome::Success { .. })
    }
}

/// Runs the install pipeline for one platform profile
pub struct Installer<'a> {
    fetcher: &'a Fetcher,
    store: &'a ConfigStore,
    work_dir: PathBuf,
}

impl<'a> Installer<'a> {
    /// `work_dir` receives the archive and the `eaglercraft/` extraction dir
    pub fn new(fetcher: &'a Fetcher, store: &'a ConfigStore, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            store,
            work_dir: work_dir.into(),
        }
    }

    /// Where the archive is downloaded to
    pub fn archive_path(&self, profile: &PlatformProfile) -> PathBuf {
        self.work_dir.join(profile.archive_file_name())
    }

    /// Where the archive is extracted to
    pub fn extract_dir(&self) -> PathBuf {
        self.work_dir.join(EXTRACT_DIR_NAME)
    }

    /// Fetch, unpack and register the game.
    ///
    /// Every call downloads and extracts from scratch. Only a failure to
    /// write the config file escapes as an error.
    pub async fn install<F>(
        &self,
        profile: &PlatformProfile,
        on_progress: F,
    ) -> Result<InstallOutcome, ConfigWriteError>
    where
        F: Fn(&str),
    {
        let archive = self.archive_path(profile);
        let extract_dir = self.extract_dir();

        on_progress("Downloading Eaglercraft...");
        if let Err(e) = self.fetcher.fetch(&profile.archive_url, &archive).await {
            tracing::error!("Download failed: {}", e);
            return Ok(InstallOutcome::DownloadFailed { cause: e });
        }

        on_progress("Extracting files...");
        if let Err(e) = extract::extract(profile.format, &archive, &extract_dir) {
            tracing::error!("Extraction failed: {}", e);
            return Ok(InstallOutcome::ExtractFailed { cause: e });
        }

        on_progress("Locating executable...");
        let executable = match locate::locate(&extract_dir, &profile.discovery) {
            Ok(Some(path)) => path,
            Ok(None) => return Ok(InstallOutcome::ExecutableNotFound),
            Err(e) => {
                tracing::warn!("Could not scan {:?}: {}", extract_dir, e);
                return Ok(InstallOutcome::ExecutableNotFound);
            }
        };

        self.store.save(&executable)?;

        tracing::info!("Eaglercraft installed at {:?}", executable);
        Ok(InstallOutcome::Success { path: executable })
    }
}
