//! Executable path store
//!
//! Persists the last known-good game executable as a single line of text
//! in `zap_config.zlc`, next to wherever the launcher is started from.

use crate::util;
use std::path::{Path, PathBuf};

/// Config file name, resolved against the current working directory
pub const CONFIG_FILE: &str = "zap_config.zlc";

/// Result of reading the stored path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredPath {
    /// No config file yet
    None,
    /// Config points at a usable executable
    Valid(PathBuf),
    /// Config exists but is unreadable or stale
    Invalid { reason: String },
}

/// The config file could not be written
#[derive(Debug, thiserror::Error)]
#[error("failed to write {path:?}: {source}")]
pub struct ConfigWriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Errors from manually selecting an executable
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("{0:?} is not a file")]
    NotAFile(PathBuf),

    #[error("could not mark {path:?} executable: {source}")]
    Permissions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Write(#[from] ConfigWriteError),
}

/// Owner of the executable path config file
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(CONFIG_FILE)
    }
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the config file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the stored executable path
    pub fn load(&self) -> StoredPath {
        if !self.path.is_file() {
            return StoredPath::None;
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read {:?}: {}", self.path, e);
                return StoredPath::Invalid {
                    reason: e.to_string(),
                };
            }
        };

        let stored = PathBuf::from(content.trim());
        if util::is_executable(&stored) {
            tracing::debug!("Stored executable is valid: {:?}", stored);
            StoredPath::Valid(stored)
        } else {
            tracing::warn!("Stored executable is missing or not executable: {:?}", stored);
            StoredPath::Invalid {
                reason: format!("{} is missing or not executable", stored.display()),
            }
        }
    }

    /// Overwrite the config file with exactly `executable`
    pub fn save(&self, executable: &Path) -> Result<(), ConfigWriteError> {
        let write_error = |source| ConfigWriteError {
            path: self.path.clone(),
            source,
        };

        let text = executable.to_str().ok_or_else(|| {
            write_error(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{:?} is not valid UTF-8", executable),
            ))
        })?;
        std::fs::write(&self.path, text).map_err(write_error)?;

        tracing::info!("Executable path saved to {:?}", self.path);
        Ok(())
    }

    /// Record a user-chosen executable, bypassing download and discovery
    pub fn select(&self, executable: &Path) -> Result<PathBuf, SelectError> {
        if !executable.is_file() {
            return Err(SelectError::NotAFile(executable.to_path_buf()));
        }

        let permissions_error = |source| SelectError::Permissions {
            path: executable.to_path_buf(),
            source,
        };
        let executable = std::path::absolute(executable).map_err(permissions_error)?;
        util::make_executable(&executable).map_err(permissions_error)?;

        self.save(&executable)?;
        Ok(executable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> ConfigStore {
        ConfigStore::new(dir.path().join(CONFIG_FILE))
    }

    fn executable_in(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"#!/bin/sh\nexit 0\n").unwrap();
        util::make_executable(&path).unwrap();
        path
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store_in(&dir).load(), StoredPath::None);
    }

    #[test]
    fn test_save_then_load_valid() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let game = executable_in(&dir, "eaglercraft");

        store.save(&game).unwrap();
        assert_eq!(store.load(), StoredPath::Valid(game.clone()));
        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            game.to_string_lossy()
        );
    }

    #[test]
    fn test_save_nonexistent_then_load_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&dir.path().join("gone")).unwrap();
        assert!(matches!(store.load(), StoredPath::Invalid { .. }));
    }

    #[test]
    fn test_load_trims_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let game = executable_in(&dir, "eaglercraft");

        std::fs::write(store.path(), format!("  {}\n", game.display())).unwrap();
        assert_eq!(store.load(), StoredPath::Valid(game));
    }

    #[cfg(unix)]
    #[test]
    fn test_load_rejects_non_executable() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let plain = dir.path().join("notes.txt");
        std::fs::write(&plain, b"hello").unwrap();

        store.save(&plain).unwrap();
        assert!(matches!(store.load(), StoredPath::Invalid { .. }));
    }

    #[test]
    fn test_save_unwritable_location() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("missing").join(CONFIG_FILE));

        let err = store.save(Path::new("/usr/bin/true")).unwrap_err();
        assert_eq!(err.path, store.path());
    }

    #[test]
    fn test_select_marks_executable() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let game = dir.path().join("eaglercraft");
        std::fs::write(&game, b"#!/bin/sh\n").unwrap();

        let selected = store.select(&game).unwrap();
        assert_eq!(selected, game);
        assert_eq!(store.load(), StoredPath::Valid(game));
    }

    #[test]
    fn test_select_stores_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let file = tempfile::Builder::new()
            .prefix("zapgame")
            .tempfile_in(".")
            .unwrap();
        let bare = PathBuf::from(file.path().file_name().unwrap());

        let selected = store.select(&bare).unwrap();

        let expected = std::env::current_dir().unwrap().join(&bare);
        assert_eq!(selected, expected);
        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            expected.to_string_lossy()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_save_rejects_non_utf8_path() {
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let path = dir
            .path()
            .join(std::ffi::OsStr::from_bytes(b"games\xff"))
            .join("eaglercraft");

        let err = store.save(&path).unwrap_err();
        assert_eq!(err.source.kind(), std::io::ErrorKind::InvalidData);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_select_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let err = store.select(dir.path()).unwrap_err();
        assert!(matches!(err, SelectError::NotAFile(_)));
        assert_eq!(store.load(), StoredPath::None);
    }
}
