//! Archive extraction
//!
//! Unpacks the downloaded release into the install directory. The format
//! comes from the platform profile; file contents are never sniffed.

use crate::core::platform::ArchiveFormat;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Errors raised while unpacking an archive
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("archive entry {0:?} escapes the destination directory")]
    UnsafeEntry(String),
}

/// Unpack `archive` into `destination`, creating it if needed.
///
/// Tar permission bits are kept. Zip entries only get a mode when the archive
/// recorded one; otherwise callers set the executable bit themselves.
pub fn extract(
    format: ArchiveFormat,
    archive: &Path,
    destination: &Path,
) -> Result<(), ExtractError> {
    tracing::info!("Extracting {:?} ({:?}) to {:?}", archive, format, destination);
    std::fs::create_dir_all(destination)?;

    match format {
        ArchiveFormat::TarGz => extract_tar_gz(archive, destination)?,
        ArchiveFormat::Zip => {
            let count = extract_zip(archive, destination)?;
            tracing::debug!("Extracted {} zip entries", count);
        }
    }

    Ok(())
}

fn extract_tar_gz(archive: &Path, destination: &Path) -> Result<(), ExtractError> {
    let file = File::open(archive)?;
    let mut tar = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
    tar.set_preserve_permissions(true);
    tar.set_overwrite(true);
    tar.unpack(destination)?;
    Ok(())
}

fn extract_zip(archive: &Path, destination: &Path) -> Result<usize, ExtractError> {
    let file = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(BufReader::new(file))?;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let relative: PathBuf = entry
            .enclosed_name()
            .ok_or_else(|| ExtractError::UnsafeEntry(entry.name().to_string()))?;
        let path = destination.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&path)?;
            continue;
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut outfile = File::create(&path)?;
        std::io::copy(&mut entry, &mut outfile)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode & 0o777))?;
            }
        }
    }

    Ok(zip.len())
}


#[cfg(test)]
mod tests {
    use super::*;

    fn write_archive(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_extract_tar_gz() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = fixtures::tar_gz(&[
            ("bin/eaglercraft", 0o755, b"#!/bin/sh\nexit 0\n"),
            ("assets/readme.txt", 0o644, b"hello"),
        ]);
        let archive = write_archive(dir.path(), "game.tar.gz", &bytes);
        let out = dir.path().join("out");

        extract(ArchiveFormat::TarGz, &archive, &out).unwrap();

        assert_eq!(
            std::fs::read(out.join("assets/readme.txt")).unwrap(),
            b"hello"
        );
        assert!(crate::util::is_executable(&out.join("bin/eaglercraft")));
    }

    #[cfg(unix)]
    #[test]
    fn test_tar_keeps_plain_files_plain() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = fixtures::tar_gz(&[("eaglercraft", 0o644, b"data")]);
        let archive = write_archive(dir.path(), "game.tar.gz", &bytes);
        let out = dir.path().join("out");

        extract(ArchiveFormat::TarGz, &archive, &out).unwrap();
        assert!(!crate::util::is_executable(&out.join("eaglercraft")));
    }

    #[test]
    fn test_extract_zip() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = fixtures::zip(&[
            ("eaglercraft/eaglercraft.exe", b"MZ"),
            ("eaglercraft/resources/lang.txt", b"en_US"),
        ]);
        let archive = write_archive(dir.path(), "game.zip", &bytes);
        let out = dir.path().join("out");

        extract(ArchiveFormat::Zip, &archive, &out).unwrap();

        assert_eq!(
            std::fs::read(out.join("eaglercraft/eaglercraft.exe")).unwrap(),
            b"MZ"
        );
        assert!(out.join("eaglercraft/resources/lang.txt").is_file());
    }

    #[test]
    fn test_corrupted_archives_fail() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_archive(dir.path(), "broken", b"this is not an archive at all");

        for format in [ArchiveFormat::TarGz, ArchiveFormat::Zip] {
            let out = dir.path().join(format.extension());
            assert!(extract(format, &archive, &out).is_err());
        }
    }

    #[test]
    fn test_missing_archive() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract(
            ArchiveFormat::Zip,
            &dir.path().join("nope.zip"),
            &dir.path().join("out"),
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::Io(_)));
    }

    #[test]
    fn test_zip_rejects_escaping_entry() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = fixtures::zip(&[("../evil.txt", b"x")]);
        let archive = write_archive(dir.path(), "evil.zip", &bytes);
        let out = dir.path().join("out");

        let err = extract(ArchiveFormat::Zip, &archive, &out).unwrap_err();
        assert!(matches!(err, ExtractError::UnsafeEntry(_)));
        assert!(!dir.path().join("evil.txt").exists());
    }
}
