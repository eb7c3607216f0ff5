//! Platform profiles
//!
//! Everything that differs between hosts (archive format, download URL,
//! GPU probe, executable discovery rule) lives in one value selected at startup.

use glob::Pattern;
use std::fmt;

/// Release archive for Linux and other POSIX hosts
pub const POSIX_ARCHIVE_URL: &str =
    "https://github.com/ZohanHaqu/eaglercraftwindows/releases/download/1.0/eaglercraft.tar.gz";

/// Release archive for Windows
pub const WINDOWS_ARCHIVE_URL: &str =
    "https://github.com/ZohanHaqu/eaglercraftwindows/releases/download/1.0/eaglercraft.zip";

/// Directory (relative to the work dir) the archive is extracted into
pub const EXTRACT_DIR_NAME: &str = "eaglercraft";

/// Host family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    Posix,
    Windows,
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformKind::Posix => write!(f, "posix"),
            PlatformKind::Windows => write!(f, "windows"),
        }
    }
}

/// Archive container format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    Zip,
}

impl ArchiveFormat {
    /// File extension used when storing the downloaded archive
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::TarGz => "tar.gz",
            ArchiveFormat::Zip => "zip",
        }
    }
}

/// What part of an entry's path the discovery pattern is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchScope {
    /// Only the final path component, anywhere in the tree
    FileName,
    /// The whole path relative to the extraction root, `/`-separated
    RelativePath,
}

/// Policy for finding the game binary inside an extracted tree
#[derive(Debug, Clone)]
pub struct DiscoveryRule {
    pub pattern: Pattern,
    pub scope: MatchScope,
    /// Set the executable bit on the match before it is used
    pub force_executable: bool,
}

impl DiscoveryRule {
    /// First file named `eaglercraft`, wherever it sits
    pub fn posix() -> Self {
        Self {
            pattern: Pattern::new("eaglercraft").expect("literal pattern"),
            scope: MatchScope::FileName,
            force_executable: true,
        }
    }

    /// The fixed `eaglercraft/eaglercraft.exe` location
    pub fn windows() -> Self {
        Self {
            pattern: Pattern::new("eaglercraft/eaglercraft.exe").expect("literal pattern"),
            scope: MatchScope::RelativePath,
            force_executable: false,
        }
    }
}

/// Read-only system query used for the GPU warning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuProbe {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl GpuProbe {
    pub const LSPCI: GpuProbe = GpuProbe {
        program: "lspci",
        args: &[],
    };
    pub const WMIC: GpuProbe = GpuProbe {
        program: "wmic",
        args: &["path", "win32_VideoController", "get", "name"],
    };
    pub const SYSTEM_PROFILER: GpuProbe = GpuProbe {
        program: "system_profiler",
        args: &["SPDisplaysDataType"],
    };
}

/// Host has no published build
#[derive(Debug, Clone, thiserror::Error)]
#[error("no Eaglercraft build is published for {os}")]
pub struct UnsupportedPlatform {
    pub os: &'static str,
    /// Probe still works on unsupported hosts
    pub gpu_probe: Option<GpuProbe>,
}

/// Static per-platform settings
#[derive(Debug, Clone)]
pub struct PlatformProfile {
    pub kind: PlatformKind,
    pub format: ArchiveFormat,
    pub archive_url: String,
    pub gpu_probe: GpuProbe,
    pub discovery: DiscoveryRule,
}

impl PlatformProfile {
    pub fn posix() -> Self {
        Self {
            kind: PlatformKind::Posix,
            format: ArchiveFormat::TarGz,
            archive_url: POSIX_ARCHIVE_URL.to_string(),
            gpu_probe: GpuProbe::LSPCI,
            discovery: DiscoveryRule::posix(),
        }
    }

    pub fn windows() -> Self {
        Self {
            kind: PlatformKind::Windows,
            format: ArchiveFormat::Zip,
            archive_url: WINDOWS_ARCHIVE_URL.to_string(),
            gpu_probe: GpuProbe::WMIC,
            discovery: DiscoveryRule::windows(),
        }
    }

    /// Select the profile for the host this binary was built for
    pub fn detect() -> Result<Self, UnsupportedPlatform> {
        Self::for_os(std::env::consts::OS)
    }

    /// Select the profile for an `std::env::consts::OS` value
    pub fn for_os(os: &str) -> Result<Self, UnsupportedPlatform> {
        match os {
            "windows" => Ok(Self::windows()),
            "macos" => Err(UnsupportedPlatform {
                os: "macOS",
                gpu_probe: Some(GpuProbe::SYSTEM_PROFILER),
            }),
            "linux" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => Ok(Self::posix()),
            _ => Err(UnsupportedPlatform {
                os: "this operating system",
                gpu_probe: None,
            }),
        }
    }

    /// Replace the download location (settings override, test servers)
    pub fn with_archive_url(mut self, url: impl Into<String>) -> Self {
        self.archive_url = url.into();
        self
    }

    /// File name the downloaded archive is stored under
    pub fn archive_file_name(&self) -> String {
        format!("{}.{}", EXTRACT_DIR_NAME, self.format.extension())
    }
}
