//! Host platform detection.
use std::fmt;

/// Platform names a manifest may declare in its `platform` field.
pub const SUPPORTED_MANIFEST_PLATFORMS: &[&str] = &["macos", "debian"];

/// Detected operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Linux of any distribution.
    Linux,
    /// Apple macOS.
    MacOs,
    /// Another Unix-like system (BSDs, illumos, ...).
    OtherUnix,
    /// Microsoft Windows.
    Windows,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::MacOs => write!(f, "macos"),
            Self::OtherUnix => write!(f, "unix"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

/// Platform information for the current host.
#[derive(Debug, Clone)]
pub struct Platform {
    /// Operating system family.
    pub os: Os,
    /// Whether the host is a Debian-based Linux distribution.
    pub is_debian: bool,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            os: Self::detect_os(),
            is_debian: Self::detect_debian(),
        }
    }

    /// Create a platform with explicit values.
    #[must_use]
    pub const fn new(os: Os, is_debian: bool) -> Self {
        Self { os, is_debian }
    }

    /// Whether the host is a POSIX system able to run `sh -c`.
    #[must_use]
    pub const fn is_posix(&self) -> bool {
        !matches!(self.os, Os::Windows)
    }

    /// Check whether a manifest declared for `platform` targets this host.
    ///
    /// Unknown platform names never match; callers report those separately.
    #[must_use]
    pub fn matches_manifest_platform(&self, platform: &str) -> bool {
        match platform {
            "macos" => self.os == Os::MacOs,
            "debian" => self.os == Os::Linux && self.is_debian,
            _ => false,
        }
    }

    fn detect_os() -> Os {
        if cfg!(target_os = "linux") {
            Os::Linux
        } else if cfg!(target_os = "macos") {
            Os::MacOs
        } else if cfg!(target_os = "windows") {
            Os::Windows
        } else {
            Os::OtherUnix
        }
    }

    fn detect_debian() -> bool {
        cfg!(target_os = "linux") && std::path::Path::new("/etc/debian_version").exists()
    }
}

/// Whether `platform` is one of [`SUPPORTED_MANIFEST_PLATFORMS`].
#[must_use]
pub fn is_supported_manifest_platform(platform: &str) -> bool {
    SUPPORTED_MANIFEST_PLATFORMS.contains(&platform)
}
