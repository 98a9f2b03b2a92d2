//! Platform-specific detection: host OS, execution mode and resource roots.
//!
//! Public API is exposed through sibling modules; the functions here are the
//! only place that reads the process environment for path purposes.

use std::env;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::error::PathError;

/// Operating systems that ship a bundled download tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostPlatform {
    Windows,
    MacOs,
    Linux,
}

impl HostPlatform {
    /// Map an OS identifier (as in `std::env::consts::OS`) to a platform.
    pub fn from_os(os: &str) -> Result<Self, PathError> {
        match os {
            "windows" => Ok(Self::Windows),
            "macos" => Ok(Self::MacOs),
            "linux" => Ok(Self::Linux),
            other => Err(PathError::UnsupportedPlatform(other.to_string())),
        }
    }

    /// Detect the platform this binary runs on.
    ///
    /// Front-ends call this at startup so an unsupported host fails before
    /// any download is attempted.
    pub fn current() -> Result<Self, PathError> {
        Self::from_os(env::consts::OS)
    }

    /// File name of the bundled tool build for this platform.
    #[must_use]
    pub fn binary_name(&self, base: &str) -> String {
        match self {
            Self::Windows => format!("{base}.exe"),
            Self::MacOs => format!("{base}_macos"),
            Self::Linux => format!("{base}_linux"),
        }
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Windows => "windows",
            Self::MacOs => "macos",
            Self::Linux => "linux",
        })
    }
}

/// Whether the application runs from its source tree or as an installed bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Running from the repository (`cargo run`); resources live in the tree.
    Development,
    /// Installed build; resources live next to the executable.
    Packaged,
}

impl ExecutionMode {
    /// Mode implied by the build profile alone.
    #[must_use]
    pub const fn from_build() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Packaged
        }
    }

    /// Parse an explicit override value, falling back to the build profile.
    pub fn from_override(value: Option<&str>) -> Result<Self, PathError> {
        match value.map(str::trim) {
            None | Some("") => Ok(Self::from_build()),
            Some(v) if v.eq_ignore_ascii_case("development") || v.eq_ignore_ascii_case("dev") => {
                Ok(Self::Development)
            }
            Some(v) if v.eq_ignore_ascii_case("packaged") || v.eq_ignore_ascii_case("release") => {
                Ok(Self::Packaged)
            }
            Some(other) => Err(PathError::UnknownMode(other.to_string())),
        }
    }

    /// Detect the mode, honouring `CHANFETCH_MODE`.
    pub fn detect() -> Result<Self, PathError> {
        Self::from_override(env::var("CHANFETCH_MODE").ok().as_deref())
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Development => "development",
            Self::Packaged => "packaged",
        })
    }
}

/// Root of the source tree this binary was built from.
pub fn repo_root() -> PathBuf {
    PathBuf::from(env!("CHANFETCH_REPO_ROOT"))
}

/// Get the root directory for runtime resources of a packaged build.
///
/// Resolution order:
/// 1. `CHANFETCH_RESOURCE_DIR` environment variable
/// 2. `resources/` next to the running executable
pub fn resource_root() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var("CHANFETCH_RESOURCE_DIR") {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let exe = env::current_exe().map_err(|e| PathError::NoExecutableDir(e.to_string()))?;
    let dir = exe
        .parent()
        .ok_or_else(|| PathError::NoExecutableDir(exe.display().to_string()))?;
    Ok(dir.join("resources"))
}
