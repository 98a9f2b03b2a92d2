//! Bundled download tool binary path resolution.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::PathError;
use super::platform::{ExecutionMode, HostPlatform, repo_root, resource_root};
use crate::settings::Settings;

/// Base name of the bundled tool; the platform adds its suffix.
pub const TOOL_BASE_NAME: &str = "yt-dlp";

/// Candidate directories that contain `bin/<tool>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRoots {
    /// Used in development mode (the source tree's `resources/`).
    pub development: PathBuf,
    /// Used in packaged mode (the runtime resource directory).
    pub packaged: PathBuf,
}

impl ToolRoots {
    /// Create roots from explicit directories.
    pub fn new(development: impl Into<PathBuf>, packaged: impl Into<PathBuf>) -> Self {
        Self {
            development: development.into(),
            packaged: packaged.into(),
        }
    }

    /// Roots of the current installation.
    pub fn detect() -> Result<Self, PathError> {
        Ok(Self {
            development: repo_root().join("resources"),
            packaged: resource_root()?,
        })
    }

    fn for_mode(&self, mode: ExecutionMode) -> &Path {
        match mode {
            ExecutionMode::Development => &self.development,
            ExecutionMode::Packaged => &self.packaged,
        }
    }
}

/// Compute where the bundled tool lives. Pure; touches nothing on disk.
pub fn locate_tool(platform: HostPlatform, mode: ExecutionMode, roots: &ToolRoots) -> PathBuf {
    roots
        .for_mode(mode)
        .join("bin")
        .join(platform.binary_name(TOOL_BASE_NAME))
}

/// Resolve the tool path for this process.
///
/// An explicit `tool_path` in settings wins; otherwise the bundled binary for
/// the detected platform and execution mode is used.
pub fn resolve_tool_path(settings: &Settings) -> Result<PathBuf, PathError> {
    if let Some(path) = settings.tool_path.as_ref() {
        debug!(path = %path.display(), "Using configured tool path");
        return Ok(path.clone());
    }

    let platform = HostPlatform::current()?;
    let mode = ExecutionMode::detect()?;
    let roots = ToolRoots::detect()?;
    let path = locate_tool(platform, mode, &roots);
    debug!(%platform, %mode, path = %path.display(), "Resolved bundled tool path");
    Ok(path)
}
