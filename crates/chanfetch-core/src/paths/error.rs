//! Path-related error types.
//!
//! Provides semantic errors for path operations without exposing
//! implementation details or adapter-specific concerns.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during path resolution and directory operations.
#[derive(Debug, Error)]
pub enum PathError {
    /// The host operating system has no bundled tool build.
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// `CHANFETCH_MODE` holds something other than `development` or `packaged`.
    #[error("Unknown execution mode '{0}' (expected 'development' or 'packaged')")]
    UnknownMode(String),

    /// The directory of the running executable could not be determined.
    #[error("Cannot determine executable directory: {0}")]
    NoExecutableDir(String),

    /// A path was expected to be a directory but was not.
    #[error("{0} exists but is not a directory")]
    NotADirectory(PathBuf),

    /// Failed to create a directory.
    #[error("Failed to create directory {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },

    /// An empty path was provided.
    #[error("Path cannot be empty")]
    EmptyPath,
}
