//! Destination folder preparation.

use std::fs;
use std::path::Path;

use super::error::PathError;

/// Make sure `path` is a directory, creating it and any missing parents.
///
/// An existing non-directory at `path` is an error; nothing is written
/// inside the directory.
pub fn ensure_directory(path: &Path) -> Result<(), PathError> {
    if path.as_os_str().is_empty() {
        return Err(PathError::EmptyPath);
    }
    if path.exists() && !path.is_dir() {
        return Err(PathError::NotADirectory(path.to_path_buf()));
    }

    // Succeeds when the directory is already there
    fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
