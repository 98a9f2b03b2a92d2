//! Settings domain types and validation.
//!
//! Settings come from the environment (optionally seeded from a `.env` file
//! by the front-end). All fields are optional; effective-value accessors
//! apply defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::download::{ContentFilter, DEFAULT_RESOLUTION};

/// Overrides the bundled tool with an explicit binary.
pub const ENV_TOOL_PATH: &str = "CHANFETCH_YTDLP_PATH";
/// Default destination root.
pub const ENV_DOWNLOAD_DIR: &str = "CHANFETCH_DOWNLOAD_DIR";
/// Default resolution (video height).
pub const ENV_RESOLUTION: &str = "CHANFETCH_RESOLUTION";
/// Default content filter.
pub const ENV_FILTER: &str = "CHANFETCH_FILTER";

/// Application settings structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Explicit path to the download tool, bypassing the bundled binary.
    pub tool_path: Option<PathBuf>,

    /// Default directory under which channel folders are created.
    pub download_root: Option<PathBuf>,

    /// Default target height.
    pub default_resolution: Option<u32>,

    /// Default channel section.
    pub default_filter: Option<ContentFilter>,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let default_resolution = non_empty(ENV_RESOLUTION)
            .map(|raw| {
                let trimmed = raw.trim().trim_end_matches(['p', 'P']);
                trimmed
                    .parse::<u32>()
                    .map_err(|_| SettingsError::InvalidResolutionValue(raw.clone()))
            })
            .transpose()?;

        let default_filter = non_empty(ENV_FILTER)
            .map(|raw| {
                raw.parse::<ContentFilter>()
                    .map_err(|_| SettingsError::InvalidFilter(raw.clone()))
            })
            .transpose()?;

        let settings = Self {
            tool_path: non_empty(ENV_TOOL_PATH).map(PathBuf::from),
            download_root: non_empty(ENV_DOWNLOAD_DIR).map(PathBuf::from),
            default_resolution,
            default_filter,
        };
        validate_settings(&settings)?;
        Ok(settings)
    }

    /// Get the effective resolution (with default fallback).
    #[must_use]
    pub const fn effective_resolution(&self) -> u32 {
        match self.default_resolution {
            Some(resolution) => resolution,
            None => DEFAULT_RESOLUTION,
        }
    }

    /// Get the effective content filter (with default fallback).
    #[must_use]
    pub fn effective_filter(&self) -> ContentFilter {
        self.default_filter.unwrap_or_default()
    }

    /// Get the effective download root.
    ///
    /// Falls back to the user's download directory, then the current directory.
    #[must_use]
    pub fn effective_download_root(&self) -> PathBuf {
        self.download_root
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Resolution must be between 144 and 4320, got {0}")]
    InvalidResolution(u32),

    #[error("Resolution '{0}' is not a number")]
    InvalidResolutionValue(String),

    #[error("Unknown content filter '{0}'")]
    InvalidFilter(String),

    #[error("Tool path cannot be empty")]
    EmptyToolPath,

    #[error("Download path cannot be empty")]
    EmptyDownloadPath,
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(resolution) = settings.default_resolution {
        if !(144..=4320).contains(&resolution) {
            return Err(SettingsError::InvalidResolution(resolution));
        }
    }

    if settings
        .tool_path
        .as_ref()
        .is_some_and(|p| p.as_os_str().is_empty())
    {
        return Err(SettingsError::EmptyToolPath);
    }

    if settings
        .download_root
        .as_ref()
        .is_some_and(|p| p.as_os_str().is_empty())
    {
        return Err(SettingsError::EmptyDownloadPath);
    }

    Ok(())
}
