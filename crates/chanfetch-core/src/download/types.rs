//! Download request and status types.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::errors::JobError;

/// Heights offered by the desktop front-end's resolution picker.
pub const STANDARD_RESOLUTIONS: [u32; 4] = [360, 480, 720, 1080];

/// Resolution used when the caller does not pick one.
pub const DEFAULT_RESOLUTION: u32 = 720;

/// Which section of a channel to download.
///
/// Each variant except `All` maps to the channel tab of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFilter {
    /// The channel root listing.
    All,
    /// Regular uploads only.
    #[default]
    Videos,
    /// Shorts only.
    Shorts,
    /// Every playlist published by the channel.
    Playlists,
}

impl ContentFilter {
    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Videos => "videos",
            Self::Shorts => "shorts",
            Self::Playlists => "playlists",
        }
    }

    /// Path segment appended to the channel URL (empty for `All`).
    #[must_use]
    pub const fn url_suffix(&self) -> &'static str {
        match self {
            Self::All => "",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for ContentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`ContentFilter`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown content filter '{0}' (expected one of: all, videos, shorts, playlists)")]
pub struct UnknownFilter(pub String);

impl FromStr for ContentFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "videos" => Ok(Self::Videos),
            "shorts" => Ok(Self::Shorts),
            "playlists" => Ok(Self::Playlists),
            _ => Err(UnknownFilter(s.to_string())),
        }
    }
}

/// Parameters of a single "download from channel" job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRequest {
    /// Channel handle without the leading `@`.
    pub channel: String,
    /// Target video height in pixels.
    pub resolution: u32,
    /// Directory under which the `@<channel>` folder is created.
    pub destination_root: PathBuf,
    /// Section of the channel to fetch.
    pub filter: ContentFilter,
}

impl ChannelRequest {
    /// Build a validated request.
    ///
    /// The channel handle is trimmed and a leading `@` is stripped, so both
    /// `foo` and `@foo` name the same channel.
    pub fn new(
        channel: impl AsRef<str>,
        resolution: u32,
        destination_root: impl Into<PathBuf>,
        filter: ContentFilter,
    ) -> Result<Self, JobError> {
        let channel = channel.as_ref().trim();
        let channel = channel.strip_prefix('@').unwrap_or(channel).trim();

        if channel.is_empty() {
            return Err(JobError::invalid_request("channel cannot be empty"));
        }
        if channel.contains(['/', '\\']) || channel.chars().any(char::is_whitespace) {
            return Err(JobError::invalid_request(format!(
                "'{channel}' is not a channel handle"
            )));
        }
        if resolution == 0 {
            return Err(JobError::invalid_request("resolution must be greater than zero"));
        }

        Ok(Self {
            channel: channel.to_string(),
            resolution,
            destination_root: destination_root.into(),
            filter,
        })
    }

    /// Whether the resolution is one the desktop picker offered.
    #[must_use]
    pub fn is_standard_resolution(&self) -> bool {
        STANDARD_RESOLUTIONS.contains(&self.resolution)
    }
}

/// Snapshot of the supervisor's single job slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum JobStatus {
    /// No job is active.
    Idle,
    /// The tool is running.
    Running { pid: u32 },
    /// The tool's process group is suspended.
    Paused { pid: u32 },
    /// A cancel was requested and the tree kill has not been confirmed.
    Cancelling { pid: u32 },
}

impl JobStatus {
    /// Whether a job occupies the slot.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Process ID of the job occupying the slot.
    #[must_use]
    pub const fn pid(&self) -> Option<u32> {
        match *self {
            Self::Running { pid } | Self::Paused { pid } | Self::Cancelling { pid } => Some(pid),
            Self::Idle => None,
        }
    }
}
