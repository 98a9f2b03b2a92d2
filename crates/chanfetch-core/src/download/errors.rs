//! Job error types.
//!
//! Like the events, these are serializable so front-ends can forward them
//! verbatim. I/O and path failures are captured as strings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paths::PathError;

/// Error type for the single outcome of a channel download job.
///
/// Cancellation is deliberately absent: a canceled job resolves successfully
/// after emitting `Done { canceled: true }`.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum JobError {
    /// The request parameters were rejected before anything ran.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Another job already occupies the supervisor.
    #[error("A download is already running (pid {pid})")]
    Busy {
        /// Process ID of the active job.
        pid: u32,
    },

    /// The destination directory could not be prepared.
    #[error("Destination unavailable: {0}")]
    Destination(String),

    /// The tool could not be started (missing binary, permission denied, ...).
    #[error("Failed to start download tool: {0}")]
    Spawn(String),

    /// The tool exited unsuccessfully.
    #[error("Download failed with code {}", display_code(.code))]
    ProcessFailed {
        /// Exit code, or `None` when the process was killed by a signal.
        code: Option<i32>,
    },

    /// Reading the tool's output or waiting for it failed.
    #[error("I/O error: {0}")]
    Io(String),
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

impl JobError {
    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a spawn error.
    pub fn spawn(message: impl Into<String>) -> Self {
        Self::Spawn(message.into())
    }

    /// Create an I/O error from a `std::io::Error`.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        Self::Io(err.to_string())
    }

    /// Exit code carried by a process failure.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ProcessFailed { code } => *code,
            _ => None,
        }
    }

    /// Whether the tool never started (no `Done` event was emitted).
    #[must_use]
    pub const fn is_pre_spawn(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest(_) | Self::Busy { .. } | Self::Destination(_) | Self::Spawn(_)
        )
    }

    /// Convert to a user-friendly message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidRequest(message) => format!("Check the download settings: {message}"),
            Self::Busy { .. } => {
                "A download is already in progress. Cancel it or wait for it to finish.".to_string()
            }
            Self::Destination(message) => format!("Cannot write to the save folder: {message}"),
            Self::Spawn(message) => {
                format!("The download tool could not be started ({message}). Is it installed?")
            }
            Self::ProcessFailed { code: Some(code) } => {
                format!("The download tool stopped with exit code {code}.")
            }
            Self::ProcessFailed { code: None } => {
                "The download tool was terminated unexpectedly.".to_string()
            }
            Self::Io(message) => format!("Lost contact with the download tool: {message}"),
        }
    }
}

impl From<PathError> for JobError {
    fn from(err: PathError) -> Self {
        Self::Destination(err.to_string())
    }
}

/// Convenience result type for job operations.
pub type JobResult<T> = Result<T, JobError>;
