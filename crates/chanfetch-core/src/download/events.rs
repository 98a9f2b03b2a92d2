//! Progress events - discriminated union for everything a job reports.

use serde::{Deserialize, Serialize};

/// Single discriminated union for all job output.
///
/// Front-ends handle this as a tagged union:
///
/// ```typescript
/// type ProgressEvent =
///   | { type: "progress"; percent: number; speed: string; eta: string; filename: string }
///   | { type: "log"; message: string }
///   | { type: "done"; success: boolean; canceled: boolean };
/// ```
///
/// `Done` is terminal: exactly one is emitted per spawned job and nothing
/// follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProgressEvent {
    /// A download percentage line from the tool.
    Progress {
        /// Completion of the current file, clamped to `0.0..=100.0`.
        percent: f64,
        /// Speed token exactly as printed by the tool (e.g. `1.2MiB/s`).
        speed: String,
        /// ETA token exactly as printed by the tool (e.g. `00:05`).
        eta: String,
        /// Basename of the file currently being written, or empty.
        filename: String,
    },

    /// One raw, trimmed, non-empty output line.
    Log {
        /// The line content.
        message: String,
    },

    /// The job finished.
    Done {
        /// Whether the tool exited with code 0.
        success: bool,
        /// Whether the job ended because of a cancel request.
        #[serde(default)]
        canceled: bool,
    },
}

impl ProgressEvent {
    /// Create a log event.
    pub fn log(message: impl Into<String>) -> Self {
        Self::Log {
            message: message.into(),
        }
    }

    /// Create the terminal event for a job whose tool exited on its own.
    #[must_use]
    pub const fn finished(success: bool) -> Self {
        Self::Done {
            success,
            canceled: false,
        }
    }

    /// Create the terminal event for a canceled job.
    #[must_use]
    pub const fn canceled() -> Self {
        Self::Done {
            success: false,
            canceled: true,
        }
    }

    /// Whether this is the terminal event.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_serialization() {
        let event = ProgressEvent::Progress {
            percent: 45.2,
            speed: "1.2MiB/s".to_string(),
            eta: "00:05".to_string(),
            filename: "1-Title.mp4".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"progress\""));
        assert!(json.contains("\"percent\":45.2"));
        assert!(json.contains("\"filename\":\"1-Title.mp4\""));
    }

    #[test]
    fn test_done_defaults_canceled_when_absent() {
        let parsed: ProgressEvent =
            serde_json::from_str(r#"{"type":"done","success":true}"#).unwrap();
        assert_eq!(parsed, ProgressEvent::finished(true));
    }

    #[test]
    fn test_canceled_is_not_success() {
        let event = ProgressEvent::canceled();
        assert!(event.is_done());
        assert_eq!(
            event,
            ProgressEvent::Done {
                success: false,
                canceled: true
            }
        );
    }
}
