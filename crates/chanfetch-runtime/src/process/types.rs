//! Shared types for process supervision.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chanfetch_core::SignalError;
use tokio::process::{Child, ChildStderr, ChildStdout};

/// Which pipe a chunk came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl OutputStream {
    /// Stream name for log fields.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// Raw bytes read from one of the child's pipes, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputChunk {
    pub stream: OutputStream,
    pub bytes: Vec<u8>,
}

/// Identity of one supervised job, held by whoever awaits its exit.
///
/// The cancellation flag lives here rather than on the supervisor so that a
/// cancel is attributed to the job it was aimed at, even after the slot has
/// been cleared or reused.
#[derive(Debug, Clone)]
pub struct JobTicket {
    pub(crate) id: u64,
    pub(crate) pid: u32,
    pub(crate) cancelled: Arc<AtomicBool>,
}

impl JobTicket {
    /// Supervisor-local job number.
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Process ID of the tool (also its process group ID on Unix).
    pub const fn pid(&self) -> u32 {
        self.pid
    }

    /// Whether a cancel was requested for this job.
    pub fn was_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// A freshly started tool with its output pipes detached.
pub struct SupervisedChild {
    pub child: Child,
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
    pub ticket: JobTicket,
}

impl fmt::Debug for SupervisedChild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupervisedChild")
            .field("ticket", &self.ticket)
            .finish_non_exhaustive()
    }
}

/// Result of a pause/resume/cancel request.
///
/// Only `Applied` changed anything; every other variant was logged as a
/// warning and left the job as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlOutcome {
    /// The signal was delivered and state updated.
    Applied,
    /// No job is active.
    NoActiveJob,
    /// The job is already paused (pause) or not paused (resume).
    AlreadyInState,
    /// A cancel is in flight; the job no longer accepts pause/resume.
    Terminating,
    /// The OS refused the signal.
    SignalFailed(SignalError),
}

impl ControlOutcome {
    /// Whether the request took effect.
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// How a job's exit should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitDisposition {
    /// A cancel was requested before the exit was observed.
    pub cancelled: bool,
}
