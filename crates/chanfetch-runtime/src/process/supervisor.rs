//! Single-slot process supervisor.
//!
//! Tracks at most one running download tool and applies pause, resume and
//! cancel to it. The slot is guarded by a `std::sync::Mutex` because control
//! requests may arrive from any thread while the job's own task awaits exit;
//! the lock is never held across an `.await`.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chanfetch_core::{JobStatus, ProcessSignaller, SignalError};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::signals::OsSignaller;
use super::types::{ControlOutcome, ExitDisposition, JobTicket, SupervisedChild};

/// Errors that can occur when starting a job.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// A job is already active; concurrent jobs are rejected.
    #[error("A job is already running (pid {pid})")]
    Busy { pid: u32 },

    /// The executable could not be started.
    #[error("Failed to spawn {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The child started but did not expose a required handle.
    #[error("Spawned process is missing its {0}")]
    MissingHandle(&'static str),
}

/// The job occupying the slot.
#[derive(Debug)]
struct ActiveJob {
    id: u64,
    pid: u32,
    paused: bool,
    terminating: bool,
    cancelled: Arc<AtomicBool>,
}

impl ActiveJob {
    const fn status(&self) -> JobStatus {
        if self.terminating {
            JobStatus::Cancelling { pid: self.pid }
        } else if self.paused {
            JobStatus::Paused { pid: self.pid }
        } else {
            JobStatus::Running { pid: self.pid }
        }
    }
}

/// Owner of the single download tool process.
pub struct ProcessSupervisor {
    slot: Mutex<Option<ActiveJob>>,
    signaller: Arc<dyn ProcessSignaller>,
    next_id: AtomicU64,
}

impl ProcessSupervisor {
    /// Create a supervisor that signals real processes.
    pub fn new() -> Self {
        Self::with_signaller(Arc::new(OsSignaller::new()))
    }

    /// Create a supervisor with an injected signalling capability.
    pub fn with_signaller(signaller: Arc<dyn ProcessSignaller>) -> Self {
        Self {
            slot: Mutex::new(None),
            signaller,
            next_id: AtomicU64::new(1),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<ActiveJob>> {
        // A panic while holding the lock cannot leave the slot half-written
        self.slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Spawn `executable` with `args` as the active job.
    ///
    /// Stdout and stderr are piped, stdin is closed. On Unix the child leads
    /// a new process group so signals reach every helper it forks.
    pub fn start(
        &self,
        executable: &Path,
        args: &[String],
    ) -> Result<SupervisedChild, SupervisorError> {
        let mut slot = self.slot();
        if let Some(active) = slot.as_ref() {
            warn!(pid = %active.pid, "Rejecting start: a job is already running");
            return Err(SupervisorError::Busy { pid: active.pid });
        }

        let mut cmd = Command::new(executable);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd.spawn().map_err(|source| SupervisorError::Spawn {
            path: executable.to_path_buf(),
            source,
        })?;

        let Some(pid) = child.id() else {
            let _ = child.start_kill();
            return Err(SupervisorError::MissingHandle("pid"));
        };
        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            let _ = child.start_kill();
            return Err(SupervisorError::MissingHandle("output pipes"));
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let cancelled = Arc::new(AtomicBool::new(false));
        *slot = Some(ActiveJob {
            id,
            pid,
            paused: false,
            terminating: false,
            cancelled: Arc::clone(&cancelled),
        });

        info!(job = %id, pid = %pid, executable = %executable.display(), "Started download tool");

        Ok(SupervisedChild {
            child,
            stdout,
            stderr,
            ticket: JobTicket { id, pid, cancelled },
        })
    }

    /// Suspend the active job.
    ///
    /// No-op (logged) when idle, already paused, or being cancelled.
    pub fn pause(&self) -> ControlOutcome {
        let mut slot = self.slot();
        let Some(job) = slot.as_mut() else {
            warn!("Cannot pause: no active download");
            return ControlOutcome::NoActiveJob;
        };
        if job.terminating {
            warn!(pid = %job.pid, "Cannot pause: download is being cancelled");
            return ControlOutcome::Terminating;
        }
        if job.paused {
            warn!(pid = %job.pid, "Cannot pause: download already paused");
            return ControlOutcome::AlreadyInState;
        }

        match self.signaller.suspend(job.pid) {
            Ok(()) => {
                job.paused = true;
                info!(pid = %job.pid, "Download paused");
                ControlOutcome::Applied
            }
            Err(e) => {
                warn!(pid = %job.pid, error = %e, "Failed to pause download");
                ControlOutcome::SignalFailed(e)
            }
        }
    }

    /// Continue a paused job.
    ///
    /// No-op (logged) when idle, not paused, or being cancelled.
    pub fn resume(&self) -> ControlOutcome {
        let mut slot = self.slot();
        let Some(job) = slot.as_mut() else {
            warn!("Cannot resume: no active download");
            return ControlOutcome::NoActiveJob;
        };
        if job.terminating {
            warn!(pid = %job.pid, "Cannot resume: download is being cancelled");
            return ControlOutcome::Terminating;
        }
        if !job.paused {
            warn!(pid = %job.pid, "Cannot resume: download is not paused");
            return ControlOutcome::AlreadyInState;
        }

        match self.signaller.resume(job.pid) {
            Ok(()) => {
                job.paused = false;
                info!(pid = %job.pid, "Download resumed");
                ControlOutcome::Applied
            }
            Err(e) => {
                warn!(pid = %job.pid, error = %e, "Failed to resume download");
                ControlOutcome::SignalFailed(e)
            }
        }
    }

    /// Cancel the active job by killing its whole process tree.
    ///
    /// The job is marked cancelled before the kill so its exit is reported
    /// as a cancellation. The slot is cleared once the kill is delivered;
    /// this does not wait for the process to exit.
    pub fn cancel(&self) -> ControlOutcome {
        let mut slot = self.slot();
        let Some(job) = slot.as_mut() else {
            warn!("Cannot cancel: no active download");
            return ControlOutcome::NoActiveJob;
        };

        job.cancelled.store(true, Ordering::SeqCst);
        job.terminating = true;
        let pid = job.pid;

        match self.signaller.terminate_tree(pid) {
            Ok(()) => {
                *slot = None;
                info!(pid = %pid, "Download canceled");
                ControlOutcome::Applied
            }
            Err(e) if is_gone(&e) => {
                // Exited on its own between the last read and the kill
                *slot = None;
                debug!(pid = %pid, "Download already exited when canceled");
                ControlOutcome::Applied
            }
            Err(e) => {
                warn!(pid = %pid, error = %e, "Failed to cancel download");
                ControlOutcome::SignalFailed(e)
            }
        }
    }

    /// Record that the ticket's process has exited.
    ///
    /// Clears the slot if it still holds this job and reports whether the
    /// exit was caused by a cancel.
    pub fn release(&self, ticket: &JobTicket) -> ExitDisposition {
        let mut slot = self.slot();
        if slot.as_ref().is_some_and(|job| job.id == ticket.id) {
            *slot = None;
            debug!(job = %ticket.id, pid = %ticket.pid, "Released job slot");
        }
        ExitDisposition {
            cancelled: ticket.was_cancelled(),
        }
    }

    /// Snapshot of the slot.
    pub fn status(&self) -> JobStatus {
        self.slot()
            .as_ref()
            .map_or(JobStatus::Idle, ActiveJob::status)
    }

    /// Whether a job occupies the slot.
    pub fn is_active(&self) -> bool {
        self.slot().is_some()
    }

    /// Tear down a job whose owner stopped waiting for it.
    ///
    /// Kills the ticket's process tree and frees the slot if it still holds
    /// this job. Nobody is left to observe the exit, so the slot is freed
    /// even when the kill fails.
    pub fn abandon(&self, ticket: &JobTicket) {
        let mut slot = self.slot();
        if !slot.as_ref().is_some_and(|job| job.id == ticket.id) {
            return;
        }

        ticket.cancelled.store(true, Ordering::SeqCst);
        match self.signaller.terminate_tree(ticket.pid) {
            Ok(()) => info!(job = %ticket.id, pid = %ticket.pid, "Abandoned download killed"),
            Err(e) if is_gone(&e) => {
                debug!(job = %ticket.id, pid = %ticket.pid, "Abandoned download already exited");
            }
            Err(e) => {
                warn!(pid = %ticket.pid, error = %e, "Failed to kill abandoned download");
            }
        }
        *slot = None;
    }
}

impl Default for ProcessSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a signal error means the target is already gone.
const fn is_gone(err: &SignalError) -> bool {
    matches!(err, SignalError::NoSuchProcess(_))
}
