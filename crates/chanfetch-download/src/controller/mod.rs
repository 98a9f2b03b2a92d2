//! Channel download job controller.
//!
//! Turns a [`ChannelRequest`] into one yt-dlp run: prepares the destination,
//! starts the tool through the shared [`ProcessSupervisor`], parses both of
//! its output pipes and reports every event to the caller. Pause, resume and
//! cancel go through the same handle.

mod args;

pub use args::{build_args, channel_url, format_selector, output_dir};

use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::Arc;

use chanfetch_core::{
    ChannelRequest, JobError, JobResult, JobStatus, PathError, ProgressEvent, Settings,
    ensure_directory, resolve_tool_path,
};
use chanfetch_runtime::{
    ControlOutcome, ExitDisposition, JobTicket, OutputChunk, OutputStream, ProcessSupervisor,
    SupervisedChild, SupervisorError, spawn_chunk_reader,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::parser::StreamParser;

/// Chunks in flight between the pipe readers and the parser.
const CHUNK_CHANNEL_CAPACITY: usize = 64;

/// Runs channel downloads, one at a time.
///
/// Share it as `Arc<ChannelDownloader>`: one task awaits [`run`](Self::run)
/// while others call [`pause`](Self::pause), [`resume`](Self::resume) and
/// [`cancel`](Self::cancel).
pub struct ChannelDownloader {
    tool_path: PathBuf,
    supervisor: Arc<ProcessSupervisor>,
}

impl ChannelDownloader {
    /// Create a downloader that runs the tool at `tool_path`.
    pub fn new(tool_path: impl Into<PathBuf>) -> Self {
        Self::with_supervisor(tool_path, Arc::new(ProcessSupervisor::new()))
    }

    /// Create a downloader on top of an existing supervisor.
    pub fn with_supervisor(tool_path: impl Into<PathBuf>, supervisor: Arc<ProcessSupervisor>) -> Self {
        Self {
            tool_path: tool_path.into(),
            supervisor,
        }
    }

    /// Create a downloader for the tool configured in `settings`, falling
    /// back to the bundled binary.
    pub fn from_settings(settings: &Settings) -> Result<Self, PathError> {
        Ok(Self::new(resolve_tool_path(settings)?))
    }

    /// Path of the tool this downloader spawns.
    pub fn tool_path(&self) -> &Path {
        &self.tool_path
    }

    /// Run one job to completion.
    ///
    /// Every output line is reported as a `Log` event, progress lines also as
    /// `Progress`, and once the tool has exited a single `Done` closes the
    /// stream. A canceled job resolves `Ok(())` after
    /// `Done { success: false, canceled: true }`; a non-zero exit resolves
    /// `Err(ProcessFailed)` after `Done { success: false, .. }`. Errors raised
    /// before the tool starts emit no events at all.
    ///
    /// Dropping the returned future before it resolves kills the tool's
    /// process tree and frees the job slot.
    pub async fn run<F>(&self, request: &ChannelRequest, mut on_event: F) -> JobResult<()>
    where
        F: FnMut(ProgressEvent),
    {
        if let Some(pid) = self.supervisor.status().pid() {
            warn!(pid, "Rejecting download: a job is already running");
            return Err(JobError::Busy { pid });
        }

        let out_dir = output_dir(request);
        ensure_directory(&out_dir)?;

        let args = build_args(request, &out_dir);
        debug!(tool = %self.tool_path.display(), args = ?args, "Launching download tool");

        let SupervisedChild {
            mut child,
            stdout,
            stderr,
            ticket,
        } = self
            .supervisor
            .start(&self.tool_path, &args)
            .map_err(job_error_from_start)?;
        let guard = SlotGuard::new(&self.supervisor, ticket);

        info!(
            channel = %request.channel,
            filter = %request.filter,
            resolution = request.resolution,
            pid = guard.ticket.pid(),
            "Channel download started"
        );

        let (tx, mut rx) = mpsc::channel::<OutputChunk>(CHUNK_CHANNEL_CAPACITY);
        let stdout_task = spawn_chunk_reader(stdout, OutputStream::Stdout, tx.clone());
        let stderr_task = spawn_chunk_reader(stderr, OutputStream::Stderr, tx);

        let mut parser = StreamParser::new();
        while let Some(chunk) = rx.recv().await {
            for event in parser.feed_from(chunk.stream, &chunk.bytes) {
                on_event(event);
            }
        }
        for event in parser.finish() {
            on_event(event);
        }

        for task in [stdout_task, stderr_task] {
            if let Err(e) = task.await {
                warn!(error = %e, "Pipe reader task failed");
            }
        }

        let waited = child.wait().await;
        let disposition = guard.finish();

        if disposition.cancelled {
            info!(channel = %request.channel, "Channel download canceled");
            on_event(ProgressEvent::canceled());
            return Ok(());
        }

        let status = match waited {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "Failed to wait for download tool");
                on_event(ProgressEvent::finished(false));
                return Err(JobError::from_io_error(&e));
            }
        };

        let result = outcome_from_status(status);
        on_event(ProgressEvent::finished(result.is_ok()));

        match &result {
            Ok(()) => info!(channel = %request.channel, "Channel download finished"),
            Err(e) => warn!(channel = %request.channel, error = %e, "Channel download failed"),
        }
        result
    }

    /// Suspend the running job.
    pub fn pause(&self) -> ControlOutcome {
        self.supervisor.pause()
    }

    /// Continue a paused job.
    pub fn resume(&self) -> ControlOutcome {
        self.supervisor.resume()
    }

    /// Kill the running job's process tree.
    ///
    /// Returns once the kill is delivered; the pending `run` call reports
    /// the cancellation when it observes the exit.
    pub fn cancel(&self) -> ControlOutcome {
        self.supervisor.cancel()
    }

    pub fn status(&self) -> JobStatus {
        self.supervisor.status()
    }
}

/// Holds the job slot for the lifetime of one `run` call.
///
/// Dropped without [`finish`](Self::finish) means the `run` future was
/// dropped mid-job; the process tree is then killed and the slot freed.
struct SlotGuard<'a> {
    supervisor: &'a ProcessSupervisor,
    ticket: JobTicket,
    armed: bool,
}

impl<'a> SlotGuard<'a> {
    const fn new(supervisor: &'a ProcessSupervisor, ticket: JobTicket) -> Self {
        Self {
            supervisor,
            ticket,
            armed: true,
        }
    }

    /// Release the slot after the tool's exit has been observed.
    fn finish(mut self) -> ExitDisposition {
        self.armed = false;
        self.supervisor.release(&self.ticket)
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            debug!(pid = self.ticket.pid(), "Download dropped before exit");
            self.supervisor.abandon(&self.ticket);
        }
    }
}

fn outcome_from_status(status: ExitStatus) -> JobResult<()> {
    if status.success() {
        Ok(())
    } else {
        Err(JobError::ProcessFailed {
            code: status.code(),
        })
    }
}

fn job_error_from_start(err: SupervisorError) -> JobError {
    match err {
        SupervisorError::Busy { pid } => JobError::Busy { pid },
        other => JobError::spawn(other.to_string()),
    }
}
