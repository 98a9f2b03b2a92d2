//! Download command handler.
//!
//! Runs one channel job on a background task and renders its events while
//! listening for control keys and Ctrl+C.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chanfetch_core::{ChannelRequest, ContentFilter, JobError, ProgressEvent, Settings};
use chanfetch_download::{ChannelDownloader, ControlOutcome, output_dir};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::bootstrap::CliContext;
use crate::presentation::{DownloadProgressPrinter, JobKey, spawn_key_reader};

/// Arguments for the download command.
#[derive(Debug, Clone)]
pub struct DownloadArgs {
    pub channel: String,
    pub resolution: Option<u32>,
    pub output: Option<PathBuf>,
    pub filter: Option<ContentFilter>,
}

/// Merge CLI flags over settings into a validated request.
pub fn build_request(settings: &Settings, args: &DownloadArgs) -> Result<ChannelRequest, JobError> {
    ChannelRequest::new(
        &args.channel,
        args.resolution
            .unwrap_or_else(|| settings.effective_resolution()),
        args.output
            .clone()
            .unwrap_or_else(|| settings.effective_download_root()),
        args.filter.unwrap_or_else(|| settings.effective_filter()),
    )
}

/// Execute the download command.
pub async fn execute(ctx: &CliContext, args: DownloadArgs) -> Result<()> {
    let request = build_request(&ctx.settings, &args)?;
    if !request.is_standard_resolution() {
        warn!(
            resolution = request.resolution,
            "Non-standard resolution; yt-dlp falls back to the best available format"
        );
    }

    println!(
        "Downloading @{} ({}, {}p) into {}",
        request.channel,
        request.filter,
        request.resolution,
        output_dir(&request).display()
    );

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let job = {
        let downloader = Arc::clone(&ctx.downloader);
        tokio::spawn(async move {
            downloader
                .run(&request, move |event| {
                    let _ = event_tx.send(event);
                })
                .await
        })
    };

    let mut printer = DownloadProgressPrinter::new();
    let mut keys = spawn_key_reader();
    if keys.is_some() {
        printer.notice("Press p to pause, r to resume, c to cancel");
    }

    let ctrl_c = signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interrupted = false;
    let mut canceled = false;

    loop {
        tokio::select! {
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                if let ProgressEvent::Done { canceled: was_canceled, .. } = event {
                    canceled = was_canceled;
                }
                printer.handle(&event);
            }
            Some(key) = next_key(&mut keys) => {
                apply_control(&ctx.downloader, key, &mut printer);
            }
            result = &mut ctrl_c, if !interrupted => {
                interrupted = true;
                match result {
                    Ok(()) => {
                        printer.notice("Interrupted");
                        apply_control(&ctx.downloader, JobKey::Cancel, &mut printer);
                    }
                    Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C"),
                }
            }
        }
    }

    printer.finish();

    match job.await.context("Download task failed")? {
        Ok(()) if canceled => {
            println!("Download canceled.");
            Ok(())
        }
        Ok(()) => {
            println!("✓ Download complete");
            Ok(())
        }
        Err(e) => {
            debug!(error = ?e, "Download job failed");
            bail!("{}", e.user_message())
        }
    }
}

async fn next_key(keys: &mut Option<mpsc::UnboundedReceiver<JobKey>>) -> Option<JobKey> {
    match keys {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

fn apply_control(downloader: &ChannelDownloader, key: JobKey, printer: &mut DownloadProgressPrinter) {
    let (outcome, action) = match key {
        JobKey::Pause => (downloader.pause(), "pause"),
        JobKey::Resume => (downloader.resume(), "resume"),
        JobKey::Cancel => (downloader.cancel(), "cancel"),
    };

    match (key, outcome) {
        (JobKey::Pause, ControlOutcome::Applied) => printer.notice("⏸ Paused (press r to resume)"),
        (JobKey::Resume, ControlOutcome::Applied) => printer.notice("▶ Resumed"),
        (JobKey::Cancel, ControlOutcome::Applied) => printer.notice("✖ Canceling..."),
        (_, ControlOutcome::SignalFailed(e)) => {
            printer.notice(&format!("Could not {action} the download: {e}"));
        }
        (_, other) => debug!(?key, outcome = ?other, "Control key had no effect"),
    }
}
