//! End-to-end controller tests against a fake yt-dlp shell script.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chanfetch_core::{ChannelRequest, ContentFilter, JobError, JobStatus, ProgressEvent};
use chanfetch_download::{ChannelDownloader, ControlOutcome, build_args, output_dir};
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_test::{assert_err, assert_ok};

const JOB_TIMEOUT: Duration = Duration::from_secs(20);

const PROGRESS_SCRIPT: &str = r"
echo '[youtube:tab] foo: Downloading webpage'
echo '[download] Destination: /out/@foo/1-Title.mp4'
printf '[download]  45.2%% of 10.00MiB at 1.20MiB/s ETA 00:05\r'
printf '[download] 100.0%% of 10.00MiB at 2.00MiB/s ETA 00:00\n'
";

fn write_tool(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake-yt-dlp");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

fn request(root: &Path) -> ChannelRequest {
    ChannelRequest::new("@foo", 720, root.join("videos"), ContentFilter::Videos).unwrap()
}

fn progress(percent: f64, speed: &str, eta: &str) -> ProgressEvent {
    ProgressEvent::Progress {
        percent,
        speed: speed.to_string(),
        eta: eta.to_string(),
        filename: "1-Title.mp4".to_string(),
    }
}

/// Run `downloader` on a task, streaming events back over a channel.
fn spawn_job(
    downloader: &Arc<ChannelDownloader>,
    request: ChannelRequest,
) -> (
    tokio::task::JoinHandle<Result<(), JobError>>,
    mpsc::UnboundedReceiver<ProgressEvent>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let downloader = Arc::clone(downloader);
    let handle = tokio::spawn(async move {
        downloader
            .run(&request, move |event| {
                let _ = tx.send(event);
            })
            .await
    });
    (handle, rx)
}

async fn wait_for_log(rx: &mut mpsc::UnboundedReceiver<ProgressEvent>, text: &str) {
    timeout(JOB_TIMEOUT, async {
        while let Some(event) = rx.recv().await {
            if matches!(&event, ProgressEvent::Log { message } if message == text) {
                return;
            }
        }
        panic!("event stream ended before '{text}'");
    })
    .await
    .unwrap();
}

async fn drain(mut rx: mpsc::UnboundedReceiver<ProgressEvent>) -> Vec<ProgressEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_successful_job_reports_progress_then_done() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(temp.path(), &format!("{PROGRESS_SCRIPT}\nexit 0"));
    let downloader = ChannelDownloader::new(&tool);

    let mut events = Vec::new();
    let result = downloader
        .run(&request(temp.path()), |event| events.push(event))
        .await;
    assert_ok!(result);

    assert_eq!(
        events,
        vec![
            ProgressEvent::log("[youtube:tab] foo: Downloading webpage"),
            ProgressEvent::log("[download] Destination: /out/@foo/1-Title.mp4"),
            ProgressEvent::log("[download]  45.2% of 10.00MiB at 1.20MiB/s ETA 00:05"),
            progress(45.2, "1.20MiB/s", "00:05"),
            ProgressEvent::log("[download] 100.0% of 10.00MiB at 2.00MiB/s ETA 00:00"),
            progress(100.0, "2.00MiB/s", "00:00"),
            ProgressEvent::finished(true),
        ]
    );
    assert_eq!(downloader.status(), JobStatus::Idle);
}

#[tokio::test]
async fn test_failing_job_reports_code() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(
        temp.path(),
        "echo 'ERROR: [youtube:tab] foo: This channel does not exist' >&2\nexit 3",
    );
    let downloader = ChannelDownloader::new(&tool);

    let mut events = Vec::new();
    let err = assert_err!(
        downloader
            .run(&request(temp.path()), |event| events.push(event))
            .await
    );

    assert_eq!(err, JobError::ProcessFailed { code: Some(3) });
    assert_eq!(
        events,
        vec![
            ProgressEvent::log("ERROR: [youtube:tab] foo: This channel does not exist"),
            ProgressEvent::finished(false),
        ]
    );
}

#[tokio::test]
async fn test_cancel_reports_canceled_done() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(temp.path(), "echo started\nsleep 30 &\nwait");
    let downloader = Arc::new(ChannelDownloader::new(&tool));

    let (handle, mut rx) = spawn_job(&downloader, request(temp.path()));
    wait_for_log(&mut rx, "started").await;
    assert!(matches!(downloader.status(), JobStatus::Running { .. }));

    assert_eq!(downloader.cancel(), ControlOutcome::Applied);

    let result = timeout(JOB_TIMEOUT, handle).await.unwrap().unwrap();
    assert_ok!(result);

    let rest = drain(rx).await;
    assert_eq!(rest.last(), Some(&ProgressEvent::canceled()));
    assert_eq!(rest.iter().filter(|e| e.is_done()).count(), 1);
    assert_eq!(downloader.status(), JobStatus::Idle);
}

#[tokio::test]
async fn test_cancel_while_paused_reports_canceled_done() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(temp.path(), "echo started\nsleep 30");
    let downloader = Arc::new(ChannelDownloader::new(&tool));

    let (handle, mut rx) = spawn_job(&downloader, request(temp.path()));
    wait_for_log(&mut rx, "started").await;

    assert!(downloader.pause().is_applied());
    assert!(matches!(downloader.status(), JobStatus::Paused { .. }));
    assert_eq!(downloader.pause(), ControlOutcome::AlreadyInState);
    assert!(downloader.cancel().is_applied());

    assert_ok!(timeout(JOB_TIMEOUT, handle).await.unwrap().unwrap());
    assert_eq!(drain(rx).await.last(), Some(&ProgressEvent::canceled()));
}

#[tokio::test]
async fn test_pause_and_resume_complete_normally() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(temp.path(), "echo started\nsleep 1\necho finished");
    let downloader = Arc::new(ChannelDownloader::new(&tool));

    let (handle, mut rx) = spawn_job(&downloader, request(temp.path()));
    wait_for_log(&mut rx, "started").await;

    assert_eq!(downloader.pause(), ControlOutcome::Applied);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(downloader.resume(), ControlOutcome::Applied);
    assert_eq!(downloader.resume(), ControlOutcome::AlreadyInState);

    assert_ok!(timeout(JOB_TIMEOUT, handle).await.unwrap().unwrap());
    let rest = drain(rx).await;
    assert_eq!(
        rest,
        vec![ProgressEvent::log("finished"), ProgressEvent::finished(true)]
    );
}

#[tokio::test]
async fn test_second_job_is_rejected_while_busy() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(temp.path(), "echo started\nsleep 30");
    let downloader = Arc::new(ChannelDownloader::new(&tool));

    let (handle, mut rx) = spawn_job(&downloader, request(temp.path()));
    wait_for_log(&mut rx, "started").await;

    let other_root = temp.path().join("elsewhere");
    let second = ChannelRequest::new("@bar", 720, &other_root, ContentFilter::Videos).unwrap();
    let mut events = Vec::new();
    let err = downloader
        .run(&second, |event| events.push(event))
        .await
        .unwrap_err();
    assert!(matches!(err, JobError::Busy { .. }));
    assert!(events.is_empty());
    // Rejected before the destination is prepared
    assert!(!other_root.exists());

    downloader.cancel();
    assert_ok!(timeout(JOB_TIMEOUT, handle).await.unwrap().unwrap());
}

#[tokio::test]
async fn test_dropped_run_frees_the_slot() {
    let temp = TempDir::new().unwrap();
    let quick = temp.path().join("quick");
    let tool = write_tool(
        temp.path(),
        &format!("[ -f '{}' ] && exit 0\necho started\nsleep 30", quick.display()),
    );
    let downloader = ChannelDownloader::new(&tool);
    let req = request(temp.path());

    let dropped = timeout(Duration::from_millis(500), downloader.run(&req, |_| {})).await;
    assert!(dropped.is_err());
    assert_eq!(downloader.status(), JobStatus::Idle);

    fs::write(&quick, b"").unwrap();
    let mut events = Vec::new();
    let result = timeout(JOB_TIMEOUT, downloader.run(&req, |event| events.push(event)))
        .await
        .unwrap();
    assert_ok!(result);
    assert_eq!(events, vec![ProgressEvent::finished(true)]);
}

#[tokio::test]
async fn test_aborted_job_task_frees_the_slot() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(temp.path(), "echo started\nsleep 30");
    let downloader = Arc::new(ChannelDownloader::new(&tool));

    let (handle, mut rx) = spawn_job(&downloader, request(temp.path()));
    wait_for_log(&mut rx, "started").await;

    handle.abort();
    assert!(timeout(JOB_TIMEOUT, handle).await.unwrap().is_err());
    assert_eq!(downloader.status(), JobStatus::Idle);
}

#[tokio::test]
async fn test_missing_tool_fails_without_events() {
    let temp = TempDir::new().unwrap();
    let downloader = ChannelDownloader::new(temp.path().join("no-such-tool"));

    let mut events = Vec::new();
    let err = downloader
        .run(&request(temp.path()), |event| events.push(event))
        .await
        .unwrap_err();

    assert!(matches!(err, JobError::Spawn(_)));
    assert!(err.is_pre_spawn());
    assert!(events.is_empty());
    assert_eq!(downloader.status(), JobStatus::Idle);
}

#[tokio::test]
async fn test_unusable_destination_fails_without_events() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(temp.path(), "exit 0");
    let blocker = temp.path().join("videos");
    fs::write(&blocker, b"not a directory").unwrap();
    let downloader = ChannelDownloader::new(&tool);

    let mut events = Vec::new();
    let err = downloader
        .run(&request(temp.path()), |event| events.push(event))
        .await
        .unwrap_err();

    assert!(matches!(err, JobError::Destination(_)));
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_tool_receives_exact_arguments() {
    let temp = TempDir::new().unwrap();
    let args_file = temp.path().join("args.txt");
    let tool = write_tool(
        temp.path(),
        &format!("printf '%s\\n' \"$@\" > '{}'", args_file.display()),
    );
    let downloader = ChannelDownloader::new(&tool);
    let req = request(temp.path());

    assert_ok!(downloader.run(&req, |_| {}).await);

    let expected_dir = temp.path().join("videos").join("@foo");
    assert!(expected_dir.is_dir());
    assert_eq!(output_dir(&req), expected_dir);

    let recorded = fs::read_to_string(&args_file).unwrap();
    let recorded: Vec<&str> = recorded.lines().collect();
    assert_eq!(recorded, build_args(&req, &expected_dir));
    assert_eq!(recorded[0], "https://www.youtube.com/@foo/videos");
    assert_eq!(
        recorded[2],
        format!("{}/%(autonumber)d-%(title)s.%(ext)s", expected_dir.display())
    );
}
