//! OS implementation of the `ProcessSignaller` port.
//!
//! On Unix the tool is spawned as a process group leader, so every signal is
//! sent to the group: helpers it forks for merging or thumbnailing are
//! stopped, continued and killed together with it. Windows has no stop
//! signal; the tree is killed with `taskkill /T`.

use chanfetch_core::{ProcessSignaller, SignalError};

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;
#[cfg(unix)]
use tracing::debug;

/// Signals real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSignaller;

impl OsSignaller {
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessSignaller for OsSignaller {
    fn suspend(&self, pid: u32) -> Result<(), SignalError> {
        #[cfg(unix)]
        {
            signal_tree(pid, Signal::SIGSTOP)
        }

        #[cfg(not(unix))]
        {
            let _ = pid;
            Err(SignalError::Unsupported("suspend"))
        }
    }

    fn resume(&self, pid: u32) -> Result<(), SignalError> {
        #[cfg(unix)]
        {
            signal_tree(pid, Signal::SIGCONT)
        }

        #[cfg(not(unix))]
        {
            let _ = pid;
            Err(SignalError::Unsupported("resume"))
        }
    }

    fn terminate_tree(&self, pid: u32) -> Result<(), SignalError> {
        #[cfg(unix)]
        {
            signal_tree(pid, Signal::SIGKILL)
        }

        #[cfg(windows)]
        {
            taskkill_tree(pid)
        }

        #[cfg(not(any(unix, windows)))]
        {
            let _ = pid;
            Err(SignalError::Unsupported("terminate_tree"))
        }
    }
}

/// Send `sig` to the process group led by `pid`, falling back to the single
/// process when `pid` does not lead a group.
#[cfg(unix)]
fn signal_tree(pid: u32, sig: Signal) -> Result<(), SignalError> {
    let raw = i32::try_from(pid).map_err(|_| SignalError::Os(format!("pid {pid} out of range")))?;
    let target = Pid::from_raw(raw);

    match signal::killpg(target, sig) {
        Ok(()) => Ok(()),
        Err(Errno::ESRCH) => {
            debug!(pid = %pid, signal = ?sig, "No process group, signalling process directly");
            match signal::kill(target, sig) {
                Ok(()) => Ok(()),
                Err(Errno::ESRCH) => Err(SignalError::NoSuchProcess(pid)),
                Err(e) => Err(SignalError::Os(e.to_string())),
            }
        }
        Err(e) => Err(SignalError::Os(e.to_string())),
    }
}

#[cfg(windows)]
fn taskkill_tree(pid: u32) -> Result<(), SignalError> {
    // taskkill exits with 128 when the pid does not exist
    const NOT_FOUND: i32 = 128;

    let output = std::process::Command::new("taskkill")
        .args(["/T", "/F", "/PID"])
        .arg(pid.to_string())
        .output()
        .map_err(|e| SignalError::Os(e.to_string()))?;

    match output.status.code() {
        Some(0) => Ok(()),
        Some(NOT_FOUND) => Err(SignalError::NoSuchProcess(pid)),
        _ => Err(SignalError::Os(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn signalling_missing_pid_reports_no_such_process() {
        // Use a PID that's very unlikely to exist
        let result = OsSignaller::new().resume(999_999);
        assert_eq!(result, Err(SignalError::NoSuchProcess(999_999)));
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn terminate_tree_kills_group_leader() {
        let mut child = tokio::process::Command::new("sleep")
            .arg("30")
            .process_group(0)
            .spawn()
            .expect("failed to spawn sleep");
        let pid = child.id().expect("no PID");

        OsSignaller::new().terminate_tree(pid).unwrap();

        let status = child.wait().await.unwrap();
        assert!(!status.success());
        assert_eq!(status.code(), None);
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn suspend_and_resume_round_trip() {
        let mut child = tokio::process::Command::new("sleep")
            .arg("30")
            .process_group(0)
            .spawn()
            .expect("failed to spawn sleep");
        let pid = child.id().expect("no PID");

        let signaller = OsSignaller::new();
        assert!(signaller.suspend(pid).is_ok());
        assert!(signaller.resume(pid).is_ok());

        let _ = child.kill().await;
    }
}
