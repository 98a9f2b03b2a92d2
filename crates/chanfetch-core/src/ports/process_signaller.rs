//! Process signalling port.
//!
//! Abstracts the OS-level primitives the supervisor needs to pause, resume
//! and cancel a running tool: suspend, continue, and kill an entire process
//! tree. Implementations address the tree by the pid of its root process.

use thiserror::Error;

/// Errors from delivering a control signal.
///
/// The supervisor never propagates these; they surface as warnings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    /// The target process (or group) no longer exists.
    #[error("No such process: {0}")]
    NoSuchProcess(u32),

    /// The platform has no primitive for this operation.
    #[error("Not supported on this platform: {0}")]
    Unsupported(&'static str),

    /// The OS rejected the request.
    #[error("Signal delivery failed: {0}")]
    Os(String),
}

/// OS capability for controlling a process tree.
pub trait ProcessSignaller: Send + Sync {
    /// Stop the tree rooted at `pid` without terminating it.
    fn suspend(&self, pid: u32) -> Result<(), SignalError>;

    /// Continue a previously suspended tree.
    fn resume(&self, pid: u32) -> Result<(), SignalError>;

    /// Forcibly terminate the tree rooted at `pid`, helpers included.
    fn terminate_tree(&self, pid: u32) -> Result<(), SignalError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(SignalError::NoSuchProcess(12).to_string(), "No such process: 12");
        assert!(SignalError::Unsupported("suspend").to_string().contains("suspend"));
    }
}
