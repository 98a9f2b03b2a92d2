//! Process runtime for chanfetch.
//!
//! Owns the download tool's child process: spawning it in its own process
//! group, draining its output streams, and delivering suspend/continue/kill
//! signals to the whole tree.

#![deny(unsafe_code)]

pub mod process;

// Re-export the supervisor surface
pub use process::{
    ControlOutcome, ExitDisposition, JobTicket, OsSignaller, OutputChunk, OutputStream,
    ProcessSupervisor, SupervisedChild, SupervisorError, spawn_chunk_reader,
};
