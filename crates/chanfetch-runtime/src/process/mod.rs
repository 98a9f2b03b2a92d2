//! Process management for the download tool.
//!
//! # Structure
//!
//! - `ProcessSupervisor` - single-slot lifecycle owner (start/pause/resume/cancel)
//! - `OsSignaller` - `ProcessSignaller` implementation over OS primitives
//! - `spawn_chunk_reader` - forwards raw stdout/stderr chunks to a channel

mod signals;
mod stream;
mod supervisor;
mod types;

pub use signals::OsSignaller;
pub use stream::spawn_chunk_reader;
pub use supervisor::{ProcessSupervisor, SupervisorError};
pub use types::{ControlOutcome, ExitDisposition, JobTicket, OutputChunk, OutputStream, SupervisedChild};
