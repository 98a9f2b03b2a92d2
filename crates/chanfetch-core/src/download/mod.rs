//! Channel download domain: requests, progress events, job status and errors.
//!
//! These are pure types shared by the runtime, the download controller and
//! every front-end. Nothing here spawns processes or touches the filesystem.

mod errors;
mod events;
mod types;

pub use errors::{JobError, JobResult};
pub use events::ProgressEvent;
pub use types::{
    ChannelRequest, ContentFilter, DEFAULT_RESOLUTION, JobStatus, STANDARD_RESOLUTIONS,
    UnknownFilter,
};
