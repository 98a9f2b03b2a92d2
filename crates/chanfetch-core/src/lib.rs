//! Core domain types, path resolution and port definitions for chanfetch.
//!
//! This crate has no process or async runtime concerns. It describes what a
//! channel download job is, what it reports, how it fails, and where the
//! bundled download tool lives. Runtime crates implement the ports.

#![deny(unused_crate_dependencies)]

pub mod download;
pub mod paths;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use download::{
    ChannelRequest, ContentFilter, DEFAULT_RESOLUTION, JobError, JobResult, JobStatus,
    ProgressEvent, STANDARD_RESOLUTIONS, UnknownFilter,
};
pub use ports::{ProcessSignaller, SignalError};
pub use settings::{Settings, SettingsError, validate_settings};

// Re-export path utilities
pub use paths::{
    ExecutionMode, HostPlatform, PathError, ToolRoots, ensure_directory, locate_tool,
    resolve_tool_path,
};
