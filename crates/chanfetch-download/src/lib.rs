//! Channel downloads for chanfetch.
//!
//! # Modules
//!
//! - `controller` - runs one yt-dlp job per [`ChannelRequest`] and exposes
//!   pause/resume/cancel
//! - `parser` - incremental output parser producing [`ProgressEvent`]s
//!
//! ```no_run
//! # async fn demo() -> chanfetch_core::JobResult<()> {
//! use chanfetch_core::{ChannelRequest, ContentFilter};
//! use chanfetch_download::ChannelDownloader;
//!
//! let downloader = ChannelDownloader::new("/usr/local/bin/yt-dlp");
//! let request = ChannelRequest::new("somechannel", 720, "/tmp/videos", ContentFilter::Videos)?;
//! downloader.run(&request, |event| println!("{event:?}")).await
//! # }
//! ```

// Re-export core types for convenience
pub use chanfetch_core::{ChannelRequest, ContentFilter, JobError, JobStatus, ProgressEvent};
pub use chanfetch_runtime::ControlOutcome;

pub mod controller;
pub mod parser;

pub use controller::{ChannelDownloader, build_args, channel_url, format_selector, output_dir};
pub use parser::{ProgressMatch, StreamParser, basename, match_destination, match_progress};
