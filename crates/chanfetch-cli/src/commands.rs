//! Available subcommands.

use std::path::PathBuf;

use chanfetch_core::ContentFilter;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Download a channel into `<output>/@<channel>`
    ///
    /// While running, press `p` to pause, `r` to resume and `c` (or Ctrl+C)
    /// to cancel.
    Download {
        /// Channel handle, with or without the leading `@`
        channel: String,
        /// Target video height in pixels (e.g. 360, 480, 720, 1080)
        #[arg(short, long, value_parser = parse_resolution)]
        resolution: Option<u32>,
        /// Directory under which the channel folder is created
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Section of the channel to fetch: all, videos, shorts, playlists
        #[arg(short, long)]
        filter: Option<ContentFilter>,
    },

    /// Show the resolved yt-dlp location and path settings
    Paths,
}

/// Accept `720` as well as `720p`.
fn parse_resolution(raw: &str) -> Result<u32, String> {
    let trimmed = raw.trim().trim_end_matches(['p', 'P']);
    match trimmed.parse::<u32>() {
        Ok(0) | Err(_) => Err(format!("'{raw}' is not a video height")),
        Ok(height) => Ok(height),
    }
}
