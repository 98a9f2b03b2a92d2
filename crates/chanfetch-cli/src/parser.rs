//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Download every video of a channel with yt-dlp.
#[derive(Parser)]
#[command(name = "chanfetch")]
#[command(about = "Download a channel's videos, shorts or playlists with yt-dlp")]
#[command(version)]
pub struct Cli {
    /// Use this yt-dlp binary instead of the bundled one
    #[arg(long = "tool", global = true, env = "CHANFETCH_YTDLP_PATH")]
    pub tool: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
