//! Paths command handler.
//!
//! Displays the resolved tool location and effective settings for
//! diagnosing "yt-dlp not found" reports.

use std::fmt::Write;

use anyhow::Result;
use chanfetch_core::{ExecutionMode, HostPlatform};

use crate::bootstrap::CliContext;

/// Execute the paths command.
pub fn execute(ctx: &CliContext) -> Result<()> {
    let mode = ExecutionMode::detect()?;
    print!("{}", render(ctx, ctx.platform, mode));
    Ok(())
}

/// `key = value` report, one entry per line.
fn render(ctx: &CliContext, platform: HostPlatform, mode: ExecutionMode) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "platform = {platform}");
    let _ = writeln!(out, "mode = {mode}");
    let _ = writeln!(out, "tool = {}", ctx.tool_path.display());
    let _ = writeln!(out, "tool_exists = {}", ctx.tool_path.is_file());
    let _ = writeln!(
        out,
        "download_root = {}",
        ctx.settings.effective_download_root().display()
    );
    let _ = writeln!(out, "resolution = {}", ctx.settings.effective_resolution());
    let _ = writeln!(out, "filter = {}", ctx.settings.effective_filter());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::{CliConfig, bootstrap};
    use chanfetch_core::Settings;

    #[test]
    fn test_render_lists_every_key() {
        let settings = Settings {
            tool_path: Some("/nonexistent/yt-dlp".into()),
            download_root: Some("/data/videos".into()),
            default_resolution: Some(1080),
            default_filter: None,
        };
        let ctx = bootstrap(CliConfig { settings }).unwrap();

        let report = render(&ctx, HostPlatform::Linux, ExecutionMode::Packaged);
        assert_eq!(
            report,
            "platform = linux\n\
             mode = packaged\n\
             tool = /nonexistent/yt-dlp\n\
             tool_exists = false\n\
             download_root = /data/videos\n\
             resolution = 1080\n\
             filter = videos\n"
        );
    }
}
