//! CLI bootstrap - the composition root.
//!
//! This is the only place where the supervisor and the downloader are
//! instantiated for the CLI. Handlers receive the composed [`CliContext`].

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chanfetch_core::{HostPlatform, Settings, resolve_tool_path};
use chanfetch_download::ChannelDownloader;
use chanfetch_runtime::ProcessSupervisor;
use tracing::debug;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Settings loaded from the environment.
    pub settings: Settings,
}

impl CliConfig {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self> {
        let settings = Settings::from_env().context("Invalid CHANFETCH_* environment settings")?;
        Ok(Self { settings })
    }

    /// Apply a `--tool` flag on top of the environment.
    #[must_use]
    pub fn with_tool_override(mut self, tool: Option<PathBuf>) -> Self {
        if let Some(tool) = tool {
            self.settings.tool_path = Some(tool);
        }
        self
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    pub settings: Settings,
    pub platform: HostPlatform,
    /// Resolved yt-dlp binary.
    pub tool_path: PathBuf,
    pub downloader: Arc<ChannelDownloader>,
}

/// Build the CLI context from configuration.
pub fn bootstrap(config: CliConfig) -> Result<CliContext> {
    let CliConfig { settings } = config;

    // Checked even when an explicit tool path makes the bundled lookup moot
    let platform = HostPlatform::current().context("chanfetch cannot run on this platform")?;
    let tool_path = resolve_tool_path(&settings).context("Failed to locate yt-dlp")?;
    debug!(%platform, tool = %tool_path.display(), "Bootstrapping download runtime");

    let supervisor = Arc::new(ProcessSupervisor::new());
    let downloader = Arc::new(ChannelDownloader::with_supervisor(
        tool_path.clone(),
        supervisor,
    ));

    Ok(CliContext {
        settings,
        platform,
        tool_path,
        downloader,
    })
}
