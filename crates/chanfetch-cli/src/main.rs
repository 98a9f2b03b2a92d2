//! CLI entry point - the composition root.
//!
//! Command dispatch routes to handlers; all wiring happens in `bootstrap`.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use chanfetch_cli::handlers::download::DownloadArgs;
use chanfetch_cli::{Cli, CliConfig, Commands, bootstrap, handlers};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads its `env` fallbacks
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    // Bootstrap the CLI context (composition root)
    let config = CliConfig::from_env()?.with_tool_override(cli.tool);
    let ctx = bootstrap(config)?;

    match command {
        Commands::Download {
            channel,
            resolution,
            output,
            filter,
        } => {
            let args = DownloadArgs {
                channel,
                resolution,
                output,
                filter,
            };
            handlers::download::execute(&ctx, args).await?;
        }
        Commands::Paths => {
            handlers::paths::execute(&ctx)?;
        }
    }

    Ok(())
}
