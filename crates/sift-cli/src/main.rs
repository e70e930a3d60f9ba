//! `sift` -- CLI binary for the sift feedback analysis service.
//!
//! Provides the following subcommands:
//!
//! - `sift serve` -- Start the HTTP API.
//! - `sift report` -- Run the report pipeline once over a file or stdin.
//! - `sift config show` -- Show the resolved configuration.

use clap::{Parser, Subcommand};

mod commands;
mod config_loader;

/// Student feedback analysis CLI.
#[derive(Parser)]
#[command(name = "sift", about = "Student feedback analysis service", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server.
    Serve(commands::serve::ServeArgs),

    /// Generate one report from feedback in a file or on stdin.
    Report(commands::report::ReportArgs),

    /// Show resolved configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCmd,
    },
}

/// Subcommands for `sift config`.
#[derive(Subcommand)]
enum ConfigCmd {
    /// Show the full resolved configuration (credential masked).
    Show {
        /// Config file path (overrides auto-discovery).
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args).await?,
        Commands::Report(args) => commands::report::run(args).await?,
        Commands::Config { action } => match action {
            ConfigCmd::Show { config } => {
                let config = commands::load_config(config.as_deref())?;
                commands::config_cmd::config_show(&config);
            }
        },
    }

    Ok(())
}
