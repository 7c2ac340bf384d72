#![deny(unsafe_code)]
//! Synthesis CLI - terminal interface for Darwin-Kropotkin prompt evolution
//!
//! This CLI lets operators and developers:
//! - Run evolutionary optimization against a task
//! - Inspect saved run snapshots
//! - List the active gene pool

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

use commands::{inspect, pool, run};
use config::CliConfig;
pub use error::{CliError, CliResult};

/// Synthesis CLI application
#[derive(Parser)]
#[command(name = "synthesis")]
#[command(about = "Evolutionary optimizer for prompt genomes", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SYNTHESIS_CONFIG")]
    config: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table")]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Run an evolutionary optimization
    Run(run::RunArgs),

    /// Inspect a saved run snapshot
    Inspect(inspect::InspectArgs),

    /// List the active gene pool
    Pool(pool::PoolArgs),
}

/// Run using the current process arguments.
pub async fn run() -> CliResult<()> {
    run_with_args(std::env::args_os()).await
}

/// Run using the provided argument iterator.
pub async fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    // Initialize tracing; logs go to stderr so JSON output stays parseable.
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let config = CliConfig::load(cli.config.as_deref())?;
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Commands::Run(args) => run::execute(args, &config, cli.output).await,
        Commands::Inspect(args) => inspect::execute(args, cli.output),
        Commands::Pool(args) => pool::execute(args, cli.output),
    }
}
