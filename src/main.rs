//! insight - writing-style analysis from the terminal
//!
//! CLI binary that submits a blog URL to the analysis backend and follows
//! the job until results arrive.

use anstream::eprintln;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use writer_insight::config::{resolve_config, ConfigOverrides};
use writer_insight::error::Error;

mod cli;

use cli::style::Stylize;

#[derive(Parser)]
#[command(name = "insight")]
#[command(about = "Writing-style analysis for Substack and Medium blogs")]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides WRITER_INSIGHT_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Seconds between status checks
    #[arg(long, global = true)]
    interval: Option<u64>,

    /// Maximum number of status checks before giving up
    #[arg(long, global = true)]
    max_attempts: Option<u32>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log requests and state changes to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a blog and wait for the results
    Analyze {
        /// Substack or Medium URL (prompted for when omitted)
        url: Option<String>,
    },

    /// Check the status of an analysis task once
    Status {
        /// Task id returned when the analysis was submitted
        task_id: String,
    },

    /// Show the resolved backend configuration
    Config,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "writer_insight=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let overrides = ConfigOverrides {
        api_url: cli.api_url,
        poll_interval_secs: cli.interval,
        max_attempts: cli.max_attempts,
    };
    let config = resolve_config(&overrides).await?;

    match cli.command {
        None => cli::run_analyze(&config, None, cli.json).await?,
        Some(Commands::Analyze { url }) => {
            cli::run_analyze(&config, url.as_deref(), cli.json).await?;
        }
        Some(Commands::Status { task_id }) => {
            cli::run_status(&config, &task_id, cli.json).await?;
        }
        Some(Commands::Config) => cli::run_config(&config),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("{}: {err:#}", "error".error());
        if matches!(
            err.downcast_ref::<Error>(),
            Some(Error::Timeout { .. } | Error::Analysis(_) | Error::TaskNotFound(_))
        ) {
            eprintln!("{}", "Submit the URL again to start a new analysis.".muted().for_stderr());
        }
        std::process::exit(1);
    }
}
