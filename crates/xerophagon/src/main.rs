mod commands;

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use xerophagon::config::DEFAULT_CONFIG_FILE;

// ============================================================================
// CLI Types
// ============================================================================

/// Xerophagon - a small self-hosted tracker for intermittent fasting
#[derive(Parser, Debug)]
#[command(version = xerophagon::build_info::VERSION, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    config: String,

    /// Data file (overrides config file)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the web server
    Serve {
        /// Host to bind to (overrides config file)
        #[arg(long)]
        host: Option<IpAddr>,

        /// Port to listen on (overrides config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show the current fast and recent history
    Status {
        /// History page to show
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Start a fast now
    Start {
        /// Goal in whole hours
        #[arg(short, long)]
        goal: Option<String>,
    },

    /// End the current fast now
    End,
}

// ============================================================================
// Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> std::process::ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let data = cli.data.as_deref();

    match cli.command {
        Commands::Serve { host, port } => {
            commands::serve::run(&cli.config, host, port, data).await
        }
        Commands::Status { page } => commands::fast::status(&cli.config, data, page).await,
        Commands::Start { goal } => {
            commands::fast::start(&cli.config, data, goal.as_deref()).await
        }
        Commands::End => commands::fast::end(&cli.config, data).await,
    }
}

// ============================================================================
// Initialization
// ============================================================================

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
