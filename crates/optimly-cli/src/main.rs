use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use optimly_core::config::{OptimlyConfig, default_config_path};
use optimly_execution::{Clock, InstantClock, TokioClock};
use tracing::error;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::lab::LabArgs;
use commands::onboard::OnboardArgs;

#[derive(Parser)]
#[command(name = "optimly")]
#[command(
    version,
    about = "Optimly - simulate brand visibility in AI assistant answers",
    long_about = None
)]
struct Cli {
    /// Config file (defaults to ~/.config/optimly/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip the simulated latency of mock calls
    #[arg(long, global = true, default_value_t = false)]
    instant: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the brand onboarding wizard with AI suggestions
    Onboard(OnboardArgs),
    /// Run the prompt lab: simulate, generate variants, compare and export
    Lab(LabArgs),
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = run(Cli::parse()).await {
        error!(error = %err, "command failed");
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = OptimlyConfig::load_from(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let clock: Arc<dyn Clock> = if cli.instant {
        Arc::new(InstantClock)
    } else {
        Arc::new(TokioClock)
    };

    match cli.command {
        Commands::Onboard(args) => commands::onboard::run(&config, clock, args).await,
        Commands::Lab(args) => commands::lab::run(&config, clock, args).await,
        Commands::Config => commands::config::show(&config, &config_path),
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("optimly=info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
