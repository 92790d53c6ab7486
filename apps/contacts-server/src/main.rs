mod body;
mod config;
mod cors;
mod logging;
mod server;
mod signals;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use contacts::InMemoryContactsRepository;

use crate::config::{AppConfig, CliOverrides};

/// Contacts Server - in-memory contact directory over REST
#[derive(Parser)]
#[command(name = "contacts-server")]
#[command(about = "Contacts Server - in-memory contact directory over REST")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Dataset path override (overrides config)
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and dataset, then exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config
        && !Path::new(path).is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    // 1) defaults -> 2) YAML (if provided) -> 3) env (CONTACTS__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        port: cli.port,
        dataset: cli.dataset.clone(),
    })?;

    logging::init_logging(&config.logging, cli.verbose);

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_pretty_json()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            tracing::info!("Contacts Server starting");
            server::run(config).await
        }
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    config.bind_addr()?;
    cors::build_cors_layer(&config.cors)?;
    let repo = InMemoryContactsRepository::load(&config.contacts).with_context(|| {
        format!(
            "failed to load contacts dataset {}",
            config.contacts.dataset_path.display()
        )
    })?;

    println!("Configuration is valid");
    println!("Contacts loaded: {}", repo.len());
    Ok(())
}
