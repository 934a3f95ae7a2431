mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::organizations::{self, OrganizationsArgs};
use crate::cmd::tickets::{self, TicketsArgs};
use crate::config::AppConfig;
use crate::error::AppResult;

#[derive(Parser)]
#[command(
    name = "zd-ops",
    author,
    version,
    about = "Zendesk organization export and bulk ticket creation"
)]
struct Cli {
    /// Read settings from this file instead of the user config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with customer organizations.
    Orgs(OrganizationsArgs),
    /// Create tickets in bulk.
    Tickets(TicketsArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command, config_path),
        Commands::Orgs(args) => {
            let config = AppConfig::load(config_path)?;
            organizations::run(config, args.command).await
        }
        Commands::Tickets(args) => {
            let config = AppConfig::load(config_path)?;
            tickets::run(config, args.command).await
        }
    }
}
