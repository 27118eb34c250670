//! tailacl CLI - export and import a tailnet's ACL policy and IP ranges
//!
//! `export` pulls the current policy and IP ranges from the Tailscale
//! control-plane API into one JSON file; `import` pushes such a file back.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tailacl_core::api::{self, config::ENV_BASE_URL};
use tailacl_core::settings::{ENV_API_KEY, ENV_TAILNET};
use tailacl_core::{SyncSettings, TailnetClient, sync};

#[derive(Parser)]
#[command(name = "tailacl")]
#[command(version)]
#[command(about = "Export or import Tailscale ACL configuration")]
#[command(long_about = "
Export or import a tailnet's ACL policy and IP ranges through the Tailscale API.

  tailacl export acl.json    write the current policy and IP ranges to acl.json
  tailacl import acl.json    push acl.json back to the tailnet

The tailnet and API key come from --tailnet/--api-key or the
TAILSCALE_TAILNET/TAILSCALE_API_KEY environment variables.
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Tailscale tailnet name (or set TAILSCALE_TAILNET)
    #[arg(long, global = true, env = ENV_TAILNET)]
    pub tailnet: Option<String>,

    /// Tailscale API key (or set TAILSCALE_API_KEY)
    #[arg(long, global = true, env = ENV_API_KEY, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the tailnet's ACL policy and IP ranges to a JSON file
    Export {
        /// Path to ACL JSON file
        file: PathBuf,
    },

    /// Push the ACL policy and IP ranges from a JSON file to the tailnet
    Import {
        /// Path to ACL JSON file
        file: PathBuf,
    },

    /// Show configuration paths and settings
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("tailacl_cli={},tailacl_core={}", log_level, log_level).into()
            }),
        )
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Export { file } => cmd_export(&cli, file).await,
        Commands::Import { file } => cmd_import(&cli, file).await,
        Commands::Config => {
            cmd_config();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Resolve tailnet and API key, exiting with a usage error when either is missing
fn resolve_settings(cli: &Cli) -> Result<SyncSettings> {
    match SyncSettings::resolve(cli.tailnet.clone(), cli.api_key.clone()) {
        Ok(settings) => Ok(settings),
        Err(e) if e.is_usage() => Cli::command()
            .error(ErrorKind::MissingRequiredArgument, e.to_string())
            .exit(),
        Err(e) => Err(e.into()),
    }
}

fn build_client(cli: &Cli) -> Result<TailnetClient> {
    let settings = resolve_settings(cli)?;
    let endpoint = api::load_api_config();
    tracing::debug!(
        "Using API endpoint {} (from {})",
        endpoint.api_root(),
        endpoint.source
    );
    Ok(TailnetClient::new(&endpoint, settings))
}

async fn cmd_export(cli: &Cli, file: &Path) -> Result<()> {
    let client = build_client(cli)?;
    sync::export(&client, file).await.context("Export failed")?;
    Ok(())
}

async fn cmd_import(cli: &Cli, file: &Path) -> Result<()> {
    let client = build_client(cli)?;
    sync::import(&client, file).await.context("Import failed")?;
    Ok(())
}

fn cmd_config() {
    let endpoint = api::load_api_config();
    let config_path = api::config::get_config_file_path_string();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file:      {}", config_path);
    println!("API endpoint:     {} (from {})", endpoint.api_root(), endpoint.source);
    println!();
    println!("Environment variables:");
    println!("  {} - Default tailnet", ENV_TAILNET);
    println!("  {} - API key", ENV_API_KEY);
    println!("  {} - Override API host", ENV_BASE_URL);
    println!();
    println!("Example config.toml:");
    println!();
    println!("{}", api::config::generate_example_config());
}
