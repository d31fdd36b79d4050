use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{load_settings, ServerOverrides};
use database::ConnectionProvider;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the stock inventory service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("failed to read .env file");
        }
    }

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => handle_serve(args).await,
        Commands::Ping(args) => handle_ping(args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// REST service for a single-table stock inventory backed by PostgreSQL.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Check that the configured database is reachable, then exit.
    Ping(PingArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Path to a TOML settings file (defaults to ./config.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: ServerOverrides,
}

#[derive(Parser)]
struct PingArgs {
    /// Path to a TOML settings file (defaults to ./config.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.config.as_deref())?.with_overrides(&args.overrides);
    let addr = settings.server.socket_addr()?;

    let provider = ConnectionProvider::connect(&settings.database)
        .await
        .context("database is not reachable")?;

    web_server::run_server(addr, provider).await
}

async fn handle_ping(args: PingArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.config.as_deref())?;

    let provider = ConnectionProvider::connect_lazy(&settings.database)?;
    provider.ping().await?;
    provider.close().await;

    println!("database is reachable");
    Ok(())
}
