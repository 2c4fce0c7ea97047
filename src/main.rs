//! CEP address resolver service.
//!
//! Answers `GET /{cep}` by querying every configured address provider at once
//! and returning the first document to arrive.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │               CEP RESOLVER                   │
//!                      │                                              │
//!   GET /{cep}         │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │      ┌──────────┐
//!   ───────────────────┼─▶│  http   │──▶│ resolver │─┬▶│  viacep   │──┼─────▶│ ViaCEP   │
//!                      │  │ server  │   │  (race)  │ │ └───────────┘  │      └──────────┘
//!   200 JSON / 400/404 │  │         │◀──│ deadline │ │ ┌───────────┐  │      ┌──────────┐
//!   ◀──────────────────┼──│         │   │          │ └▶│ brasilapi │──┼─────▶│BrasilAPI │
//!                      │  └─────────┘   └──────────┘   └───────────┘  │      └──────────┘
//!                      │                                              │
//!                      │  config (TOML + watcher)   lifecycle/signals │
//!                      └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use cep_resolver::config::ConfigWatcher;
use cep_resolver::lifecycle::{startup_config, wait_for_termination, Shutdown};
use cep_resolver::observability::init_logging;
use cep_resolver::HttpServer;

#[derive(Parser)]
#[command(name = "cep-resolver")]
#[command(about = "Resolve Brazilian postal codes by racing address providers", long_about = None)]
struct Cli {
    /// TOML configuration file (watched for changes).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = startup_config(cli.config.as_deref(), cli.bind.as_deref())?;
    init_logging(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "cep-resolver starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        timeout_ms = config.resolver.timeout_ms,
        policy = %config.resolver.policy,
        providers = config.providers.len(),
        "Configuration loaded"
    );

    // Hot reload only when a file backs the configuration.
    let (_watcher, config_updates) = match &cli.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_termination().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
