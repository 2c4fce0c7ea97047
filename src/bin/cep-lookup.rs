use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cep_resolver::config::{validate_config, ConfigError};
use cep_resolver::lifecycle::startup_config;
use cep_resolver::{AddressResolver, RacePolicy};

#[derive(Parser)]
#[command(name = "cep-lookup")]
#[command(about = "Resolve a single postal code and print the winning document", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Race policy (fail_fast or first_success).
    #[arg(short, long)]
    policy: Option<RacePolicy>,

    /// Resolution budget in milliseconds.
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    /// Postal code to look up.
    cep: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "cep_resolver=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = startup_config(cli.config.as_deref(), None)?;
    if let Some(policy) = cli.policy {
        config.resolver.policy = policy;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.resolver.timeout_ms = timeout_ms;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    let resolver = AddressResolver::from_config(&config.resolver, &config.providers)?;

    match resolver.resolve(&cli.cep).await {
        Ok(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{} ({})", e, e.kind());
            Ok(ExitCode::FAILURE)
        }
    }
}
