use anyhow::{Context, Result};
use careermade_client::cli::{handle_command, Cli};
use careermade_client::core::{ApiError, ConfigManager};
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ConfigManager::load()?;

    // Optional JSON log file next to the human-readable stderr output
    let file_layer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(Mutex::new(file))
                    .with_current_span(false)
                    .with_span_list(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    tracing::debug!(
        "Environment: {}, API: {}",
        config.environment,
        config.api.base_url
    );

    if let Err(e) = handle_command(cli, config).await {
        if e
            .downcast_ref::<ApiError>()
            .map(ApiError::is_unauthorized)
            .unwrap_or(false)
        {
            eprintln!("Hint: run `careermade login` to sign in again");
        }
        return Err(e);
    }

    Ok(())
}
