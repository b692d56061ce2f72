use anyhow::{Context, Result};
use career_copilot::cli::{handle_command, CopilotCli};
use career_copilot::core::ConfigManager;
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "career_copilot=info,rocket::server=off";

fn init_logging() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match std::env::var("COPILOT_LOG_FILE") {
        Ok(path) if !path.trim().is_empty() => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path))?;

            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(Mutex::new(file))
                        .with_current_span(false)
                        .with_span_list(false),
                )
                .with(filter)
                .try_init()
                .context("Failed to install log subscriber")?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(filter)
                .try_init()
                .context("Failed to install log subscriber")?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CopilotCli::parse();
    init_logging()?;

    let config = ConfigManager::load()?;
    handle_command(cli, config).await
}
