//! Backtester CLI application.

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use logging::{setup_logging, LogFormat};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let loaded = quant_config::load_config_or_default(cli.config.as_deref());

    // Setup logging; an invalid config still gets default logging so the error is reported
    let logging_config = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    let level = cli
        .log_level
        .map(|level| level.as_str().to_string())
        .unwrap_or(logging_config.level);
    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::parse(&logging_config.format)
    };
    let _guard = setup_logging(&level, format, logging_config.file.as_deref().map(Path::new))?;

    // Execute command
    match cli.command {
        Commands::Backtest(args) => {
            let config = loaded.context("Failed to load configuration")?;
            cli::commands::backtest::run(args, &config).await
        }
        Commands::Strategies => cli::commands::strategies::run().await,
        Commands::ValidateConfig => {
            cli::commands::validate::run(cli.config.as_deref(), loaded).await
        }
    }
}
