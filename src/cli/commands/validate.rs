//! Validate configuration command.

use anyhow::Result;
use quant_config::{AppConfig, ConfigError};
use std::path::Path;

pub async fn run(config_path: Option<&Path>, loaded: Result<AppConfig, ConfigError>) -> Result<()> {
    match config_path {
        Some(path) => println!("Validating configuration: {}", path.display()),
        None => println!("Validating built-in defaults and QUANT__* environment"),
    }

    match loaded {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Log format: {}", config.logging.format);
            if let Some(file) = &config.logging.file {
                println!("Log file: {file}");
            }
            println!("Default capital: ${:.2}", config.backtest.default_capital);
            println!("Commission: {:.4}%", config.backtest.commission * 100.0);
            println!("Data: {}", config.data.csv_dir);
            match &config.data.sentiment_file {
                Some(file) => println!("Sentiment file: {file}"),
                None => println!("Sentiment file: (none)"),
            }
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
