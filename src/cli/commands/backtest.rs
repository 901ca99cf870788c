//! Backtest command implementation.

use anyhow::{Context, Result};
use quant_api::{BacktestRequest, BacktestService};
use quant_config::AppConfig;
use quant_data::{CsvDataSource, CsvSentimentSource};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::cli::{BacktestArgs, OutputFormat};

pub async fn run(args: BacktestArgs, config: &AppConfig) -> Result<()> {
    info!("Starting backtest for strategy: {}", args.strategy);

    let params = match &args.params {
        Some(path) => load_params(path)?,
        None => serde_json::Map::new(),
    };

    let data_path = args
        .data
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.data.csv_dir));
    if !data_path.exists() {
        anyhow::bail!(
            "Data path '{}' does not exist. Provide a CSV file or directory containing CSV files (e.g. --data ./data)",
            data_path.display()
        );
    }
    let source = CsvDataSource::new(&data_path)
        .with_context(|| format!("Failed to open data at {}", data_path.display()))?;

    let mut service = BacktestService::new(source);
    if let Some(file) = &config.data.sentiment_file {
        let sentiment = CsvSentimentSource::from_path(file)
            .with_context(|| format!("Failed to load sentiment file {file}"))?;
        info!(headlines = sentiment.len(), "Loaded sentiment headlines");
        service = service.with_sentiment(Arc::new(sentiment));
    }

    let request = BacktestRequest::new(&args.symbol, &args.strategy, args.start, args.end)
        .with_params(params)
        .with_capital(args.capital.unwrap_or(config.backtest.default_capital))
        .with_commission(args.commission.unwrap_or(config.backtest.commission));

    let report = service
        .backtest(&request)
        .await
        .with_context(|| format!("Backtest of {} on {} failed", args.strategy, args.symbol))?;

    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary()),
    }

    if let Some(save_path) = &args.save {
        std::fs::write(save_path, report.to_json()?)
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Results saved to {:?}", save_path);
    }

    if let Some(csv_path) = &args.equity_csv {
        std::fs::write(csv_path, report.equity_to_csv())
            .with_context(|| format!("Failed to write {}", csv_path.display()))?;
        info!("Equity curve saved to {:?}", csv_path);
    }

    Ok(())
}

/// Read a TOML table of strategy parameters.
fn load_params(path: &Path) -> Result<serde_json::Map<String, serde_json::Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameter file {}", path.display()))?;
    let table: toml::Table = toml::from_str(&text)
        .with_context(|| format!("Invalid TOML in {}", path.display()))?;
    match serde_json::to_value(table)? {
        serde_json::Value::Object(map) => Ok(map),
        _ => anyhow::bail!("Parameter file {} is not a table", path.display()),
    }
}
