//! CLI definitions.

pub mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quant")]
#[command(author, version, about = "Signal-driven strategy backtester")]
pub struct Cli {
    /// Configuration file path (defaults plus QUANT__* environment when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (overrides the configuration file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run backtesting simulation
    Backtest(BacktestArgs),
    /// List available strategies
    Strategies,
    /// Validate configuration
    ValidateConfig,
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args)]
pub struct BacktestArgs {
    /// Symbol to backtest
    #[arg(short = 'S', long)]
    pub symbol: String,

    /// Strategy key or alias
    #[arg(short, long)]
    pub strategy: String,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: NaiveDate,

    /// Initial capital (defaults to backtest.default_capital)
    #[arg(long)]
    pub capital: Option<f64>,

    /// Commission as a fraction of notional (defaults to backtest.commission)
    #[arg(long)]
    pub commission: Option<f64>,

    /// Strategy parameter file (TOML)
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Data file or directory (defaults to data.csv_dir)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Save the JSON report to a file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Write the equity curve as CSV
    #[arg(long)]
    pub equity_csv: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_backtest() {
        let cli = Cli::try_parse_from([
            "quant",
            "--log-level",
            "debug",
            "backtest",
            "--symbol",
            "AAPL",
            "--strategy",
            "ma_crossover",
            "--start",
            "2023-01-01",
            "--end",
            "2023-12-31",
            "--commission",
            "0.001",
            "--output",
            "json",
        ])
        .unwrap();

        assert!(matches!(cli.log_level, Some(LogLevel::Debug)));
        match cli.command {
            Commands::Backtest(args) => {
                assert_eq!(args.symbol, "AAPL");
                assert_eq!(args.start, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
                assert_eq!(args.commission, Some(0.001));
                assert!(args.capital.is_none());
                assert!(matches!(args.output, OutputFormat::Json));
            }
            _ => panic!("expected backtest command"),
        }
    }

    #[test]
    fn test_bad_date_rejected() {
        let result = Cli::try_parse_from([
            "quant", "backtest", "-S", "AAPL", "-s", "ma_crossover", "--start", "01-2023",
            "--end", "2023-12-31",
        ]);
        assert!(result.is_err());
    }
}
