//! Configuration structures.

use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub backtest: BacktestSettings,
    #[serde(default)]
    pub data: DataSettings,
}

impl AppConfig {
    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if !matches!(self.logging.format.as_str(), "pretty" | "json" | "compact") {
            return Err(format!(
                "logging.format must be pretty, json or compact, got {:?}",
                self.logging.format
            ));
        }
        if !(self.backtest.default_capital.is_finite() && self.backtest.default_capital > 0.0) {
            return Err(format!(
                "backtest.default_capital must be positive, got {}",
                self.backtest.default_capital
            ));
        }
        if !(0.0..1.0).contains(&self.backtest.commission) {
            return Err(format!(
                "backtest.commission must be in [0, 1), got {}",
                self.backtest.commission
            ));
        }
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "quant".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// `pretty`, `json` or `compact`
    pub format: String,
    /// Also write logs to this file
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Backtest defaults applied when a request leaves them out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BacktestSettings {
    pub default_capital: f64,
    pub commission: f64,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            default_capital: 100_000.0,
            commission: 0.0,
        }
    }
}

/// Where market data and headline sentiment are read from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataSettings {
    /// CSV file or directory of per-symbol CSV files
    pub csv_dir: String,
    /// `date,symbol,label,score` file for the sentiment strategy
    pub sentiment_file: Option<String>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            csv_dir: "data".to_string(),
            sentiment_file: None,
        }
    }
}
