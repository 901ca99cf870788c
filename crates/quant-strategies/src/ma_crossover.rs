//! Moving Average Crossover Strategy.
//!
//! Long while the short moving average is above the long one, exit while it
//! is below. The signal is a level, not an edge: every bar with short > long
//! carries a buy, and the engine ignores buys while already long.

use serde::{Deserialize, Serialize};
use quant_core::{
    error::StrategyError,
    traits::{Indicator, SignalProvider, StrategyConfig},
    types::{BarSeries, Signal, SignalSeries},
};
use quant_indicators::{Ema, Sma};

use crate::into_signal_series;

/// Configuration for the MA Crossover strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MACrossoverConfig {
    /// Short moving average window
    pub short_window: usize,
    /// Long moving average window
    pub long_window: usize,
    /// Use EMA instead of SMA
    pub use_ema: bool,
}

impl Default for MACrossoverConfig {
    fn default() -> Self {
        Self {
            short_window: 20,
            long_window: 50,
            use_ema: false,
        }
    }
}

impl StrategyConfig for MACrossoverConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.short_window == 0 {
            return Err(StrategyError::InvalidParameter(
                "short_window must be greater than 0".into(),
            ));
        }
        if self.short_window >= self.long_window {
            return Err(StrategyError::InvalidParameter(format!(
                "short_window ({}) must be less than long_window ({})",
                self.short_window, self.long_window
            )));
        }
        Ok(())
    }
}

/// Moving Average Crossover Strategy.
#[derive(Debug, Clone)]
pub struct MACrossoverStrategy {
    config: MACrossoverConfig,
}

impl MACrossoverStrategy {
    /// Create a strategy from a validated configuration.
    pub fn new(config: MACrossoverConfig) -> Result<Self, StrategyError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MACrossoverConfig {
        &self.config
    }

    fn calculate_ma(&self, closes: &[f64], period: usize) -> Result<Vec<Option<f64>>, StrategyError> {
        let values = if self.config.use_ema {
            Ema::new(period).map(|ema| ema.calculate(closes))
        } else {
            Sma::new(period).map(|sma| sma.calculate(closes))
        };
        values.map_err(|e| StrategyError::InvalidParameter(e.to_string()))
    }
}

impl SignalProvider for MACrossoverStrategy {
    fn name(&self) -> &str {
        "ma_crossover"
    }

    fn description(&self) -> &str {
        "Long while the short moving average is above the long moving average"
    }

    fn generate_signals(&self, bars: &BarSeries) -> Result<SignalSeries, StrategyError> {
        let closes = bars.closes();
        let short = self.calculate_ma(&closes, self.config.short_window)?;
        let long = self.calculate_ma(&closes, self.config.long_window)?;

        let signals = short
            .iter()
            .zip(&long)
            .map(|pair| match pair {
                (Some(s), Some(l)) if s > l => Signal::Buy,
                (Some(s), Some(l)) if s < l => Signal::Sell,
                _ => Signal::Hold,
            })
            .collect();

        into_signal_series(bars, signals)
    }

    fn warmup_period(&self) -> usize {
        self.config.long_window
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }
}
