//! News sentiment strategy.
//!
//! Each bar is scored from the headlines published in the few days up to and
//! including its date. A day without headlines is neutral; a source failure
//! is not, and the configured policy decides whether it aborts the run.

use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::warn;
use quant_core::{
    error::StrategyError,
    traits::{SentimentReading, SentimentSource, SignalProvider, StrategyConfig},
    types::{BarSeries, Signal, SignalSeries},
};

use crate::into_signal_series;

/// Upper bound on `lookback_days` (ten years).
pub const MAX_LOOKBACK_DAYS: u32 = 3_650;

/// What to do when the sentiment source cannot be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnavailablePolicy {
    /// Fail signal generation.
    #[default]
    Fail,
    /// Hold on the affected bar.
    Hold,
}

/// Configuration for the sentiment strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SentimentConfig {
    /// Mean score above which the strategy buys (below its negative, sells)
    pub sentiment_threshold: f64,
    /// Calendar days before the bar date included in the window
    pub lookback_days: u32,
    /// Headlines scored per bar
    pub max_headlines: usize,
    pub on_unavailable: UnavailablePolicy,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            sentiment_threshold: 0.6,
            lookback_days: 3,
            max_headlines: 5,
            on_unavailable: UnavailablePolicy::Fail,
        }
    }
}

impl StrategyConfig for SentimentConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if !(0.0..=1.0).contains(&self.sentiment_threshold) {
            return Err(StrategyError::InvalidParameter(format!(
                "sentiment_threshold must be in [0, 1], got {}",
                self.sentiment_threshold
            )));
        }
        if self.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(StrategyError::InvalidParameter(format!(
                "lookback_days must be at most {MAX_LOOKBACK_DAYS}, got {}",
                self.lookback_days
            )));
        }
        if self.max_headlines == 0 {
            return Err(StrategyError::InvalidParameter(
                "max_headlines must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Sentiment-driven signal provider.
pub struct SentimentStrategy {
    config: SentimentConfig,
    source: Arc<dyn SentimentSource>,
}

impl SentimentStrategy {
    pub fn new(
        config: SentimentConfig,
        source: Arc<dyn SentimentSource>,
    ) -> Result<Self, StrategyError> {
        config.validate()?;
        Ok(Self { config, source })
    }

    /// Score one date for `symbol`.
    pub fn reading(&self, symbol: &str, date: chrono::NaiveDate) -> SentimentReading {
        let lookback = Duration::days(i64::from(self.config.lookback_days));
        let Some(from) = date.checked_sub_signed(lookback) else {
            return SentimentReading::Unavailable(format!(
                "lookback of {} days from {date} is out of range",
                self.config.lookback_days
            ));
        };
        match self.source.headlines(symbol, from, date) {
            Ok(headlines) if headlines.is_empty() => SentimentReading::NoCoverage,
            Ok(headlines) => {
                let scored: Vec<f64> = headlines
                    .iter()
                    .take(self.config.max_headlines)
                    .map(|h| h.signed_score())
                    .collect();
                SentimentReading::Score(scored.iter().sum::<f64>() / scored.len() as f64)
            }
            Err(e) => SentimentReading::Unavailable(e.to_string()),
        }
    }

    fn classify(&self, score: f64) -> Signal {
        if score > self.config.sentiment_threshold {
            Signal::Buy
        } else if score < -self.config.sentiment_threshold {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }
}

impl SignalProvider for SentimentStrategy {
    fn name(&self) -> &str {
        "sentiment"
    }

    fn description(&self) -> &str {
        "Trades on the mean sentiment of recent news headlines"
    }

    fn generate_signals(&self, bars: &BarSeries) -> Result<SignalSeries, StrategyError> {
        let mut signals = Vec::with_capacity(bars.len());

        for bar in bars.iter() {
            let date = bar.date();
            let signal = match self.reading(&bars.symbol, date) {
                SentimentReading::Score(score) => self.classify(score),
                SentimentReading::NoCoverage => Signal::Hold,
                SentimentReading::Unavailable(reason) => match self.config.on_unavailable {
                    UnavailablePolicy::Fail => {
                        return Err(StrategyError::DataUnavailable {
                            symbol: bars.symbol.clone(),
                            date: date.to_string(),
                            reason,
                        });
                    }
                    UnavailablePolicy::Hold => {
                        warn!(
                            symbol = %bars.symbol,
                            %date,
                            source = self.source.name(),
                            %reason,
                            "Sentiment unavailable, holding"
                        );
                        Signal::Hold
                    }
                },
            };
            signals.push(signal);
        }

        into_signal_series(bars, signals)
    }

    fn warmup_period(&self) -> usize {
        0
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }
}
