//! Signal provider implementations.
//!
//! This crate provides the built-in strategies:
//! - Moving Average Crossover
//! - Trained direction classifier
//! - News sentiment

mod classifier;
mod ma_crossover;
mod registry;
mod sentiment;

pub use classifier::{
    ClassifierConfig, ClassifierStrategy, DirectionModel, FEATURE_COUNT, MAX_EPOCHS,
    MAX_SEQUENCE_LENGTH,
};
pub use ma_crossover::{MACrossoverConfig, MACrossoverStrategy};
pub use registry::{StrategyContext, StrategyInfo, StrategyRegistry};
pub use sentiment::{SentimentConfig, SentimentStrategy, UnavailablePolicy, MAX_LOOKBACK_DAYS};

use quant_core::error::StrategyError;
use quant_core::types::{BarSeries, Signal, SignalSeries};

/// Stamp per-bar signals with the bar timestamps.
pub(crate) fn into_signal_series(
    bars: &BarSeries,
    signals: Vec<Signal>,
) -> Result<SignalSeries, StrategyError> {
    let produced = signals.len();
    SignalSeries::for_bars(bars, signals).map_err(|_| StrategyError::Misaligned {
        expected: bars.len(),
        produced,
    })
}
