//! Core traits for the backtester.

mod data_source;
mod indicator;
mod sentiment;
mod strategy;

pub use data_source::DataSource;
pub use indicator::{check_period, Indicator};
pub use sentiment::{ScoredHeadline, SentimentLabel, SentimentReading, SentimentSource};
pub use strategy::{ProviderSummary, SignalProvider, StrategyConfig};
