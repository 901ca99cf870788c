//! Error types for the backtester.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level backtester error.
#[derive(Error, Debug)]
pub enum TradingError {
    /// Malformed or mismatched series.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Out-of-range run parameter (capital, commission, dates).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Degenerate statistics input.
    #[error("Numeric error: {0}")]
    Numeric(String),

    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Run cancelled at bar {bar}")]
    Cancelled { bar: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Strategy-specific errors.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Strategy not found: {0}")]
    NotFound(String),

    /// Parameters that do not deserialize into the strategy's configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Parameters that deserialize but are out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Insufficient data: need {required} bars, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Signal data unavailable for {symbol} on {date}: {reason}")]
    DataUnavailable {
        symbol: String,
        date: String,
        reason: String,
    },

    #[error("Strategy produced {produced} signals for {expected} bars")]
    Misaligned { expected: usize, produced: usize },

    #[error("Training failed: {0}")]
    TrainingFailed(String),
}

/// Data errors, both from data sources and degenerate values inside a series.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for {symbol} between {start} and {end}")]
    NoDataAvailable {
        symbol: String,
        start: String,
        end: String,
    },

    #[error("Invalid close price {price} at bar {index}")]
    InvalidPrice { index: usize, price: f64 },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Data source error: {0}")]
    Internal(String),
}

/// Indicator calculation errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Stable classification of failures, used by the request façade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    InvalidParameter,
    DataError,
    NumericError,
    NotFound,
    StrategyError,
    Internal,
}

impl TradingError {
    /// Classify this error into the stable taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TradingError::InvalidInput(_) => ErrorKind::InvalidInput,
            TradingError::InvalidParameter(_) => ErrorKind::InvalidParameter,
            TradingError::Numeric(_) => ErrorKind::NumericError,
            TradingError::Strategy(e) => e.kind(),
            TradingError::Data(e) => e.kind(),
            TradingError::Indicator(IndicatorError::InvalidParameter(_)) => {
                ErrorKind::InvalidParameter
            }
            TradingError::Cancelled { .. } | TradingError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl StrategyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StrategyError::InvalidParameter(_) => ErrorKind::InvalidParameter,
            StrategyError::DataUnavailable { .. } => ErrorKind::DataError,
            _ => ErrorKind::StrategyError,
        }
    }
}

impl DataError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DataError::SymbolNotFound(_) | DataError::NoDataAvailable { .. } => {
                ErrorKind::NotFound
            }
            DataError::InvalidPrice { .. } | DataError::ParseError(_) => ErrorKind::DataError,
            DataError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Result type alias for backtester operations.
pub type TradingResult<T> = Result<T, TradingError>;
