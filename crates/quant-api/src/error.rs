//! Stable error records returned to callers.

use serde::{Deserialize, Serialize};
use quant_core::error::{ErrorKind, StrategyError, TradingError};

/// Error returned by the façade: HTTP-style status, stable code, message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code} ({status}): {message}")]
pub struct ApiError {
    pub status: u16,
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let (status, code) = status_and_code(kind);
        Self {
            status,
            code: code.to_string(),
            message: message.into(),
        }
    }

    /// 4xx errors are the caller's fault; 5xx are ours.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }
}

/// Status and code for each error kind.
pub fn status_and_code(kind: ErrorKind) -> (u16, &'static str) {
    match kind {
        ErrorKind::InvalidInput => (400, "invalid_input"),
        ErrorKind::InvalidParameter => (400, "invalid_parameter"),
        ErrorKind::StrategyError => (400, "strategy_error"),
        ErrorKind::NotFound => (404, "not_found"),
        ErrorKind::DataError => (422, "data_error"),
        ErrorKind::NumericError => (500, "numeric_error"),
        ErrorKind::Internal => (500, "internal_error"),
    }
}

impl From<TradingError> for ApiError {
    fn from(err: TradingError) -> Self {
        ApiError::new(err.kind(), err.to_string())
    }
}

impl From<StrategyError> for ApiError {
    fn from(err: StrategyError) -> Self {
        TradingError::from(err).into()
    }
}
