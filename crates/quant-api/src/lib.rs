//! Request façade over the backtester.
//!
//! Translates a request (symbol, strategy, parameters, date range, capital,
//! commission) into a data fetch, a signal provider and an engine run, and
//! returns either a full result or a stable error record. Never a partial
//! result.

mod error;
mod request;
mod service;

pub use error::{status_and_code, ApiError};
pub use request::{BacktestRequest, BacktestResponse, DEFAULT_CAPITAL};
pub use service::BacktestService;
