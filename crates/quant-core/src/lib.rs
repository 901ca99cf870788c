//! Core types and traits for the backtester.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries)
//! - Discrete signals aligned to bars (Signal, SignalSeries)
//! - Position state and the trade log record
//! - Core traits for signal providers, indicators and data sources

pub mod types;
pub mod traits;
pub mod error;

pub use error::{ErrorKind, TradingError, TradingResult};
pub use types::*;
pub use traits::*;
