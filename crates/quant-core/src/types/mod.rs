//! Core data types for the backtester.

mod ohlcv;
mod position;
mod signal;
mod trade;

pub use ohlcv::{Bar, BarSeries};
pub use position::PositionState;
pub use signal::{Signal, SignalPoint, SignalSeries};
pub use trade::{Side, Trade};
