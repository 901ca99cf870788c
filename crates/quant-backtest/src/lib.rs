//! Backtesting engine.

mod engine;
pub mod metrics;
mod report;
mod statistics;

pub use engine::{run_backtest, BacktestConfig, BacktestEngine, BacktestResult, EquityPoint};
pub use metrics::PerformanceMetrics;
pub use report::BacktestReport;
pub use statistics::TradeStats;
