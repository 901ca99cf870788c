//! Technical indicators used by the built-in signal providers.
//!
//! Every indicator returns a vector aligned with its input, with `None`
//! during the warmup window:
//! - Moving averages (SMA, EMA)
//! - Momentum (RSI, percentage change)
//! - Volatility (rolling standard deviation)

pub mod momentum;
pub mod moving_average;
pub mod volatility;

pub use momentum::{pct_change, Rsi};
pub use moving_average::{Ema, Sma};
pub use volatility::StdDev;
