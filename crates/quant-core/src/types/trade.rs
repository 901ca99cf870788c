//! Trade log records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// One executed transition. Never mutated after it is appended to a log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Bar timestamp (Unix milliseconds)
    pub timestamp: i64,
    pub side: Side,
    /// Execution price (the bar close)
    pub price: f64,
    /// Shares bought, or shares sold
    pub size: f64,
    /// Commission charged on this trade's notional
    pub commission: f64,
}

impl Trade {
    /// Traded value before commission.
    pub fn notional(&self) -> f64 {
        self.price * self.size
    }

    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or_default()
    }
}
