//! Single-slot position state.

use serde::{Deserialize, Serialize};

/// Holding state of the one position slot. The engine never goes short.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PositionState {
    /// No shares held; capital sits in cash.
    #[default]
    Flat,
    /// All capital committed to `shares` bought at `entry_price`.
    Long { shares: f64, entry_price: f64 },
}

impl PositionState {
    /// Check if the position is flat (no shares).
    pub fn is_flat(&self) -> bool {
        !self.is_long()
    }

    /// Check if shares are held.
    pub fn is_long(&self) -> bool {
        matches!(self, PositionState::Long { shares, .. } if *shares > 0.0)
    }

    /// Shares held (0 when flat).
    pub fn shares(&self) -> f64 {
        match self {
            PositionState::Flat => 0.0,
            PositionState::Long { shares, .. } => *shares,
        }
    }

    /// Value of the held shares at `price`.
    pub fn market_value(&self, price: f64) -> f64 {
        self.shares() * price
    }

    /// Unrealized profit/loss at `price`.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        match self {
            PositionState::Flat => 0.0,
            PositionState::Long {
                shares,
                entry_price,
            } => shares * (price - entry_price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat() {
        let pos = PositionState::Flat;
        assert!(pos.is_flat());
        assert_eq!(pos.shares(), 0.0);
        assert_eq!(pos.market_value(100.0), 0.0);
        assert_eq!(pos.unrealized_pnl(100.0), 0.0);
    }

    #[test]
    fn test_long() {
        let pos = PositionState::Long {
            shares: 10.0,
            entry_price: 50.0,
        };
        assert!(pos.is_long());
        assert!((pos.market_value(55.0) - 550.0).abs() < 1e-9);
        assert!((pos.unrealized_pnl(45.0) - (-50.0)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_share_long_counts_as_flat() {
        let pos = PositionState::Long {
            shares: 0.0,
            entry_price: 50.0,
        };
        assert!(pos.is_flat());
    }
}
