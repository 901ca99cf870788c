//! Trade log statistics.

use serde::{Deserialize, Serialize};
use quant_core::types::{Side, Trade};

/// Summary of the trade log of one run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TradeStats {
    /// Total number of trades (buys and sells)
    pub total_trades: usize,
    /// Completed buy-then-sell pairs
    pub round_trips: usize,
    /// Round trips with positive P&L
    pub winning_trades: usize,
    /// Round trips with negative P&L
    pub losing_trades: usize,
    /// Winning share of round trips, 0.0 to 1.0
    pub win_rate: f64,
    /// Realized P&L summed over round trips
    pub realized_pnl: f64,
    /// Commission charged on all trades
    pub total_commission: f64,
    /// Whether the run ended holding shares
    pub open_at_end: bool,
}

impl TradeStats {
    /// Derive statistics from a trade log.
    ///
    /// Round-trip P&L is `sell_notional - sell_commission - buy_notional`.
    pub fn from_trades(trades: &[Trade]) -> Self {
        let mut stats = TradeStats {
            total_trades: trades.len(),
            ..Default::default()
        };
        let mut entry: Option<&Trade> = None;

        for trade in trades {
            stats.total_commission += trade.commission;
            match trade.side {
                Side::Buy => entry = Some(trade),
                Side::Sell => {
                    if let Some(buy) = entry.take() {
                        let pnl = trade.notional() - trade.commission - buy.notional();
                        stats.round_trips += 1;
                        stats.realized_pnl += pnl;
                        if pnl > 0.0 {
                            stats.winning_trades += 1;
                        } else if pnl < 0.0 {
                            stats.losing_trades += 1;
                        }
                    }
                }
            }
        }

        stats.open_at_end = entry.is_some();
        if stats.round_trips > 0 {
            stats.win_rate = stats.winning_trades as f64 / stats.round_trips as f64;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(side: Side, price: f64, size: f64, commission: f64) -> Trade {
        Trade {
            timestamp: 0,
            side,
            price,
            size,
            commission,
        }
    }

    #[test]
    fn test_empty_log() {
        let stats = TradeStats::from_trades(&[]);
        assert_eq!(stats, TradeStats::default());
    }

    #[test]
    fn test_round_trips() {
        let trades = [
            trade(Side::Buy, 100.0, 10.0, 0.0),
            trade(Side::Sell, 110.0, 10.0, 11.0), // +89
            trade(Side::Buy, 100.0, 9.0, 0.0),
            trade(Side::Sell, 90.0, 9.0, 0.0), // -90
            trade(Side::Buy, 95.0, 8.0, 7.6),
        ];
        let stats = TradeStats::from_trades(&trades);

        assert_eq!(stats.total_trades, 5);
        assert_eq!(stats.round_trips, 2);
        assert_eq!(stats.winning_trades, 1);
        assert_eq!(stats.losing_trades, 1);
        assert!((stats.win_rate - 0.5).abs() < 1e-12);
        assert!((stats.realized_pnl - (-1.0)).abs() < 1e-9);
        assert!((stats.total_commission - 18.6).abs() < 1e-9);
        assert!(stats.open_at_end);
    }

    #[test]
    fn test_breakeven_round_trip() {
        let trades = [
            trade(Side::Buy, 50.0, 2.0, 0.0),
            trade(Side::Sell, 50.0, 2.0, 0.0),
        ];
        let stats = TradeStats::from_trades(&trades);
        assert_eq!(stats.round_trips, 1);
        assert_eq!(stats.winning_trades + stats.losing_trades, 0);
        assert_eq!(stats.win_rate, 0.0);
        assert!(!stats.open_at_end);
    }
}
