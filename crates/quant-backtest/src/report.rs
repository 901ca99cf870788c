//! Backtest report generation.

use serde::{Deserialize, Serialize};

use crate::{BacktestConfig, BacktestResult};

/// Complete backtest report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    pub symbol: String,
    /// Strategy key
    pub strategy: String,
    /// Configuration used
    pub config: BacktestConfig,
    pub result: BacktestResult,
}

impl BacktestReport {
    pub fn new(
        symbol: impl Into<String>,
        strategy: impl Into<String>,
        config: BacktestConfig,
        result: BacktestResult,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            strategy: strategy.into(),
            config,
            result,
        }
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let r = &self.result;
        let t = &r.trade_stats;
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                     BACKTEST REPORT                        \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!("  Symbol:              {}\n", self.symbol));
        s.push_str(&format!("  Strategy:            {}\n", self.strategy));
        s.push('\n');

        s.push_str("PERFORMANCE\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Initial Capital:     ${:.2}\n", r.initial_capital));
        s.push_str(&format!("  Final Equity:        ${:.2}\n", r.final_equity));
        s.push_str(&format!("  Total Return:        {:.2}%\n", r.total_return * 100.0));
        s.push_str(&format!(
            "  Annualized Return:   {:.2}%\n",
            r.annualized_return * 100.0
        ));
        s.push_str(&format!("  Max Drawdown:        {:.2}%\n", r.max_drawdown * 100.0));
        s.push('\n');

        s.push_str("RISK METRICS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Sharpe Ratio:        {:.2}\n", r.risk_adjusted_return));
        s.push_str(&format!(
            "  Commission Rate:     {:.4}%\n",
            self.config.commission * 100.0
        ));
        s.push('\n');

        s.push_str("TRADE STATISTICS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Total Trades:        {}\n", t.total_trades));
        s.push_str(&format!("  Round Trips:         {}\n", t.round_trips));
        s.push_str(&format!("  Winning Trades:      {}\n", t.winning_trades));
        s.push_str(&format!("  Losing Trades:       {}\n", t.losing_trades));
        s.push_str(&format!("  Win Rate:            {:.2}%\n", t.win_rate * 100.0));
        s.push_str(&format!("  Realized P&L:        ${:.2}\n", t.realized_pnl));
        s.push_str(&format!("  Commission Paid:     ${:.2}\n", t.total_commission));
        s.push_str(&format!(
            "  Open At End:         {}\n",
            if t.open_at_end { "yes" } else { "no" }
        ));
        if t.open_at_end {
            s.push_str(&format!("  Unrealized P&L:      ${:.2}
", r.unrealized_pnl));
        }
        s.push('\n');

        s.push_str("EXECUTION\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Equity Points:       {}\n", r.equity_curve.len()));
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV (equity curve only).
    pub fn equity_to_csv(&self) -> String {
        let mut csv = String::from("timestamp,equity\n");
        for point in &self.result.equity_curve {
            csv.push_str(&format!("{},{}\n", point.timestamp, point.equity));
        }
        csv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run_backtest;
    use quant_core::types::{Bar, BarSeries, SignalSeries};

    fn report() -> BacktestReport {
        let bars = BarSeries::new(
            "AAPL",
            [100.0, 105.0, 110.0, 90.0, 95.0]
                .iter()
                .enumerate()
                .map(|(i, &c)| Bar::new(i as i64 * 1000, c, c, c, c, 1.0))
                .collect(),
        )
        .unwrap();
        let signals = SignalSeries::from_values(&bars, &[0, 1, 0, -1, 0]).unwrap();
        let config = BacktestConfig::new(1000.0, 0.0);
        let result = run_backtest(&bars, &signals, 1000.0, 0.0).unwrap();
        BacktestReport::new("AAPL", "ma_crossover", config, result)
    }

    #[test]
    fn test_report_summary() {
        let summary = report().summary();
        assert!(summary.contains("Total Return"));
        assert!(summary.contains("-14.29%"));
        assert!(summary.contains("Round Trips:         1"));
        assert!(summary.contains("ma_crossover"));
    }

    #[test]
    fn test_equity_csv() {
        let csv = report().equity_to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "timestamp,equity");
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "0,1000");
    }

    #[test]
    fn test_json_export() {
        let json = report().to_json().unwrap();
        let parsed: BacktestReport = serde_json::from_str(&json).unwrap();
        let original = report();
        assert_eq!(parsed.symbol, "AAPL");
        assert_eq!(parsed.result.trades.len(), original.result.trades.len());
        assert!((parsed.result.final_equity - original.result.final_equity).abs() < 1e-9);
    }
}
