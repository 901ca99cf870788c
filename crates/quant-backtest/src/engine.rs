//! Backtesting engine.
//!
//! Single position slot, all-in sizing, execution at the close of the bar
//! that carries the signal. Bar 0 only seeds the equity curve.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};
use quant_core::error::{DataError, TradingError, TradingResult};
use quant_core::traits::SignalProvider;
use quant_core::types::{BarSeries, PositionState, Side, Signal, SignalSeries, Trade};

use crate::metrics;
use crate::statistics::TradeStats;

/// Backtest configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Initial capital
    pub initial_capital: f64,
    /// Fraction of traded notional charged on every buy and sell
    pub commission: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            commission: 0.0,
        }
    }
}

impl BacktestConfig {
    pub fn new(initial_capital: f64, commission: f64) -> Self {
        Self {
            initial_capital,
            commission,
        }
    }

    /// Capital must be positive and finite; commission in `[0, 1)`.
    pub fn validate(&self) -> TradingResult<()> {
        if !(self.initial_capital.is_finite() && self.initial_capital > 0.0) {
            return Err(TradingError::InvalidParameter(format!(
                "initial capital must be a positive number, got {}",
                self.initial_capital
            )));
        }
        if !(self.commission >= 0.0 && self.commission < 1.0) {
            return Err(TradingError::InvalidParameter(format!(
                "commission must be in [0, 1), got {}",
                self.commission
            )));
        }
        Ok(())
    }
}

/// Portfolio value at the close of one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: i64,
    pub equity: f64,
}

/// Outcome of one run. Never partially filled: any failure aborts the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub initial_capital: f64,
    pub final_equity: f64,
    pub total_return: f64,
    pub risk_adjusted_return: f64,
    pub max_drawdown: f64,
    pub annualized_return: f64,
    pub trades: Vec<Trade>,
    /// One point per bar
    pub equity_curve: Vec<EquityPoint>,
    pub trade_stats: TradeStats,
    /// Mark-to-market P&L of a position still open after the last bar
    #[serde(default)]
    pub unrealized_pnl: f64,
}

impl BacktestResult {
    /// Equity values without timestamps.
    pub fn equity_values(&self) -> Vec<f64> {
        self.equity_curve.iter().map(|p| p.equity).collect()
    }
}

/// Run a backtest with explicit parameters.
pub fn run_backtest(
    bars: &BarSeries,
    signals: &SignalSeries,
    initial_capital: f64,
    commission: f64,
) -> TradingResult<BacktestResult> {
    BacktestEngine::new(BacktestConfig::new(initial_capital, commission))?.run(bars, signals)
}

/// Backtesting engine.
#[derive(Debug, Clone)]
pub struct BacktestEngine {
    config: BacktestConfig,
}

impl BacktestEngine {
    /// Create a new backtest engine. The configuration is validated once here.
    pub fn new(config: BacktestConfig) -> TradingResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Run a backtest over precomputed signals.
    pub fn run(&self, bars: &BarSeries, signals: &SignalSeries) -> TradingResult<BacktestResult> {
        self.simulate(bars, signals, None)
    }

    /// Generate signals with `provider`, then run.
    pub fn run_strategy(
        &self,
        bars: &BarSeries,
        provider: &dyn SignalProvider,
    ) -> TradingResult<BacktestResult> {
        let signals = provider.generate_signals(bars)?;
        debug!(
            provider = provider.name(),
            active = signals.active_count(),
            "Generated signals"
        );
        self.run(bars, &signals)
    }

    /// Like [`run`](Self::run), but checks `cancel` before every bar.
    pub fn run_cancellable(
        &self,
        bars: &BarSeries,
        signals: &SignalSeries,
        cancel: &AtomicBool,
    ) -> TradingResult<BacktestResult> {
        self.simulate(bars, signals, Some(cancel))
    }

    fn check_inputs(bars: &BarSeries, signals: &SignalSeries) -> TradingResult<()> {
        if bars.is_empty() {
            return Err(TradingError::InvalidInput("bar series is empty".into()));
        }
        signals.ensure_aligned(bars)?;
        if let Some((index, bar)) = bars
            .iter()
            .enumerate()
            .find(|(_, bar)| !bar.has_tradable_close())
        {
            return Err(DataError::InvalidPrice {
                index,
                price: bar.close,
            }
            .into());
        }
        Ok(())
    }

    fn simulate(
        &self,
        bars: &BarSeries,
        signals: &SignalSeries,
        cancel: Option<&AtomicBool>,
    ) -> TradingResult<BacktestResult> {
        Self::check_inputs(bars, signals)?;

        let span = info_span!("backtest", symbol = %bars.symbol, bars = bars.len());
        let _enter = span.enter();

        let commission = self.config.commission;
        let mut capital = self.config.initial_capital;
        let mut position = PositionState::Flat;
        let mut trades: Vec<Trade> = Vec::new();
        let mut equity_curve = Vec::with_capacity(bars.len());

        for (i, (bar, signal)) in bars.iter().zip(signals.signals()).enumerate() {
            if i == 0 {
                equity_curve.push(EquityPoint {
                    timestamp: bar.timestamp,
                    equity: capital,
                });
                continue;
            }
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                info!(bar = i, "Backtest cancelled");
                return Err(TradingError::Cancelled { bar: i });
            }

            let price = bar.close;
            match (signal, position) {
                (Signal::Buy, PositionState::Flat) => {
                    let shares = capital / price;
                    let fee = shares * price * commission;
                    capital -= fee;
                    trades.push(Trade {
                        timestamp: bar.timestamp,
                        side: Side::Buy,
                        price,
                        size: shares,
                        commission: fee,
                    });
                    debug!(bar = i, price, shares, fee, "Buy");
                    position = PositionState::Long {
                        shares,
                        entry_price: price,
                    };
                }
                (Signal::Sell, PositionState::Long { shares, .. }) if shares > 0.0 => {
                    let notional = shares * price;
                    let fee = notional * commission;
                    capital = notional - fee;
                    trades.push(Trade {
                        timestamp: bar.timestamp,
                        side: Side::Sell,
                        price,
                        size: shares,
                        commission: fee,
                    });
                    debug!(bar = i, price, shares, fee, proceeds = capital, "Sell");
                    position = PositionState::Flat;
                }
                _ => {}
            }

            let equity = match position {
                PositionState::Flat => capital,
                PositionState::Long { .. } => position.market_value(price),
            };
            equity_curve.push(EquityPoint {
                timestamp: bar.timestamp,
                equity,
            });
        }

        let values: Vec<f64> = equity_curve.iter().map(|p| p.equity).collect();
        let performance = metrics::compute(&values)?;
        let trade_stats = TradeStats::from_trades(&trades);
        let final_equity = values.last().copied().unwrap_or(self.config.initial_capital);
        let unrealized_pnl = bars
            .last()
            .map_or(0.0, |bar| position.unrealized_pnl(bar.close));
        if let PositionState::Long { shares, .. } = position {
            info!(shares, unrealized_pnl, "Position open at end of run");
        }

        info!(
            trades = trades.len(),
            final_equity,
            total_return = performance.total_return,
            sharpe = performance.risk_adjusted_return,
            max_drawdown = performance.max_drawdown,
            "Backtest complete"
        );

        Ok(BacktestResult {
            initial_capital: self.config.initial_capital,
            final_equity,
            total_return: performance.total_return,
            risk_adjusted_return: performance.risk_adjusted_return,
            max_drawdown: performance.max_drawdown,
            annualized_return: performance.annualized_return,
            trades,
            equity_curve,
            trade_stats,
            unrealized_pnl,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quant_core::types::Bar;
    use quant_strategies::{MACrossoverConfig, MACrossoverStrategy};

    fn series(closes: &[f64]) -> BarSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64 * 86_400_000, c, c, c, c, 1_000.0))
            .collect();
        BarSeries::new("TEST", bars).unwrap()
    }

    fn signals(bars: &BarSeries, values: &[i8]) -> SignalSeries {
        SignalSeries::from_values(bars, values).unwrap()
    }

    #[test]
    fn test_reference_scenario() {
        let bars = series(&[100.0, 105.0, 110.0, 90.0, 95.0]);
        let result = run_backtest(&bars, &signals(&bars, &[0, 1, 0, -1, 0]), 1000.0, 0.0).unwrap();

        let shares = 1000.0 / 105.0;
        let equity = result.equity_values();
        assert_eq!(equity.len(), 5);
        assert_eq!(equity[0], 1000.0);
        assert!((equity[1] - 1000.0).abs() < 1e-9);
        assert!((equity[2] - shares * 110.0).abs() < 1e-9);
        assert!((equity[3] - shares * 90.0).abs() < 1e-9);
        assert!((equity[4] - 857.142857).abs() < 1e-4);
        assert!((result.total_return - (-0.142857)).abs() < 1e-5);
        assert!(result.max_drawdown < 0.0);

        assert_eq!(result.trades.len(), 2);
        assert_eq!(result.trades[0].side, Side::Buy);
        assert!((result.trades[0].size - 9.5238).abs() < 1e-3);
        assert_eq!(result.trades[1].side, Side::Sell);
        assert_eq!(result.trades[1].size, result.trades[0].size);
        assert_eq!(result.trades[1].timestamp, 3 * 86_400_000);
        assert_eq!(result.unrealized_pnl, 0.0);
    }

    #[test]
    fn test_reference_scenario_with_commission() {
        let bars = series(&[100.0, 105.0, 110.0, 90.0, 95.0]);
        let result = run_backtest(&bars, &signals(&bars, &[0, 1, 0, -1, 0]), 1000.0, 0.01).unwrap();

        let expected = 1000.0 / 105.0 * 90.0 * 0.99;
        assert!((result.final_equity - expected).abs() < 1e-9);
        // Entry commission does not reduce the valuation while long
        assert!((result.equity_values()[2] - 1000.0 / 105.0 * 110.0).abs() < 1e-9);
        assert!((result.trades[0].commission - 10.0).abs() < 1e-9);
        assert!((result.trade_stats.total_commission - (10.0 + expected / 0.99 * 0.01)).abs() < 1e-9);
    }

    #[test]
    fn test_bar_zero_never_trades() {
        let bars = series(&[100.0, 100.0, 100.0]);
        let result = run_backtest(&bars, &signals(&bars, &[1, 0, 0]), 1000.0, 0.0).unwrap();
        assert!(result.trades.is_empty());
        assert_eq!(result.equity_values(), vec![1000.0; 3]);
    }

    #[test]
    fn test_repeated_buys_ignored_while_long() {
        let bars = series(&[10.0, 10.0, 20.0, 40.0]);
        let result = run_backtest(&bars, &signals(&bars, &[0, 1, 1, 1]), 100.0, 0.0).unwrap();
        assert_eq!(result.trades.len(), 1);
        assert!((result.final_equity - 400.0).abs() < 1e-9);
        assert!(result.trade_stats.open_at_end);
        // 10 shares bought at 10, marked at 40
        assert!((result.unrealized_pnl - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_sell_while_flat_ignored() {
        let bars = series(&[10.0, 12.0, 8.0]);
        let result = run_backtest(&bars, &signals(&bars, &[0, -1, -1]), 100.0, 0.0).unwrap();
        assert!(result.trades.is_empty());
        assert_eq!(result.total_return, 0.0);
    }

    #[test]
    fn test_single_bar() {
        let bars = series(&[42.0]);
        let result = run_backtest(&bars, &signals(&bars, &[1]), 500.0, 0.0).unwrap();
        assert_eq!(result.equity_values(), vec![500.0]);
        assert_eq!(result.risk_adjusted_return, 0.0);
        assert_eq!(result.max_drawdown, 0.0);
    }

    #[test]
    fn test_invalid_inputs() {
        let bars = series(&[100.0, 101.0, 102.0]);
        let short = SignalSeries::from_values(&series(&[1.0, 2.0]), &[0, 0]).unwrap();
        assert!(matches!(
            run_backtest(&bars, &short, 1000.0, 0.0),
            Err(TradingError::InvalidInput(_))
        ));

        let empty = BarSeries::new("TEST", vec![]).unwrap();
        assert!(matches!(
            run_backtest(&empty, &SignalSeries::hold(&empty), 1000.0, 0.0),
            Err(TradingError::InvalidInput(_))
        ));

        let hold = SignalSeries::hold(&bars);
        assert!(matches!(
            run_backtest(&bars, &hold, 0.0, 0.0),
            Err(TradingError::InvalidParameter(_))
        ));
        assert!(matches!(
            run_backtest(&bars, &hold, 1000.0, 1.0),
            Err(TradingError::InvalidParameter(_))
        ));
        assert!(matches!(
            run_backtest(&bars, &hold, f64::INFINITY, 0.0),
            Err(TradingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_misaligned_timestamps() {
        let bars = series(&[100.0, 101.0]);
        let shifted = BarSeries::new(
            "TEST",
            vec![
                Bar::new(0, 1.0, 1.0, 1.0, 1.0, 1.0),
                Bar::new(5, 1.0, 1.0, 1.0, 1.0, 1.0),
            ],
        )
        .unwrap();
        let other = SignalSeries::hold(&shifted);
        assert!(matches!(
            run_backtest(&bars, &other, 1000.0, 0.0),
            Err(TradingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_invalid_price_rejected_up_front() {
        for bad in [0.0, -5.0, f64::NAN] {
            let bars = series(&[100.0, 101.0, bad, 103.0]);
            let err = run_backtest(&bars, &SignalSeries::hold(&bars), 1000.0, 0.0).unwrap_err();
            assert!(matches!(
                err,
                TradingError::Data(DataError::InvalidPrice { index: 2, .. })
            ));
        }
    }

    #[test]
    fn test_cancellation() {
        let bars = series(&[1.0, 2.0, 3.0]);
        let hold = SignalSeries::hold(&bars);
        let engine = BacktestEngine::new(BacktestConfig::default()).unwrap();

        let cancel = AtomicBool::new(true);
        assert!(matches!(
            engine.run_cancellable(&bars, &hold, &cancel),
            Err(TradingError::Cancelled { bar: 1 })
        ));

        let proceed = AtomicBool::new(false);
        assert!(engine.run_cancellable(&bars, &hold, &proceed).is_ok());
    }

    #[test]
    fn test_run_strategy() {
        let closes: Vec<f64> = (0..100)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 10.0)
            .collect();
        let bars = series(&closes);
        let strategy = MACrossoverStrategy::new(MACrossoverConfig {
            short_window: 5,
            long_window: 10,
            use_ema: true,
        })
        .unwrap();

        let engine = BacktestEngine::new(BacktestConfig::default()).unwrap();
        let result = engine.run_strategy(&bars, &strategy).unwrap();

        assert_eq!(result.equity_curve.len(), 100);
        assert!(!result.trades.is_empty());
        for pair in result.trades.windows(2) {
            assert_ne!(pair[0].side, pair[1].side);
            assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }

    #[test]
    fn test_result_serializes() {
        let bars = series(&[100.0, 105.0, 110.0]);
        let result = run_backtest(&bars, &signals(&bars, &[0, 1, 0]), 1000.0, 0.0).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["trades"][0]["side"], "buy");
        assert_eq!(json["equity_curve"].as_array().unwrap().len(), 3);
    }
}
