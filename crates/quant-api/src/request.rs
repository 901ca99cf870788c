//! Request and response records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use quant_backtest::{BacktestResult, TradeStats};
use quant_core::error::{TradingError, TradingResult};
use quant_core::types::Trade;

/// Default starting capital when a request leaves it out.
pub const DEFAULT_CAPITAL: f64 = 100_000.0;

fn default_capital() -> f64 {
    DEFAULT_CAPITAL
}

/// A backtest request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRequest {
    pub symbol: String,
    /// Registry key or alias
    pub strategy: String,
    /// Strategy parameters; missing keys take the strategy's defaults
    #[serde(default)]
    pub params: serde_json::Map<String, serde_json::Value>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_capital")]
    pub initial_capital: f64,
    #[serde(default)]
    pub commission: f64,
}

impl BacktestRequest {
    pub fn new(
        symbol: impl Into<String>,
        strategy: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            strategy: strategy.into(),
            params: serde_json::Map::new(),
            start_date,
            end_date,
            initial_capital: DEFAULT_CAPITAL,
            commission: 0.0,
        }
    }

    pub fn with_params(mut self, params: serde_json::Map<String, serde_json::Value>) -> Self {
        self.params = params;
        self
    }

    pub fn with_capital(mut self, capital: f64) -> Self {
        self.initial_capital = capital;
        self
    }

    pub fn with_commission(mut self, commission: f64) -> Self {
        self.commission = commission;
        self
    }

    /// Checks that do not need data or a strategy.
    pub fn validate(&self) -> TradingResult<()> {
        if self.symbol.trim().is_empty() {
            return Err(TradingError::InvalidInput("symbol is empty".into()));
        }
        if self.strategy.trim().is_empty() {
            return Err(TradingError::InvalidInput("strategy is empty".into()));
        }
        if self.start_date > self.end_date {
            return Err(TradingError::InvalidParameter(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            )));
        }
        Ok(())
    }
}

/// Successful backtest response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResponse {
    pub symbol: String,
    /// Resolved registry key
    pub strategy: String,
    pub total_return: f64,
    pub risk_adjusted_return: f64,
    pub max_drawdown: f64,
    pub annualized_return: f64,
    pub final_equity: f64,
    pub equity_curve: Vec<f64>,
    pub trades: Vec<Trade>,
    pub trade_stats: TradeStats,
}

impl BacktestResponse {
    pub fn from_result(symbol: &str, strategy: &str, result: &BacktestResult) -> Self {
        Self {
            symbol: symbol.to_string(),
            strategy: strategy.to_string(),
            total_return: result.total_return,
            risk_adjusted_return: result.risk_adjusted_return,
            max_drawdown: result.max_drawdown,
            annualized_return: result.annualized_return,
            final_equity: result.final_equity,
            equity_curve: result.equity_values(),
            trades: result.trades.clone(),
            trade_stats: result.trade_stats.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: BacktestRequest = serde_json::from_value(serde_json::json!({
            "symbol": "AAPL",
            "strategy": "ma_crossover",
            "start_date": "2023-01-01",
            "end_date": "2023-12-31"
        }))
        .unwrap();

        assert_eq!(request.initial_capital, 100_000.0);
        assert_eq!(request.commission, 0.0);
        assert!(request.params.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_date_order() {
        let request = BacktestRequest::new(
            "AAPL",
            "ma_crossover",
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert!(matches!(
            request.validate(),
            Err(TradingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_empty_symbol() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let request = BacktestRequest::new(" ", "ma_crossover", day, day);
        assert!(matches!(
            request.validate(),
            Err(TradingError::InvalidInput(_))
        ));
    }
}
