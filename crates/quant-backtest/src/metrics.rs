//! Performance metrics derived from an equity curve.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use quant_core::error::{TradingError, TradingResult};

/// Trading periods per year used for annualization.
pub const PERIODS_PER_YEAR: f64 = 252.0;

/// Summary performance figures for one run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// `(last - first) / first`
    pub total_return: f64,
    /// Annualized Sharpe ratio with a zero risk-free rate
    pub risk_adjusted_return: f64,
    /// Largest fractional decline from a running peak; always <= 0
    pub max_drawdown: f64,
    /// Total return compounded to a yearly rate
    pub annualized_return: f64,
}

/// Compute all metrics for an equity curve.
///
/// Fails with `InvalidInput` on an empty curve and `Numeric` on any
/// non-positive or non-finite value.
pub fn compute(equity: &[f64]) -> TradingResult<PerformanceMetrics> {
    let (first, last) = match (equity.first(), equity.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(TradingError::InvalidInput("empty equity curve".into())),
    };

    if let Some((i, value)) = equity
        .iter()
        .enumerate()
        .find(|(_, v)| !(v.is_finite() && **v > 0.0))
    {
        return Err(TradingError::Numeric(format!(
            "equity value {value} at bar {i} is not a positive number"
        )));
    }

    let total_return = (last - first) / first;
    let returns = returns(equity);

    Ok(PerformanceMetrics {
        total_return,
        risk_adjusted_return: sharpe_ratio(&returns),
        max_drawdown: max_drawdown(equity),
        annualized_return: annualized_return(total_return, returns.len()),
    })
}

/// Simple per-bar returns `e[i] / e[i-1] - 1`; empty for fewer than two points.
pub fn returns(equity: &[f64]) -> Vec<f64> {
    equity.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// `sqrt(252) * mean / stdev` using the sample standard deviation.
///
/// Returns 0.0 when there are no returns or the returns have no variability
/// (a flat curve, or a single return).
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let mean = returns.iter().mean();
    let std_dev = returns.iter().std_dev();

    if !std_dev.is_finite() || std_dev <= 1e-12 * mean.abs().max(1.0) {
        return 0.0;
    }
    PERIODS_PER_YEAR.sqrt() * mean / std_dev
}

/// Minimum of `e[i] / runningMax[i] - 1`.
pub fn max_drawdown(equity: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst: f64 = 0.0;
    for &value in equity {
        peak = peak.max(value);
        worst = worst.min(value / peak - 1.0);
    }
    worst
}

/// `(1 + total_return)^(252 / periods) - 1`; 0.0 without any periods.
pub fn annualized_return(total_return: f64, periods: usize) -> f64 {
    if periods == 0 {
        return 0.0;
    }
    (1.0 + total_return).powf(PERIODS_PER_YEAR / periods as f64) - 1.0
}
