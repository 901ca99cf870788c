//! Momentum indicators.

use quant_core::error::IndicatorError;
use quant_core::traits::{check_period, Indicator};

/// One-bar percentage change: `x[i] / x[i-1] - 1`. Undefined at index 0
/// and wherever the previous value is zero.
pub fn pct_change(data: &[f64]) -> Vec<Option<f64>> {
    let mut result = Vec::with_capacity(data.len());
    if data.is_empty() {
        return result;
    }
    result.push(None);
    for w in data.windows(2) {
        result.push((w[0] != 0.0).then(|| w[1] / w[0] - 1.0));
    }
    result
}

/// Relative Strength Index (RSI).
///
/// Average gain and average loss are simple rolling means of the last
/// `period` price changes.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        Ok(Self {
            period: check_period("RSI", period)?,
        })
    }
}

impl Indicator for Rsi {
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        if data.len() <= self.period {
            return result;
        }

        let changes: Vec<f64> = data.windows(2).map(|w| w[1] - w[0]).collect();
        let period_f64 = self.period as f64;

        for end in self.period..=changes.len() {
            let window = &changes[end - self.period..end];
            let gain: f64 = window.iter().filter(|c| **c > 0.0).sum::<f64>() / period_f64;
            let loss: f64 = -window.iter().filter(|c| **c < 0.0).sum::<f64>() / period_f64;

            let rsi = if loss == 0.0 && gain == 0.0 {
                50.0
            } else if loss == 0.0 {
                100.0
            } else {
                100.0 - (100.0 / (1.0 + gain / loss))
            };
            // changes[end - 1] is the move into data[end]
            result[end] = Some(rsi);
        }

        result
    }

    fn period(&self) -> usize {
        self.period + 1 // Need period+1 data points
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pct_change() {
        let result = pct_change(&[100.0, 110.0, 99.0, 0.0, 5.0]);
        assert_eq!(result[0], None);
        assert!((result[1].unwrap() - 0.1).abs() < 1e-12);
        assert!((result[2].unwrap() - (-0.1)).abs() < 1e-12);
        assert_eq!(result[3], Some(-1.0));
        assert_eq!(result[4], None);
        assert!(pct_change(&[]).is_empty());
    }

    #[test]
    fn test_rsi_all_gains() {
        let rsi = Rsi::new(3).unwrap();
        let result = rsi.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(result[..3], [None, None, None]);
        assert_eq!(result[3], Some(100.0));
        assert_eq!(result[4], Some(100.0));
    }

    #[test]
    fn test_rsi_mixed() {
        let rsi = Rsi::new(2).unwrap();
        // changes: +2, -1, +1
        let result = rsi.calculate(&[10.0, 12.0, 11.0, 12.0]);

        // window [+2, -1]: gain 1.0, loss 0.5, rs 2 → 66.67
        assert!((result[2].unwrap() - 200.0 / 3.0).abs() < 1e-9);
        // window [-1, +1]: gain 0.5, loss 0.5 → 50
        assert!((result[3].unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_flat_prices() {
        let rsi = Rsi::new(2).unwrap();
        let result = rsi.calculate(&[5.0, 5.0, 5.0]);
        assert_eq!(result[2], Some(50.0));
    }

    #[test]
    fn test_rsi_bounds() {
        let data: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let rsi = Rsi::new(14).unwrap();
        for value in rsi.calculate(&data).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value));
        }
    }
}
