//! Volatility indicators.

use quant_core::error::IndicatorError;
use quant_core::traits::Indicator;

/// Rolling sample standard deviation (n - 1 denominator).
#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
}

impl StdDev {
    /// Create a new standard deviation indicator. The window must hold at least two values.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period < 2 {
            return Err(IndicatorError::InvalidParameter(
                "StdDev period must be at least 2".into(),
            ));
        }
        Ok(Self { period })
    }

    /// Same as [`Indicator::calculate`], but over a series with gaps.
    ///
    /// A value is produced only when the whole window is defined.
    pub fn calculate_sparse(&self, data: &[Option<f64>]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        if data.len() < self.period {
            return result;
        }
        for end in self.period - 1..data.len() {
            let window = &data[end + 1 - self.period..=end];
            if let Some(values) = window.iter().copied().collect::<Option<Vec<f64>>>() {
                result[end] = Some(sample_std(&values));
            }
        }
        result
    }
}

fn sample_std(window: &[f64]) -> f64 {
    let n = window.len() as f64;
    let mean: f64 = window.iter().sum::<f64>() / n;
    let variance: f64 = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

impl Indicator for StdDev {
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        if data.len() < self.period {
            return result;
        }

        for (offset, window) in data.windows(self.period).enumerate() {
            result[offset + self.period - 1] = Some(sample_std(window));
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "StdDev"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stddev() {
        let std = StdDev::new(4).unwrap();
        let data = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let result = std.calculate(&data);

        assert!(result[2].is_none());
        // [2,4,4,4]: mean 3.5, squared deviations 2.25+0.25*3 = 3.0, / 3 = 1.0
        assert!((result[3].unwrap() - 1.0).abs() < 1e-10);
        assert!(result[7].unwrap() > 0.0);
    }

    #[test]
    fn test_constant_data() {
        let std = StdDev::new(3).unwrap();
        let result = std.calculate(&[5.0; 6]);
        assert!(result[2..].iter().all(|v| *v == Some(0.0)));
    }

    #[test]
    fn test_sparse_skips_undefined_windows() {
        let std = StdDev::new(2).unwrap();
        let result = std.calculate_sparse(&[None, Some(1.0), Some(3.0), Some(3.0)]);

        assert_eq!(result[0], None);
        assert_eq!(result[1], None);
        assert!((result[2].unwrap() - 2.0_f64.sqrt()).abs() < 1e-10);
        assert_eq!(result[3], Some(0.0));
    }

    #[test]
    fn test_invalid_period() {
        assert!(StdDev::new(1).is_err());
    }
}
