//! Indicator trait definitions.

use crate::error::IndicatorError;

/// Trait for technical indicators.
///
/// Indicators process price data and produce derived values useful for
/// signal generation. Output is aligned with the input: element `i` is the
/// value at input `i`, or `None` while the lookback window is not yet full.
/// A value at `i` never depends on inputs after `i`.
pub trait Indicator: Send + Sync {
    /// Calculate aligned indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>>;

    /// Get the minimum data points required for the first value.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

/// Check an indicator period at construction time.
pub fn check_period(name: &str, period: usize) -> Result<usize, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(format!(
            "{} period must be greater than 0",
            name
        )));
    }
    Ok(period)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RollingSum {
        period: usize,
    }

    impl Indicator for RollingSum {
        fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
            (0..data.len())
                .map(|i| {
                    (i + 1 >= self.period).then(|| data[i + 1 - self.period..=i].iter().sum())
                })
                .collect()
        }

        fn period(&self) -> usize {
            self.period
        }

        fn name(&self) -> &str {
            "sum"
        }
    }

    #[test]
    fn test_aligned_output() {
        let indicator = RollingSum { period: 3 };
        let result = indicator.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(result, vec![None, None, Some(6.0), Some(9.0), Some(12.0)]);
    }

    #[test]
    fn test_check_period() {
        assert!(check_period("SMA", 0).is_err());
        assert_eq!(check_period("SMA", 20).unwrap(), 20);
    }
}
