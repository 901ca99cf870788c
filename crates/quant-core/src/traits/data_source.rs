//! Data source trait definitions.

use crate::error::DataError;
use crate::types::BarSeries;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Trait for historical daily bar sources.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch historical daily bars.
    ///
    /// # Arguments
    /// * `symbol` - The symbol to fetch
    /// * `start` - First date of the range (inclusive)
    /// * `end` - Last date of the range (inclusive)
    ///
    /// # Returns
    /// Bars ordered from oldest to newest. Non-trading days are simply absent.
    async fn get_historical_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BarSeries, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bar;

    struct StaticSource {
        bars: Vec<Bar>,
    }

    #[async_trait]
    impl DataSource for StaticSource {
        async fn get_historical_bars(
            &self,
            symbol: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<BarSeries, DataError> {
            let bars: Vec<Bar> = self
                .bars
                .iter()
                .filter(|b| b.date() >= start && b.date() <= end)
                .copied()
                .collect();
            if bars.is_empty() {
                return Err(DataError::NoDataAvailable {
                    symbol: symbol.to_string(),
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
            BarSeries::new(symbol, bars).map_err(|e| DataError::Internal(e.to_string()))
        }

        fn name(&self) -> &str {
            "static"
        }
    }

    #[tokio::test]
    async fn test_range_filter() {
        let day = 86_400_000;
        let source = StaticSource {
            bars: (0..5)
                .map(|i| Bar::new(i * day, 1.0, 1.0, 1.0, 1.0, 1.0))
                .collect(),
        };
        let start = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(1970, 1, 4).unwrap();

        let series = source.get_historical_bars("TEST", start, end).await.unwrap();
        assert_eq!(series.len(), 3);

        let empty_start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let empty_end = NaiveDate::from_ymd_opt(2000, 2, 1).unwrap();
        let result = source
            .get_historical_bars("TEST", empty_start, empty_end)
            .await;
        assert!(matches!(result, Err(DataError::NoDataAvailable { .. })));
    }
}
