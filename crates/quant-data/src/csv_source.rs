//! CSV data source.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::{debug, info};
use quant_core::error::DataError;
use quant_core::traits::DataSource;
use quant_core::types::{Bar, BarSeries};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "timestamp", alias = "Timestamp", alias = "Datetime")]
    date: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume", default)]
    volume: f64,
}

/// Historical daily bars stored as CSV.
///
/// The path is either a single file (used for every symbol) or a directory
/// holding one file per symbol.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    root: PathBuf,
}

impl CsvDataSource {
    /// Create a new CSV data source.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let root = path.as_ref().to_path_buf();
        if !root.exists() {
            return Err(DataError::Internal(format!(
                "data path {} does not exist",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// File holding `symbol`'s bars, if any.
    ///
    /// Inside a directory, tries `SYMBOL.csv`, `symbol.csv`, `SYMBOL_daily.csv`
    /// and `symbol_daily.csv` in that order.
    pub fn resolve(&self, symbol: &str) -> Option<PathBuf> {
        if self.root.is_file() {
            return Some(self.root.clone());
        }
        let upper = symbol.to_uppercase();
        let lower = symbol.to_lowercase();
        [
            format!("{upper}.csv"),
            format!("{lower}.csv"),
            format!("{upper}_daily.csv"),
            format!("{lower}_daily.csv"),
        ]
        .into_iter()
        .map(|name| self.root.join(name))
        .find(|candidate| candidate.is_file())
    }

    /// Load every bar for `symbol`, sorted, with duplicate timestamps collapsed
    /// to the last row in the file.
    pub fn load_all(&self, symbol: &str) -> Result<Vec<Bar>, DataError> {
        let path = self
            .resolve(symbol)
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))?;
        debug!(symbol, path = %path.display(), "Reading bars");
        let bars = load_from_path(&path)?;
        Ok(dedup_last_wins(bars))
    }
}

#[async_trait]
impl DataSource for CsvDataSource {
    async fn get_historical_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BarSeries, DataError> {
        let bars: Vec<Bar> = self
            .load_all(symbol)?
            .into_iter()
            .filter(|bar| (start..=end).contains(&bar.date()))
            .collect();

        if bars.is_empty() {
            return Err(DataError::NoDataAvailable {
                symbol: symbol.to_string(),
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        info!(symbol, bars = bars.len(), %start, %end, "Loaded bars");
        BarSeries::new(symbol, bars).map_err(|e| DataError::Internal(e.to_string()))
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Sort by timestamp; among equal timestamps the later row wins.
fn dedup_last_wins(mut bars: Vec<Bar>) -> Vec<Bar> {
    bars.sort_by_key(|b| b.timestamp);
    let mut out: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match out.last_mut() {
            Some(last) if last.timestamp == bar.timestamp => *last = bar,
            _ => out.push(bar),
        }
    }
    out
}

fn load_from_path(path: &Path) -> Result<Vec<Bar>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DataError::ParseError(e.to_string()))?;

    let mut bars = Vec::new();

    for (row, result) in reader.deserialize().enumerate() {
        let record: CsvRecord =
            result.map_err(|e| DataError::ParseError(format!("row {}: {}", row + 1, e)))?;

        let timestamp = parse_timestamp(&record.date)?;

        bars.push(Bar::new(
            timestamp,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        ));
    }

    Ok(bars)
}

/// Parse a date or timestamp into Unix milliseconds (UTC).
pub(crate) fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    Ok(parse_datetime(date_str)?.and_utc().timestamp_millis())
}

/// Parse a date in any of the accepted formats.
pub(crate) fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    Ok(parse_datetime(date_str)?.date())
}

fn parse_datetime(date_str: &str) -> Result<NaiveDateTime, DataError> {
    let formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt);
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d.and_time(chrono::NaiveTime::MIN));
        }
    }

    // Unix timestamp: milliseconds if > 10 digits, else seconds
    if let Ok(ts) = date_str.parse::<i64>() {
        let millis = if ts > 10_000_000_000 { ts } else { ts * 1000 };
        if let Some(dt) = chrono::DateTime::from_timestamp_millis(millis) {
            return Ok(dt.naive_utc());
        }
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}
