//! Pre-scored headlines read from CSV.

use std::path::Path;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::info;
use quant_core::error::DataError;
use quant_core::traits::{ScoredHeadline, SentimentLabel, SentimentSource};

use crate::csv_source::parse_date;

#[derive(Debug, Deserialize)]
struct HeadlineRecord {
    date: String,
    symbol: String,
    label: String,
    score: f64,
}

fn parse_label(label: &str) -> Result<SentimentLabel, DataError> {
    match label.to_ascii_lowercase().as_str() {
        "positive" | "pos" => Ok(SentimentLabel::Positive),
        "negative" | "neg" => Ok(SentimentLabel::Negative),
        "neutral" => Ok(SentimentLabel::Neutral),
        other => Err(DataError::ParseError(format!(
            "unknown sentiment label: {other}"
        ))),
    }
}

/// Headline sentiment loaded from a `date,symbol,label,score` file.
///
/// Rows keep their file order, which is treated as relevance order.
#[derive(Debug, Clone, Default)]
pub struct CsvSentimentSource {
    rows: Vec<(String, ScoredHeadline)>,
}

impl CsvSentimentSource {
    /// Read and validate the whole file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut rows = Vec::new();
        for (row, result) in reader.deserialize().enumerate() {
            let record: HeadlineRecord =
                result.map_err(|e| DataError::ParseError(format!("row {}: {}", row + 1, e)))?;
            if !(0.0..=1.0).contains(&record.score) {
                return Err(DataError::ParseError(format!(
                    "row {}: score {} outside [0, 1]",
                    row + 1,
                    record.score
                )));
            }
            rows.push((
                record.symbol.to_uppercase(),
                ScoredHeadline {
                    date: parse_date(&record.date)?,
                    label: parse_label(&record.label)?,
                    score: record.score,
                },
            ));
        }

        info!(path = %path.display(), headlines = rows.len(), "Loaded headline sentiment");
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl SentimentSource for CsvSentimentSource {
    fn headlines(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ScoredHeadline>, DataError> {
        let symbol = symbol.to_uppercase();
        Ok(self
            .rows
            .iter()
            .filter(|(s, h)| *s == symbol && h.date >= from && h.date <= to)
            .map(|(_, h)| h.clone())
            .collect())
    }

    fn name(&self) -> &str {
        "csv-sentiment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_load_and_query() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("news.csv");
        fs::write(
            &file,
            "date,symbol,label,score\n\
             2024-03-01,AAPL,POSITIVE,0.91\n\
             2024-03-02,aapl,negative,0.70\n\
             2024-03-02,MSFT,positive,0.99\n\
             2024-03-09,AAPL,neutral,0.50\n",
        )
        .unwrap();

        let source = CsvSentimentSource::from_path(&file).unwrap();
        assert_eq!(source.len(), 4);

        let window = source
            .headlines("AAPL", date("2024-02-28"), date("2024-03-03"))
            .unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].label, SentimentLabel::Positive);
        assert_eq!(window[1].signed_score(), -0.70);

        let none = source
            .headlines("AAPL", date("2024-03-04"), date("2024-03-08"))
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_rejects_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let bad_label = dir.path().join("label.csv");
        fs::write(&bad_label, "date,symbol,label,score\n2024-03-01,AAPL,great,0.9\n").unwrap();
        assert!(CsvSentimentSource::from_path(&bad_label).is_err());

        let bad_score = dir.path().join("score.csv");
        fs::write(&bad_score, "date,symbol,label,score\n2024-03-01,AAPL,positive,1.5\n").unwrap();
        assert!(CsvSentimentSource::from_path(&bad_score).is_err());
    }
}
