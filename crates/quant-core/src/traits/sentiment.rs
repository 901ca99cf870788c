//! News sentiment source trait.

use crate::error::DataError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Classifier label attached to a headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

/// A scored news headline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHeadline {
    pub date: NaiveDate,
    pub label: SentimentLabel,
    /// Classifier confidence in the label, 0.0 to 1.0
    pub score: f64,
}

impl ScoredHeadline {
    /// Signed score: +confidence for positive, -confidence for negative, 0 for neutral.
    pub fn signed_score(&self) -> f64 {
        match self.label {
            SentimentLabel::Positive => self.score,
            SentimentLabel::Negative => -self.score,
            SentimentLabel::Neutral => 0.0,
        }
    }
}

/// Outcome of scoring one date.
///
/// `NoCoverage` (nothing was published) is a neutral reading; `Unavailable`
/// (the source could not be queried) is not, and callers decide what to do.
#[derive(Debug, Clone, PartialEq)]
pub enum SentimentReading {
    Score(f64),
    NoCoverage,
    Unavailable(String),
}

impl SentimentReading {
    /// Score usable for thresholding, if the reading carries one.
    pub fn value(&self) -> Option<f64> {
        match self {
            SentimentReading::Score(s) => Some(*s),
            SentimentReading::NoCoverage => Some(0.0),
            SentimentReading::Unavailable(_) => None,
        }
    }
}

/// Source of scored headlines for a symbol.
pub trait SentimentSource: Send + Sync {
    /// Headlines about `symbol` published between `from` and `to` (inclusive),
    /// most relevant first.
    fn headlines(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ScoredHeadline>, DataError>;

    /// Get the source name.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_score() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let pos = ScoredHeadline {
            date,
            label: SentimentLabel::Positive,
            score: 0.9,
        };
        let neg = ScoredHeadline {
            label: SentimentLabel::Negative,
            ..pos.clone()
        };
        assert_eq!(pos.signed_score(), 0.9);
        assert_eq!(neg.signed_score(), -0.9);
    }

    #[test]
    fn test_reading_value() {
        assert_eq!(SentimentReading::Score(0.7).value(), Some(0.7));
        assert_eq!(SentimentReading::NoCoverage.value(), Some(0.0));
        assert_eq!(SentimentReading::Unavailable("timeout".into()).value(), None);
    }
}
