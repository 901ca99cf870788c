//! Data sources for the backtester.

mod csv_source;
mod sentiment_source;

pub use csv_source::CsvDataSource;
pub use sentiment_source::CsvSentimentSource;
