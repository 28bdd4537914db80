//! Error taxonomy for loading and querying rental datasets.

use chrono::NaiveDate;
use thiserror::Error;

/// Every recoverable condition the dataset loader and the aggregation
/// pipeline can report.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("range {start}..={end} is outside the loaded data bounds {min}..={max}")]
    OutOfBounds {
        start: NaiveDate,
        end: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },

    #[error("no daily records are loaded")]
    NoData,

    #[error("cannot compute {0} over zero rows")]
    EmptyAggregation(&'static str),

    #[error("malformed record in {source_name} at line {line}: {message}")]
    MalformedRecord {
        source_name: String,
        line: u64,
        message: String,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid label configuration: {0}")]
    Config(String),
}

impl DashboardError {
    /// Shorthand for a row-level schema failure.
    pub fn malformed(source_name: &str, line: u64, message: impl Into<String>) -> Self {
        DashboardError::MalformedRecord {
            source_name: source_name.to_string(),
            line,
            message: message.into(),
        }
    }

    /// Returns `true` for failures caused by the requested date range rather
    /// than by the data itself.
    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            DashboardError::InvalidRange { .. }
                | DashboardError::OutOfBounds { .. }
                | DashboardError::NoData
        )
    }
}
