use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValuesError {
    #[error("Required column '{column}' not found in observation frame")]
    MissingColumn {
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Failed to scan parquet file '{0}'")]
    ParquetScan(PathBuf, #[source] PolarsError),

    #[error("Polars operation failed for station {station}: {source}")]
    Frame {
        station: String,
        #[source]
        source: PolarsError,
    },

    #[error("Invalid timestamp {millis} ms for station {station}")]
    InvalidTimestamp { station: String, millis: i64 },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
