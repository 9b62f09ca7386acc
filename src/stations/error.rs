use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationDirectoryError {
    #[error("Failed to read station file '{0}'")]
    FileRead(PathBuf, #[source] std::io::Error),

    // Covers truncated or corrupt gzip streams
    #[error("Failed to decompress station file '{0}'")]
    Decompress(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse station JSON from '{0}'")]
    JsonParse(PathBuf, #[source] serde_json::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
