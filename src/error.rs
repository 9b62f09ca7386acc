use polars::error::PolarsError;
use thiserror::Error;

/// A collaborator error with its concrete type erased but preserved as the source.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("Station directory failed for {context}")]
    StationDirectory {
        context: String,
        #[source]
        source: BoxError,
    },

    #[error("Values provider failed for station '{station}'")]
    ValuesProvider {
        station: String,
        #[source]
        source: BoxError,
    },

    #[error("Failed to assemble result frame")]
    Frame(#[from] PolarsError),
}

impl SpatialError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        SpatialError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}
