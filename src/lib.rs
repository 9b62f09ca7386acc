mod eligibility;
pub mod engine;
mod error;
mod settings;
mod spatial;
mod stations;
mod types;
mod values;

#[cfg(test)]
mod test_utils;

pub use error::{BoxError, SpatialError};
pub use spatial::*;

pub use eligibility::{check as check_eligibility, Eligibility};
pub use settings::*;

pub use stations::directory::*;
pub use stations::geodistance::{distance_km, EARTH_RADIUS_KM};
pub use stations::ranker::{rank, Candidate, CandidateSet, StationRanker};

pub use types::date_range::DateRange;
pub use types::into_utc_trait::IntoUtcDateTime;
pub use types::observation::{Observation, Reading};
pub use types::parameter::Parameter;
pub use types::provider::{ProviderContext, Resolution};
pub use types::station::Station;

pub use engine::aligner::{AlignmentGrid, CellEntry, CellKey};
pub use engine::assembler::{Outcome, SpatialResult, SpatialRow, RESULT_COLUMNS};

pub use values::cache::*;
pub use values::frame_provider::{FrameValuesProvider, OBSERVATION_COLUMNS};
pub use values::provider::*;

pub use stations::error::StationDirectoryError;
pub use values::error::ValuesError;
