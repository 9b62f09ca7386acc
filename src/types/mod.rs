pub mod date_range;
pub mod into_utc_trait;
pub mod observation;
pub mod parameter;
pub mod provider;
pub mod station;
