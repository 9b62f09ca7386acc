pub mod cache;
pub mod error;
pub mod frame_provider;
pub mod provider;
