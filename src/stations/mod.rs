pub mod directory;
pub mod error;
pub mod geodistance;
pub mod ranker;
