//! The synchronous core: alignment, summarization, interpolation and assembly.
//!
//! Everything in here operates on request-local data and performs no I/O.

pub mod aligner;
pub mod assembler;
pub mod interpolator;
pub mod summarizer;
