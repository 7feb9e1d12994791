//! Substation detection pipeline.
//!
//! Two detection paths feed one accumulator: a keyword text search over a
//! fixed set of synonym phrases, and a satellite grid scan that submits
//! static imagery to a vision model. The accumulator then flows through a
//! batch validation pass and a dedup/rank step that collapses ~100 m
//! coordinate cells and sorts by confidence descending.
//!
//! The accumulator is a plain `Vec` threaded explicitly through each phase
//! by the single sequential caller — there are no concurrent writers, and
//! all external calls happen one at a time with configured delays between
//! them to respect provider rate limits.

pub mod dedup;
mod detector;
mod keyword;
mod scan;
pub mod validate;

pub use detector::{DetectorConfig, SubstationDetector};
pub use keyword::SEARCH_PHRASES;
