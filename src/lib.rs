//! # Protest Digest
//!
//! Aggregation passes over LLM analyses of student-protest news coverage.
//!
//! Upstream tooling scrapes Serbian news sites and asks a language model to
//! describe each article as a JSON object. This crate folds those JSON Lines
//! streams into:
//!
//! - one [`models::ProtestRecord`] per distinct `(date, location)` protest,
//!   geolocated when the location is a known city
//! - one [`models::DailyRecord`] per publication date (flag counters)
//! - one [`models::IssueDayRecord`] per issue date (summed article scores)
//!
//! ## Architecture
//!
//! 1. **Decode**: each trimmed line becomes a loosely typed input record
//! 2. **Fold**: an [`aggregate::Aggregator`] merges it into a keyed map
//! 3. **Emit**: the map is written back out as sorted JSON Lines
//!
//! Bad lines and bad values are logged and skipped; only file-level failures
//! abort a pass.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod dates;
pub mod error;
pub mod geo;
pub mod models;
pub mod utils;

pub use aggregate::{
    Aggregator, DailyAggregator, IssueDayTally, PassStats, ProtestDeduplicator, aggregate_daily,
    deduplicate, run_pass, tally_issue_days,
};
pub use error::{AggregateError, Result};
