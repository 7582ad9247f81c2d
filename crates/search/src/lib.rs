//! Timber Search - wildcard matching primitives for IR streams
//!
//! This crate provides the query-side leaf types used by the streaming
//! scanner in `timber-ir`:
//!
//! - [`wildcard_match`] - anchored glob matching (`*`, `?`, backslash escapes)
//! - [`clean_pattern`] - pattern normalization applied once before matching
//! - [`WildcardQuery`] - a cleaned pattern plus case-sensitivity flag
//! - [`TimestampInterval`] - half-open `[lower, upper)` time window
//!
//! Matching is pure and allocation-light; the scanner calls it once per
//! decoded event, so queries store their pattern pre-cleaned.

mod query;
mod wildcard;

pub use query::{TimestampInterval, WildcardQuery};
pub use wildcard::{clean_pattern, wildcard_match};

/// Timestamp unit used throughout Timber: milliseconds since the Unix epoch.
pub type EpochTimeMs = i64;

// Test modules - only compiled during testing
#[cfg(test)]
mod query_test;
#[cfg(test)]
mod wildcard_test;
