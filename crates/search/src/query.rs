//! Query types for time-windowed wildcard search

use crate::wildcard::{clean_pattern, wildcard_match};
use crate::EpochTimeMs;

/// A glob pattern plus case-sensitivity flag.
///
/// The pattern is normalized once at construction (escape handling, `*`-run
/// collapsing) so repeated matching never re-parses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardQuery {
    pattern: String,
    case_sensitive: bool,
}

impl WildcardQuery {
    /// Create a query from a raw pattern.
    pub fn new(pattern: &str, case_sensitive: bool) -> Self {
        Self {
            pattern: clean_pattern(pattern),
            case_sensitive,
        }
    }

    /// The cleaned pattern this query matches with.
    #[inline]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether literal characters are compared case-sensitively.
    #[inline]
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Test a target line against this query.
    #[inline]
    pub fn matches(&self, target: &str) -> bool {
        wildcard_match(target, &self.pattern, self.case_sensitive)
    }
}

/// Half-open time window `[lower, upper)` in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampInterval {
    /// Inclusive lower bound
    pub lower: EpochTimeMs,
    /// Exclusive upper bound
    pub upper: EpochTimeMs,
}

impl TimestampInterval {
    /// Create the window `[lower, upper)`.
    pub const fn new(lower: EpochTimeMs, upper: EpochTimeMs) -> Self {
        Self { lower, upper }
    }

    /// Window covering every representable timestamp.
    pub const fn all() -> Self {
        Self::new(EpochTimeMs::MIN, EpochTimeMs::MAX)
    }

    /// True when `timestamp` falls inside the window.
    #[inline]
    pub const fn contains(&self, timestamp: EpochTimeMs) -> bool {
        self.lower <= timestamp && timestamp < self.upper
    }
}
