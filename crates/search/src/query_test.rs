//! Tests for query types

use super::query::{TimestampInterval, WildcardQuery};

// =============================================================================
// WildcardQuery
// =============================================================================

#[test]
fn test_query_cleans_pattern_on_construction() {
    let query = WildcardQuery::new("a**b", true);
    assert_eq!(query.pattern(), "a*b");
}

#[test]
fn test_query_matches() {
    let query = WildcardQuery::new("*disk*", true);
    assert!(query.matches("error: disk full"));
    assert!(!query.matches("error: out of memory"));
}

#[test]
fn test_query_case_flag() {
    let sensitive = WildcardQuery::new("*DISK*", true);
    let insensitive = WildcardQuery::new("*DISK*", false);
    assert!(!sensitive.matches("error: disk full"));
    assert!(insensitive.matches("error: disk full"));
    assert!(sensitive.is_case_sensitive());
    assert!(!insensitive.is_case_sensitive());
}

// =============================================================================
// TimestampInterval
// =============================================================================

#[test]
fn test_interval_is_half_open() {
    let interval = TimestampInterval::new(100, 200);
    assert!(interval.contains(100));
    assert!(interval.contains(199));
    assert!(!interval.contains(200));
    assert!(!interval.contains(99));
}

#[test]
fn test_interval_empty_when_bounds_equal() {
    let interval = TimestampInterval::new(100, 100);
    assert!(!interval.contains(100));
}

#[test]
fn test_interval_all() {
    let interval = TimestampInterval::all();
    assert!(interval.contains(0));
    assert!(interval.contains(i64::MIN));
    assert!(interval.contains(i64::MAX - 1));
}
