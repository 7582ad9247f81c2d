//! Tests for the streaming wildcard scanner

use super::preamble::deserialize_preamble;
use crate::encode::Serializer;
use crate::metadata::TimestampInfo;
use crate::{EpochTimeMs, IrError, TimestampInterval, WildcardQuery};

fn info() -> TimestampInfo {
    TimestampInfo::new("yyyy-MM-dd HH:mm:ss,SSS", "java::SimpleDateFormat", "UTC")
}

const EVENTS: &[(&str, EpochTimeMs)] = &[
    ("alpha service started", 100),
    ("beta request failed", 200),
    ("gamma request ok", 300),
];

fn eight_byte_stream(events: &[(&str, EpochTimeMs)]) -> Vec<u8> {
    let mut serializer = Serializer::eight_byte(info());
    let mut stream = serializer.serialize_preamble().unwrap().to_vec();
    for &(message, timestamp) in events {
        stream.extend_from_slice(serializer.serialize_log_event(message, timestamp).unwrap());
    }
    stream.extend_from_slice(serializer.serialize_end_of_stream());
    stream
}

fn four_byte_stream(reference: EpochTimeMs, events: &[(&str, EpochTimeMs)]) -> Vec<u8> {
    let mut serializer = Serializer::four_byte(info(), reference);
    let mut stream = serializer.serialize_preamble().unwrap().to_vec();
    for &(message, timestamp) in events {
        stream.extend_from_slice(serializer.serialize_log_event(message, timestamp).unwrap());
    }
    stream.extend_from_slice(serializer.serialize_end_of_stream());
    stream
}

fn queries(patterns: &[&str]) -> Vec<WildcardQuery> {
    patterns
        .iter()
        .map(|pattern| WildcardQuery::new(pattern, true))
        .collect()
}

// =============================================================================
// Matching
// =============================================================================

#[test]
fn test_scan_finds_first_matching_event() {
    let stream = eight_byte_stream(EVENTS);
    let (mut deserializer, _, pos) = deserialize_preamble(&stream).unwrap();

    let (hit, consumed) = deserializer
        .scan(
            &stream[pos..],
            &TimestampInterval::all(),
            &queries(&["*failed*"]),
        )
        .unwrap();
    let hit = hit.unwrap();
    assert_eq!(hit.message, "beta request failed");
    assert_eq!(hit.timestamp, 200);
    assert_eq!(hit.query_index, 0);
    assert!(consumed > 0);
}

#[test]
fn test_scan_returns_first_query_in_input_order() {
    // Both queries match the same event; the earlier index wins
    let stream = eight_byte_stream(EVENTS);
    let (mut deserializer, _, pos) = deserialize_preamble(&stream).unwrap();

    let (hit, _) = deserializer
        .scan(
            &stream[pos..],
            &TimestampInterval::all(),
            &queries(&["*beta*", "*failed*"]),
        )
        .unwrap();
    assert_eq!(hit.unwrap().query_index, 0);
}

#[test]
fn test_scan_case_insensitive_query() {
    let stream = eight_byte_stream(EVENTS);
    let (mut deserializer, _, pos) = deserialize_preamble(&stream).unwrap();

    let query = vec![WildcardQuery::new("*REQUEST FAILED*", false)];
    let (hit, _) = deserializer
        .scan(&stream[pos..], &TimestampInterval::all(), &query)
        .unwrap();
    assert_eq!(hit.unwrap().timestamp, 200);
}

#[test]
fn test_scan_resumes_after_a_hit() {
    let stream = eight_byte_stream(EVENTS);
    let (mut deserializer, _, mut pos) = deserialize_preamble(&stream).unwrap();
    let query = queries(&["*request*"]);

    let (hit, consumed) = deserializer
        .scan(&stream[pos..], &TimestampInterval::all(), &query)
        .unwrap();
    assert_eq!(hit.unwrap().timestamp, 200);
    pos += consumed;

    let (hit, _) = deserializer
        .scan(&stream[pos..], &TimestampInterval::all(), &query)
        .unwrap();
    assert_eq!(hit.unwrap().timestamp, 300);
}

#[test]
fn test_scan_without_match_runs_to_end_of_stream() {
    let stream = eight_byte_stream(EVENTS);
    let (mut deserializer, _, pos) = deserialize_preamble(&stream).unwrap();

    let err = deserializer
        .scan(
            &stream[pos..],
            &TimestampInterval::all(),
            &queries(&["*no such text*"]),
        )
        .unwrap_err();
    assert!(matches!(err, IrError::EndOfIr));
}

// =============================================================================
// Time window
// =============================================================================

#[test]
fn test_scan_skips_events_before_lower_bound() {
    // The first event matches the query but sits below the window
    let stream = eight_byte_stream(EVENTS);
    let (mut deserializer, _, pos) = deserialize_preamble(&stream).unwrap();

    let err = deserializer
        .scan(
            &stream[pos..],
            &TimestampInterval::new(150, 1_000),
            &queries(&["*alpha*"]),
        )
        .unwrap_err();
    assert!(matches!(err, IrError::EndOfIr));
}

#[test]
fn test_scan_lower_bound_is_inclusive() {
    let stream = eight_byte_stream(EVENTS);
    let (mut deserializer, _, pos) = deserialize_preamble(&stream).unwrap();

    let (hit, _) = deserializer
        .scan(
            &stream[pos..],
            &TimestampInterval::new(100, 1_000),
            &queries(&["*alpha*"]),
        )
        .unwrap();
    assert_eq!(hit.unwrap().timestamp, 100);
}

#[test]
fn test_scan_upper_bound_is_exclusive() {
    // An event timestamped exactly at the upper edge ends the scan
    let stream = eight_byte_stream(EVENTS);
    let (mut deserializer, _, pos) = deserialize_preamble(&stream).unwrap();

    let (hit, consumed) = deserializer
        .scan(
            &stream[pos..],
            &TimestampInterval::new(0, 300),
            &queries(&["*gamma*"]),
        )
        .unwrap();
    assert!(hit.is_none());

    // The boundary event was not consumed; normal decoding picks it up
    let (event, _) = deserializer
        .deserialize_log_event(&stream[pos + consumed..])
        .unwrap();
    assert_eq!(event.message, "gamma request ok");
    assert_eq!(event.timestamp, 300);
}

#[test]
fn test_scan_boundary_keeps_delta_state_consistent() {
    // Four-byte streams accumulate deltas; stopping at the upper edge must
    // not advance the running timestamp past the boundary event
    let stream = four_byte_stream(0, EVENTS);
    let (mut deserializer, _, mut pos) = deserialize_preamble(&stream).unwrap();

    let (hit, consumed) = deserializer
        .scan(
            &stream[pos..],
            &TimestampInterval::new(0, 300),
            &queries(&["*beta*"]),
        )
        .unwrap();
    assert_eq!(hit.unwrap().timestamp, 200);
    pos += consumed;

    let (hit, consumed) = deserializer
        .scan(&stream[pos..], &TimestampInterval::new(0, 300), &queries(&["*"]))
        .unwrap();
    assert!(hit.is_none());
    pos += consumed;

    let (event, _) = deserializer.deserialize_log_event(&stream[pos..]).unwrap();
    assert_eq!(event.message, "gamma request ok");
    assert_eq!(event.timestamp, 300);
}

// =============================================================================
// Errors and retries
// =============================================================================

#[test]
fn test_scan_rolls_back_on_incomplete_buffer() {
    let stream = four_byte_stream(0, EVENTS);
    let (mut deserializer, _, pos) = deserialize_preamble(&stream).unwrap();
    let query = queries(&["*failed*"]);

    // Cut the buffer inside the second event: the scan consumes the first
    // event, hits the truncation, and must roll everything back
    let cut = stream.len() - 30;
    let err = deserializer
        .scan(&stream[pos..cut], &TimestampInterval::all(), &query)
        .unwrap_err();
    assert!(matches!(err, IrError::IncompleteIr));

    // Retrying over the full buffer reproduces the correct absolute
    // timestamp, so no delta was applied twice
    let (hit, _) = deserializer
        .scan(&stream[pos..], &TimestampInterval::all(), &query)
        .unwrap();
    let hit = hit.unwrap();
    assert_eq!(hit.message, "beta request failed");
    assert_eq!(hit.timestamp, 200);
}

#[test]
fn test_scan_empty_buffer_is_incomplete() {
    let stream = eight_byte_stream(EVENTS);
    let (mut deserializer, _, _) = deserialize_preamble(&stream).unwrap();
    let err = deserializer
        .scan(&[], &TimestampInterval::all(), &queries(&["*"]))
        .unwrap_err();
    assert!(matches!(err, IrError::IncompleteIr));
}
