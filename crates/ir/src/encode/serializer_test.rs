//! Tests for stream serialization

use super::serializer::Serializer;
use crate::metadata::{StreamMetadata, TimestampInfo};
use crate::protocol::{
    DICT_LEN_U8, EIGHT_BYTE_MAGIC, EOF_TAG, FOUR_BYTE_MAGIC, LOGTYPE_LEN_U8, METADATA_JSON,
    PLACEHOLDER_INT, TS_ABSOLUTE, TS_DELTA_I16, TS_DELTA_I8,
};

fn info() -> TimestampInfo {
    TimestampInfo::new(
        "yyyy-MM-dd HH:mm:ss,SSS",
        "java::SimpleDateFormat",
        "America/Toronto",
    )
}

// =============================================================================
// Preamble
// =============================================================================

#[test]
fn test_eight_byte_preamble_layout() {
    let mut serializer = Serializer::eight_byte(info());
    let bytes = serializer.serialize_preamble().unwrap().to_vec();

    assert_eq!(&bytes[0..4], &EIGHT_BYTE_MAGIC);
    assert_eq!(bytes[4], METADATA_JSON);

    let metadata = StreamMetadata::from_json(&bytes[7..]).unwrap();
    assert_eq!(metadata.info, info());
    assert_eq!(metadata.reference_timestamp, None);
}

#[test]
fn test_four_byte_preamble_carries_reference_timestamp() {
    let mut serializer = Serializer::four_byte(info(), 1_700_000_000_123);
    let bytes = serializer.serialize_preamble().unwrap().to_vec();

    assert_eq!(&bytes[0..4], &FOUR_BYTE_MAGIC);
    let metadata = StreamMetadata::from_json(&bytes[7..]).unwrap();
    assert_eq!(metadata.reference_timestamp_ms(), Some(1_700_000_000_123));
}

// =============================================================================
// Event records
// =============================================================================

#[test]
fn test_eight_byte_static_event_bytes() {
    let mut serializer = Serializer::eight_byte(info());
    let bytes = serializer.serialize_log_event("x", 42).unwrap();

    let mut expected = vec![TS_ABSOLUTE];
    expected.extend_from_slice(&42i64.to_be_bytes());
    expected.extend_from_slice(&[LOGTYPE_LEN_U8, 1, b'x']);
    assert_eq!(bytes, &expected[..]);
}

#[test]
fn test_eight_byte_integer_variable_bytes() {
    let mut serializer = Serializer::eight_byte(info());
    let bytes = serializer.serialize_log_event("id 7", 1).unwrap();

    let mut expected = vec![TS_ABSOLUTE];
    expected.extend_from_slice(&1i64.to_be_bytes());
    expected.extend_from_slice(&[LOGTYPE_LEN_U8, 4]);
    expected.extend_from_slice(b"id ");
    expected.push(PLACEHOLDER_INT);
    expected.extend_from_slice(&7i64.to_be_bytes());
    assert_eq!(bytes, &expected[..]);
}

#[test]
fn test_dictionary_region_layout() {
    let mut serializer = Serializer::eight_byte(info());
    let bytes = serializer.serialize_log_event("user alice123", 1).unwrap();

    // Record tail: dict length tag, length, bytes, one u32 end offset
    let tail_len = 1 + 1 + 8 + 4;
    let tail = &bytes[bytes.len() - tail_len..];
    assert_eq!(tail[0], DICT_LEN_U8);
    assert_eq!(tail[1], 8);
    assert_eq!(&tail[2..10], b"alice123");
    assert_eq!(&tail[10..], &8u32.to_be_bytes());
}

#[test]
fn test_event_without_dictionary_has_no_dict_region() {
    let mut serializer = Serializer::eight_byte(info());
    let bytes = serializer.serialize_log_event("plain text", 1).unwrap();
    // ts tag + i64 + len tag + len + logtype, nothing after
    assert_eq!(bytes.len(), 1 + 8 + 2 + "plain text".len());
}

#[test]
fn test_four_byte_delta_width_escalates() {
    let mut serializer = Serializer::four_byte(info(), 1000);

    // First delta fits i8: 1010 - 1000 = 10
    let bytes = serializer.serialize_log_event("a", 1010).unwrap();
    assert_eq!(bytes[0], TS_DELTA_I8);
    assert_eq!(bytes[1] as i8, 10);

    // Second delta needs i16: 1710 - 1010 = 700
    let bytes = serializer.serialize_log_event("a", 1710).unwrap();
    assert_eq!(bytes[0], TS_DELTA_I16);
    assert_eq!(i16::from_be_bytes([bytes[1], bytes[2]]), 700);
}

#[test]
fn test_four_byte_negative_delta() {
    let mut serializer = Serializer::four_byte(info(), 1000);
    let bytes = serializer.serialize_log_event("a", 950).unwrap();
    assert_eq!(bytes[0], TS_DELTA_I8);
    assert_eq!(bytes[1] as i8, -50);
}

#[test]
fn test_end_of_stream_tag() {
    let mut serializer = Serializer::eight_byte(info());
    assert_eq!(serializer.serialize_end_of_stream(), &[EOF_TAG]);
}
