//! Wire protocol constants
//!
//! The byte-level tag values below are a fixed wire contract; changing any
//! of them breaks interoperability with existing streams.

/// Stream magic for the four-byte width profile (delta timestamps).
pub const FOUR_BYTE_MAGIC: [u8; 4] = [0xFD, 0x2F, 0xB5, 0x29];

/// Stream magic for the eight-byte width profile (absolute timestamps).
pub const EIGHT_BYTE_MAGIC: [u8; 4] = [0xFD, 0x2F, 0xB5, 0x30];

/// End-of-stream tag; valid wherever an event record could start.
pub const EOF_TAG: u8 = 0x00;

// =============================================================================
// Preamble
// =============================================================================

/// Metadata region holds a JSON object.
pub const METADATA_JSON: u8 = 0x01;

/// Metadata length follows as u8.
pub const METADATA_LEN_U8: u8 = 0x11;

/// Metadata length follows as u16.
pub const METADATA_LEN_U16: u8 = 0x12;

// =============================================================================
// Event records
// =============================================================================

/// Absolute i64 timestamp (eight-byte streams).
pub const TS_ABSOLUTE: u8 = 0x30;

/// i8 timestamp delta (four-byte streams).
pub const TS_DELTA_I8: u8 = 0x31;

/// i16 timestamp delta.
pub const TS_DELTA_I16: u8 = 0x32;

/// i32 timestamp delta.
pub const TS_DELTA_I32: u8 = 0x33;

/// i64 timestamp delta.
pub const TS_DELTA_I64: u8 = 0x34;

/// Logtype length follows as u8 / u16 / u32.
pub const LOGTYPE_LEN_U8: u8 = 0x21;
pub const LOGTYPE_LEN_U16: u8 = 0x22;
pub const LOGTYPE_LEN_U32: u8 = 0x23;

/// Dictionary region length follows as u8 / u16 / u32.
pub const DICT_LEN_U8: u8 = 0x41;
pub const DICT_LEN_U16: u8 = 0x42;
pub const DICT_LEN_U32: u8 = 0x43;

// =============================================================================
// Logtype placeholders
// =============================================================================

/// Packed integer variable.
pub const PLACEHOLDER_INT: u8 = 0x11;

/// Dictionary variable, resolved from the dictionary buffer in encounter
/// order.
pub const PLACEHOLDER_DICT: u8 = 0x12;

/// Packed float variable (bit pattern).
pub const PLACEHOLDER_FLOAT: u8 = 0x13;

/// Escapes a literal placeholder or escape byte inside static text.
pub const ESCAPE: u8 = 0x5C;

/// True if `byte` must be escaped when copied verbatim into a logtype.
#[inline]
pub(crate) const fn needs_escape(byte: u8) -> bool {
    matches!(byte, PLACEHOLDER_INT | PLACEHOLDER_DICT | PLACEHOLDER_FLOAT | ESCAPE)
}
