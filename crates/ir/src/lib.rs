//! Timber IR - compact binary intermediate representation for log streams
//!
//! A stream starts with a one-time preamble (width profile, timestamp
//! format metadata) followed by one record per log event. Encoding splits
//! each message into a static skeleton (the "logtype") plus typed
//! variables: integers and floats are packed at the stream's width,
//! everything else goes into a per-event dictionary buffer addressed by
//! cumulative end offsets. Decoding walks the logtype and substitutes the
//! variables back in; the streaming scanner filters decoded events by a
//! time window and a set of wildcard queries without materializing the
//! stream.
//!
//! # Wire Format
//!
//! All multi-byte integers are big-endian:
//!
//! ```text
//! stream   := preamble event* eof?
//! preamble := magic(4) metadata_type(1) len_tag(1) len(1|2) metadata_bytes
//! event    := ts_tag(1) ts_payload
//!             logtype_len_tag(1) logtype_len(1|2|4) logtype_bytes
//!             packed_var*            (4 or 8 bytes each)
//!             [dict_len_tag(1) dict_len(1|2|4) dict_bytes
//!              dict_end_offset*]     (u32 each; omitted when the logtype
//!                                     has no dictionary placeholders)
//! eof      := 0x00
//! ```
//!
//! # Width Profiles
//!
//! The preamble's magic number selects one of two profiles for the life of
//! the stream: [`FourByte`] (4-byte variables, delta timestamps against a
//! reference) or [`EightByte`] (8-byte variables, absolute timestamps).
//! The codec is generic over the profile so the substitution loop never
//! branches on width; [`deserialize_preamble`] dispatches at run time via
//! [`StreamDeserializer`].
//!
//! # Ownership
//!
//! Serializer and deserializer instances own reusable scratch buffers.
//! Every call overwrites them and returns a borrowed view, so the bytes
//! must be copied out before the next call on the same instance - the
//! borrow checker enforces this.

mod error;
mod message;
mod metadata;
mod width;

pub mod protocol;

pub mod decode;
pub mod encode;

pub use decode::{
    decode_preamble, deserialize_preamble, Deserializer, Preamble, RawPreamble, ScanMatch,
    StreamDeserializer,
};
pub use encode::{encode_message, Serializer, TokenizerConfig};
pub use error::IrError;
pub use message::{EncodedMessage, LogEventView};
pub use metadata::TimestampInfo;
pub use width::{EightByte, FourByte, Width, WidthProfile};

// Re-export the search primitives the scanner consumes
pub use timber_search::{EpochTimeMs, TimestampInterval, WildcardQuery};

/// Result type for IR operations
pub type Result<T> = std::result::Result<T, IrError>;
