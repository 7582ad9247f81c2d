//! Preamble decoding
//!
//! The preamble is self-describing: the magic number determines the width
//! profile, which determines how the rest of the stream is decoded. The
//! metadata region is located and sized here but not interpreted;
//! [`deserialize_preamble`] layers the JSON parsing on top and hands back
//! a deserializer of the right width, seeded with the stream's reference
//! timestamp.

use std::ops::Range;

use tracing::debug;

use crate::decode::deserializer::{Deserializer, StreamDeserializer};
use crate::decode::reader::ByteReader;
use crate::metadata::{StreamMetadata, TimestampInfo};
use crate::protocol::{METADATA_JSON, METADATA_LEN_U16, METADATA_LEN_U8};
use crate::width::Width;
use crate::{EpochTimeMs, IrError, Result};

/// A decoded stream header with its metadata located but not interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPreamble {
    /// Width profile declared by the stream magic
    pub width: Width,
    /// Metadata region encoding ([`METADATA_JSON`] is the only one known)
    pub metadata_type: u8,
    /// Metadata byte range within the input buffer
    pub metadata: Range<usize>,
}

/// A fully interpreted stream header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preamble {
    /// Width profile declared by the stream magic
    pub width: Width,
    /// Timestamp formatting info from the metadata
    pub timestamp_info: TimestampInfo,
    /// Delta-accumulation base; present only for four-byte streams
    pub reference_timestamp: Option<EpochTimeMs>,
}

/// Read the stream header, returning the located metadata region and the
/// number of bytes consumed. The region's contents are opaque at this
/// layer.
///
/// An unrecognized magic number yields [`IrError::UnsupportedVersion`]; a
/// buffer that ends mid-header yields [`IrError::IncompleteIr`].
pub fn decode_preamble(buf: &[u8]) -> Result<(RawPreamble, usize)> {
    let mut reader = ByteReader::new(buf);

    let magic = reader.read_exact(4)?;
    let magic = [magic[0], magic[1], magic[2], magic[3]];
    let width = Width::from_magic(&magic).ok_or(IrError::UnsupportedVersion)?;

    let metadata_type = reader.read_u8()?;
    let len = match reader.read_u8()? {
        METADATA_LEN_U8 => reader.read_u8()? as usize,
        METADATA_LEN_U16 => reader.read_u16()? as usize,
        _ => return Err(IrError::DecodeError("unrecognized metadata length tag")),
    };
    let start = reader.pos();
    reader.read_exact(len)?;

    debug!(width = %width, metadata_len = len, "decoded IR preamble");
    Ok((
        RawPreamble {
            width,
            metadata_type,
            metadata: start..start + len,
        },
        reader.pos(),
    ))
}

/// Decode the preamble and construct the matching deserializer.
///
/// Parses the JSON metadata region and seeds a four-byte deserializer with
/// the stream's reference timestamp. Returns the deserializer, the
/// interpreted preamble, and the number of bytes consumed.
pub fn deserialize_preamble(buf: &[u8]) -> Result<(StreamDeserializer, Preamble, usize)> {
    let (raw, consumed) = decode_preamble(buf)?;
    if raw.metadata_type != METADATA_JSON {
        return Err(IrError::UnsupportedVersion);
    }

    let metadata = StreamMetadata::from_json(&buf[raw.metadata.clone()])?;
    let reference_timestamp = metadata.reference_timestamp_ms();

    let deserializer = match raw.width {
        Width::FourByte => {
            StreamDeserializer::FourByte(Deserializer::new(reference_timestamp.unwrap_or(0)))
        }
        Width::EightByte => StreamDeserializer::EightByte(Deserializer::new(0)),
    };
    let preamble = Preamble {
        width: raw.width,
        timestamp_info: metadata.info,
        reference_timestamp,
    };
    Ok((deserializer, preamble, consumed))
}
