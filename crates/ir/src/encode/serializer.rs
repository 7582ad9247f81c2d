//! IR stream serialization
//!
//! A [`Serializer`] owns one stream's encode-side state: the tokenizer
//! scratch, the output buffer, and (for four-byte streams) the running
//! timestamp that deltas are taken against. Every `serialize_*` call
//! overwrites the output buffer and returns a borrowed view, so the bytes
//! must be written out before the next call.

use bytes::{BufMut, BytesMut};

use crate::encode::tokenizer::{encode_message, TokenizerConfig};
use crate::message::EncodedMessage;
use crate::metadata::{StreamMetadata, TimestampInfo};
use crate::protocol::{
    DICT_LEN_U16, DICT_LEN_U32, DICT_LEN_U8, EOF_TAG, LOGTYPE_LEN_U16, LOGTYPE_LEN_U32,
    LOGTYPE_LEN_U8, METADATA_JSON, METADATA_LEN_U16, METADATA_LEN_U8,
};
use crate::width::{EightByte, FourByte, WidthProfile};
use crate::{EpochTimeMs, IrError, Result};

/// Serializes log events into an IR byte stream.
///
/// Create one per stream with [`Serializer::four_byte`] or
/// [`Serializer::eight_byte`], write the preamble once, then one record
/// per event, and optionally the end-of-stream tag.
#[derive(Debug)]
pub struct Serializer<W: WidthProfile> {
    timestamp_info: TimestampInfo,
    reference_timestamp: Option<EpochTimeMs>,
    prev_timestamp: EpochTimeMs,
    config: TokenizerConfig,
    scratch: EncodedMessage<W>,
    buf: BytesMut,
}

impl Serializer<FourByte> {
    /// Create a four-byte stream serializer. `reference_timestamp` seeds
    /// the delta chain: the first event's delta is taken against it.
    pub fn four_byte(timestamp_info: TimestampInfo, reference_timestamp: EpochTimeMs) -> Self {
        Self::with_state(timestamp_info, reference_timestamp, Some(reference_timestamp))
    }
}

impl Serializer<EightByte> {
    /// Create an eight-byte stream serializer (absolute timestamps).
    pub fn eight_byte(timestamp_info: TimestampInfo) -> Self {
        Self::with_state(timestamp_info, 0, None)
    }
}

impl<W: WidthProfile> Serializer<W> {
    fn with_state(
        timestamp_info: TimestampInfo,
        prev_timestamp: EpochTimeMs,
        reference_timestamp: Option<EpochTimeMs>,
    ) -> Self {
        Self {
            timestamp_info,
            reference_timestamp,
            prev_timestamp,
            config: TokenizerConfig::default(),
            scratch: EncodedMessage::new(),
            buf: BytesMut::new(),
        }
    }

    /// The timestamp formatting info written into the preamble.
    pub fn timestamp_info(&self) -> &TimestampInfo {
        &self.timestamp_info
    }

    /// Override the variable-token detection switches for this stream.
    pub fn set_tokenizer_config(&mut self, config: TokenizerConfig) {
        self.config = config;
    }

    /// Serialize the one-time stream preamble.
    pub fn serialize_preamble(&mut self) -> Result<&[u8]> {
        let metadata = StreamMetadata::new(self.timestamp_info.clone(), self.reference_timestamp);
        let json = metadata.to_json()?;

        self.buf.clear();
        self.buf.put_slice(&W::MAGIC);
        self.buf.put_u8(METADATA_JSON);
        if let Ok(len) = u8::try_from(json.len()) {
            self.buf.put_u8(METADATA_LEN_U8);
            self.buf.put_u8(len);
        } else if let Ok(len) = u16::try_from(json.len()) {
            self.buf.put_u8(METADATA_LEN_U16);
            self.buf.put_u16(len);
        } else {
            return Err(IrError::CorruptedIr("preamble metadata too large"));
        }
        self.buf.put_slice(&json);
        Ok(&self.buf[..])
    }

    /// Serialize one log event.
    ///
    /// For four-byte streams the timestamp is stored as a delta against
    /// the previous event (or the reference timestamp for the first); the
    /// running base only advances when serialization succeeds.
    pub fn serialize_log_event(&mut self, message: &str, timestamp: EpochTimeMs) -> Result<&[u8]> {
        encode_message(message, &self.config, &mut self.scratch)?;

        self.buf.clear();
        W::put_timestamp(timestamp, self.prev_timestamp, &mut self.buf);

        put_tagged_len(
            &mut self.buf,
            self.scratch.logtype.len(),
            [LOGTYPE_LEN_U8, LOGTYPE_LEN_U16, LOGTYPE_LEN_U32],
        )?;
        self.buf.put_slice(&self.scratch.logtype);

        for &var in &self.scratch.vars {
            W::put_var(var, &mut self.buf);
        }

        if self.scratch.dict_var_count() > 0 {
            put_tagged_len(
                &mut self.buf,
                self.scratch.dict_vars.len(),
                [DICT_LEN_U8, DICT_LEN_U16, DICT_LEN_U32],
            )?;
            self.buf.put_slice(&self.scratch.dict_vars);
            for &offset in &self.scratch.dict_var_end_offsets {
                self.buf.put_u32(offset);
            }
        }

        self.prev_timestamp = timestamp;
        Ok(&self.buf[..])
    }

    /// Serialize the end-of-stream tag.
    pub fn serialize_end_of_stream(&mut self) -> &[u8] {
        self.buf.clear();
        self.buf.put_u8(EOF_TAG);
        &self.buf[..]
    }
}

/// Write a length with the smallest of the three tagged widths.
fn put_tagged_len(buf: &mut BytesMut, len: usize, tags: [u8; 3]) -> Result<()> {
    if let Ok(len) = u8::try_from(len) {
        buf.put_u8(tags[0]);
        buf.put_u8(len);
    } else if let Ok(len) = u16::try_from(len) {
        buf.put_u8(tags[1]);
        buf.put_u16(len);
    } else if let Ok(len) = u32::try_from(len) {
        buf.put_u8(tags[2]);
        buf.put_u32(len);
    } else {
        return Err(IrError::CorruptedIr("record field exceeds u32 range"));
    }
    Ok(())
}
