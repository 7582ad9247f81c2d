//! Log event deserialization
//!
//! A [`Deserializer`] owns one stream's decode-side state: the running
//! timestamp (four-byte streams accumulate deltas into it) and the scratch
//! buffers backing every returned [`LogEventView`]. Each call overwrites
//! the scratch, so a view must be copied out before the next call on the
//! same instance.

use std::marker::PhantomData;

use timber_search::{TimestampInterval, WildcardQuery};

use crate::decode::reader::ByteReader;
use crate::decode::scan::ScanMatch;
use crate::message::{validate_end_offsets, LogEventView};
use crate::protocol::{
    DICT_LEN_U16, DICT_LEN_U32, DICT_LEN_U8, ESCAPE, LOGTYPE_LEN_U16, LOGTYPE_LEN_U32,
    LOGTYPE_LEN_U8, PLACEHOLDER_DICT, PLACEHOLDER_FLOAT, PLACEHOLDER_INT,
};
use crate::width::{EightByte, FourByte, Width, WidthProfile};
use crate::{EpochTimeMs, IrError, Result};

/// Streaming decoder for one IR stream.
///
/// Never invoke one instance from multiple threads; `&mut self` methods
/// make that impossible without external synchronization. Independent
/// instances share nothing.
#[derive(Debug)]
pub struct Deserializer<W: WidthProfile> {
    timestamp: EpochTimeMs,
    message: Vec<u8>,
    vars: Vec<W::Var>,
    dict_end_offsets: Vec<u32>,
    _width: PhantomData<W>,
}

impl<W: WidthProfile> Deserializer<W> {
    /// Create a deserializer. `reference_timestamp` seeds delta
    /// accumulation for four-byte streams and is ignored by eight-byte
    /// streams.
    pub fn new(reference_timestamp: EpochTimeMs) -> Self {
        Self {
            timestamp: reference_timestamp,
            message: Vec::new(),
            vars: Vec::new(),
            dict_end_offsets: Vec::new(),
            _width: PhantomData,
        }
    }

    /// The running absolute timestamp after the last decoded event.
    pub fn timestamp(&self) -> EpochTimeMs {
        self.timestamp
    }

    /// Advance or roll back the running timestamp (scan bookkeeping).
    pub(super) fn set_timestamp(&mut self, timestamp: EpochTimeMs) {
        self.timestamp = timestamp;
    }

    /// The raw bytes of the last reconstructed message.
    pub(super) fn scratch_message(&self) -> &[u8] {
        &self.message
    }

    /// Decode the next event, returning the event view and the number of
    /// bytes consumed.
    ///
    /// On any error nothing is consumed and the running state is
    /// untouched, so an [`IrError::IncompleteIr`] caller can append bytes
    /// and retry from the same position.
    pub fn deserialize_log_event(&mut self, buf: &[u8]) -> Result<(LogEventView<'_>, usize)> {
        let (raw_timestamp, consumed) = self.parse_event(buf)?;
        let resolved = W::resolve_timestamp(self.timestamp, raw_timestamp);
        let message = std::str::from_utf8(&self.message)
            .map_err(|_| IrError::DecodeError("reconstructed message is not valid UTF-8"))?;
        self.timestamp = resolved;
        Ok((
            LogEventView {
                message,
                timestamp: resolved,
            },
            consumed,
        ))
    }

    /// Parse one event record into the scratch buffers without committing
    /// any state. Returns the raw timestamp field and bytes consumed.
    pub(super) fn parse_event(&mut self, buf: &[u8]) -> Result<(EpochTimeMs, usize)> {
        let mut reader = ByteReader::new(buf);

        let raw_timestamp = W::read_timestamp(&mut reader)?;

        let logtype_len = read_tagged_len(
            &mut reader,
            [LOGTYPE_LEN_U8, LOGTYPE_LEN_U16, LOGTYPE_LEN_U32],
            "unrecognized logtype length tag",
        )?;
        let logtype = reader.read_exact(logtype_len)?;
        let (var_count, dict_count) = placeholder_census(logtype)?;

        self.vars.clear();
        for _ in 0..var_count {
            self.vars.push(W::read_var(&mut reader)?);
        }

        self.dict_end_offsets.clear();
        let dict_bytes: &[u8] = if dict_count > 0 {
            let dict_len = read_tagged_len(
                &mut reader,
                [DICT_LEN_U8, DICT_LEN_U16, DICT_LEN_U32],
                "unrecognized dictionary length tag",
            )?;
            let bytes = reader.read_exact(dict_len)?;
            for _ in 0..dict_count {
                self.dict_end_offsets.push(reader.read_u32()?);
            }
            validate_end_offsets(&self.dict_end_offsets, bytes.len())?;
            bytes
        } else {
            &[]
        };

        reconstruct_message::<W>(
            logtype,
            &self.vars,
            dict_bytes,
            &self.dict_end_offsets,
            &mut self.message,
        )?;
        Ok((raw_timestamp, reader.pos()))
    }
}

/// Deserializer for a stream whose width profile was discovered at run
/// time by [`crate::decode::deserialize_preamble`].
#[derive(Debug)]
pub enum StreamDeserializer {
    FourByte(Deserializer<FourByte>),
    EightByte(Deserializer<EightByte>),
}

impl StreamDeserializer {
    /// The stream's width profile.
    pub fn width(&self) -> Width {
        match self {
            Self::FourByte(_) => Width::FourByte,
            Self::EightByte(_) => Width::EightByte,
        }
    }

    /// See [`Deserializer::deserialize_log_event`].
    pub fn deserialize_log_event(&mut self, buf: &[u8]) -> Result<(LogEventView<'_>, usize)> {
        match self {
            Self::FourByte(inner) => inner.deserialize_log_event(buf),
            Self::EightByte(inner) => inner.deserialize_log_event(buf),
        }
    }

    /// See [`Deserializer::scan`].
    pub fn scan(
        &mut self,
        buf: &[u8],
        interval: &TimestampInterval,
        queries: &[WildcardQuery],
    ) -> Result<(Option<ScanMatch<'_>>, usize)> {
        match self {
            Self::FourByte(inner) => inner.scan(buf, interval, queries),
            Self::EightByte(inner) => inner.scan(buf, interval, queries),
        }
    }
}

/// Read a length prefixed by one of the three tagged widths.
fn read_tagged_len(
    reader: &mut ByteReader<'_>,
    tags: [u8; 3],
    context: &'static str,
) -> Result<usize> {
    let tag = reader.read_u8()?;
    if tag == tags[0] {
        Ok(reader.read_u8()? as usize)
    } else if tag == tags[1] {
        Ok(reader.read_u16()? as usize)
    } else if tag == tags[2] {
        Ok(reader.read_u32()? as usize)
    } else {
        Err(IrError::DecodeError(context))
    }
}

/// Count the packed-variable and dictionary placeholders in a logtype.
fn placeholder_census(logtype: &[u8]) -> Result<(usize, usize)> {
    let mut vars = 0;
    let mut dicts = 0;
    let mut iter = logtype.iter();
    while let Some(&byte) = iter.next() {
        match byte {
            ESCAPE => {
                if iter.next().is_none() {
                    return Err(IrError::CorruptedIr("logtype ends with a dangling escape"));
                }
            }
            PLACEHOLDER_INT | PLACEHOLDER_FLOAT => vars += 1,
            PLACEHOLDER_DICT => dicts += 1,
            _ => {}
        }
    }
    Ok((vars, dicts))
}

/// Rebuild the original message by walking the logtype and substituting
/// each placeholder with its variable, formatted in canonical decimal
/// form. Dictionary segments are consumed strictly in placeholder order.
fn reconstruct_message<W: WidthProfile>(
    logtype: &[u8],
    vars: &[W::Var],
    dict_bytes: &[u8],
    dict_end_offsets: &[u32],
    out: &mut Vec<u8>,
) -> Result<()> {
    out.clear();
    let mut next_var = 0;
    let mut next_dict = 0;
    let mut segment_start = 0usize;

    let mut iter = logtype.iter();
    while let Some(&byte) = iter.next() {
        match byte {
            ESCAPE => {
                let &literal = iter
                    .next()
                    .ok_or(IrError::CorruptedIr("logtype ends with a dangling escape"))?;
                out.push(literal);
            }
            PLACEHOLDER_INT => {
                let var = *vars
                    .get(next_var)
                    .ok_or(IrError::CorruptedIr("logtype names more variables than stored"))?;
                W::format_int(var, out);
                next_var += 1;
            }
            PLACEHOLDER_FLOAT => {
                let var = *vars
                    .get(next_var)
                    .ok_or(IrError::CorruptedIr("logtype names more variables than stored"))?;
                W::format_float(var, out);
                next_var += 1;
            }
            PLACEHOLDER_DICT => {
                let end = *dict_end_offsets
                    .get(next_dict)
                    .ok_or(IrError::CorruptedIr("logtype names more dictionary variables than stored"))?
                    as usize;
                let segment = dict_bytes
                    .get(segment_start..end)
                    .ok_or(IrError::CorruptedIr("dictionary segment out of range"))?;
                out.extend_from_slice(segment);
                segment_start = end;
                next_dict += 1;
            }
            _ => out.push(byte),
        }
    }
    Ok(())
}
