//! Width profiles
//!
//! A stream commits to one of two packing widths in its preamble and keeps
//! it for life: four-byte variables with delta timestamps, or eight-byte
//! variables with absolute timestamps. The codec is generic over
//! [`WidthProfile`] so the per-event substitution loop is monomorphized
//! per profile instead of branching on width per value.

use bytes::{BufMut, BytesMut};

use crate::decode::reader::ByteReader;
use crate::protocol::{
    EIGHT_BYTE_MAGIC, EOF_TAG, FOUR_BYTE_MAGIC, TS_ABSOLUTE, TS_DELTA_I16, TS_DELTA_I32,
    TS_DELTA_I64, TS_DELTA_I8,
};
use crate::{EpochTimeMs, IrError, Result};

mod sealed {
    pub trait Sealed {}
}

/// Stream-wide variable and timestamp packing profile.
///
/// Implemented only by [`FourByte`] and [`EightByte`].
pub trait WidthProfile: sealed::Sealed + Copy + Send + std::fmt::Debug + 'static {
    /// Packed variable representation (`i32` or `i64`; float variables are
    /// stored as bit patterns of the matching float width).
    type Var: Copy + std::fmt::Debug;

    /// Stream magic declaring this profile.
    const MAGIC: [u8; 4];

    /// Runtime tag for this profile.
    const WIDTH: Width;

    /// Pack an integer token, or `None` if the packed value would not
    /// format back to the identical byte sequence.
    fn pack_int(token: &str) -> Option<Self::Var>;

    /// Pack a float token as a bit pattern, or `None` if it would not
    /// format back identically.
    fn pack_float(token: &str) -> Option<Self::Var>;

    /// Append one packed value to the output buffer.
    fn put_var(var: Self::Var, out: &mut BytesMut);

    /// Read one packed value.
    fn read_var(reader: &mut ByteReader<'_>) -> Result<Self::Var>;

    /// Append a packed integer's canonical decimal form.
    fn format_int(var: Self::Var, out: &mut Vec<u8>);

    /// Append a packed float's canonical decimal form.
    fn format_float(var: Self::Var, out: &mut Vec<u8>);

    /// Serialize the event timestamp field; `prev` is the running base for
    /// delta profiles and ignored otherwise.
    fn put_timestamp(timestamp: EpochTimeMs, prev: EpochTimeMs, out: &mut BytesMut);

    /// Read the raw timestamp field (absolute value or delta). Yields
    /// [`IrError::EndOfIr`] on the end-of-stream tag.
    fn read_timestamp(reader: &mut ByteReader<'_>) -> Result<EpochTimeMs>;

    /// Resolve a raw timestamp field against the running base.
    fn resolve_timestamp(prev: EpochTimeMs, raw: EpochTimeMs) -> EpochTimeMs;
}

/// Four-byte profile: `i32`/`f32` variables, delta timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FourByte;

/// Eight-byte profile: `i64`/`f64` variables, absolute timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EightByte;

impl sealed::Sealed for FourByte {}
impl sealed::Sealed for EightByte {}

impl WidthProfile for FourByte {
    type Var = i32;

    const MAGIC: [u8; 4] = FOUR_BYTE_MAGIC;
    const WIDTH: Width = Width::FourByte;

    fn pack_int(token: &str) -> Option<i32> {
        lossless_int::<i32>(token)
    }

    fn pack_float(token: &str) -> Option<i32> {
        if !token.contains('.') {
            return None;
        }
        let value: f32 = token.parse().ok()?;
        if !value.is_finite() || value.to_string() != token {
            return None;
        }
        Some(value.to_bits() as i32)
    }

    fn put_var(var: i32, out: &mut BytesMut) {
        out.put_i32(var);
    }

    fn read_var(reader: &mut ByteReader<'_>) -> Result<i32> {
        reader.read_i32()
    }

    fn format_int(var: i32, out: &mut Vec<u8>) {
        out.extend_from_slice(var.to_string().as_bytes());
    }

    fn format_float(var: i32, out: &mut Vec<u8>) {
        let value = f32::from_bits(var as u32);
        out.extend_from_slice(value.to_string().as_bytes());
    }

    fn put_timestamp(timestamp: EpochTimeMs, prev: EpochTimeMs, out: &mut BytesMut) {
        let delta = timestamp - prev;
        if let Ok(delta) = i8::try_from(delta) {
            out.put_u8(TS_DELTA_I8);
            out.put_i8(delta);
        } else if let Ok(delta) = i16::try_from(delta) {
            out.put_u8(TS_DELTA_I16);
            out.put_i16(delta);
        } else if let Ok(delta) = i32::try_from(delta) {
            out.put_u8(TS_DELTA_I32);
            out.put_i32(delta);
        } else {
            out.put_u8(TS_DELTA_I64);
            out.put_i64(delta);
        }
    }

    fn read_timestamp(reader: &mut ByteReader<'_>) -> Result<EpochTimeMs> {
        match reader.read_u8()? {
            EOF_TAG => Err(IrError::EndOfIr),
            TS_DELTA_I8 => Ok(EpochTimeMs::from(reader.read_i8()?)),
            TS_DELTA_I16 => Ok(EpochTimeMs::from(reader.read_i16()?)),
            TS_DELTA_I32 => Ok(EpochTimeMs::from(reader.read_i32()?)),
            TS_DELTA_I64 => reader.read_i64(),
            _ => Err(IrError::DecodeError("expected timestamp delta tag")),
        }
    }

    fn resolve_timestamp(prev: EpochTimeMs, raw: EpochTimeMs) -> EpochTimeMs {
        prev + raw
    }
}

impl WidthProfile for EightByte {
    type Var = i64;

    const MAGIC: [u8; 4] = EIGHT_BYTE_MAGIC;
    const WIDTH: Width = Width::EightByte;

    fn pack_int(token: &str) -> Option<i64> {
        lossless_int::<i64>(token)
    }

    fn pack_float(token: &str) -> Option<i64> {
        if !token.contains('.') {
            return None;
        }
        let value: f64 = token.parse().ok()?;
        if !value.is_finite() || value.to_string() != token {
            return None;
        }
        Some(value.to_bits() as i64)
    }

    fn put_var(var: i64, out: &mut BytesMut) {
        out.put_i64(var);
    }

    fn read_var(reader: &mut ByteReader<'_>) -> Result<i64> {
        reader.read_i64()
    }

    fn format_int(var: i64, out: &mut Vec<u8>) {
        out.extend_from_slice(var.to_string().as_bytes());
    }

    fn format_float(var: i64, out: &mut Vec<u8>) {
        let value = f64::from_bits(var as u64);
        out.extend_from_slice(value.to_string().as_bytes());
    }

    fn put_timestamp(timestamp: EpochTimeMs, _prev: EpochTimeMs, out: &mut BytesMut) {
        out.put_u8(TS_ABSOLUTE);
        out.put_i64(timestamp);
    }

    fn read_timestamp(reader: &mut ByteReader<'_>) -> Result<EpochTimeMs> {
        match reader.read_u8()? {
            EOF_TAG => Err(IrError::EndOfIr),
            TS_ABSOLUTE => reader.read_i64(),
            _ => Err(IrError::DecodeError("expected absolute timestamp tag")),
        }
    }

    fn resolve_timestamp(_prev: EpochTimeMs, raw: EpochTimeMs) -> EpochTimeMs {
        raw
    }
}

/// Parse an integer token that formats back to the identical spelling.
///
/// Rejects leading zeros, a `+` sign, `-0`, and out-of-range values, all of
/// which would decode to a different byte sequence.
fn lossless_int<T>(token: &str) -> Option<T>
where
    T: std::str::FromStr + std::fmt::Display,
{
    let value: T = token.parse().ok()?;
    if value.to_string() == token {
        Some(value)
    } else {
        None
    }
}

/// Runtime width profile tag, as declared by a stream's magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// 4-byte variables, delta timestamps
    FourByte,
    /// 8-byte variables, absolute timestamps
    EightByte,
}

impl Width {
    /// Match a stream magic number, or `None` if unrecognized.
    pub fn from_magic(magic: &[u8; 4]) -> Option<Self> {
        if *magic == FOUR_BYTE_MAGIC {
            Some(Self::FourByte)
        } else if *magic == EIGHT_BYTE_MAGIC {
            Some(Self::EightByte)
        } else {
            None
        }
    }

    /// Get string representation
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FourByte => "four-byte",
            Self::EightByte => "eight-byte",
        }
    }
}

impl std::fmt::Display for Width {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
