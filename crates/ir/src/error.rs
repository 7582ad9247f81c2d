//! IR error types
//!
//! Every fallible operation in this crate returns a status; nothing is
//! retried internally and no error crosses a public boundary as a panic.

use thiserror::Error;

/// Errors that can occur while encoding or decoding an IR stream
#[derive(Debug, Error)]
pub enum IrError {
    /// The buffer ended before a full record could be parsed. The cursor is
    /// left at the last fully-consumed record boundary; append more bytes
    /// and retry.
    #[error("incomplete IR: buffer ends mid-record")]
    IncompleteIr,

    /// An encoding invariant was violated; the record cannot be recovered
    #[error("corrupted IR: {0}")]
    CorruptedIr(&'static str),

    /// The record is structurally malformed
    #[error("decode error: {0}")]
    DecodeError(&'static str),

    /// The preamble metadata region could not be parsed
    #[error("corrupted preamble metadata: {0}")]
    CorruptedMetadata(#[from] serde_json::Error),

    /// The preamble declares a width profile or metadata encoding this
    /// version does not recognize
    #[error("unsupported IR stream version")]
    UnsupportedVersion,

    /// The stream's end-of-IR tag was read; no further events follow
    #[error("end of IR stream")]
    EndOfIr,
}

impl IrError {
    /// True when retrying the same operation with more bytes may succeed
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::IncompleteIr)
    }

    /// True when the stream terminated cleanly rather than failed
    #[inline]
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfIr)
    }
}
