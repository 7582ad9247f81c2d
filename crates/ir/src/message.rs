//! Log message containers
//!
//! An encoded message is four parallel pieces:
//!
//! ```text
//! logtype:   static text with placeholder bytes where variables were
//! vars:      packed integer/float values, in placeholder order
//! dict_vars: [seg0 bytes][seg1 bytes]...   (back-to-back)
//! offsets:   [end0, end1, ...]             (cumulative, strictly increasing)
//! ```
//!
//! Dictionary segment `i` spans `dict_vars[offsets[i-1]..offsets[i]]` with
//! `offsets[-1] = 0`; the final offset equals the buffer length.

use crate::width::WidthProfile;
use crate::{EpochTimeMs, IrError, Result};

/// A log message split into its encoded components.
///
/// Used as reusable scratch by the serializer: every encode call clears
/// and refills the buffers in place.
#[derive(Debug, Clone)]
pub struct EncodedMessage<W: WidthProfile> {
    pub(crate) logtype: Vec<u8>,
    pub(crate) vars: Vec<W::Var>,
    pub(crate) dict_vars: Vec<u8>,
    pub(crate) dict_var_end_offsets: Vec<u32>,
}

impl<W: WidthProfile> EncodedMessage<W> {
    /// Create an empty message with no buffers allocated yet.
    pub fn new() -> Self {
        Self {
            logtype: Vec::new(),
            vars: Vec::new(),
            dict_vars: Vec::new(),
            dict_var_end_offsets: Vec::new(),
        }
    }

    /// Clear all buffers, keeping their capacity.
    pub(crate) fn clear(&mut self) {
        self.logtype.clear();
        self.vars.clear();
        self.dict_vars.clear();
        self.dict_var_end_offsets.clear();
    }

    /// The static skeleton with placeholder bytes.
    #[inline]
    pub fn logtype(&self) -> &[u8] {
        &self.logtype
    }

    /// Packed integer/float variables in placeholder order.
    #[inline]
    pub fn vars(&self) -> &[W::Var] {
        &self.vars
    }

    /// The dictionary variable bytes, back-to-back.
    #[inline]
    pub fn dict_vars(&self) -> &[u8] {
        &self.dict_vars
    }

    /// Cumulative end offsets, one per dictionary variable.
    #[inline]
    pub fn dict_var_end_offsets(&self) -> &[u32] {
        &self.dict_var_end_offsets
    }

    /// Number of dictionary variables.
    #[inline]
    pub fn dict_var_count(&self) -> usize {
        self.dict_var_end_offsets.len()
    }

    /// Get dictionary segment `index`, or `None` if out of bounds.
    pub fn dict_var(&self, index: usize) -> Option<&[u8]> {
        let end = *self.dict_var_end_offsets.get(index)? as usize;
        let start = if index == 0 {
            0
        } else {
            self.dict_var_end_offsets[index - 1] as usize
        };
        self.dict_vars.get(start..end)
    }

    /// Check the end-offset invariant against the dictionary buffer.
    pub fn validate_dictionary(&self) -> Result<()> {
        validate_end_offsets(&self.dict_var_end_offsets, self.dict_vars.len())
    }
}

impl<W: WidthProfile> Default for EncodedMessage<W> {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that `offsets` is strictly increasing and its final entry covers
/// `len` bytes exactly.
pub(crate) fn validate_end_offsets(offsets: &[u32], len: usize) -> Result<()> {
    let mut prev = 0usize;
    for &offset in offsets {
        let offset = offset as usize;
        if offset <= prev {
            return Err(IrError::CorruptedIr(
                "dictionary end offsets not strictly increasing",
            ));
        }
        prev = offset;
    }
    if prev != len {
        return Err(IrError::CorruptedIr(
            "dictionary end offsets do not cover the buffer",
        ));
    }
    Ok(())
}

/// A decoded log event borrowed from the decoder instance that produced it.
///
/// The message text lives in the instance's scratch buffer and is
/// overwritten by the next call on that instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEventView<'a> {
    /// Reconstructed message text
    pub message: &'a str,
    /// Absolute timestamp, epoch milliseconds
    pub timestamp: EpochTimeMs,
}
