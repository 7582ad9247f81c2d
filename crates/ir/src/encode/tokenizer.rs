//! Logtype and variable extraction
//!
//! Scans a message left to right for variable tokens. Numeric tokens that
//! pack losslessly at the stream's width become placeholder + packed
//! value; every other variable token is stored verbatim in the dictionary
//! buffer. Static text is copied into the logtype byte-for-byte, with
//! placeholder-lookalike bytes escaped. Unencodable text never fails -
//! it degrades to dictionary storage.

use crate::message::EncodedMessage;
use crate::protocol::{
    needs_escape, ESCAPE, PLACEHOLDER_DICT, PLACEHOLDER_FLOAT, PLACEHOLDER_INT,
};
use crate::width::WidthProfile;
use crate::{IrError, Result};

/// Variable-token detection switches.
///
/// The token boundary is a heuristic, so the two non-digit rules are
/// individually switchable; the defaults are pinned by round-trip tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Treat a letters-only token directly preceded by `=` as a variable
    /// (captures `key=value` assignments).
    pub match_assignments: bool,

    /// Treat a multi-character all-hex-digit token as a variable.
    pub match_hex: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            match_assignments: true,
            match_hex: true,
        }
    }
}

/// Bytes that can appear inside a variable token; everything else
/// delimits. Covers `+ - . / 0-9 A-Z \ _ a-z`.
#[inline]
const fn is_variable_byte(byte: u8) -> bool {
    matches!(byte, b'+' | b'-'..=b'9' | b'A'..=b'Z' | b'\\' | b'_' | b'a'..=b'z')
}

/// Encode `message` into `out`, clearing and reusing its buffers.
///
/// The result is valid until the next call with the same `out`.
pub fn encode_message<W: WidthProfile>(
    message: &str,
    config: &TokenizerConfig,
    out: &mut EncodedMessage<W>,
) -> Result<()> {
    out.clear();
    let bytes = message.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() {
        let begin = match bytes[pos..].iter().position(|&b| is_variable_byte(b)) {
            Some(offset) => pos + offset,
            None => bytes.len(),
        };
        copy_static(&bytes[pos..begin], out);
        if begin == bytes.len() {
            break;
        }
        let end = bytes[begin..]
            .iter()
            .position(|&b| !is_variable_byte(b))
            .map(|offset| begin + offset)
            .unwrap_or(bytes.len());
        if is_variable_token(bytes, begin, end, config) {
            // Token bytes are ASCII, so this slice is on char boundaries
            encode_variable(&message[begin..end], out);
        } else {
            copy_static(&bytes[begin..end], out);
        }
        pos = end;
    }
    if out.dict_vars.len() > u32::MAX as usize {
        return Err(IrError::CorruptedIr("dictionary buffer exceeds u32 range"));
    }
    Ok(())
}

/// Decide whether the token at `[begin, end)` is a variable.
///
/// A token is a variable when it contains a decimal digit, is directly
/// preceded by `=` and contains a letter, or looks like a multi-digit hex
/// value.
fn is_variable_token(message: &[u8], begin: usize, end: usize, config: &TokenizerConfig) -> bool {
    let token = &message[begin..end];
    let mut has_digit = false;
    let mut has_alpha = false;
    for &byte in token {
        if byte.is_ascii_digit() {
            has_digit = true;
        } else if byte.is_ascii_alphabetic() {
            has_alpha = true;
        }
    }
    if has_digit {
        return true;
    }
    if config.match_assignments && has_alpha && begin > 0 && message[begin - 1] == b'=' {
        return true;
    }
    config.match_hex && token.len() >= 2 && token.iter().all(|b| b.is_ascii_hexdigit())
}

/// Append one variable token: packed numeric if lossless, dictionary
/// otherwise.
fn encode_variable<W: WidthProfile>(token: &str, out: &mut EncodedMessage<W>) {
    if let Some(var) = W::pack_int(token) {
        out.logtype.push(PLACEHOLDER_INT);
        out.vars.push(var);
    } else if let Some(var) = W::pack_float(token) {
        out.logtype.push(PLACEHOLDER_FLOAT);
        out.vars.push(var);
    } else {
        out.dict_vars.extend_from_slice(token.as_bytes());
        out.dict_var_end_offsets.push(out.dict_vars.len() as u32);
        out.logtype.push(PLACEHOLDER_DICT);
    }
}

/// Copy static text into the logtype, escaping placeholder-lookalike bytes.
fn copy_static<W: WidthProfile>(text: &[u8], out: &mut EncodedMessage<W>) {
    for &byte in text {
        if needs_escape(byte) {
            out.logtype.push(ESCAPE);
        }
        out.logtype.push(byte);
    }
}
