//! Time-windowed wildcard scanning on the decode path
//!
//! The scanner decodes events one by one and filters as it goes: events
//! before the window are skipped without ever touching the queries, the
//! first event at or past the window's upper edge ends the scan, and
//! in-window events are tested against the queries in input order with an
//! early exit on the first hit.

use timber_search::{TimestampInterval, WildcardQuery};
use tracing::trace;

use crate::decode::deserializer::Deserializer;
use crate::width::WidthProfile;
use crate::{EpochTimeMs, IrError, Result};

/// A scan hit: the decoded event plus the index of the first query that
/// matched it.
///
/// Borrows the deserializer's scratch buffer like
/// [`crate::LogEventView`]; copy the message out before the next call.
#[derive(Debug, Clone, Copy)]
pub struct ScanMatch<'a> {
    /// Reconstructed message text
    pub message: &'a str,
    /// Absolute timestamp, epoch milliseconds
    pub timestamp: EpochTimeMs,
    /// Index into the scan's query slice
    pub query_index: usize,
}

impl<W: WidthProfile> Deserializer<W> {
    /// Scan forward for the first event inside `interval` that matches any
    /// of `queries`, returning the hit and the number of bytes consumed.
    ///
    /// `Ok((None, consumed))` means an event at or past `interval.upper`
    /// was reached: the scan is over, and that boundary event is left
    /// unconsumed (the cursor stops at its first byte and the running
    /// timestamp does not advance past it), so the stream can still be
    /// decoded or re-scanned from there.
    ///
    /// On error the running state is rolled back to where this call
    /// started, so the whole scan can be retried from the same cursor
    /// after more bytes arrive.
    pub fn scan(
        &mut self,
        buf: &[u8],
        interval: &TimestampInterval,
        queries: &[WildcardQuery],
    ) -> Result<(Option<ScanMatch<'_>>, usize)> {
        let start_timestamp = self.timestamp();
        let mut pos = 0;

        let (query_index, consumed) = loop {
            let (raw_timestamp, consumed) = match self.parse_event(&buf[pos..]) {
                Ok(parsed) => parsed,
                Err(err) => {
                    self.set_timestamp(start_timestamp);
                    return Err(err);
                }
            };
            let resolved = W::resolve_timestamp(self.timestamp(), raw_timestamp);

            if resolved >= interval.upper {
                trace!(timestamp = resolved, "scan reached interval upper edge");
                return Ok((None, pos));
            }

            self.set_timestamp(resolved);
            pos += consumed;

            if resolved < interval.lower {
                trace!(timestamp = resolved, "scan skipped event before interval");
                continue;
            }

            let message = match std::str::from_utf8(self.scratch_message()) {
                Ok(message) => message,
                Err(_) => {
                    self.set_timestamp(start_timestamp);
                    return Err(IrError::DecodeError(
                        "reconstructed message is not valid UTF-8",
                    ));
                }
            };
            if let Some(index) = queries.iter().position(|query| query.matches(message)) {
                break (index, pos);
            }
        };

        let message = std::str::from_utf8(self.scratch_message())
            .map_err(|_| IrError::DecodeError("reconstructed message is not valid UTF-8"))?;
        Ok((
            Some(ScanMatch {
                message,
                timestamp: self.timestamp(),
                query_index,
            }),
            consumed,
        ))
    }
}
