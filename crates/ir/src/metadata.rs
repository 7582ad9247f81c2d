//! Preamble metadata
//!
//! The preamble's metadata region is a JSON object with a fixed key set.
//! The codec layer only locates the region; interpreting it happens here,
//! one layer up. Unknown keys are ignored on read so streams written by
//! newer producers stay readable.

use serde::{Deserialize, Serialize};

use crate::{EpochTimeMs, Result};

/// Timestamp formatting information shared by every event in a stream.
///
/// The codec treats all three fields as opaque text; they exist so a
/// consumer can render decoded epoch timestamps the way the producer
/// originally formatted them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampInfo {
    /// Format pattern, e.g. `yyyy-MM-dd HH:mm:ss,SSS`
    #[serde(rename = "TIMESTAMP_PATTERN", default)]
    pub pattern: String,

    /// Syntax family the pattern is written in, e.g. `java::SimpleDateFormat`
    #[serde(rename = "TIMESTAMP_PATTERN_SYNTAX", default)]
    pub pattern_syntax: String,

    /// IANA timezone identifier, e.g. `America/Toronto`
    #[serde(rename = "TZ_ID", default)]
    pub time_zone_id: String,
}

impl TimestampInfo {
    /// Create timestamp info from its three components.
    pub fn new(
        pattern: impl Into<String>,
        pattern_syntax: impl Into<String>,
        time_zone_id: impl Into<String>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            pattern_syntax: pattern_syntax.into(),
            time_zone_id: time_zone_id.into(),
        }
    }
}

/// The full metadata object serialized into the preamble.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StreamMetadata {
    #[serde(flatten)]
    pub info: TimestampInfo,

    /// Delta-accumulation base for four-byte streams, as a decimal string.
    /// Absent for eight-byte streams.
    #[serde(
        rename = "REFERENCE_TIMESTAMP",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reference_timestamp: Option<String>,
}

impl StreamMetadata {
    pub fn new(info: TimestampInfo, reference_timestamp: Option<EpochTimeMs>) -> Self {
        Self {
            info,
            reference_timestamp: reference_timestamp.map(|ts| ts.to_string()),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(Into::into)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(Into::into)
    }

    /// The reference timestamp parsed back to epoch milliseconds, if
    /// present and well-formed.
    pub fn reference_timestamp_ms(&self) -> Option<EpochTimeMs> {
        self.reference_timestamp
            .as_deref()
            .and_then(|ts| ts.parse().ok())
    }
}
