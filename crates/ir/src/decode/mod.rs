//! Decoding: IR bytes back into log events
//!
//! - `preamble` - stream header decoding and deserializer construction
//! - `deserializer` - per-event decoding with running timestamp state
//! - `scan` - time-windowed wildcard search on the decode path
//! - `reader` - bounds-checked cursor reads shared by the above

mod deserializer;
mod preamble;
pub mod reader;
mod scan;

pub use deserializer::{Deserializer, StreamDeserializer};
pub use preamble::{decode_preamble, deserialize_preamble, Preamble, RawPreamble};
pub use scan::ScanMatch;


#[cfg(test)]
#[path = "scan_test.rs"]
mod scan_test;
