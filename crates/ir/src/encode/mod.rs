//! Encoding: raw log text into IR
//!
//! - `tokenizer` - splits a message into logtype + typed variables
//! - `serializer` - writes the preamble and per-event records

mod serializer;
mod tokenizer;

pub use serializer::Serializer;
pub use tokenizer::{encode_message, TokenizerConfig};


#[cfg(test)]
#[path = "serializer_test.rs"]
mod serializer_test;
