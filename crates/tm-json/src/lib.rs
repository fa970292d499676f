//! Byte-position-tracking JSON decoder.
//!
//! Streams tokens out of a JSON document and builds typed wrappers that
//! remember the byte offset each value's token began at. This crate knows
//! nothing about Thing Models — it is the generic decoding layer `tm-model`
//! builds the Entity Model on top of.

mod decoder;
mod error;
mod span;
mod token;
mod tokenizer;
mod trackers;

pub use decoder::{unescape_json_string, Decoder, JsonDecode};
pub use error::{DecodeError, DecodeErrorKind};
pub use span::{Offset, Span};
pub use token::{Token, TokenKind};
pub use tokenizer::Tokenizer;
pub use trackers::{ArrayTracker, MapTracker, PropertyNameMap, Tracked};
