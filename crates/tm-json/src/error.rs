//! Decoder-level failures: malformed JSON the validator never sees.

use crate::Span;

/// What went wrong while decoding raw JSON into tracked values.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeErrorKind {
    /// The input ended before a value was complete.
    UnexpectedEof,
    /// A token didn't match what the grammar expected at this position.
    UnexpectedToken { expected: &'static str, found: String },
    /// A string or number literal couldn't be lexed (bad escape, bad digits).
    MalformedLiteral(String),
    /// The same key appeared twice in one JSON object.
    DuplicateKey { key: String, original: Span },
    /// A value was present but of the wrong JSON type for its slot
    /// (e.g. a number where a string was expected).
    TypeMismatch { expected: &'static str, found: &'static str },
}

/// A single fatal decode error, with the byte span it occurred at.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    pub span: Span,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            DecodeErrorKind::UnexpectedEof => write!(f, "unexpected end of input"),
            DecodeErrorKind::UnexpectedToken { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            DecodeErrorKind::MalformedLiteral(reason) => write!(f, "malformed literal: {reason}"),
            DecodeErrorKind::DuplicateKey { key, .. } => write!(f, "duplicate key \"{key}\""),
            DecodeErrorKind::TypeMismatch { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
        }?;
        write!(f, " at offset {}", self.span.start)
    }
}

impl std::error::Error for DecodeError {}
