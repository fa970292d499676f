//! A free-form JSON value, used to represent `const` literals.
//!
//! Kept separate from the `serde_json::Value` family on purpose: every node
//! here preserves the byte offset it was decoded at, so the Validator can
//! cite the exact source location of a mismatched `const` property.

use tm_json::{ArrayTracker, Decoder, JsonDecode, MapTracker, Offset, TokenKind};

/// A `const` literal: null, bool, number, string, or an array/object of the
/// same, each node carrying its own offset.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonLiteral {
    Null(Offset),
    Bool(Offset, bool),
    Number(Offset, f64),
    String(Offset, String),
    Array(ArrayTracker<JsonLiteral>),
    Object(MapTracker<JsonLiteral>),
}

impl JsonLiteral {
    pub fn offset(&self) -> Offset {
        match self {
            JsonLiteral::Null(o) => *o,
            JsonLiteral::Bool(o, _) => *o,
            JsonLiteral::Number(o, _) => *o,
            JsonLiteral::String(o, _) => *o,
            JsonLiteral::Array(a) => a.offset,
            JsonLiteral::Object(m) => m.offset,
        }
    }

    pub fn as_object(&self) -> Option<&MapTracker<JsonLiteral>> {
        match self {
            JsonLiteral::Object(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonLiteral::String(_, s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonLiteral::Number(_, n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonLiteral::Bool(_, b) => Some(*b),
            _ => None,
        }
    }

    /// Name of the JSON type this value type-checks as, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            JsonLiteral::Null(_) => "null",
            JsonLiteral::Bool(..) => "boolean",
            JsonLiteral::Number(..) => "number",
            JsonLiteral::String(..) => "string",
            JsonLiteral::Array(_) => "array",
            JsonLiteral::Object(_) => "object",
        }
    }
}

impl JsonDecode for JsonLiteral {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, tm_json::DecodeError> {
        let tok = dec.peek();
        match tok.kind {
            TokenKind::Null => {
                dec.advance();
                Ok(JsonLiteral::Null(tok.span.offset()))
            }
            TokenKind::True | TokenKind::False => {
                let b = dec.decode_bool()?;
                Ok(JsonLiteral::Bool(b.offset, b.value))
            }
            TokenKind::Number => {
                let n = dec.decode_number()?;
                Ok(JsonLiteral::Number(n.offset, n.value))
            }
            TokenKind::String => {
                let s = dec.decode_string()?;
                Ok(JsonLiteral::String(s.offset, s.value))
            }
            TokenKind::LBracket => Ok(JsonLiteral::Array(dec.decode_array()?)),
            TokenKind::LBrace => Ok(JsonLiteral::Object(dec.decode_map()?)),
            _ => Err(tm_json::DecodeError::new(
                tm_json::DecodeErrorKind::UnexpectedToken {
                    expected: "a JSON value",
                    found: format!("{:?}", tok.kind),
                },
                tok.span,
            )),
        }
    }
}
