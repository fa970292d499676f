//! The position-tracking decoder: turns a token stream into trackers and,
//! via the [`JsonDecode`] trait entities in `tm-model` implement, into the
//! full Entity Model.

use crate::error::{DecodeError, DecodeErrorKind};
use crate::token::{Token, TokenKind};
use crate::tokenizer::Tokenizer;
use crate::trackers::{ArrayTracker, MapTracker, PropertyNameMap, Tracked};
use crate::{Offset, Span};

/// Implemented by every Entity Model type so it can be decoded directly by
/// a [`Decoder`]. `Value<T>`/`ArrayTracker<T>`/`MapTracker<T>` delegate to
/// this for their element type the same way `styx_parse`'s generic
/// trackers delegate to a sum type's own `deserialize`.
pub trait JsonDecode: Sized {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError>;
}

/// Streams a JSON document into tracked values, never losing byte offsets.
pub struct Decoder<'src> {
    source: &'src str,
    tokenizer: Tokenizer<'src>,
    peeked: Option<Token<'src>>,
}

impl<'src> Decoder<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            tokenizer: Tokenizer::new(source),
            peeked: None,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Peek at the next significant (non-whitespace) token.
    pub fn peek(&mut self) -> Token<'src> {
        if self.peeked.is_none() {
            self.peeked = Some(self.tokenizer.next_significant());
        }
        self.peeked.clone().unwrap()
    }

    /// Consume and return the next significant token.
    pub fn advance(&mut self) -> Token<'src> {
        if let Some(tok) = self.peeked.take() {
            return tok;
        }
        self.tokenizer.next_significant()
    }

    /// Consume the next token, erroring if it isn't `kind`.
    pub fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token<'src>, DecodeError> {
        let tok = self.peek();
        if tok.kind == kind {
            Ok(self.advance())
        } else if tok.kind == TokenKind::Eof {
            Err(DecodeError::new(DecodeErrorKind::UnexpectedEof, tok.span))
        } else {
            Err(DecodeError::new(
                DecodeErrorKind::UnexpectedToken {
                    expected,
                    found: describe(tok.kind, tok.text),
                },
                tok.span,
            ))
        }
    }

    /// Whole-document entry point: parse exactly one value, then require
    /// end of input (trailing garbage is a decode error).
    pub fn parse_document<T: JsonDecode>(&mut self) -> Result<T, DecodeError> {
        let value = T::decode(self)?;
        let tok = self.peek();
        if tok.kind != TokenKind::Eof {
            return Err(DecodeError::new(
                DecodeErrorKind::UnexpectedToken {
                    expected: "end of input",
                    found: describe(tok.kind, tok.text),
                },
                tok.span,
            ));
        }
        Ok(value)
    }

    fn expect_key(&mut self) -> Result<(String, Span), DecodeError> {
        let tok = self.expect(TokenKind::String, "a property name")?;
        let key = unescape_json_string(tok.text, tok.span)?;
        Ok((key, tok.span))
    }

    /// Decode a JSON object whose field set is known ahead of time (every
    /// Entity Model type). `field` is called once per key with the key
    /// text and its span; it is responsible for dispatching to a typed
    /// child decoder and for skipping values it doesn't recognize (see
    /// [`Decoder::skip_value`]). Duplicate keys are rejected before
    /// `field` is ever called, as a fatal decode error.
    pub fn decode_object<F>(&mut self, mut field: F) -> Result<(Offset, PropertyNameMap), DecodeError>
    where
        F: FnMut(&mut Self, &str, Span) -> Result<(), DecodeError>,
    {
        let open = self.expect(TokenKind::LBrace, "'{'")?;
        let offset = open.span.offset();
        let mut props = PropertyNameMap::new();

        if self.peek().kind == TokenKind::RBrace {
            self.advance();
            return Ok((offset, props));
        }

        loop {
            let (key, span) = self.expect_key()?;
            self.expect(TokenKind::Colon, "':'")?;
            if let Some(original) = props.record(&key, span) {
                return Err(DecodeError::new(
                    DecodeErrorKind::DuplicateKey { key, original },
                    span,
                ));
            }
            field(self, &key, span)?;

            match self.peek().kind {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::RBrace => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => {
                    return Err(DecodeError::new(DecodeErrorKind::UnexpectedEof, self.peek().span));
                }
                _ => {
                    let tok = self.peek();
                    return Err(DecodeError::new(
                        DecodeErrorKind::UnexpectedToken {
                            expected: "',' or '}'",
                            found: describe(tok.kind, tok.text),
                        },
                        tok.span,
                    ));
                }
            }
        }

        Ok((offset, props))
    }

    /// Decode a JSON object as a `name -> T` map with no fixed field set
    /// (`SchemaDefinitions`, `Actions`, `Properties`, `Events`).
    pub fn decode_map<T>(&mut self) -> Result<MapTracker<T>, DecodeError>
    where
        T: JsonDecode,
    {
        let open = self.expect(TokenKind::LBrace, "'{'")?;
        let mut map = MapTracker::new(open.span.offset());

        if self.peek().kind == TokenKind::RBrace {
            self.advance();
            return Ok(map);
        }

        loop {
            let (key, span) = self.expect_key()?;
            self.expect(TokenKind::Colon, "':'")?;
            let value = T::decode(self)?;
            if !map.insert(key.clone(), value) {
                return Err(DecodeError::new(
                    DecodeErrorKind::DuplicateKey { key, original: span },
                    span,
                ));
            }

            match self.peek().kind {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::RBrace => {
                    self.advance();
                    break;
                }
                _ => {
                    let tok = self.peek();
                    return Err(DecodeError::new(
                        DecodeErrorKind::UnexpectedToken {
                            expected: "',' or '}'",
                            found: describe(tok.kind, tok.text),
                        },
                        tok.span,
                    ));
                }
            }
        }

        Ok(map)
    }

    /// Decode a JSON array in source order.
    pub fn decode_array<T>(&mut self) -> Result<ArrayTracker<T>, DecodeError>
    where
        T: JsonDecode,
    {
        let open = self.expect(TokenKind::LBracket, "'['")?;
        let mut items = Vec::new();

        if self.peek().kind == TokenKind::RBracket {
            self.advance();
            return Ok(ArrayTracker::new(open.span.offset(), items));
        }

        loop {
            items.push(T::decode(self)?);
            match self.peek().kind {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::RBracket => {
                    self.advance();
                    break;
                }
                _ => {
                    let tok = self.peek();
                    return Err(DecodeError::new(
                        DecodeErrorKind::UnexpectedToken {
                            expected: "',' or ']'",
                            found: describe(tok.kind, tok.text),
                        },
                        tok.span,
                    ));
                }
            }
        }

        Ok(ArrayTracker::new(open.span.offset(), items))
    }

    pub fn decode_string(&mut self) -> Result<Tracked<String>, DecodeError> {
        let tok = self.expect(TokenKind::String, "a string")?;
        let value = unescape_json_string(tok.text, tok.span)?;
        Ok(Tracked::new(tok.span.offset(), value))
    }

    pub fn decode_number(&mut self) -> Result<Tracked<f64>, DecodeError> {
        let tok = self.expect(TokenKind::Number, "a number")?;
        let value: f64 = tok
            .text
            .parse()
            .map_err(|_| DecodeError::new(DecodeErrorKind::MalformedLiteral(tok.text.to_string()), tok.span))?;
        Ok(Tracked::new(tok.span.offset(), value))
    }

    pub fn decode_bool(&mut self) -> Result<Tracked<bool>, DecodeError> {
        let tok = self.peek();
        match tok.kind {
            TokenKind::True => {
                self.advance();
                Ok(Tracked::new(tok.span.offset(), true))
            }
            TokenKind::False => {
                self.advance();
                Ok(Tracked::new(tok.span.offset(), false))
            }
            _ => Err(DecodeError::new(
                DecodeErrorKind::UnexpectedToken {
                    expected: "a boolean",
                    found: describe(tok.kind, tok.text),
                },
                tok.span,
            )),
        }
    }

    /// Skip over one JSON value without interpreting it — used for
    /// unrecognized keys on a fixed-shape object.
    pub fn skip_value(&mut self) -> Result<(), DecodeError> {
        let tok = self.peek();
        match tok.kind {
            TokenKind::String | TokenKind::Number | TokenKind::True | TokenKind::False | TokenKind::Null => {
                self.advance();
                Ok(())
            }
            TokenKind::LBrace => {
                self.advance();
                if self.peek().kind == TokenKind::RBrace {
                    self.advance();
                    return Ok(());
                }
                loop {
                    self.expect(TokenKind::String, "a property name")?;
                    self.expect(TokenKind::Colon, "':'")?;
                    self.skip_value()?;
                    match self.peek().kind {
                        TokenKind::Comma => {
                            self.advance();
                        }
                        TokenKind::RBrace => {
                            self.advance();
                            break;
                        }
                        _ => {
                            let tok = self.peek();
                            return Err(DecodeError::new(
                                DecodeErrorKind::UnexpectedToken {
                                    expected: "',' or '}'",
                                    found: describe(tok.kind, tok.text),
                                },
                                tok.span,
                            ));
                        }
                    }
                }
                Ok(())
            }
            TokenKind::LBracket => {
                self.advance();
                if self.peek().kind == TokenKind::RBracket {
                    self.advance();
                    return Ok(());
                }
                loop {
                    self.skip_value()?;
                    match self.peek().kind {
                        TokenKind::Comma => {
                            self.advance();
                        }
                        TokenKind::RBracket => {
                            self.advance();
                            break;
                        }
                        _ => {
                            let tok = self.peek();
                            return Err(DecodeError::new(
                                DecodeErrorKind::UnexpectedToken {
                                    expected: "',' or ']'",
                                    found: describe(tok.kind, tok.text),
                                },
                                tok.span,
                            ));
                        }
                    }
                }
                Ok(())
            }
            TokenKind::Eof => Err(DecodeError::new(DecodeErrorKind::UnexpectedEof, tok.span)),
            _ => Err(DecodeError::new(
                DecodeErrorKind::UnexpectedToken {
                    expected: "a value",
                    found: describe(tok.kind, tok.text),
                },
                tok.span,
            )),
        }
    }
}

impl JsonDecode for Tracked<String> {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        dec.decode_string()
    }
}

impl JsonDecode for Tracked<f64> {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        dec.decode_number()
    }
}

impl JsonDecode for Tracked<bool> {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        dec.decode_bool()
    }
}

fn describe(kind: TokenKind, text: &str) -> String {
    match kind {
        TokenKind::Eof => "end of input".to_string(),
        TokenKind::Error => format!("invalid input {text:?}"),
        _ => format!("{text:?}"),
    }
}

/// Unescape a raw `"..."` token's text (quotes included) into its string
/// value, validating `\uXXXX` and the short escapes along the way.
pub fn unescape_json_string(raw: &str, span: Span) -> Result<String, DecodeError> {
    let inner = &raw[1..raw.len() - 1];
    if !inner.contains('\\') {
        return Ok(inner.to_string());
    }

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let code = u32::from_str_radix(&hex, 16).map_err(|_| {
                    DecodeError::new(DecodeErrorKind::MalformedLiteral(format!("\\u{hex}")), span)
                })?;
                match char::from_u32(code) {
                    Some(c) => out.push(c),
                    None => out.push('\u{FFFD}'),
                }
            }
            _ => {
                return Err(DecodeError::new(
                    DecodeErrorKind::MalformedLiteral("invalid escape sequence".to_string()),
                    span,
                ));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    impl JsonDecode for String {
        fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError> {
            Ok(dec.decode_string()?.value)
        }
    }

    #[test]
    fn decode_simple_object_tracks_offsets() {
        let src = r#"{"a": "x", "b": 1}"#;
        let mut dec = Decoder::new(src);
        let mut a = None;
        let mut b = None;
        let (offset, props) = dec
            .decode_object(|dec, key, _span| {
                match key {
                    "a" => a = Some(dec.decode_string()?),
                    "b" => b = Some(dec.decode_number()?),
                    _ => dec.skip_value()?,
                }
                Ok(())
            })
            .unwrap();

        assert_eq!(offset, Offset::at(0));
        assert!(props.contains("a"));
        assert!(props.contains("b"));
        assert_eq!(a.unwrap().value, "x");
        assert_eq!(b.unwrap().value, 1.0);
    }

    #[test]
    fn duplicate_key_is_fatal() {
        let src = r#"{"a": 1, "a": 2}"#;
        let mut dec = Decoder::new(src);
        let result = dec.decode_object(|dec, key, _| match key {
            "a" => {
                dec.skip_value()?;
                Ok(())
            }
            _ => dec.skip_value(),
        });
        assert!(matches!(
            result.unwrap_err().kind,
            DecodeErrorKind::DuplicateKey { .. }
        ));
    }

    #[test]
    fn duplicate_key_in_nested_object_is_fatal() {
        let src = r#"{"outer": {"x": 1, "x": 2}}"#;
        let mut dec = Decoder::new(src);
        let result = dec.decode_object(|dec, key, _| match key {
            "outer" => dec.decode_object(|dec, _, _| dec.skip_value()).map(|_| ()),
            _ => dec.skip_value(),
        });
        assert!(matches!(
            result.unwrap_err().kind,
            DecodeErrorKind::DuplicateKey { .. }
        ));
    }

    #[test]
    fn string_escapes_are_unescaped() {
        let span = Span::empty(0);
        assert_eq!(unescape_json_string(r#""a\nb""#, span).unwrap(), "a\nb");
        assert_eq!(unescape_json_string(r#""A""#, span).unwrap(), "A");
    }

    #[test]
    fn array_tracker_preserves_order() {
        let src = r#"["a", "b", "c"]"#;
        let mut dec = Decoder::new(src);
        let arr: ArrayTracker<String> = dec.decode_array().unwrap();
        assert_eq!(arr.items, vec!["a", "b", "c"]);
        assert_eq!(arr.offset, Offset::at(0));
    }

    #[test]
    fn map_tracker_rejects_duplicate_keys() {
        let src = r#"{"a": "1", "a": "2"}"#;
        let mut dec = Decoder::new(src);
        let result: Result<MapTracker<String>, DecodeError> = dec.decode_map();
        assert!(matches!(
            result.unwrap_err().kind,
            DecodeErrorKind::DuplicateKey { .. }
        ));
    }

    #[test]
    fn unknown_keys_are_skipped() {
        let src = r#"{"known": 1, "unknown": {"nested": [1, 2, 3]}}"#;
        let mut dec = Decoder::new(src);
        let mut known = None;
        let (_, props) = dec
            .decode_object(|dec, key, _| {
                match key {
                    "known" => known = Some(dec.decode_number()?),
                    _ => dec.skip_value()?,
                }
                Ok(())
            })
            .unwrap();
        assert_eq!(known.unwrap().value, 1.0);
        assert!(props.contains("unknown"));
    }
}
