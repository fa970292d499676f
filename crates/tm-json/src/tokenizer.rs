//! Tokenizer for UTF-8 JSON source text.

use crate::{Span, Token, TokenKind};
use tracing::trace;

/// Streams tokens out of a JSON document, tracking byte offsets as it goes.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    source: &'src str,
    remaining: &'src str,
    pos: u32,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
        }
    }

    #[inline]
    pub fn position(&self) -> u32 {
        self.pos
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8() as u32;
        self.remaining = &self.remaining[c.len_utf8()..];
        Some(c)
    }

    #[inline]
    fn starts_with(&self, prefix: &str) -> bool {
        self.remaining.starts_with(prefix)
    }

    fn token(&self, kind: TokenKind, start: u32) -> Token<'src> {
        let span = Span::new(start, self.pos);
        let text = &self.source[start as usize..self.pos as usize];
        trace!(?kind, ?span, ?text, "token");
        Token::new(kind, span, text)
    }

    /// Get the next token, including whitespace. Callers that want
    /// "meaningful" tokens only should use [`Tokenizer::next_significant`].
    pub fn next_token(&mut self) -> Token<'src> {
        if self.is_eof() {
            return self.token(TokenKind::Eof, self.pos);
        }

        let start = self.pos;
        let c = self.peek().unwrap();

        match c {
            '{' => {
                self.advance();
                self.token(TokenKind::LBrace, start)
            }
            '}' => {
                self.advance();
                self.token(TokenKind::RBrace, start)
            }
            '[' => {
                self.advance();
                self.token(TokenKind::LBracket, start)
            }
            ']' => {
                self.advance();
                self.token(TokenKind::RBracket, start)
            }
            ':' => {
                self.advance();
                self.token(TokenKind::Colon, start)
            }
            ',' => {
                self.advance();
                self.token(TokenKind::Comma, start)
            }
            ' ' | '\t' | '\n' | '\r' => {
                while matches!(self.peek(), Some(' ' | '\t' | '\n' | '\r')) {
                    self.advance();
                }
                self.token(TokenKind::Whitespace, start)
            }
            '"' => self.tokenize_string(start),
            '-' | '0'..='9' => self.tokenize_number(start),
            't' if self.starts_with("true") => {
                self.advance_by(4);
                self.token(TokenKind::True, start)
            }
            'f' if self.starts_with("false") => {
                self.advance_by(5);
                self.token(TokenKind::False, start)
            }
            'n' if self.starts_with("null") => {
                self.advance_by(4);
                self.token(TokenKind::Null, start)
            }
            _ => {
                self.advance();
                self.token(TokenKind::Error, start)
            }
        }
    }

    #[inline]
    fn advance_by(&mut self, n: usize) {
        self.pos += n as u32;
        self.remaining = &self.remaining[n..];
    }

    /// Get the next non-whitespace token.
    pub fn next_significant(&mut self) -> Token<'src> {
        loop {
            let token = self.next_token();
            if token.kind != TokenKind::Whitespace {
                return token;
            }
        }
    }

    fn tokenize_string(&mut self, start: u32) -> Token<'src> {
        self.advance(); // opening quote
        loop {
            match self.peek() {
                None => return self.token(TokenKind::Error, start),
                Some('"') => {
                    self.advance();
                    return self.token(TokenKind::String, start);
                }
                Some('\\') => {
                    self.advance();
                    if self.peek().is_none() {
                        return self.token(TokenKind::Error, start);
                    }
                    // `\uXXXX` escapes consume four extra hex digits; every
                    // other recognized escape is a single character. We
                    // don't reject unrecognized escapes here — that's the
                    // decoder's job once it has the full literal in hand.
                    let escape = self.advance().unwrap();
                    if escape == 'u' {
                        for _ in 0..4 {
                            if self.peek().is_none() {
                                return self.token(TokenKind::Error, start);
                            }
                            self.advance();
                        }
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn tokenize_number(&mut self, start: u32) -> Token<'src> {
        if self.peek() == Some('-') {
            self.advance();
        }
        while matches!(self.peek(), Some('0'..='9')) {
            self.advance();
        }
        if self.peek() == Some('.') {
            self.advance();
            while matches!(self.peek(), Some('0'..='9')) {
                self.advance();
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            while matches!(self.peek(), Some('0'..='9')) {
                self.advance();
            }
        }
        self.token(TokenKind::Number, start)
    }
}
