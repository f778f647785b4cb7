//! Token cursor for navigating the token stream.
//!
//! Low-level access, lookahead, and consumption. The stream always ends
//! with `Eof`, so `current` never runs out of tokens; `advance` parks on
//! the final `Eof` instead of moving past it.

use std::mem::discriminant;

use zscript_diagnostic::ErrorCode;
use zscript_ir::{Name, Span, Token, TokenKind};

use crate::ParseError;

pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// `tokens` must end with an `Eof` token, which the lexer guarantees.
    pub fn new(tokens: &'a [Token]) -> Self {
        debug_assert!(matches!(
            tokens.last().map(|t| t.kind),
            Some(TokenKind::Eof)
        ));
        Cursor { tokens, pos: 0 }
    }

    #[inline]
    pub fn current(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    #[inline]
    pub fn peek(&self) -> Token {
        self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    /// Position in the token stream, for progress checks during recovery.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The token most recently consumed. At position 0 this is the current
    /// token, which only recovery paths care about.
    pub fn previous(&self) -> Token {
        self.tokens[self.pos.saturating_sub(1)]
    }

    /// Consume and return the current token. Parks on `Eof`.
    pub fn advance(&mut self) -> Token {
        let token = self.current();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    #[inline]
    pub fn at_eof(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    /// True if the current token has the same kind, ignoring payloads.
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        discriminant(&self.current().kind) == discriminant(&kind)
    }

    /// Consume the current token if it matches, reporting whether it did.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Require the current token to match, or produce an error naming what
    /// was expected. A lexer error token reports its own problem instead.
    pub fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        let current = self.current();
        if let TokenKind::Error(lex_error) = current.kind {
            self.advance();
            return Err(ParseError::from_lex_error(lex_error, current.span));
        }
        Err(ParseError::unexpected_token(
            current.kind,
            expected,
            current.span,
        ))
    }

    /// Require an identifier, returning its interned name and span.
    pub fn expect_ident(&mut self, what: &str) -> Result<(Name, Span), ParseError> {
        let current = self.current();
        match current.kind {
            TokenKind::Ident(name) => {
                self.advance();
                Ok((name, current.span))
            }
            TokenKind::Error(lex_error) => {
                self.advance();
                Err(ParseError::from_lex_error(lex_error, current.span))
            }
            kind => Err(ParseError::new(
                ErrorCode::E1004,
                format!("expected {what}, found {}", kind.describe()),
                current.span,
            )),
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests unwrap for brevity")]
mod tests {
    use super::*;
    use zscript_ir::Interner;
    use zscript_lexer::lex;

    #[test]
    fn advance_parks_on_eof() {
        let interner = Interner::new();
        let tokens = lex(";", &interner);
        let mut cursor = Cursor::new(&tokens);
        assert_eq!(cursor.advance().kind, TokenKind::Semicolon);
        assert_eq!(cursor.advance().kind, TokenKind::Eof);
        assert_eq!(cursor.advance().kind, TokenKind::Eof);
        assert!(cursor.at_eof());
    }

    #[test]
    fn check_ignores_payloads() {
        let interner = Interner::new();
        let tokens = lex("42", &interner);
        let cursor = Cursor::new(&tokens);
        assert!(cursor.check(TokenKind::Number(0.0)));
        assert!(!cursor.check(TokenKind::Semicolon));
    }

    #[test]
    fn expect_ident_rejects_keywords() {
        let interner = Interner::new();
        let tokens = lex("while", &interner);
        let mut cursor = Cursor::new(&tokens);
        let err = cursor.expect_ident("variable name").unwrap_err();
        assert_eq!(err.code, ErrorCode::E1004);
        assert_eq!(err.message, "expected variable name, found 'while'");
    }
}
