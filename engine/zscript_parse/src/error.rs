//! Parse error type and factory functions.
//!
//! A [`ParseError`] is (code, message, span). Factories cover the common
//! sites so messages stay consistent across the grammar.

use zscript_diagnostic::{Diagnostic, ErrorCode};
use zscript_ir::{LexErrorKind, Span, TokenKind};

/// A single parse failure, positioned in source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
        }
    }

    /// A token that cannot appear here.
    pub fn unexpected_token(found: TokenKind, expected: &str, span: Span) -> Self {
        ParseError::new(
            ErrorCode::E1001,
            format!("expected {expected}, found {}", found.describe()),
            span,
        )
    }

    /// A position where an expression must start but does not.
    pub fn expected_expression(found: TokenKind, span: Span) -> Self {
        if found == TokenKind::Eof {
            ParseError::new(ErrorCode::E1002, "expected expression", span)
        } else {
            ParseError::new(
                ErrorCode::E1002,
                format!("expected expression, found {}", found.describe()),
                span,
            )
        }
    }

    /// A delimiter opened but never closed.
    pub fn unclosed_delimiter(open: &str, close: &str, at: Span) -> Self {
        ParseError::new(
            ErrorCode::E1003,
            format!("unclosed {open}, expected {close}"),
            at,
        )
    }

    /// Assignment to something that is not a variable or index expression.
    pub fn invalid_assignment_target(span: Span) -> Self {
        ParseError::new(ErrorCode::E1005, "invalid assignment target", span)
    }

    /// Lexical errors surface through the parser so every failure goes
    /// through one reporting path.
    pub fn from_lex_error(kind: LexErrorKind, span: Span) -> Self {
        let code = match kind {
            LexErrorKind::UnterminatedString => ErrorCode::E0001,
            LexErrorKind::UnexpectedChar(_) | LexErrorKind::InvalidNumber => ErrorCode::E0002,
            LexErrorKind::InvalidEscape(_) => ErrorCode::E0003,
            LexErrorKind::UnterminatedBlockComment => ErrorCode::E0004,
        };
        ParseError::new(code, kind.to_string(), span)
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        Diagnostic::error(self.code, self.message, self.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_token_names_both_sides() {
        let e = ParseError::unexpected_token(TokenKind::Semicolon, "';'", Span::new(1, 2));
        assert_eq!(e.code, ErrorCode::E1001);
        assert_eq!(e.message, "expected ';', found ';'");
    }

    #[test]
    fn expected_expression_at_eof_is_terse() {
        let e = ParseError::expected_expression(TokenKind::Eof, Span::point(4));
        assert_eq!(e.message, "expected expression");
    }

    #[test]
    fn lex_error_mapping() {
        let e = ParseError::from_lex_error(LexErrorKind::UnterminatedString, Span::new(0, 3));
        assert_eq!(e.code, ErrorCode::E0001);
        let e = ParseError::from_lex_error(LexErrorKind::UnexpectedChar('@'), Span::new(0, 1));
        assert_eq!(e.code, ErrorCode::E0002);
    }
}
