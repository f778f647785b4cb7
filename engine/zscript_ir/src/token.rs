//! Token kinds shared by the lexer and parser.

use crate::{Name, Span};
use std::fmt;

/// Lexical error carried inside an error token.
///
/// The scanner never aborts: malformed input becomes an `Error` token with
/// one of these kinds, and the parser reports it with a position. This lets
/// a single pass surface several lexical problems.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LexErrorKind {
    /// A character with no role in the grammar.
    UnexpectedChar(char),
    /// String literal ran to end of input without a closing quote.
    UnterminatedString,
    /// Block comment ran to end of input without `*/`.
    UnterminatedBlockComment,
    /// Unknown escape sequence inside a string literal.
    InvalidEscape(char),
    /// Numeric literal that does not parse as a 64-bit float.
    InvalidNumber,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::UnexpectedChar(c) => write!(f, "unexpected character '{c}'"),
            LexErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            LexErrorKind::UnterminatedBlockComment => write!(f, "unterminated block comment"),
            LexErrorKind::InvalidEscape(c) => write!(f, "invalid escape sequence '\\{c}'"),
            LexErrorKind::InvalidNumber => write!(f, "invalid number literal"),
        }
    }
}

/// Kind of a single token.
///
/// Literal payloads are interned (`Name`) or inline (`f64`), so tokens are
/// `Copy` and the token buffer is a plain `Vec`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Grouping and punctuation
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    /// `#{`, opening a map literal.
    HashBrace,
    Comma,
    Colon,
    Semicolon,

    // Operators
    Plus,
    Minus,
    Star,
    /// `**`, the power operator.
    StarStar,
    Slash,
    /// `/_`, floor division.
    SlashUnderscore,
    Percent,
    /// `%%`, percent-of (`a %% b` is `a / 100 * b`).
    PercentPercent,
    Bang,
    BangEq,
    Eq,
    EqEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,

    // Literals
    Ident(Name),
    Number(f64),
    Str(Name),

    // Keywords
    And,
    Break,
    Continue,
    Else,
    False,
    Func,
    If,
    Null,
    Or,
    Return,
    True,
    Var,
    While,

    /// Malformed input; the stream continues after it.
    Error(LexErrorKind),
    /// End of input. Always the final token.
    Eof,
}

impl TokenKind {
    /// Human-readable description for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
            TokenKind::LeftBracket => "'['",
            TokenKind::RightBracket => "']'",
            TokenKind::HashBrace => "'#{'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::Semicolon => "';'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::StarStar => "'**'",
            TokenKind::Slash => "'/'",
            TokenKind::SlashUnderscore => "'/_'",
            TokenKind::Percent => "'%'",
            TokenKind::PercentPercent => "'%%'",
            TokenKind::Bang => "'!'",
            TokenKind::BangEq => "'!='",
            TokenKind::Eq => "'='",
            TokenKind::EqEq => "'=='",
            TokenKind::Less => "'<'",
            TokenKind::LessEq => "'<='",
            TokenKind::Greater => "'>'",
            TokenKind::GreaterEq => "'>='",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Number(_) => "number",
            TokenKind::Str(_) => "string",
            TokenKind::And => "'and'",
            TokenKind::Break => "'break'",
            TokenKind::Continue => "'continue'",
            TokenKind::Else => "'else'",
            TokenKind::False => "'false'",
            TokenKind::Func => "'func'",
            TokenKind::If => "'if'",
            TokenKind::Null => "'null'",
            TokenKind::Or => "'or'",
            TokenKind::Return => "'return'",
            TokenKind::True => "'true'",
            TokenKind::Var => "'var'",
            TokenKind::While => "'while'",
            TokenKind::Error(_) => "invalid token",
            TokenKind::Eof => "end of input",
        }
    }

    /// True for tokens that begin a statement; parse recovery stops here.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Var
                | TokenKind::Func
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Return
                | TokenKind::Break
                | TokenKind::Continue
        )
    }
}

/// A spanned token.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_is_quoted_for_punctuation() {
        assert_eq!(TokenKind::Semicolon.describe(), "';'");
        assert_eq!(TokenKind::Ident(Name::EMPTY).describe(), "identifier");
    }

    #[test]
    fn statement_starters() {
        assert!(TokenKind::Var.starts_statement());
        assert!(TokenKind::While.starts_statement());
        assert!(!TokenKind::Plus.starts_statement());
        assert!(!TokenKind::Eof.starts_statement());
    }

    #[test]
    fn lex_error_display() {
        assert_eq!(
            LexErrorKind::UnexpectedChar('@').to_string(),
            "unexpected character '@'"
        );
        assert_eq!(
            LexErrorKind::UnterminatedString.to_string(),
            "unterminated string literal"
        );
    }
}
