//! The token scanner.
//!
//! Single forward pass, dispatching on the current byte. Malformed input
//! becomes `TokenKind::Error` tokens and scanning continues, so one pass can
//! surface several lexical problems. The stream always ends with `Eof`.

use zscript_ir::{Interner, LexErrorKind, Span, Token, TokenKind};

use crate::cursor::Cursor;

/// Scan `source` into a token stream. String and identifier payloads are
/// interned into `interner`.
pub fn lex(source: &str, interner: &Interner) -> Vec<Token> {
    let mut scanner = Scanner {
        cursor: Cursor::new(source),
        interner,
        tokens: Vec::new(),
    };
    scanner.run();
    scanner.tokens
}

struct Scanner<'a> {
    cursor: Cursor<'a>,
    interner: &'a Interner,
    tokens: Vec<Token>,
}

impl Scanner<'_> {
    fn run(&mut self) {
        self.skip_shebang();
        loop {
            self.skip_trivia();
            if self.cursor.is_eof() {
                break;
            }
            self.scan_token();
        }
        let end = self.cursor.pos();
        self.push(TokenKind::Eof, Span::point(end));
    }

    /// A `#!` on the very first line belongs to the OS, not the grammar.
    fn skip_shebang(&mut self) {
        if self.cursor.current() == b'#' && self.cursor.peek() == b'!' {
            self.cursor.eat_until_newline_or_eof();
        }
    }

    /// Skip whitespace and comments. Unterminated block comments produce an
    /// error token here since they swallow the rest of the input.
    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.current() {
                b' ' | b'\t' | b'\r' | b'\n' => self.cursor.advance(),
                b'/' if self.cursor.peek() == b'/' => {
                    self.cursor.eat_until_newline_or_eof();
                }
                b'/' if self.cursor.peek() == b'*' => {
                    let start = self.cursor.pos();
                    self.cursor.advance_n(2);
                    loop {
                        if self.cursor.is_eof() {
                            self.push(
                                TokenKind::Error(LexErrorKind::UnterminatedBlockComment),
                                Span::new(start, self.cursor.pos()),
                            );
                            return;
                        }
                        if self.cursor.current() == b'*' && self.cursor.peek() == b'/' {
                            self.cursor.advance_n(2);
                            break;
                        }
                        self.cursor.advance_char();
                    }
                }
                _ => return,
            }
        }
    }

    fn scan_token(&mut self) {
        let start = self.cursor.pos();
        let byte = self.cursor.current();
        match byte {
            b'(' => self.single(TokenKind::LeftParen),
            b')' => self.single(TokenKind::RightParen),
            b'{' => self.single(TokenKind::LeftBrace),
            b'}' => self.single(TokenKind::RightBrace),
            b'[' => self.single(TokenKind::LeftBracket),
            b']' => self.single(TokenKind::RightBracket),
            b',' => self.single(TokenKind::Comma),
            b':' => self.single(TokenKind::Colon),
            b';' => self.single(TokenKind::Semicolon),
            b'+' => self.single(TokenKind::Plus),
            b'-' => self.single(TokenKind::Minus),
            b'#' if self.cursor.peek() == b'{' => self.double(TokenKind::HashBrace),
            b'*' => self.one_or_two(b'*', TokenKind::Star, TokenKind::StarStar),
            b'/' => self.one_or_two(b'_', TokenKind::Slash, TokenKind::SlashUnderscore),
            b'%' => self.one_or_two(b'%', TokenKind::Percent, TokenKind::PercentPercent),
            b'!' => self.one_or_two(b'=', TokenKind::Bang, TokenKind::BangEq),
            b'=' => self.one_or_two(b'=', TokenKind::Eq, TokenKind::EqEq),
            b'<' => self.one_or_two(b'=', TokenKind::Less, TokenKind::LessEq),
            b'>' => self.one_or_two(b'=', TokenKind::Greater, TokenKind::GreaterEq),
            b'"' => self.scan_string(),
            b'0'..=b'9' => self.scan_number(),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.scan_ident(),
            _ => {
                let c = self.cursor.current_char();
                self.cursor.advance_char();
                self.push(
                    TokenKind::Error(LexErrorKind::UnexpectedChar(c)),
                    Span::new(start, self.cursor.pos()),
                );
            }
        }
    }

    fn single(&mut self, kind: TokenKind) {
        let start = self.cursor.pos();
        self.cursor.advance();
        self.push(kind, Span::new(start, self.cursor.pos()));
    }

    fn double(&mut self, kind: TokenKind) {
        let start = self.cursor.pos();
        self.cursor.advance_n(2);
        self.push(kind, Span::new(start, self.cursor.pos()));
    }

    /// Emit `two` if the byte after the current one is `second`, else `one`.
    fn one_or_two(&mut self, second: u8, one: TokenKind, two: TokenKind) {
        if self.cursor.peek() == second {
            self.double(two);
        } else {
            self.single(one);
        }
    }

    fn scan_number(&mut self) {
        let start = self.cursor.pos();
        self.cursor.eat_while(|b| b.is_ascii_digit());
        if self.cursor.current() == b'.' && self.cursor.peek().is_ascii_digit() {
            self.cursor.advance();
            self.cursor.eat_while(|b| b.is_ascii_digit());
        }
        if matches!(self.cursor.current(), b'e' | b'E') {
            let mut lookahead = self.cursor;
            lookahead.advance();
            if matches!(lookahead.current(), b'+' | b'-') {
                lookahead.advance();
            }
            if lookahead.current().is_ascii_digit() {
                lookahead.eat_while(|b| b.is_ascii_digit());
                self.cursor = lookahead;
            }
        }
        let span = Span::new(start, self.cursor.pos());
        let text = self.cursor.slice(start, self.cursor.pos());
        match text.parse::<f64>() {
            Ok(value) => self.push(TokenKind::Number(value), span),
            Err(_) => self.push(TokenKind::Error(LexErrorKind::InvalidNumber), span),
        }
    }

    fn scan_ident(&mut self) {
        let start = self.cursor.pos();
        self.cursor
            .eat_while(|b| b.is_ascii_alphanumeric() || b == b'_');
        let text = self.cursor.slice(start, self.cursor.pos());
        let kind = match keyword(text) {
            Some(kind) => kind,
            None => TokenKind::Ident(self.interner.intern(text)),
        };
        self.push(kind, Span::new(start, self.cursor.pos()));
    }

    /// Scan a double-quoted string, cooking escapes into the interned value.
    /// On an invalid escape the rest of the literal is still consumed so the
    /// scanner resynchronizes at the closing quote.
    fn scan_string(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance();
        let mut value = String::new();
        let mut bad_escape: Option<char> = None;
        loop {
            match self.cursor.current() {
                b'"' => {
                    self.cursor.advance();
                    let span = Span::new(start, self.cursor.pos());
                    match bad_escape {
                        Some(c) => {
                            self.push(TokenKind::Error(LexErrorKind::InvalidEscape(c)), span);
                        }
                        None => {
                            self.push(TokenKind::Str(self.interner.intern(&value)), span);
                        }
                    }
                    return;
                }
                0 if self.cursor.is_eof() => {
                    self.push(
                        TokenKind::Error(LexErrorKind::UnterminatedString),
                        Span::new(start, self.cursor.pos()),
                    );
                    return;
                }
                b'\\' => {
                    self.cursor.advance();
                    let escape = self.cursor.current_char();
                    match escape {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '\\' => value.push('\\'),
                        '"' => value.push('"'),
                        '0' => value.push('\0'),
                        other => {
                            if bad_escape.is_none() {
                                bad_escape = Some(other);
                            }
                        }
                    }
                    if !self.cursor.is_eof() {
                        self.cursor.advance_char();
                    }
                }
                _ => {
                    value.push(self.cursor.current_char());
                    self.cursor.advance_char();
                }
            }
        }
    }

    fn push(&mut self, kind: TokenKind, span: Span) {
        self.tokens.push(Token::new(kind, span));
    }
}

fn keyword(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "and" => TokenKind::And,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "else" => TokenKind::Else,
        "false" => TokenKind::False,
        "func" => TokenKind::Func,
        "if" => TokenKind::If,
        "null" => TokenKind::Null,
        "or" => TokenKind::Or,
        "return" => TokenKind::Return,
        "true" => TokenKind::True,
        "var" => TokenKind::Var,
        "while" => TokenKind::While,
        _ => return None,
    };
    Some(kind)
}
