//! Hand-written scanner for ZScript source.
//!
//! One forward pass over the bytes, producing a `Vec<Token>` ending in
//! `Eof`. Errors are tokens too, so downstream phases decide how to report
//! them.

mod cursor;
mod scanner;

pub use cursor::Cursor;
pub use scanner::lex;

#[cfg(test)]
mod tests {
    use super::lex;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use zscript_ir::{Interner, LexErrorKind, Span, TokenKind};

    fn kinds(source: &str) -> Vec<TokenKind> {
        let interner = Interner::new();
        lex(source, &interner).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("   \n\t"), vec![TokenKind::Eof]);
    }

    #[test]
    fn simple_expression() {
        assert_eq!(
            kinds("1 + 2;"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Plus,
                TokenKind::Number(2.0),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn spans_cover_lexemes() {
        let interner = Interner::new();
        let tokens = lex("var x = 10;", &interner);
        assert_eq!(tokens[0].span, Span::new(0, 3));
        assert_eq!(tokens[1].span, Span::new(4, 5));
        assert_eq!(tokens[2].span, Span::new(6, 7));
        assert_eq!(tokens[3].span, Span::new(8, 10));
        assert_eq!(tokens[4].span, Span::new(10, 11));
    }

    #[test]
    fn two_char_operators() {
        assert_eq!(
            kinds("** /_ %% == != <= >= ="),
            vec![
                TokenKind::StarStar,
                TokenKind::SlashUnderscore,
                TokenKind::PercentPercent,
                TokenKind::EqEq,
                TokenKind::BangEq,
                TokenKind::LessEq,
                TokenKind::GreaterEq,
                TokenKind::Eq,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords_versus_identifiers() {
        let interner = Interner::new();
        let tokens = lex("while whilst", &interner);
        assert_eq!(tokens[0].kind, TokenKind::While);
        match tokens[1].kind {
            TokenKind::Ident(name) => assert_eq!(&*interner.lookup(name), "whilst"),
            other => panic!("expected identifier, got {other:?}"),
        }
    }

    #[test]
    fn number_forms() {
        assert_eq!(kinds("3.25"), vec![TokenKind::Number(3.25), TokenKind::Eof]);
        assert_eq!(kinds("1e3"), vec![TokenKind::Number(1000.0), TokenKind::Eof]);
        assert_eq!(
            kinds("2.5e-1"),
            vec![TokenKind::Number(0.25), TokenKind::Eof]
        );
        // Dot without a following digit belongs to the next token.
        assert_eq!(
            kinds("1."),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Error(LexErrorKind::UnexpectedChar('.')),
                TokenKind::Eof,
            ]
        );
        // 'e' without digits stays an identifier suffix boundary.
        assert_eq!(
            kinds("1e")[0],
            TokenKind::Number(1.0),
        );
    }

    #[test]
    fn string_escapes_are_cooked() {
        let interner = Interner::new();
        let tokens = lex(r#""a\n\t\"b\\""#, &interner);
        match tokens[0].kind {
            TokenKind::Str(name) => assert_eq!(&*interner.lookup(name), "a\n\t\"b\\"),
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn bad_escape_is_an_error_token_and_scanning_continues() {
        assert_eq!(
            kinds(r#""a\qb" 1"#),
            vec![
                TokenKind::Error(LexErrorKind::InvalidEscape('q')),
                TokenKind::Number(1.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_string() {
        assert_eq!(
            kinds("\"abc"),
            vec![
                TokenKind::Error(LexErrorKind::UnterminatedString),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_are_trivia() {
        assert_eq!(
            kinds("1 // rest of line\n+ /* block */ 2"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Plus,
                TokenKind::Number(2.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_block_comment() {
        assert_eq!(
            kinds("1 /* never closed"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Error(LexErrorKind::UnterminatedBlockComment),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn shebang_is_skipped_on_first_line_only() {
        assert_eq!(
            kinds("#!/usr/bin/env zvm\n1;"),
            vec![TokenKind::Number(1.0), TokenKind::Semicolon, TokenKind::Eof]
        );
        assert_eq!(
            kinds("#{}"),
            vec![TokenKind::HashBrace, TokenKind::RightBrace, TokenKind::Eof]
        );
    }

    #[test]
    fn unexpected_character() {
        assert_eq!(
            kinds("1 @ 2"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Error(LexErrorKind::UnexpectedChar('@')),
                TokenKind::Number(2.0),
                TokenKind::Eof,
            ]
        );
    }

    proptest! {
        /// Scanning always terminates and always ends in exactly one Eof.
        #[test]
        fn lexing_never_panics(source in "\\PC*") {
            let interner = Interner::new();
            let tokens = lex(&source, &interner);
            prop_assert!(!tokens.is_empty());
            prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
            prop_assert_eq!(
                tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(),
                1
            );
        }

        /// Token spans never run backwards and never pass the end of input.
        #[test]
        fn spans_are_ordered_and_in_bounds(source in "\\PC*") {
            let interner = Interner::new();
            let tokens = lex(&source, &interner);
            let len = source.len() as u32;
            for token in &tokens {
                prop_assert!(token.span.start <= token.span.end);
                prop_assert!(token.span.end <= len);
            }
        }
    }
}
