//! Recursive descent parser for ZScript.
//!
//! Input is the lexer's token stream; output is an arena [`Program`] or the
//! full list of diagnostics the parse produced. The parser keeps going after
//! errors by synchronizing at statement boundaries, so a single run reports
//! everything it can.

mod cursor;
mod error;
mod grammar;

pub use cursor::Cursor;
pub use error::ParseError;
pub use grammar::{Parser, MAX_ARITY};

use zscript_diagnostic::Diagnostic;
use zscript_ir::{Program, Token};

/// Parse a token stream into a program, or all errors found.
pub fn parse(tokens: &[Token]) -> Result<Program, Vec<Diagnostic>> {
    let mut parser = Parser::new(tokens);
    let root = parser.parse_program();
    let Parser { ast, errors, .. } = parser;
    if errors.is_empty() {
        Ok(Program { ast, root })
    } else {
        Err(errors
            .into_iter()
            .map(ParseError::into_diagnostic)
            .collect())
    }
}
