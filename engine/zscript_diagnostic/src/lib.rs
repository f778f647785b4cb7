//! Structured error reporting for the ZScript engine.
//!
//! Every phase (lexer, parser, evaluator, host boundary) reports failures as
//! [`Diagnostic`] values carrying an [`ErrorCode`], a message, and spans into
//! the original source. [`Renderer`] turns them into the plain-text form the
//! host receives.

mod diagnostic;
mod error_code;
mod line_index;
mod render;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use line_index::LineIndex;
pub use render::Renderer;
