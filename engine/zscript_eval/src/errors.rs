//! Runtime error type.
//!
//! Every failure the evaluator can produce is a closed [`EvalErrorKind`]
//! with the span of the expression that raised it. Factory functions keep
//! message wording in one place.

use std::fmt;

use zscript_diagnostic::{Diagnostic, ErrorCode};
use zscript_ir::Span;

/// A runtime failure, positioned at the expression that caused it.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub span: Span,
}

/// Closed set of runtime failures.
#[derive(Clone, Debug, PartialEq)]
pub enum EvalErrorKind {
    /// A name was read before any declaration defined it.
    UndefinedVariable { name: String },
    /// Assignment to a name no scope defines. Assignment never declares.
    UndefinedAssignment { name: String },
    /// An operator or call received a value of the wrong type.
    TypeError { message: String },
    /// `/`, `/_`, or `%` with a zero right operand.
    DivisionByZero,
    /// A call with the wrong number of arguments.
    WrongArity {
        callee: String,
        expected: usize,
        found: usize,
    },
    /// More than [`crate::FRAMES_MAX`] nested calls.
    StackOverflow,
    /// Array index outside `0..len`.
    IndexOutOfBounds { index: i64, len: usize },
}

impl EvalErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            EvalErrorKind::UndefinedVariable { .. } | EvalErrorKind::UndefinedAssignment { .. } => {
                ErrorCode::E6001
            }
            EvalErrorKind::TypeError { .. } => ErrorCode::E6002,
            EvalErrorKind::DivisionByZero => ErrorCode::E6003,
            EvalErrorKind::WrongArity { .. } => ErrorCode::E6004,
            EvalErrorKind::StackOverflow => ErrorCode::E6005,
            EvalErrorKind::IndexOutOfBounds { .. } => ErrorCode::E6006,
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalErrorKind::UndefinedVariable { name } => {
                write!(f, "undefined variable '{name}'")
            }
            EvalErrorKind::UndefinedAssignment { name } => {
                write!(f, "cannot assign to undefined variable '{name}'")
            }
            EvalErrorKind::TypeError { message } => f.write_str(message),
            EvalErrorKind::DivisionByZero => f.write_str("division by zero"),
            EvalErrorKind::WrongArity {
                callee,
                expected,
                found,
            } => write!(
                f,
                "'{callee}' expects {expected} argument{}, got {found}",
                if *expected == 1 { "" } else { "s" }
            ),
            EvalErrorKind::StackOverflow => f.write_str("call stack depth exceeded"),
            EvalErrorKind::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
        }
    }
}

impl EvalError {
    pub fn new(kind: EvalErrorKind, span: Span) -> Self {
        EvalError { kind, span }
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        Diagnostic::error(self.kind.code(), self.kind.to_string(), self.span)
    }
}

pub fn undefined_variable(name: &str, span: Span) -> EvalError {
    EvalError::new(
        EvalErrorKind::UndefinedVariable {
            name: name.to_owned(),
        },
        span,
    )
}

pub fn undefined_assignment(name: &str, span: Span) -> EvalError {
    EvalError::new(
        EvalErrorKind::UndefinedAssignment {
            name: name.to_owned(),
        },
        span,
    )
}

pub fn type_error(message: impl Into<String>, span: Span) -> EvalError {
    EvalError::new(
        EvalErrorKind::TypeError {
            message: message.into(),
        },
        span,
    )
}

pub fn division_by_zero(span: Span) -> EvalError {
    EvalError::new(EvalErrorKind::DivisionByZero, span)
}

pub fn wrong_arity(callee: &str, expected: usize, found: usize, span: Span) -> EvalError {
    EvalError::new(
        EvalErrorKind::WrongArity {
            callee: callee.to_owned(),
            expected,
            found,
        },
        span,
    )
}

pub fn stack_overflow(span: Span) -> EvalError {
    EvalError::new(EvalErrorKind::StackOverflow, span)
}

pub fn index_out_of_bounds(index: i64, len: usize, span: Span) -> EvalError {
    EvalError::new(EvalErrorKind::IndexOutOfBounds { index, len }, span)
}
