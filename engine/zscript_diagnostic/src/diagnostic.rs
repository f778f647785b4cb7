//! Core diagnostic types.
//!
//! A [`Diagnostic`] is what every phase produces on failure: a code, a
//! message, a primary span, and optional secondary labels and notes. The
//! renderer turns it into text against the original source.

use std::fmt;
use zscript_ir::Span;

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A labeled span with a message.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    /// Create a primary label (the main error location).
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a secondary label (related context).
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// A structured diagnostic.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Create an error diagnostic with a primary span.
    pub fn error(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        let message = message.into();
        Diagnostic {
            code,
            severity: Severity::Error,
            labels: vec![Label::primary(span, message.clone())],
            message,
            notes: Vec::new(),
        }
    }

    /// An error with no source position, e.g. a failed file read.
    pub fn bare(code: ErrorCode, message: impl Into<String>) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Replace the primary label's message, keeping its span.
    pub fn with_primary_message(mut self, message: impl Into<String>) -> Self {
        if let Some(label) = self.labels.iter_mut().find(|l| l.is_primary) {
            label.message = message.into();
        }
        self
    }

    /// Attach a secondary label.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Attach a free-standing note shown under the snippet.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// The span of the primary label, if any.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_sets_primary_label() {
        let d = Diagnostic::error(ErrorCode::E1002, "expected expression", Span::new(3, 4));
        assert_eq!(d.severity, Severity::Error);
        assert_eq!(d.primary_span(), Some(Span::new(3, 4)));
        assert_eq!(d.labels.len(), 1);
        assert!(d.labels[0].is_primary);
    }

    #[test]
    fn builder_accumulates() {
        let d = Diagnostic::error(ErrorCode::E6001, "undefined variable 'x'", Span::new(0, 1))
            .with_label(Span::new(5, 6), "first used here")
            .with_note("variables must be declared with 'var'");
        assert_eq!(d.labels.len(), 2);
        assert_eq!(d.notes.len(), 1);
        assert!(!d.labels[1].is_primary);
    }

    #[test]
    fn primary_message_can_be_shortened() {
        let d = Diagnostic::error(ErrorCode::E1001, "unexpected token ';'", Span::new(2, 3))
            .with_primary_message("here");
        assert_eq!(d.message, "unexpected token ';'");
        assert_eq!(d.labels[0].message, "here");
    }
}
