//! Plain-text rendering of diagnostics.
//!
//! Produces the classic compiler layout:
//!
//! ```text
//! error[E1002]: expected expression
//!   --> <test>:1:4
//!    |
//!  1 | 1 +;
//!    |    ^ expected expression
//!    |
//!    = note: every statement ends with ';'
//! ```
//!
//! Output is always uncolored plain text. The host boundary returns rendered
//! diagnostics as owned strings, so the renderer writes into a `String`
//! rather than a terminal handle.

use std::fmt::Write;

use crate::{Diagnostic, LineIndex};

/// Renders diagnostics against one source buffer.
pub struct Renderer<'src> {
    source: &'src str,
    source_name: &'src str,
    index: LineIndex,
}

impl<'src> Renderer<'src> {
    pub fn new(source: &'src str, source_name: &'src str) -> Self {
        Renderer {
            source,
            source_name,
            index: LineIndex::new(source),
        }
    }

    /// Render a single diagnostic to a string.
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();
        self.render_into(&mut out, diagnostic);
        out
    }

    /// Render a batch, separated by blank lines, with a trailing summary.
    pub fn render_all(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (i, diagnostic) in diagnostics.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            self.render_into(&mut out, diagnostic);
        }
        let errors: usize = diagnostics
            .iter()
            .filter(|d| d.severity == crate::Severity::Error)
            .count();
        if errors > 1 {
            let _ = write!(out, "\n{errors} errors emitted\n");
        }
        out
    }

    fn render_into(&self, out: &mut String, diagnostic: &Diagnostic) {
        let _ = writeln!(
            out,
            "{}[{}]: {}",
            diagnostic.severity, diagnostic.code, diagnostic.message
        );

        if let Some(span) = diagnostic.primary_span() {
            let (line, col) = self.index.line_col(self.source, span.start);
            let gutter = line_number_width(line);
            let _ = writeln!(
                out,
                "{:gutter$}--> {}:{line}:{col}",
                "", self.source_name
            );
            let _ = writeln!(out, "{:gutter$} |", "");

            for label in &diagnostic.labels {
                let (label_line, label_col) = self.index.line_col(self.source, label.span.start);
                let text = self.index.line_text(self.source, label_line);
                let _ = writeln!(out, "{label_line:>gutter$} | {text}");

                let caret = if label.is_primary { '^' } else { '-' };
                let width = self.caret_width(label.span);
                let _ = writeln!(
                    out,
                    "{:gutter$} | {:pad$}{}{}{}",
                    "",
                    "",
                    caret.to_string().repeat(width),
                    if label.message.is_empty() { "" } else { " " },
                    label.message,
                    pad = (label_col - 1) as usize,
                );
            }

            if !diagnostic.notes.is_empty() {
                let _ = writeln!(out, "{:gutter$} |", "");
            }
            for note in &diagnostic.notes {
                let _ = writeln!(out, "{:gutter$} = note: {note}", "");
            }
        } else {
            for note in &diagnostic.notes {
                let _ = writeln!(out, " = note: {note}");
            }
        }
    }

    /// How many carets to draw: the span's character width, clamped to the
    /// line it starts on, never zero.
    fn caret_width(&self, span: zscript_ir::Span) -> usize {
        let start = (span.start as usize).min(self.source.len());
        let end = (span.end as usize).min(self.source.len()).max(start);
        let slice = &self.source[start..end];
        let first_line = slice.split('\n').next().unwrap_or("");
        first_line.chars().count().max(1)
    }
}

fn line_number_width(line: u32) -> usize {
    (line.checked_ilog10().unwrap_or(0) as usize) + 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Diagnostic, ErrorCode};
    use pretty_assertions::assert_eq;
    use zscript_ir::Span;

    #[test]
    fn renders_header_and_snippet() {
        let src = "1 +;";
        let renderer = Renderer::new(src, "<test>");
        let d = Diagnostic::error(ErrorCode::E1002, "expected expression", Span::new(3, 4));
        let out = renderer.render(&d);
        assert_eq!(
            out,
            "error[E1002]: expected expression\n\
             \x20 --> <test>:1:4\n\
             \x20  |\n\
             \x201 | 1 +;\n\
             \x20  |    ^ expected expression\n"
        );
    }

    #[test]
    fn notes_follow_snippet() {
        let src = "x;";
        let renderer = Renderer::new(src, "repl");
        let d = Diagnostic::error(ErrorCode::E6001, "undefined variable 'x'", Span::new(0, 1))
            .with_note("variables must be declared with 'var'");
        let out = renderer.render(&d);
        assert!(out.contains("  = note: variables must be declared with 'var'"));
        assert!(out.starts_with("error[E6001]: undefined variable 'x'\n"));
    }

    #[test]
    fn spanless_diagnostic_is_header_only() {
        let renderer = Renderer::new("", "<test>");
        let d = Diagnostic::bare(ErrorCode::E9002, "could not read 'm.zs'");
        let out = renderer.render(&d);
        assert_eq!(out, "error[E9002]: could not read 'm.zs'\n");
    }

    #[test]
    fn multi_error_summary() {
        let src = "@ @";
        let renderer = Renderer::new(src, "<test>");
        let batch = vec![
            Diagnostic::error(ErrorCode::E0002, "unexpected character '@'", Span::new(0, 1)),
            Diagnostic::error(ErrorCode::E0002, "unexpected character '@'", Span::new(2, 3)),
        ];
        let out = renderer.render_all(&batch);
        assert!(out.ends_with("2 errors emitted\n"));
    }

    #[test]
    fn caret_spans_whole_token() {
        let src = "count + 1;";
        let renderer = Renderer::new(src, "<test>");
        let d = Diagnostic::error(ErrorCode::E6001, "undefined variable 'count'", Span::new(0, 5));
        let out = renderer.render(&d);
        assert!(out.contains("| ^^^^^ undefined variable 'count'"));
    }
}
