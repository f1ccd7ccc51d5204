#![doc = include_str!("../README.md")]

use crate::source::Source;
use crate::spanned::{Span, Spanned};
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

pub mod source;
pub mod spanned;
pub mod token;

/// An error with a location
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedError<E> {
    error: E,
    location: Span,
}

impl<E> SpannedError<E> {
    pub fn new(error: E, location: Span) -> Self {
        Self { error, location }
    }

    /// The error without its location
    pub fn error(&self) -> &E {
        &self.error
    }

    pub fn into_error(self) -> E {
        self.error
    }
}

impl<E> Spanned for SpannedError<E> {
    fn span(&self) -> Span {
        self.location
    }
}

impl<E: Display> Display for SpannedError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.error, self.location.start())
    }
}

impl<E: Debug + Display> std::error::Error for SpannedError<E> {}

impl<E: Display> IntoDiagnostics for SpannedError<E> {
    fn diagnostics(&self, source: &Source) -> Vec<Diagnostic> {
        vec![Diagnostic::new(self.error.to_string(), source, self.location)]
    }
}

/// A located message ready to be shown to a user.
///
/// `line_text` is the full line containing the start of `span`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub source_id: Arc<str>,
    pub line_text: String,
    pub span: Span,
}

impl Diagnostic {
    /// Creates a diagnostic, extracting the line of the span from the source
    pub fn new(message: impl Into<String>, source: &Source, span: Span) -> Self {
        Self {
            message: message.into(),
            source_id: source.shared_id(),
            line_text: source.line_at(span.offset()).to_string(),
            span,
        }
    }

    /// The number of columns the underline of this diagnostic covers on its line
    pub fn underline_width(&self) -> usize {
        if self.span.start_row() == self.span.end_row() {
            self.span.end_col().saturating_sub(self.span.start_col())
        } else {
            self.line_text
                .chars()
                .count()
                .saturating_sub(self.span.start_col() - 1)
                .max(1)
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "error: {}", self.message)?;
        writeln!(
            f,
            "  -> {}:{}:{}",
            self.source_id,
            self.span.start_row(),
            self.span.start_col()
        )?;
        let row = self.span.start_row();
        let width = row.to_string().len();
        writeln!(f, "{:width$} |", "")?;
        writeln!(f, "{row:width$} | {}", self.line_text.trim_end())?;
        let col = self.span.start_col() - 1;
        match self.underline_width() {
            0 => write!(f, "{:width$} | {}^", "", "-".repeat(col)),
            len => write!(f, "{:width$} | {}{}", "", " ".repeat(col), "~".repeat(len)),
        }
    }
}

/// Something that can be reported against a source as one or more diagnostics
pub trait IntoDiagnostics {
    fn diagnostics(&self, source: &Source) -> Vec<Diagnostic>;
}

impl<T: IntoDiagnostics> IntoDiagnostics for Vec<T> {
    fn diagnostics(&self, source: &Source) -> Vec<Diagnostic> {
        self.iter().flat_map(|t| t.diagnostics(source)).collect()
    }
}
