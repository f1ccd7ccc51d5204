//! In-memory source units

use crate::spanned::{LineCol, Span};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A named unit of source text.
///
/// Cloning a source is cheap, both the id and the text are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct Source {
    id: Arc<str>,
    text: Arc<str>,
}

impl Source {
    /// Creates a new source
    pub fn new(id: impl AsRef<str>, text: impl AsRef<str>) -> Self {
        Self {
            id: Arc::from(id.as_ref()),
            text: Arc::from(text.as_ref()),
        }
    }

    /// The id of this source, usually a file name or `<stdin>`
    pub fn id(&self) -> &str {
        &self.id
    }

    /// A shared handle to the id, used by tokens
    pub fn shared_id(&self) -> Arc<str> {
        self.id.clone()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Gets the full line containing the byte at `offset`, without its newline.
    ///
    /// Scans left and right from the offset to the nearest newline or buffer boundary. An
    /// offset past the end of the buffer refers to the last line.
    pub fn line_at(&self, offset: usize) -> &str {
        let text = self.text();
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let start = text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let end = text[offset..]
            .find('\n')
            .map(|i| offset + i)
            .unwrap_or(text.len());
        &text[start..end]
    }

    /// A zero-width span just past the last character of the source
    pub fn end_span(&self) -> Span {
        let text = self.text();
        let row = 1 + text.matches('\n').count();
        let last_line = text.rsplit('\n').next().unwrap_or_default();
        Span::point(text.len(), LineCol::new(row, last_line.chars().count() + 1))
    }

    /// Gets the exact text covered by a span, if the span lies within this source
    pub fn slice(&self, span: Span) -> Option<&str> {
        self.text.get(span.offset()..span.offset() + span.len())
    }
}

impl Debug for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("id", &self.id)
            .field("len", &self.text.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_at_middle() {
        let source = Source::new("test", "fun f(): int {\n  1\n}");
        assert_eq!(source.line_at(17), "  1");
        assert_eq!(source.line_at(0), "fun f(): int {");
        assert_eq!(source.line_at(19), "}");
    }

    #[test]
    fn test_line_at_newline_belongs_to_preceding_line() {
        let source = Source::new("test", "ab\ncd");
        assert_eq!(source.line_at(2), "ab");
    }

    #[test]
    fn test_line_at_end_of_buffer() {
        let source = Source::new("test", "ab\ncd");
        assert_eq!(source.line_at(5), "cd");
        assert_eq!(source.line_at(100), "cd");
        assert_eq!(Source::new("empty", "").line_at(0), "");
    }

    #[test]
    fn test_end_span() {
        let span = Source::new("test", "ab\ncde").end_span();
        assert_eq!(span.offset(), 6);
        assert!(span.is_empty());
        assert_eq!(span.start(), LineCol::new(2, 4));
        assert_eq!(Source::new("test", "").end_span().start(), LineCol::new(1, 1));
    }

    #[test]
    fn test_slice() {
        let source = Source::new("test", "imp main");
        let span = Span::new(4, 4, LineCol::new(1, 5), LineCol::new(1, 9));
        assert_eq!(source.slice(span), Some("main"));
    }
}
