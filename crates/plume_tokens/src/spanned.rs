//! A trait that can provide the [Span] of the complete context of a tree node

use std::fmt::{Display, Formatter};

/// A trait that can provide the [Span] of the complete context of a tree node
///
/// This is automatically implemented for all types that implement [ToTokens](crate::token::ToTokens).
pub trait Spanned {
    fn span(&self) -> Span;
}

/// A 1-based row and column within a source
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct LineCol {
    pub row: usize,
    pub col: usize,
}

impl LineCol {
    /// Creates a new line/column pair
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl Default for LineCol {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl Display for LineCol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

/// The span, representing a region of a source.
///
/// `offset` is a 0-based byte offset into the source buffer, while the start and end
/// positions are 1-based rows and columns. The end position is exclusive.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Span {
    offset: usize,
    len: usize,
    start: LineCol,
    end: LineCol,
}

impl Span {
    /// Creates a new span
    pub const fn new(offset: usize, len: usize, start: LineCol, end: LineCol) -> Self {
        Self {
            offset,
            len,
            start,
            end,
        }
    }

    /// Creates a zero-width span at a position
    pub const fn point(offset: usize, at: LineCol) -> Self {
        Self::new(offset, 0, at, at)
    }

    /// Gets a span directly after this span
    pub const fn end(&self) -> Self {
        Self::point(self.offset + self.len, self.end)
    }

    /// Creates a span that encompasses both
    pub fn join(&self, other: Self) -> Self {
        let (first, second) = if self.offset <= other.offset {
            (*self, other)
        } else {
            (other, *self)
        };
        let end_offset = (first.offset + first.len).max(second.offset + second.len);
        let end = if second.offset + second.len >= first.offset + first.len {
            second.end
        } else {
            first.end
        };
        Self {
            offset: first.offset,
            len: end_offset - first.offset,
            start: first.start,
            end,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn start(&self) -> LineCol {
        self.start
    }

    pub fn end_position(&self) -> LineCol {
        self.end
    }

    pub fn start_row(&self) -> usize {
        self.start.row
    }

    pub fn start_col(&self) -> usize {
        self.start.col
    }

    pub fn end_row(&self) -> usize {
        self.end.row
    }

    pub fn end_col(&self) -> usize {
        self.end.col
    }
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.start, self.end)
    }
}
