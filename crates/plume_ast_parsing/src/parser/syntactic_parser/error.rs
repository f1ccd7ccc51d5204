use crate::parser::syntax_tree::SyntaxKind;
use itertools::Itertools;
use plume_tokens::source::Source;
use plume_tokens::spanned::{Span, Spanned};
use plume_tokens::token::{Token, TokenKind};
use plume_tokens::{Diagnostic, IntoDiagnostics};
use std::fmt::{Display, Formatter, Write as _};

/// Represents an error occurring during parsing.
///
/// The parser does not recover, so there is at most one of these per parse.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    /// Every token kind that would have been accepted
    pub expected: Vec<TokenKind>,
    pub found: Token,
    /// The grammar rules being parsed when the error occurred, outermost first
    pub non_terminals: Vec<SyntaxKind>,
    /// Set to the limit when parsing stopped because rules were nested too deeply
    pub depth_limit: Option<usize>,
}

impl SyntaxError {
    pub fn new(
        expected: impl IntoIterator<Item = TokenKind>,
        found: Token,
        non_terminals: Vec<SyntaxKind>,
    ) -> Self {
        Self {
            expected: expected.into_iter().collect(),
            found,
            non_terminals,
            depth_limit: None,
        }
    }

    /// The error for input nested deeper than `limit` grammar rules
    pub fn too_deep(limit: usize, found: Token, non_terminals: Vec<SyntaxKind>) -> Self {
        Self {
            expected: vec![],
            found,
            non_terminals,
            depth_limit: Some(limit),
        }
    }

    /// Renders the rules being parsed at the time of the error, one per line
    pub fn non_terminal_stack(&self) -> String {
        let mut buffer = String::from("non terminal stack:");
        for (idx, non_terminal) in self.non_terminals.iter().enumerate() {
            let _ = write!(buffer, "\n  {idx}: {non_terminal}");
        }
        buffer
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.depth_limit {
            Some(limit) => write!(
                f,
                "expression nested more than {limit} rules deep at {}",
                self.found.kind()
            ),
            None => write!(
                f,
                "expected {}, found {}",
                join_kinds(&self.expected),
                self.found.kind()
            ),
        }
    }
}

impl std::error::Error for SyntaxError {}

impl Spanned for SyntaxError {
    fn span(&self) -> Span {
        self.found.span()
    }
}

impl IntoDiagnostics for SyntaxError {
    fn diagnostics(&self, source: &Source) -> Vec<Diagnostic> {
        vec![Diagnostic::new(self.to_string(), source, self.span())]
    }
}

/// Joins token kinds as `a`, `a or b`, or `a, b, or c`
pub fn join_kinds(kinds: &[TokenKind]) -> String {
    match kinds {
        [] => String::new(),
        [only] => only.to_string(),
        [first, second] => format!("{first} or {second}"),
        [init @ .., last] => {
            format!("{}, or {last}", init.iter().join(", "))
        }
    }
}

pub type Result<T = ()> = std::result::Result<T, SyntaxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_kinds() {
        assert_eq!(join_kinds(&[TokenKind::Colon]), "':'");
        assert_eq!(
            join_kinds(&[TokenKind::Integer, TokenKind::Identifier]),
            "integer or identifier"
        );
        assert_eq!(
            join_kinds(&[TokenKind::Plus, TokenKind::Minus, TokenKind::RCurly]),
            "'+', '-', or '}'"
        );
    }
}
