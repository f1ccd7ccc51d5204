//! Responsible with converting a [Source] into a token stream

use crate::lexer::token_parsing::parse_token;
use plume_tokens::source::Source;
use plume_tokens::spanned::{LineCol, Span, Spanned};
use plume_tokens::token::{Token, TokenKind};
use plume_tokens::{Diagnostic, IntoDiagnostics};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, trace};

mod token_parsing;

/// Responsible with converting a [Source] into a token stream.
///
/// The lexer yields every token of the source in order, ending with a single
/// [TokenKind::Eof] token. An unrecognized character is yielded as an error, after which
/// lexing continues with the next character.
#[derive(Debug)]
pub struct Lexer<'a> {
    text: &'a str,
    source_id: Arc<str>,
    offset: usize,
    position: LineCol,
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer
    pub fn new(source: &'a Source) -> Self {
        Self {
            text: source.text(),
            source_id: source.shared_id(),
            offset: 0,
            position: LineCol::default(),
            finished: false,
        }
    }

    /// Moves past `consumed`, returning the span it covered
    fn advance(&mut self, consumed: &str) -> Span {
        let offset = self.offset;
        let start = self.position;
        for c in consumed.chars() {
            if c == '\n' {
                self.position.row += 1;
                self.position.col = 1;
            } else {
                self.position.col += 1;
            }
        }
        self.offset += consumed.len();
        Span::new(offset, consumed.len(), start, self.position)
    }

    fn next_token(&mut self) -> Option<LexResult<Token>> {
        if self.finished {
            return None;
        }
        let rest = &self.text[self.offset..];
        let Some(character) = rest.chars().next() else {
            self.finished = true;
            let span = Span::point(self.offset, self.position);
            return Some(Ok(Token::new(
                TokenKind::Eof,
                None,
                span,
                self.source_id.clone(),
            )));
        };
        match parse_token(rest) {
            Ok((_, (kind, text))) => {
                let span = self.advance(text);
                Some(Ok(Token::new(
                    kind,
                    text.to_string(),
                    span,
                    self.source_id.clone(),
                )))
            }
            Err(_) => {
                let span = self.advance(&rest[..character.len_utf8()]);
                Some(Err(LexingError { character, span }))
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = LexResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.next_token();
        trace!("lexed {next:?}");
        next
    }
}

type LexResult<T> = Result<T, LexingError>;

/// A character that starts no token
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Unrecognized character: '{character}'")]
pub struct LexingError {
    pub character: char,
    pub span: Span,
}

impl Spanned for LexingError {
    fn span(&self) -> Span {
        self.span
    }
}

impl IntoDiagnostics for LexingError {
    fn diagnostics(&self, source: &Source) -> Vec<Diagnostic> {
        vec![Diagnostic::new(self.to_string(), source, self.span)]
    }
}

/// Every lexing error of a source, never empty
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} unrecognized character(s), first {}", .0.len(), first_error(.0))]
pub struct LexErrors(Vec<LexingError>);

fn first_error(errors: &[LexingError]) -> String {
    errors
        .first()
        .map(|e| format!("{e} at {}", e.span.start()))
        .unwrap_or_default()
}

impl LexErrors {
    pub fn errors(&self) -> &[LexingError] {
        &self.0
    }

    pub fn into_errors(self) -> Vec<LexingError> {
        self.0
    }
}

impl IntoDiagnostics for LexErrors {
    fn diagnostics(&self, source: &Source) -> Vec<Diagnostic> {
        self.0.diagnostics(source)
    }
}

/// Lexes a whole source.
///
/// Returns the tokens, whitespace included and ending with [TokenKind::Eof], or every
/// unrecognized character if there were any.
///
/// Lexing does not stop at the first bad character. The whole source is scanned and the
/// error lists each one in source order, so a caller that only wants the first can take
/// `errors.errors()[0]`.
#[instrument(skip_all, fields(source = source.id()))]
pub fn lex(source: &Source) -> Result<Vec<Token>, LexErrors> {
    let (tokens, errors): (Vec<_>, Vec<_>) = Lexer::new(source).partition(Result::is_ok);
    let errors: Vec<LexingError> = errors.into_iter().filter_map(Result::err).collect();
    if !errors.is_empty() {
        debug!("lexing failed with {} error(s)", errors.len());
        return Err(LexErrors(errors));
    }
    let tokens: Vec<Token> = tokens.into_iter().filter_map(Result::ok).collect();
    debug!("lexed {} tokens", tokens.len());
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind()).collect()
    }

    #[test]
    fn test_lexer() {
        let source = Source::new("test", "imp main(): int { print(1); 1 }");
        let tokens = lex(&source).expect("should lex");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Imp,
                TokenKind::Whitespace,
                TokenKind::Identifier,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Colon,
                TokenKind::Whitespace,
                TokenKind::Identifier,
                TokenKind::Whitespace,
                TokenKind::LCurly,
                TokenKind::Whitespace,
                TokenKind::Identifier,
                TokenKind::LParen,
                TokenKind::Integer,
                TokenKind::RParen,
                TokenKind::SemiColon,
                TokenKind::Whitespace,
                TokenKind::Integer,
                TokenKind::Whitespace,
                TokenKind::RCurly,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[2].text(), Some("main"));
        assert_eq!(tokens[2].source_id(), "test");
    }

    #[test]
    fn test_eof_is_zero_width_at_end() {
        let source = Source::new("test", "ab\n");
        let tokens = lex(&source).expect("should lex");
        let eof = tokens.last().expect("always has eof");
        assert_eq!(eof.kind(), TokenKind::Eof);
        assert_eq!(eof.text(), None);
        assert_eq!(eof.span(), Span::point(3, LineCol::new(2, 1)));
    }

    #[test]
    fn test_empty_source() {
        let tokens = lex(&Source::new("test", "")).expect("should lex");
        assert_eq!(kinds(&tokens), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_newline_resets_column() {
        let source = Source::new("test", "fun\n  f");
        let tokens = lex(&source).expect("should lex");
        let f = &tokens[2];
        assert_eq!(f.text(), Some("f"));
        assert_eq!(f.span().start(), LineCol::new(2, 3));
        assert_eq!(f.span().end_position(), LineCol::new(2, 4));
        assert_eq!(f.span().offset(), 6);
        let whitespace = &tokens[1];
        assert_eq!(whitespace.span().start(), LineCol::new(1, 4));
        assert_eq!(whitespace.span().end_position(), LineCol::new(2, 3));
    }

    #[test]
    fn test_unrecognized_character() {
        let source = Source::new("test", "fun f(): int { 1 # 2 }");
        let errors = lex(&source).expect_err("# is not a token");
        assert_eq!(errors.errors().len(), 1);
        let error = &errors.errors()[0];
        assert_eq!(error.character, '#');
        assert_eq!(error.span.start_col(), 18);
        assert_eq!(error.span.end_col(), 19);
        assert_eq!(error.to_string(), "Unrecognized character: '#'");
    }

    #[test]
    fn test_all_unrecognized_characters_are_reported() {
        let source = Source::new("test", "1 # 2\n\t3 $");
        let errors = lex(&source).expect_err("should fail");
        let found = errors
            .errors()
            .iter()
            .map(|e| (e.character, e.span.start()))
            .collect::<Vec<_>>();
        assert_eq!(
            found,
            vec![
                ('#', LineCol::new(1, 3)),
                ('\t', LineCol::new(2, 1)),
                ('$', LineCol::new(2, 4)),
            ]
        );
    }

    #[test]
    fn test_multibyte_character_is_one_column() {
        let source = Source::new("test", "é1");
        let mut lexer = Lexer::new(&source);
        let error = lexer.next().expect("has item").expect_err("é is unrecognized");
        assert_eq!(error.span.len(), 2);
        assert_eq!(error.span.end_col(), 2);
        let one = lexer.next().expect("has item").expect("1 is an integer");
        assert_eq!(one.span().offset(), 2);
        assert_eq!(one.span().start_col(), 2);
    }
}
