//! A lexical token from a source, along with streams for said token

use crate::spanned::{Span, Spanned};
use std::collections::VecDeque;
use std::fmt::{Debug, Display, Formatter};
use std::iter;
use std::sync::Arc;

/// A lexical token from a source
#[derive(Clone)]
pub struct Token {
    kind: TokenKind,
    text: Option<String>,
    span: Span,
    source_id: Arc<str>,
}

impl Token {
    /// Creates a new token
    pub fn new(
        kind: TokenKind,
        text: impl Into<Option<String>>,
        span: Span,
        source_id: Arc<str>,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            source_id,
        }
    }

    /// Gets the kind for this token
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The exact source text of this token. Only the end-of-input token has none.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The id of the source this token was lexed from
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// A shared handle to the id of the source this token was lexed from
    pub fn shared_source_id(&self) -> Arc<str> {
        self.source_id.clone()
    }

    /// Whether this token carries no grammatical meaning
    #[inline]
    pub fn is_trivia(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }
}

impl Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.text {
            Some(text) if self.kind.has_payload() => write!(f, "{:?}({:?})", self.kind, text),
            _ => Debug::fmt(&self.kind, f),
        }
    }
}

impl Spanned for Token {
    fn span(&self) -> Span {
        self.span
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.text == other.text
    }
}

/// The kind for this token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Integer,
    /// EOF, will only appear at the end of a token sequence
    Eof,
    Plus,
    Minus,
    Star,
    Div,
    LParen,
    RParen,
    LCurly,
    RCurly,
    /// =
    Assign,
    SemiColon,
    Comma,
    /// :
    Colon,

    /// `imp`
    Imp,
    /// `fun`
    Fun,

    /// runs of spaces and newlines
    Whitespace,
}

impl TokenKind {
    /// Gets the punctuator kind for a character
    pub fn from_punctuation(c: char) -> Option<Self> {
        Some(match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Div,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LCurly,
            '}' => TokenKind::RCurly,
            '=' => TokenKind::Assign,
            ';' => TokenKind::SemiColon,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            _ => return None,
        })
    }

    /// Gets the keyword kind for a word
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "imp" => Some(TokenKind::Imp),
            "fun" => Some(TokenKind::Fun),
            _ => None,
        }
    }

    /// Whether the text of tokens of this kind varies
    fn has_payload(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier | TokenKind::Integer | TokenKind::Whitespace
        )
    }

    /// A human readable description, used when reporting errors
    pub fn description(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Integer => "integer",
            TokenKind::Eof => "end of input",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Div => "'/'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LCurly => "'{'",
            TokenKind::RCurly => "'}'",
            TokenKind::Assign => "'='",
            TokenKind::SemiColon => "';'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::Imp => "'imp'",
            TokenKind::Fun => "'fun'",
            TokenKind::Whitespace => "whitespace",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// A stream of tokens
pub struct TokenStream(VecDeque<Token>);

impl FromIterator<Token> for TokenStream {
    fn from_iter<T: IntoIterator<Item = Token>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_front()
    }
}

impl Default for TokenStream {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStream {
    #[inline]
    pub fn new() -> Self {
        TokenStream::from_iter(iter::empty())
    }
}

/// A trait to convert something to an iterator of tokens
pub trait ToTokens {
    /// Gets an iterator over tokens, in source order
    fn to_tokens(&self) -> TokenStream;

    /// Concatenates the text of every token.
    ///
    /// For trees that keep their trivia this reproduces the text they were parsed from.
    fn to_source(&self) -> String {
        self.to_tokens()
            .filter_map(|token| token.text)
            .collect()
    }
}

impl<T: ToTokens> Spanned for T {
    fn span(&self) -> Span {
        self.to_tokens()
            .filter(|token| !token.is_trivia())
            .map(|token| token.span())
            .reduce(|a, b| a.join(b))
            .unwrap_or_default()
    }
}

impl<T: ToTokens> ToTokens for Option<T> {
    fn to_tokens(&self) -> TokenStream {
        match self {
            None => TokenStream::new(),
            Some(s) => s.to_tokens(),
        }
    }
}

impl<T: ToTokens> ToTokens for Vec<T> {
    fn to_tokens(&self) -> TokenStream {
        self.iter().flat_map(|t| t.to_tokens()).collect()
    }
}

impl<T: ToTokens> ToTokens for Box<T> {
    fn to_tokens(&self) -> TokenStream {
        (**self).to_tokens()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spanned::LineCol;

    fn token(kind: TokenKind, text: &str, offset: usize) -> Token {
        Token::new(
            kind,
            text.to_string(),
            Span::new(
                offset,
                text.len(),
                LineCol::new(1, offset + 1),
                LineCol::new(1, offset + text.len() + 1),
            ),
            Arc::from("test"),
        )
    }

    #[test]
    fn test_create_token_stream() {
        let vec: Vec<Token> = vec![];
        let mut stream = TokenStream::from_iter(vec);
        assert!(stream.next().is_none())
    }

    #[test]
    fn test_keywords_and_punctuation() {
        assert_eq!(TokenKind::from_keyword("imp"), Some(TokenKind::Imp));
        assert_eq!(TokenKind::from_keyword("fun"), Some(TokenKind::Fun));
        assert_eq!(TokenKind::from_keyword("funny"), None);
        assert_eq!(TokenKind::from_punctuation(';'), Some(TokenKind::SemiColon));
        assert_eq!(TokenKind::from_punctuation('#'), None);
    }

    struct Tokens(Vec<Token>);

    impl ToTokens for Tokens {
        fn to_tokens(&self) -> TokenStream {
            self.0.iter().cloned().collect()
        }
    }

    #[test]
    fn test_to_source_keeps_trivia_but_span_skips_it() {
        let tokens = Tokens(vec![
            token(TokenKind::Whitespace, "  ", 0),
            token(TokenKind::Identifier, "foo", 2),
            token(TokenKind::Plus, "+", 5),
        ]);
        assert_eq!(tokens.to_source(), "  foo+");
        let span = tokens.span();
        assert_eq!(span.offset(), 2);
        assert_eq!(span.len(), 4);
    }

    #[test]
    fn test_token_debug() {
        assert_eq!(
            format!("{:?}", token(TokenKind::Identifier, "foo", 0)),
            "Identifier(\"foo\")"
        );
        assert_eq!(format!("{:?}", token(TokenKind::Plus, "+", 0)), "Plus");
    }
}
