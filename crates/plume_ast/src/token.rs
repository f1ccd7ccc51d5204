//! References from the AST back to the tokens it was lowered from

use plume_tokens::token::{ToTokens, Token, TokenKind, TokenStream};

/// A significant token, together with the whitespace that preceded it.
///
/// The leading trivia is only kept so the source can be rebuilt, it has no meaning.
#[derive(Debug, Clone, PartialEq)]
pub struct AstToken {
    pub token: Token,
    pub leading: Vec<Token>,
}

impl AstToken {
    pub fn new(token: Token, leading: Vec<Token>) -> Self {
        Self { token, leading }
    }

    pub fn kind(&self) -> TokenKind {
        self.token.kind()
    }

    /// The text of the significant token, empty for end of input
    pub fn text(&self) -> &str {
        self.token.text().unwrap_or_default()
    }
}

impl ToTokens for AstToken {
    fn to_tokens(&self) -> TokenStream {
        self.leading
            .iter()
            .cloned()
            .chain([self.token.clone()])
            .collect()
    }
}
