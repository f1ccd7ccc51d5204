//! The root of the AST

use crate::items::FunctionDecl;
use crate::token::AstToken;
use plume_tokens::token::{ToTokens, TokenStream};

/// Every function declared in one source, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub functions: Vec<FunctionDecl>,
    pub eof: AstToken,
}

impl ToTokens for Program {
    fn to_tokens(&self) -> TokenStream {
        self.functions
            .to_tokens()
            .chain(self.eof.to_tokens())
            .collect()
    }
}
