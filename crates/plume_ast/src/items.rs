//! Function declarations and their signatures

use crate::expr::Expression;
use crate::token::AstToken;
use plume_tokens::token::{ToTokens, TokenKind, TokenStream};
use std::fmt::{Display, Formatter};

/// Whether a function may have side effects
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Purity {
    Pure,
    Impure,
}

impl Display for Purity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Purity::Pure => f.write_str("fun"),
            Purity::Impure => f.write_str("imp"),
        }
    }
}

/// A function declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub purity: Option<AstToken>,
    pub name: AstToken,
    pub parameters: ParamList,
    pub return_type: TypeSpec,
    pub body: Expression,
}

impl FunctionDecl {
    pub fn name(&self) -> &str {
        self.name.text()
    }

    /// Functions are pure unless declared with `imp`
    pub fn purity(&self) -> Purity {
        match &self.purity {
            Some(token) if token.kind() == TokenKind::Imp => Purity::Impure,
            _ => Purity::Pure,
        }
    }
}

impl ToTokens for FunctionDecl {
    fn to_tokens(&self) -> TokenStream {
        self.purity
            .to_tokens()
            .chain(self.name.to_tokens())
            .chain(self.parameters.to_tokens())
            .chain(self.return_type.to_tokens())
            .chain(self.body.to_tokens())
            .collect()
    }
}

/// The declared parameters of a function
#[derive(Debug, Clone, PartialEq)]
pub struct ParamList {
    pub lparen: AstToken,
    pub params: Vec<Param>,
    pub rparen: AstToken,
}

impl ToTokens for ParamList {
    fn to_tokens(&self) -> TokenStream {
        self.lparen
            .to_tokens()
            .chain(self.params.to_tokens())
            .chain(self.rparen.to_tokens())
            .collect()
    }
}

/// A single parameter, `name: type`
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: AstToken,
    pub ty: TypeSpec,
    pub comma: Option<AstToken>,
}

impl Param {
    pub fn name(&self) -> &str {
        self.name.text()
    }
}

impl ToTokens for Param {
    fn to_tokens(&self) -> TokenStream {
        self.name
            .to_tokens()
            .chain(self.ty.to_tokens())
            .chain(self.comma.to_tokens())
            .collect()
    }
}

/// A type annotation, `: name`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub colon: AstToken,
    pub name: AstToken,
}

impl TypeSpec {
    /// The name of the referenced type
    pub fn type_name(&self) -> &str {
        self.name.text()
    }
}

impl ToTokens for TypeSpec {
    fn to_tokens(&self) -> TokenStream {
        self.colon.to_tokens().chain(self.name.to_tokens()).collect()
    }
}

impl Display for TypeSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}
