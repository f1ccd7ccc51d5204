//! Expressions

use crate::id::NodeId;
use crate::punctuated::Punctuated;
use crate::token::AstToken;
use derive_more::Display;
use plume_tokens::token::{ToTokens, TokenKind, TokenStream};

/// An expression
///
/// Nested expressions and calls are boxed so that the enum stays small when trees are
/// walked recursively.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Expression(Box<Expression>),
    Statement(Statement),
    Binary(BinaryOperation),
    Integer(IntegerLiteral),
    Identifier(Identifier),
    Call(Box<FunctionCall>),
}

impl Expr {
    /// The id of this node
    pub fn id(&self) -> NodeId {
        match self {
            Expr::Expression(e) => e.id,
            Expr::Statement(e) => e.id,
            Expr::Binary(e) => e.id,
            Expr::Integer(e) => e.id,
            Expr::Identifier(e) => e.id,
            Expr::Call(e) => e.id,
        }
    }

    pub fn is_statement(&self) -> bool {
        matches!(self, Expr::Statement(_))
    }
}

impl ToTokens for Expr {
    fn to_tokens(&self) -> TokenStream {
        match self {
            Expr::Expression(e) => e.to_tokens(),
            Expr::Statement(e) => e.to_tokens(),
            Expr::Binary(e) => e.to_tokens(),
            Expr::Integer(e) => e.to_tokens(),
            Expr::Identifier(e) => e.to_tokens(),
            Expr::Call(e) => e.to_tokens(),
        }
    }
}

/// A sequence of expressions, either delimited by curly braces or a single bare term.
///
/// A bare term has neither `open` nor `close` and exactly one child.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub id: NodeId,
    pub open: Option<AstToken>,
    pub children: Vec<Expr>,
    pub close: Option<AstToken>,
}

impl Expression {
    /// Whether this expression was written as a `{ ... }` block
    pub fn is_block(&self) -> bool {
        self.open.is_some()
    }
}

impl ToTokens for Expression {
    fn to_tokens(&self) -> TokenStream {
        self.open
            .to_tokens()
            .chain(self.children.to_tokens())
            .chain(self.close.to_tokens())
            .collect()
    }
}

/// An expression terminated by a `;`, discarding its value
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub id: NodeId,
    pub child: Box<Expr>,
    pub semi: AstToken,
}

impl ToTokens for Statement {
    fn to_tokens(&self) -> TokenStream {
        self.child.to_tokens().chain(self.semi.to_tokens()).collect()
    }
}

/// An arithmetic operator
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinaryOperator {
    #[display(fmt = "+")]
    Add,
    #[display(fmt = "-")]
    Sub,
    #[display(fmt = "*")]
    Mult,
    #[display(fmt = "/")]
    Div,
}

impl BinaryOperator {
    /// Gets the operator a token kind stands for
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(Self::Add),
            TokenKind::Minus => Some(Self::Sub),
            TokenKind::Star => Some(Self::Mult),
            TokenKind::Div => Some(Self::Div),
            _ => None,
        }
    }
}

/// A binary operation
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperation {
    pub id: NodeId,
    pub left: Box<Expr>,
    pub op: BinaryOperator,
    pub op_token: AstToken,
    pub right: Box<Expr>,
}

impl ToTokens for BinaryOperation {
    fn to_tokens(&self) -> TokenStream {
        self.left
            .to_tokens()
            .chain(self.op_token.to_tokens())
            .chain(self.right.to_tokens())
            .collect()
    }
}

/// An integer literal, kept as written
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerLiteral {
    pub id: NodeId,
    pub value: String,
    pub token: AstToken,
}

impl ToTokens for IntegerLiteral {
    fn to_tokens(&self) -> TokenStream {
        self.token.to_tokens()
    }
}

/// A reference to a symbol by name
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub id: NodeId,
    pub name: String,
    pub token: AstToken,
}

impl ToTokens for Identifier {
    fn to_tokens(&self) -> TokenStream {
        self.token.to_tokens()
    }
}

/// Calls a function by name
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub id: NodeId,
    pub name: AstToken,
    pub arguments: ArgList,
}

impl FunctionCall {
    /// The name of the called function
    pub fn name(&self) -> &str {
        self.name.text()
    }
}

impl ToTokens for FunctionCall {
    fn to_tokens(&self) -> TokenStream {
        self.name.to_tokens().chain(self.arguments.to_tokens()).collect()
    }
}

/// The parenthesized arguments of a call
#[derive(Debug, Clone, PartialEq)]
pub struct ArgList {
    pub lparen: AstToken,
    pub args: Punctuated<Expression>,
    pub rparen: AstToken,
}

impl ToTokens for ArgList {
    fn to_tokens(&self) -> TokenStream {
        self.lparen
            .to_tokens()
            .chain(self.args.to_tokens())
            .chain(self.rparen.to_tokens())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_from_token_kind() {
        assert_eq!(
            BinaryOperator::from_token_kind(TokenKind::Star),
            Some(BinaryOperator::Mult)
        );
        assert_eq!(BinaryOperator::from_token_kind(TokenKind::Comma), None);
        assert_eq!(BinaryOperator::Div.to_string(), "/");
    }
}
