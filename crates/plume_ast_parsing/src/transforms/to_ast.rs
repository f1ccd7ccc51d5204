use crate::parser::syntax_tree::{SyntaxKind, SyntaxNode, TokenLeaf};
use plume_ast::expr::{
    ArgList, BinaryOperation, BinaryOperator, Expr, Expression, FunctionCall, Identifier,
    IntegerLiteral, Statement,
};
use plume_ast::id::NodeIdGenerator;
use plume_ast::items::{FunctionDecl, Param, ParamList, TypeSpec};
use plume_ast::program::Program;
use plume_ast::punctuated::Punctuated;
use plume_ast::token::AstToken;
use plume_tokens::token::TokenKind;
use std::iter::Peekable;
use std::vec;
use thiserror::Error;
use tracing::trace;

/// The syntax tree did not have the shape the parser produces
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoweringError {
    #[error("expected {expected}, found {found} node")]
    UnexpectedNode {
        expected: &'static str,
        found: SyntaxKind,
    },
    #[error("expected {expected} token, found {found}")]
    UnexpectedToken { expected: TokenKind, found: TokenKind },
    #[error("{0} is not a binary operator")]
    NotAnOperator(TokenKind),
    #[error("{0} node ended early")]
    MissingChild(SyntaxKind),
    #[error("{0} node has unexpected trailing children")]
    TrailingChildren(SyntaxKind),
}

type Result<T> = std::result::Result<T, LoweringError>;

/// Walks the children of one node front to back
struct Children {
    parent: SyntaxKind,
    nodes: Peekable<vec::IntoIter<SyntaxNode>>,
}

impl Children {
    fn of(node: SyntaxNode) -> Self {
        Self {
            parent: node.kind(),
            nodes: node.into_children().into_iter().peekable(),
        }
    }

    fn next(&mut self) -> Result<SyntaxNode> {
        self.nodes
            .next()
            .ok_or(LoweringError::MissingChild(self.parent))
    }

    fn peek_kind(&mut self) -> Option<SyntaxKind> {
        self.nodes.peek().map(SyntaxNode::kind)
    }

    fn peek_token_kind(&mut self) -> Option<TokenKind> {
        match self.nodes.peek() {
            Some(SyntaxNode::Token(leaf)) => Some(leaf.token.kind()),
            _ => None,
        }
    }

    /// Takes the next child, which must be a token leaf of any kind
    fn any_token(&mut self) -> Result<AstToken> {
        match self.next()? {
            SyntaxNode::Token(leaf) => ast_token(leaf),
            other => Err(LoweringError::UnexpectedNode {
                expected: "token",
                found: other.kind(),
            }),
        }
    }

    /// Takes the next child, which must be a token leaf of `kind`
    fn token(&mut self, kind: TokenKind) -> Result<AstToken> {
        let token = self.any_token()?;
        if token.kind() == kind {
            Ok(token)
        } else {
            Err(LoweringError::UnexpectedToken {
                expected: kind,
                found: token.kind(),
            })
        }
    }

    /// Takes the next child only if it is a token leaf of `kind`
    fn token_if(&mut self, kind: TokenKind) -> Result<Option<AstToken>> {
        if self.peek_token_kind() == Some(kind) {
            self.token(kind).map(Some)
        } else {
            Ok(None)
        }
    }

    fn is_empty(&mut self) -> bool {
        self.nodes.peek().is_none()
    }

    /// Ensures every child was used
    fn finish(mut self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(LoweringError::TrailingChildren(self.parent))
        }
    }
}

/// Converts a token leaf, keeping its leading whitespace as trivia
fn ast_token(leaf: TokenLeaf) -> Result<AstToken> {
    let leading = leaf
        .leading
        .into_iter()
        .map(|node| match node {
            SyntaxNode::Whitespace(token) => Ok(token),
            other => Err(LoweringError::UnexpectedNode {
                expected: "whitespace",
                found: other.kind(),
            }),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(AstToken::new(leaf.token, leading))
}

fn unexpected<T>(expected: &'static str, node: &SyntaxNode) -> Result<T> {
    Err(LoweringError::UnexpectedNode {
        expected,
        found: node.kind(),
    })
}

/// Lowers one syntax tree, numbering expression nodes as they are completed
#[derive(Debug, Default)]
pub struct ToAst {
    ids: NodeIdGenerator,
}

impl ToAst {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of expression nodes created so far
    pub fn node_count(&self) -> usize {
        self.ids.count()
    }

    pub fn program(&mut self, node: SyntaxNode) -> Result<Program> {
        if node.kind() != SyntaxKind::Program {
            return unexpected("program", &node);
        }
        let mut children = Children::of(node);
        let mut functions = vec![];
        while !matches!(children.peek_kind(), Some(SyntaxKind::Token) | None) {
            functions.push(self.function(children.next()?)?);
        }
        let eof = children.token(TokenKind::Eof)?;
        children.finish()?;
        Ok(Program { functions, eof })
    }

    fn function(&mut self, node: SyntaxNode) -> Result<FunctionDecl> {
        if !matches!(
            node.kind(),
            SyntaxKind::PureFunction | SyntaxKind::ImpureFunction
        ) {
            return unexpected("function", &node);
        }
        let mut children = Children::of(node);
        let purity = match children.peek_token_kind() {
            Some(kind @ (TokenKind::Fun | TokenKind::Imp)) => Some(children.token(kind)?),
            _ => None,
        };
        let name = children.token(TokenKind::Identifier)?;
        let parameters = self.param_list(children.next()?)?;
        let return_type = TypeSpec {
            colon: children.token(TokenKind::Colon)?,
            name: children.token(TokenKind::Identifier)?,
        };
        let body = self.expression(children.next()?)?;
        children.finish()?;
        trace!("lowered function {}", name.text());
        Ok(FunctionDecl {
            purity,
            name,
            parameters,
            return_type,
            body,
        })
    }

    fn param_list(&mut self, node: SyntaxNode) -> Result<ParamList> {
        if node.kind() != SyntaxKind::ParamList {
            return unexpected("parameter list", &node);
        }
        let mut children = Children::of(node);
        let lparen = children.token(TokenKind::LParen)?;
        let mut params = vec![];
        while children.peek_token_kind() == Some(TokenKind::Identifier) {
            let name = children.token(TokenKind::Identifier)?;
            let ty = TypeSpec {
                colon: children.token(TokenKind::Colon)?,
                name: children.token(TokenKind::Identifier)?,
            };
            let comma = children.token_if(TokenKind::Comma)?;
            params.push(Param { name, ty, comma });
        }
        let rparen = children.token(TokenKind::RParen)?;
        children.finish()?;
        Ok(ParamList {
            lparen,
            params,
            rparen,
        })
    }

    /// Lowers a block or blockless expression node
    fn expression(&mut self, node: SyntaxNode) -> Result<Expression> {
        match node.kind() {
            SyntaxKind::BlockExpression => {
                let mut children = Children::of(node);
                let open = children.token(TokenKind::LCurly)?;
                let mut exprs = vec![];
                while !matches!(children.peek_kind(), Some(SyntaxKind::Token) | None) {
                    exprs.push(self.expr(children.next()?)?);
                }
                let close = children.token(TokenKind::RCurly)?;
                children.finish()?;
                Ok(Expression {
                    id: self.ids.next_id(),
                    open: Some(open),
                    children: exprs,
                    close: Some(close),
                })
            }
            SyntaxKind::BlocklessExpression => {
                let mut children = Children::of(node);
                let child = self.expr(children.next()?)?;
                children.finish()?;
                Ok(Expression {
                    id: self.ids.next_id(),
                    open: None,
                    children: vec![child],
                    close: None,
                })
            }
            _ => unexpected("expression", &node),
        }
    }

    fn expr(&mut self, node: SyntaxNode) -> Result<Expr> {
        match node.kind() {
            SyntaxKind::BlockExpression | SyntaxKind::BlocklessExpression => {
                self.expression(node).map(|e| Expr::Expression(Box::new(e)))
            }
            SyntaxKind::Statement => {
                let mut children = Children::of(node);
                let child = self.expr(children.next()?)?;
                let semi = children.token(TokenKind::SemiColon)?;
                children.finish()?;
                Ok(Expr::Statement(Statement {
                    id: self.ids.next_id(),
                    child: Box::new(child),
                    semi,
                }))
            }
            SyntaxKind::Term | SyntaxKind::Factor => self.chain(node),
            SyntaxKind::Element => self.element(node),
            SyntaxKind::FunctionCall => {
                let mut children = Children::of(node);
                let name = children.token(TokenKind::Identifier)?;
                let arguments = self.arg_list(children.next()?)?;
                children.finish()?;
                Ok(Expr::Call(Box::new(FunctionCall {
                    id: self.ids.next_id(),
                    name,
                    arguments,
                })))
            }
            SyntaxKind::Program
            | SyntaxKind::PureFunction
            | SyntaxKind::ImpureFunction
            | SyntaxKind::ParamList
            | SyntaxKind::ArgumentList
            | SyntaxKind::Token
            | SyntaxKind::Whitespace => unexpected("expression", &node),
        }
    }

    /// Folds an operator chain `a op b op c` into `(a op b) op c`
    fn chain(&mut self, node: SyntaxNode) -> Result<Expr> {
        let mut children = Children::of(node);
        let mut left = self.expr(children.next()?)?;
        while !children.is_empty() {
            let op_token = children.any_token()?;
            let op = BinaryOperator::from_token_kind(op_token.kind())
                .ok_or(LoweringError::NotAnOperator(op_token.kind()))?;
            let right = self.expr(children.next()?)?;
            left = Expr::Binary(BinaryOperation {
                id: self.ids.next_id(),
                left: Box::new(left),
                op,
                op_token,
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    fn element(&mut self, node: SyntaxNode) -> Result<Expr> {
        let mut children = Children::of(node);
        let token = children.any_token()?;
        children.finish()?;
        let text = token.text().to_string();
        match token.kind() {
            TokenKind::Integer => Ok(Expr::Integer(IntegerLiteral {
                id: self.ids.next_id(),
                value: text,
                token,
            })),
            TokenKind::Identifier => Ok(Expr::Identifier(Identifier {
                id: self.ids.next_id(),
                name: text,
                token,
            })),
            found => Err(LoweringError::UnexpectedToken {
                expected: TokenKind::Identifier,
                found,
            }),
        }
    }

    fn arg_list(&mut self, node: SyntaxNode) -> Result<ArgList> {
        if node.kind() != SyntaxKind::ArgumentList {
            return unexpected("argument list", &node);
        }
        let mut children = Children::of(node);
        let lparen = children.token(TokenKind::LParen)?;
        let mut args = Punctuated::new();
        while !matches!(children.peek_kind(), Some(SyntaxKind::Token) | None) {
            let arg = self.expression(children.next()?)?;
            let comma = children.token_if(TokenKind::Comma)?;
            args.push(arg, comma);
        }
        let rparen = children.token(TokenKind::RParen)?;
        children.finish()?;
        Ok(ArgList {
            lparen,
            args,
            rparen,
        })
    }
}
