//! The concrete syntax tree

use plume_ast::printer::TreePrinter;
use plume_tokens::token::{ToTokens, Token, TokenStream};
use std::fmt::{Display, Formatter};

/// The kind of a [SyntaxNode], also used to name grammar rules
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SyntaxKind {
    Program,
    BlockExpression,
    BlocklessExpression,
    Statement,
    PureFunction,
    ImpureFunction,
    ParamList,
    ArgumentList,
    FunctionCall,
    Term,
    Factor,
    Element,
    Token,
    Whitespace,
}

impl Display for SyntaxKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A significant token, along with the whitespace leaves directly before it
#[derive(Debug, Clone, PartialEq)]
pub struct TokenLeaf {
    pub leading: Vec<SyntaxNode>,
    pub token: Token,
}

/// A node of the concrete syntax tree.
///
/// Every inner node owns its children in source order. Whitespace only ever appears in the
/// `leading` list of the next [TokenLeaf], so concatenating every leaf of a tree in order
/// yields the exact text it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxNode {
    Program(Vec<SyntaxNode>),
    BlockExpression(Vec<SyntaxNode>),
    BlocklessExpression(Vec<SyntaxNode>),
    Statement(Vec<SyntaxNode>),
    PureFunction(Vec<SyntaxNode>),
    ImpureFunction(Vec<SyntaxNode>),
    ParamList(Vec<SyntaxNode>),
    ArgumentList(Vec<SyntaxNode>),
    FunctionCall(Vec<SyntaxNode>),
    Term(Vec<SyntaxNode>),
    Factor(Vec<SyntaxNode>),
    Element(Vec<SyntaxNode>),
    Token(TokenLeaf),
    Whitespace(Token),
}

impl SyntaxNode {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            SyntaxNode::Program(_) => SyntaxKind::Program,
            SyntaxNode::BlockExpression(_) => SyntaxKind::BlockExpression,
            SyntaxNode::BlocklessExpression(_) => SyntaxKind::BlocklessExpression,
            SyntaxNode::Statement(_) => SyntaxKind::Statement,
            SyntaxNode::PureFunction(_) => SyntaxKind::PureFunction,
            SyntaxNode::ImpureFunction(_) => SyntaxKind::ImpureFunction,
            SyntaxNode::ParamList(_) => SyntaxKind::ParamList,
            SyntaxNode::ArgumentList(_) => SyntaxKind::ArgumentList,
            SyntaxNode::FunctionCall(_) => SyntaxKind::FunctionCall,
            SyntaxNode::Term(_) => SyntaxKind::Term,
            SyntaxNode::Factor(_) => SyntaxKind::Factor,
            SyntaxNode::Element(_) => SyntaxKind::Element,
            SyntaxNode::Token(_) => SyntaxKind::Token,
            SyntaxNode::Whitespace(_) => SyntaxKind::Whitespace,
        }
    }

    /// The children of this node. The children of a token leaf are its leading whitespace.
    pub fn children(&self) -> &[SyntaxNode] {
        match self {
            SyntaxNode::Program(children)
            | SyntaxNode::BlockExpression(children)
            | SyntaxNode::BlocklessExpression(children)
            | SyntaxNode::Statement(children)
            | SyntaxNode::PureFunction(children)
            | SyntaxNode::ImpureFunction(children)
            | SyntaxNode::ParamList(children)
            | SyntaxNode::ArgumentList(children)
            | SyntaxNode::FunctionCall(children)
            | SyntaxNode::Term(children)
            | SyntaxNode::Factor(children)
            | SyntaxNode::Element(children) => children,
            SyntaxNode::Token(leaf) => &leaf.leading,
            SyntaxNode::Whitespace(_) => &[],
        }
    }

    /// Takes the children out of this node
    pub fn into_children(self) -> Vec<SyntaxNode> {
        match self {
            SyntaxNode::Program(children)
            | SyntaxNode::BlockExpression(children)
            | SyntaxNode::BlocklessExpression(children)
            | SyntaxNode::Statement(children)
            | SyntaxNode::PureFunction(children)
            | SyntaxNode::ImpureFunction(children)
            | SyntaxNode::ParamList(children)
            | SyntaxNode::ArgumentList(children)
            | SyntaxNode::FunctionCall(children)
            | SyntaxNode::Term(children)
            | SyntaxNode::Factor(children)
            | SyntaxNode::Element(children) => children,
            SyntaxNode::Token(leaf) => leaf.leading,
            SyntaxNode::Whitespace(_) => vec![],
        }
    }
}

impl ToTokens for SyntaxNode {
    fn to_tokens(&self) -> TokenStream {
        match self {
            SyntaxNode::Token(leaf) => leaf
                .leading
                .to_tokens()
                .chain([leaf.token.clone()])
                .collect(),
            SyntaxNode::Whitespace(token) => TokenStream::from_iter([token.clone()]),
            inner => inner.children().iter().flat_map(|c| c.to_tokens()).collect(),
        }
    }
}

/// Displays a syntax tree as an indented tree, leaving out whitespace
pub struct CstPrinter<'a> {
    root: &'a SyntaxNode,
}

impl<'a> CstPrinter<'a> {
    pub fn new(root: &'a SyntaxNode) -> Self {
        Self { root }
    }

    fn print_node(printer: &mut TreePrinter, node: &SyntaxNode, last: bool) {
        match node {
            SyntaxNode::Token(leaf) => {
                let label = match leaf.token.text() {
                    Some(text) => format!("Token {:?} {text}", leaf.token.kind()),
                    None => format!("Token {:?}", leaf.token.kind()),
                };
                printer.leaf(label, last);
            }
            SyntaxNode::Whitespace(_) => {}
            inner => {
                let children = inner
                    .children()
                    .iter()
                    .filter(|child| child.kind() != SyntaxKind::Whitespace)
                    .collect::<Vec<_>>();
                printer.node(inner.kind(), last, |printer| {
                    let count = children.len();
                    for (idx, child) in children.into_iter().enumerate() {
                        Self::print_node(printer, child, idx + 1 == count);
                    }
                });
            }
        }
    }
}

impl Display for CstPrinter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut printer = TreePrinter::new();
        Self::print_node(&mut printer, self.root, true);
        f.write_str(&printer.finish())
    }
}
