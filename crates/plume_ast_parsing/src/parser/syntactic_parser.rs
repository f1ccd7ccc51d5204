use crate::parser::syntax_tree::{SyntaxKind, SyntaxNode, TokenLeaf};
use plume_tokens::source::Source;
use plume_tokens::token::{Token, TokenKind};
use std::collections::VecDeque;
use std::mem;
use tracing::trace;

pub mod error;
pub mod syntax_tree;

pub use error::*;

/// How many grammar rules may be open at once.
///
/// Every later pass recurses along the same path as the parser, so this also bounds their
/// stack usage.
pub const MAX_RULE_DEPTH: usize = 128;

/// Creates the concrete syntax tree from a token sequence.
///
/// Each grammar rule is parsed by its own method. Whitespace tokens are collected into a
/// trivia buffer as they are skipped over, and that buffer is attached in front of the
/// next significant token that gets consumed.
///
/// # Examples
/// ```
/// # use plume_ast_parsing::lexer::lex;
/// # use plume_ast_parsing::parser::SyntacticParser;
/// # use plume_tokens::source::Source;
/// # use plume_tokens::token::ToTokens;
/// let source = Source::new("example", "fun one(): int { 1 }");
/// let tokens = lex(&source).unwrap();
/// let tree = SyntacticParser::new(tokens, &source).parse_program().unwrap();
/// assert_eq!(tree.to_source(), "fun one(): int { 1 }");
/// ```
#[derive(Debug)]
pub struct SyntacticParser {
    tokens: VecDeque<Token>,
    eof: Token,
    trivia: Vec<SyntaxNode>,
    non_terminals: Vec<SyntaxKind>,
}

impl SyntacticParser {
    /// Creates a new parser over tokens lexed from `source`.
    ///
    /// Tokens after the first end of input token are ignored. If there is no end of input
    /// token, one is placed at the end of the source.
    pub fn new(tokens: impl IntoIterator<Item = Token>, source: &Source) -> Self {
        let mut tokens = tokens.into_iter();
        let mut significant = VecDeque::new();
        let eof = loop {
            match tokens.next() {
                Some(token) if token.kind() == TokenKind::Eof => break token,
                Some(token) => significant.push_back(token),
                None => {
                    break Token::new(TokenKind::Eof, None, source.end_span(), source.shared_id())
                }
            }
        };
        Self {
            tokens: significant,
            eof,
            trivia: vec![],
            non_terminals: vec![],
        }
    }

    /// Moves leading whitespace tokens into the trivia buffer
    fn consume_trivia(&mut self) {
        while self.tokens.front().is_some_and(Token::is_trivia) {
            if let Some(token) = self.tokens.pop_front() {
                self.trivia.push(SyntaxNode::Whitespace(token));
            }
        }
    }

    /// peek the next significant token
    fn peek(&mut self) -> &Token {
        self.consume_trivia();
        self.tokens.front().unwrap_or(&self.eof)
    }

    fn peek_kind(&mut self) -> TokenKind {
        self.peek().kind()
    }

    /// Consumes the next significant token, attaching all buffered trivia to it
    fn consume(&mut self) -> SyntaxNode {
        self.consume_trivia();
        let token = self
            .tokens
            .pop_front()
            .unwrap_or_else(|| self.eof.clone());
        trace!("consumed {token:?}");
        SyntaxNode::Token(TokenLeaf {
            leading: mem::take(&mut self.trivia),
            token,
        })
    }

    /// consumes into `into` if the next token is one of `kinds`
    fn accept(&mut self, kinds: &[TokenKind], into: &mut Vec<SyntaxNode>) -> bool {
        if kinds.contains(&self.peek_kind()) {
            let token = self.consume();
            into.push(token);
            true
        } else {
            false
        }
    }

    /// Like [accept](Self::accept), but fails when the next token is not one of `kinds`
    fn expect(&mut self, kinds: &[TokenKind], into: &mut Vec<SyntaxNode>) -> Result {
        if self.accept(kinds, into) {
            Ok(())
        } else {
            Err(self.error(kinds))
        }
    }

    fn error(&mut self, expected: &[TokenKind]) -> SyntaxError {
        let found = self.peek().clone();
        SyntaxError::new(expected.iter().copied(), found, self.non_terminals.clone())
    }

    /// Wrapper function for parsing a grammar rule
    fn rule<F>(&mut self, non_terminal: SyntaxKind, parser: F) -> Result<SyntaxNode>
    where
        F: FnOnce(&mut Self) -> Result<SyntaxNode>,
    {
        trace!("starting parsing {non_terminal}");
        if self.non_terminals.len() >= MAX_RULE_DEPTH {
            let found = self.peek().clone();
            return Err(SyntaxError::too_deep(
                MAX_RULE_DEPTH,
                found,
                self.non_terminals.clone(),
            ));
        }
        self.non_terminals.push(non_terminal);
        let result = parser(self);
        if result.is_ok() {
            self.non_terminals.pop();
            trace!("finished parsing {non_terminal}");
        }
        result
    }

    /// Parses a whole program, up to and including the end of input
    pub fn parse_program(&mut self) -> Result<SyntaxNode> {
        self.rule(SyntaxKind::Program, |parser| {
            let mut nodes = vec![];
            loop {
                match parser.peek_kind() {
                    TokenKind::Eof => {
                        nodes.push(parser.consume());
                        break;
                    }
                    TokenKind::Imp | TokenKind::Fun | TokenKind::Identifier => {
                        nodes.push(parser.parse_function()?);
                    }
                    _ => {
                        return Err(parser.error(&[
                            TokenKind::Fun,
                            TokenKind::Imp,
                            TokenKind::Identifier,
                            TokenKind::Eof,
                        ]))
                    }
                }
            }
            Ok(SyntaxNode::Program(nodes))
        })
    }

    fn parse_function(&mut self) -> Result<SyntaxNode> {
        if self.peek_kind() == TokenKind::Imp {
            self.parse_impure_function()
        } else {
            self.parse_pure_function()
        }
    }

    fn parse_impure_function(&mut self) -> Result<SyntaxNode> {
        self.rule(SyntaxKind::ImpureFunction, |parser| {
            let mut nodes = vec![];
            parser.expect(&[TokenKind::Imp], &mut nodes)?;
            parser.parse_signature_and_body(&mut nodes)?;
            Ok(SyntaxNode::ImpureFunction(nodes))
        })
    }

    fn parse_pure_function(&mut self) -> Result<SyntaxNode> {
        self.rule(SyntaxKind::PureFunction, |parser| {
            let mut nodes = vec![];
            parser.accept(&[TokenKind::Fun], &mut nodes);
            parser.parse_signature_and_body(&mut nodes)?;
            Ok(SyntaxNode::PureFunction(nodes))
        })
    }

    /// `Identifier ParamList ":" Identifier BlockExpr`
    fn parse_signature_and_body(&mut self, nodes: &mut Vec<SyntaxNode>) -> Result {
        self.expect(&[TokenKind::Identifier], nodes)?;
        nodes.push(self.parse_param_list()?);
        self.expect(&[TokenKind::Colon], nodes)?;
        self.expect(&[TokenKind::Identifier], nodes)?;
        nodes.push(self.parse_block_expr()?);
        Ok(())
    }

    fn parse_param_list(&mut self) -> Result<SyntaxNode> {
        self.rule(SyntaxKind::ParamList, |parser| {
            let mut nodes = vec![];
            parser.expect(&[TokenKind::LParen], &mut nodes)?;
            let has_params = parser.accept(&[TokenKind::Identifier], &mut nodes);
            if has_params {
                parser.expect(&[TokenKind::Colon], &mut nodes)?;
                parser.expect(&[TokenKind::Identifier], &mut nodes)?;
                while parser.accept(&[TokenKind::Comma], &mut nodes) {
                    parser.expect(&[TokenKind::Identifier], &mut nodes)?;
                    parser.expect(&[TokenKind::Colon], &mut nodes)?;
                    parser.expect(&[TokenKind::Identifier], &mut nodes)?;
                }
            }
            if !parser.accept(&[TokenKind::RParen], &mut nodes) {
                let continuation = if has_params {
                    TokenKind::Comma
                } else {
                    TokenKind::Identifier
                };
                return Err(parser.error(&[continuation, TokenKind::RParen]));
            }
            Ok(SyntaxNode::ParamList(nodes))
        })
    }

    fn parse_expr(&mut self) -> Result<SyntaxNode> {
        if self.peek_kind() == TokenKind::LCurly {
            self.parse_block_expr()
        } else {
            self.parse_blockless_expr()
        }
    }

    /// Parses a `{ ... }` block, collapsing each `Expr ;` into a statement
    fn parse_block_expr(&mut self) -> Result<SyntaxNode> {
        self.rule(SyntaxKind::BlockExpression, |parser| {
            let mut nodes = vec![];
            parser.expect(&[TokenKind::LCurly], &mut nodes)?;
            while !parser.accept(&[TokenKind::RCurly], &mut nodes) {
                let expr = parser.parse_expr()?;
                let mut statement = vec![expr];
                if parser.accept(&[TokenKind::SemiColon], &mut statement) {
                    nodes.push(SyntaxNode::Statement(statement));
                } else {
                    nodes.append(&mut statement);
                }
            }
            Ok(SyntaxNode::BlockExpression(nodes))
        })
    }

    fn parse_blockless_expr(&mut self) -> Result<SyntaxNode> {
        self.rule(SyntaxKind::BlocklessExpression, |parser| {
            Ok(SyntaxNode::BlocklessExpression(vec![parser.parse_term()?]))
        })
    }

    fn parse_term(&mut self) -> Result<SyntaxNode> {
        self.rule(SyntaxKind::Term, |parser| {
            let mut nodes = vec![parser.parse_factor()?];
            while parser.accept(&[TokenKind::Plus, TokenKind::Minus], &mut nodes) {
                nodes.push(parser.parse_factor()?);
            }
            Ok(SyntaxNode::Term(nodes))
        })
    }

    fn parse_factor(&mut self) -> Result<SyntaxNode> {
        self.rule(SyntaxKind::Factor, |parser| {
            let mut nodes = vec![parser.parse_element()?];
            while parser.accept(&[TokenKind::Star, TokenKind::Div], &mut nodes) {
                nodes.push(parser.parse_element()?);
            }
            Ok(SyntaxNode::Factor(nodes))
        })
    }

    /// Parses an integer, an identifier, or a call when an identifier is followed by `(`
    fn parse_element(&mut self) -> Result<SyntaxNode> {
        self.rule(SyntaxKind::Element, |parser| match parser.peek_kind() {
            TokenKind::Integer => Ok(SyntaxNode::Element(vec![parser.consume()])),
            TokenKind::Identifier => {
                let identifier = parser.consume();
                if parser.peek_kind() == TokenKind::LParen {
                    let arguments = parser.parse_argument_list()?;
                    Ok(SyntaxNode::FunctionCall(vec![identifier, arguments]))
                } else {
                    Ok(SyntaxNode::Element(vec![identifier]))
                }
            }
            _ => Err(parser.error(&[TokenKind::Integer, TokenKind::Identifier])),
        })
    }

    fn parse_argument_list(&mut self) -> Result<SyntaxNode> {
        self.rule(SyntaxKind::ArgumentList, |parser| {
            let mut nodes = vec![];
            parser.expect(&[TokenKind::LParen], &mut nodes)?;
            if !parser.accept(&[TokenKind::RParen], &mut nodes) {
                nodes.push(parser.parse_expr()?);
                loop {
                    match parser.peek_kind() {
                        TokenKind::RParen => {
                            nodes.push(parser.consume());
                            break;
                        }
                        TokenKind::Comma => {
                            nodes.push(parser.consume());
                            nodes.push(parser.parse_expr()?);
                        }
                        _ => return Err(parser.error(&[TokenKind::Comma, TokenKind::RParen])),
                    }
                }
            }
            Ok(SyntaxNode::ArgumentList(nodes))
        })
    }
}
