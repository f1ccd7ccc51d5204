//! Recursive descent parsing of token sequences into a concrete syntax tree

use plume_tokens::source::Source;
use plume_tokens::token::Token;
use tracing::{debug, instrument};

mod syntactic_parser;

pub use syntactic_parser::*;

use syntax_tree::SyntaxNode;

/// Parses the tokens lexed from `source` into a lossless syntax tree rooted at a
/// [SyntaxNode::Program].
///
/// Fails on the first token that does not fit the grammar.
#[instrument(skip_all, fields(source = source.id()))]
pub fn parse(tokens: Vec<Token>, source: &Source) -> Result<SyntaxNode> {
    let result = SyntacticParser::new(tokens, source).parse_program();
    match &result {
        Ok(_) => debug!("parsed syntax tree"),
        Err(error) => debug!("parsing failed: {error}\n{}", error.non_terminal_stack()),
    }
    result
}
