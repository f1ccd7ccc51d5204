//! transforms for converting the syntax tree into the AST

mod to_ast;

use crate::parser::syntax_tree::SyntaxNode;
use plume_ast::program::Program;
pub use to_ast::{LoweringError, ToAst};
use tracing::{debug, instrument};

/// Lowers a syntax tree produced by the parser into the AST.
///
/// Trivia is kept only inside the tokens the AST refers to. An error means the tree was
/// not produced by the parser.
#[instrument(skip_all)]
pub fn lower(tree: SyntaxNode) -> Result<Program, LoweringError> {
    let mut to_ast = ToAst::new();
    let program = to_ast.program(tree)?;
    debug!(
        "lowered {} function(s) with {} expression nodes",
        program.functions.len(),
        to_ast.node_count()
    );
    Ok(program)
}
