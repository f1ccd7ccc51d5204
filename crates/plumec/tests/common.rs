use plume_ast::program::Program;
use plume_tokens::source::Source;

/// Lexes, parses and lowers a source that is known to be well formed
pub fn lowered(id: &str, text: &str) -> eyre::Result<(Source, Program)> {
    let source = Source::new(id, text);
    let tokens = plumec::lex(&source)?;
    let tree = plumec::parse(tokens, &source)?;
    let program = plumec::lower(tree)?;
    Ok((source, program))
}
