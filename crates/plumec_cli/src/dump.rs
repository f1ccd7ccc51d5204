//! prints intermediate results of compilation as they are produced

use crate::args::Dump;
use owo_colors::{OwoColorize, Stream};
use plume_ast::printer::AstPrinter;
use plume_ast::program::Program;
use plume_ast_parsing::parser::syntax_tree::{CstPrinter, SyntaxNode};
use plume_tokens::source::Source;
use plume_tokens::spanned::Spanned;
use plume_tokens::token::Token;
use plumec::{CompileObserver, Phase, TypedProgram};
use std::time::Duration;

/// Writes the requested dumps to stdout and phase timings to stderr
#[derive(Debug, Default)]
pub struct Dumper {
    dumps: Vec<Dump>,
    time: bool,
}

impl Dumper {
    pub fn new(dumps: Vec<Dump>, time: bool) -> Self {
        Self { dumps, time }
    }

    fn wants(&self, dump: Dump) -> bool {
        self.dumps.contains(&dump)
    }

    fn header(&self, dump: Dump) {
        let header = format!("== {dump:?} ==");
        println!(
            "{}",
            header.if_supports_color(Stream::Stdout, |text| text.bright_cyan())
        );
    }
}

impl CompileObserver for Dumper {
    fn source_started(&mut self, source: &Source) {
        if !self.dumps.is_empty() || self.time {
            println!(
                "{}",
                source
                    .id()
                    .if_supports_color(Stream::Stdout, |text| text.bold())
            );
        }
    }

    fn tokens(&mut self, tokens: &[Token]) {
        if self.wants(Dump::Tokens) {
            self.header(Dump::Tokens);
            for token in tokens {
                println!("{:>8} {token:?}", token.span().start().to_string());
            }
        }
    }

    fn syntax_tree(&mut self, tree: &SyntaxNode) {
        if self.wants(Dump::Cst) {
            self.header(Dump::Cst);
            println!("{}", CstPrinter::new(tree));
        }
    }

    fn ast(&mut self, program: &Program) {
        if self.wants(Dump::Ast) {
            self.header(Dump::Ast);
            println!("{}", AstPrinter::new(program));
        }
    }

    fn types(&mut self, typed: &TypedProgram) {
        if self.wants(Dump::Types) {
            self.header(Dump::Types);
            for function in &typed.program.functions {
                let body_type = typed
                    .type_of(function.body.id)
                    .map(|ty| ty.to_string())
                    .unwrap_or_default();
                println!("{} {}: {body_type}", function.purity(), function.name());
            }
            for (id, ty) in typed.types.iter() {
                println!("  {:>5} {ty}", id.to_string());
            }
        }
    }

    fn phase_finished(&mut self, phase: Phase, elapsed: Duration) {
        if self.time {
            let timing = format!("{phase:>10} took {elapsed:?}");
            eprintln!(
                "{}",
                timing.if_supports_color(Stream::Stderr, |text| text.dimmed())
            );
        }
    }
}
