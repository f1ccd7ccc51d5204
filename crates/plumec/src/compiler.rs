//! Responsible with running plume sources through every phase of the front-end

use crate::resolution::{SymbolTable, TypeSymbol};
use passes::declaration_discovery::discover_declarations;
use passes::type_check::check_bodies;
use plume_ast::id::NodeId;
use plume_ast::program::Program;
use plume_ast_parsing::parser::syntax_tree::SyntaxNode;
use plume_ast_parsing::{lex, lower, parse};
use plume_tokens::source::Source;
use plume_tokens::token::Token;
use prelude::*;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};
use tracing::{debug, debug_span, instrument, trace};

pub mod error;
pub mod passes;

/// Prelude that can be used in inner modules.
mod prelude {
    use super::*;
    pub use error::{PlumeCError, PlumeCResult, SemanticErrors};
}

/// Controls how validation reacts to errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Skip checking bodies when declaration discovery found errors
    pub abort_after_declaration_errors: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            abort_after_declaration_errors: true,
        }
    }
}

/// The inferred type of expressions, by node id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeTable {
    types: BTreeMap<NodeId, TypeSymbol>,
}

impl TypeTable {
    pub fn insert(&mut self, id: NodeId, ty: TypeSymbol) {
        self.types.insert(id, ty);
    }

    pub fn get(&self, id: NodeId) -> Option<&TypeSymbol> {
        self.types.get(&id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates over the entries in node id order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TypeSymbol)> {
        self.types.iter().map(|(id, ty)| (*id, ty))
    }
}

/// A program that passed validation, along with the types inferred for it
#[derive(Debug, Clone)]
pub struct TypedProgram {
    pub program: Program,
    pub types: TypeTable,
}

impl TypedProgram {
    /// The type of the expression with the given id
    pub fn type_of(&self, id: NodeId) -> Option<&TypeSymbol> {
        self.types.get(id)
    }
}

/// Validates a lowered program.
///
/// Every function is first declared, then every body is checked. A fresh symbol table is
/// used for each call. The program is never modified.
///
/// Errors are collected rather than returned on the first one. Every declaration error is
/// reported, and each body contributes at most its first error. When declarations fail and
/// [ValidationOptions::abort_after_declaration_errors] is set, bodies are not checked.
/// On success the inferred type of every expression node is returned with the program.
#[instrument(skip_all)]
pub fn validate(
    program: Program,
    options: &ValidationOptions,
) -> Result<TypedProgram, SemanticErrors> {
    let mut table = SymbolTable::new();
    let mut types = TypeTable::default();
    let mut errors = discover_declarations(&program, &mut table);
    if !errors.is_empty() && options.abort_after_declaration_errors {
        debug!("{} declaration error(s), not checking bodies", errors.len());
        return Err(SemanticErrors(errors));
    }
    errors.extend(check_bodies(&program, &mut table, &mut types));
    if errors.is_empty() {
        Ok(TypedProgram { program, types })
    } else {
        Err(SemanticErrors(errors))
    }
}

/// A phase of compilation
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Phase {
    Lexing,
    Parsing,
    Lowering,
    Validation,
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Lexing => f.pad("lexing"),
            Phase::Parsing => f.pad("parsing"),
            Phase::Lowering => f.pad("lowering"),
            Phase::Validation => f.pad("validation"),
        }
    }
}

/// Receives the intermediate results of a compilation as they are produced
pub trait CompileObserver {
    fn source_started(&mut self, _source: &Source) {}
    fn tokens(&mut self, _tokens: &[Token]) {}
    fn syntax_tree(&mut self, _tree: &SyntaxNode) {}
    fn ast(&mut self, _program: &Program) {}
    fn types(&mut self, _typed: &TypedProgram) {}
    /// Called after every phase that ran, whether or not it succeeded
    fn phase_finished(&mut self, _phase: Phase, _elapsed: Duration) {}
}

impl CompileObserver for () {}

/// Responsible with compiling plume sources into typed programs.
///
/// Must be configured using a [PlumeCBuilder].
#[derive(Debug, Clone)]
pub struct PlumeC {
    validation: ValidationOptions,
}

impl PlumeC {
    /// Creates the default PlumeCBuilder
    #[inline]
    pub fn builder() -> PlumeCBuilder {
        PlumeCBuilder::new()
    }

    /// Compile a single source
    #[inline]
    pub fn compile(&self, source: &Source) -> PlumeCResult<TypedProgram> {
        self.compile_observed(source, &mut ())
    }

    /// Compile a single source, reporting intermediate results to `observer`
    pub fn compile_observed<O: CompileObserver + ?Sized>(
        &self,
        source: &Source,
        observer: &mut O,
    ) -> PlumeCResult<TypedProgram> {
        let span = debug_span!("compile", source = source.id());
        let _enter = span.enter();
        observer.source_started(source);
        self.run_phases(source, observer)
            .map_err(|error| error.with_origin(source))
    }

    /// Compiles every source, even after one fails.
    ///
    /// When more than one source fails, the errors are combined.
    pub fn compile_all<O: CompileObserver + ?Sized>(
        &self,
        sources: &[Source],
        observer: &mut O,
    ) -> PlumeCResult<Vec<TypedProgram>> {
        let mut compiled = vec![];
        let mut errors = vec![];
        for source in sources {
            match self.compile_observed(source, observer) {
                Ok(typed) => compiled.push(typed),
                Err(error) => errors.push(error),
            }
        }
        match errors.len() {
            0 => Ok(compiled),
            1 => Err(errors.remove(0)),
            _ => Err(PlumeCError::from(errors)),
        }
    }

    fn run_phases<O: CompileObserver + ?Sized>(
        &self,
        source: &Source,
        observer: &mut O,
    ) -> PlumeCResult<TypedProgram> {
        let tokens = timed(Phase::Lexing, observer, || lex(source))?;
        observer.tokens(&tokens);
        let tree = timed(Phase::Parsing, observer, || parse(tokens, source))?;
        observer.syntax_tree(&tree);
        let program = timed(Phase::Lowering, observer, || lower(tree))?;
        observer.ast(&program);
        let typed = timed(Phase::Validation, observer, || {
            validate(program, &self.validation)
        })?;
        observer.types(&typed);
        Ok(typed)
    }
}

fn timed<T, E, O: CompileObserver + ?Sized>(
    phase: Phase,
    observer: &mut O,
    run: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    debug!("starting {phase}");
    let start = Instant::now();
    let result = run();
    let elapsed = start.elapsed();
    trace!("{phase} took {elapsed:?}");
    observer.phase_finished(phase, elapsed);
    result
}

/// Builder for creating a [PlumeC] instance.
#[derive(Debug, Default)]
pub struct PlumeCBuilder {
    pub validation: ValidationOptions,
}

impl PlumeCBuilder {
    /// Creates a PlumeCBuilder with default settings
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether function bodies are checked after declaration errors
    pub fn abort_after_declaration_errors(mut self, abort: bool) -> Self {
        self.validation.abort_after_declaration_errors = abort;
        self
    }

    pub fn validation(mut self, options: ValidationOptions) -> Self {
        self.validation = options;
        self
    }

    /// Builds a [PlumeC] instance from this builder
    pub fn build(self) -> PlumeC {
        PlumeC {
            validation: self.validation,
        }
    }
}
