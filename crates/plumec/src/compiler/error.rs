//! A plume compilation error

use crate::resolution::SymbolKind;
use itertools::Itertools as _;
use plume_ast_parsing::{LexErrors, LoweringError, SyntaxError};
use plume_tokens::source::Source;
use plume_tokens::spanned::Span;
use plume_tokens::{Diagnostic, IntoDiagnostics, SpannedError};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Something wrong with the meaning of a well formed program
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticErrorKind {
    #[error("Unknown type {0}")]
    UnknownType(String),
    #[error("{kind} {name} is already declared in scope")]
    AlreadyDeclared { kind: SymbolKind, name: String },
    #[error("Use of undeclared symbol {0}")]
    UndeclaredSymbol(String),
    #[error("{kind} {name} can not be used as a value")]
    NotAValue { kind: SymbolKind, name: String },
    #[error("Could not find function '{0}'")]
    NotAFunction(String),
    #[error("Can't invoke impure function '{0}' from pure context")]
    ImpureCallInPureContext(String),
    #[error("Function body return type {actual} does not match declared return type {expected}")]
    ReturnTypeMismatch { expected: String, actual: String },
    #[error("Operands have different types: {left} and {right}")]
    OperandTypeMismatch { left: String, right: String },
    #[error("Function '{name}' expects {expected} argument(s) but {found} were given")]
    ArgumentCountMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("Argument {position} of '{name}' should be {expected} but was {actual}")]
    ArgumentTypeMismatch {
        name: String,
        position: usize,
        expected: String,
        actual: String,
    },
    #[error("Unexpected statement after expression")]
    UnexpectedStatementAfterExpression,
}

/// A semantic error, located at the offending token
pub type SemanticError = SpannedError<SemanticErrorKind>;

/// Every semantic error found while validating a program, in the order they were found
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", .0.iter().join("\n"))]
pub struct SemanticErrors(pub Vec<SemanticError>);

impl SemanticErrors {
    pub fn errors(&self) -> &[SemanticError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoDiagnostics for SemanticErrors {
    fn diagnostics(&self, source: &Source) -> Vec<Diagnostic> {
        self.0.diagnostics(source)
    }
}

/// The kind of error
#[derive(Debug, Error)]
pub enum PlumeCErrorKind {
    #[error(transparent)]
    Lex(#[from] LexErrors),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Lowering(#[from] LoweringError),
    #[error(transparent)]
    Semantic(#[from] SemanticErrors),
    #[error("{}", .0.iter().join("\n"))]
    Multi(Vec<PlumeCError>),
}

/// An error occurred while attempting to compile plume sources
#[derive(Debug, Error)]
pub struct PlumeCError {
    kind: PlumeCErrorKind,
    origin: Option<Source>,
}

impl PlumeCError {
    pub fn kind(&self) -> &PlumeCErrorKind {
        &self.kind
    }

    /// The source this error was found in, if known
    pub fn origin(&self) -> Option<&Source> {
        self.origin.as_ref()
    }

    /// Attaches the source this error was found in
    pub fn with_origin(mut self, source: &Source) -> Self {
        self.origin = Some(source.clone());
        self
    }

    /// Renders this error against the source it was found in.
    ///
    /// Nested errors are flattened. Errors without an origin produce no diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        if let PlumeCErrorKind::Multi(errors) = &self.kind {
            return errors.iter().flat_map(|e| e.diagnostics()).collect();
        }
        let Some(source) = &self.origin else {
            return vec![];
        };
        match &self.kind {
            PlumeCErrorKind::Lex(e) => e.diagnostics(source),
            PlumeCErrorKind::Syntax(e) => e.diagnostics(source),
            PlumeCErrorKind::Lowering(e) => {
                vec![Diagnostic::new(e.to_string(), source, Span::default())]
            }
            PlumeCErrorKind::Semantic(e) => e.diagnostics(source),
            PlumeCErrorKind::Multi(_) => vec![],
        }
    }
}

impl Display for PlumeCError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.origin, &self.kind) {
            (Some(source), kind) if !matches!(kind, PlumeCErrorKind::Multi(_)) => {
                write!(f, "{}: {kind}", source.id())
            }
            (_, kind) => write!(f, "{kind}"),
        }
    }
}

impl<T> From<T> for PlumeCError
where
    PlumeCErrorKind: From<T>,
{
    fn from(value: T) -> Self {
        Self {
            kind: PlumeCErrorKind::from(value),
            origin: None,
        }
    }
}

impl From<Vec<PlumeCError>> for PlumeCErrorKind {
    fn from(value: Vec<PlumeCError>) -> Self {
        PlumeCErrorKind::Multi(value)
    }
}

/// A type alias for general results in plumec
pub type PlumeCResult<T> = Result<T, PlumeCError>;
