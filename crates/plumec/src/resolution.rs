//! Symbols and the scopes they are resolved in

use plume_ast::items::Purity;
use plume_tokens::spanned::{Span, Spanned};
use plume_tokens::token::Token;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use thiserror::Error;
use tracing::trace;

/// The builtin integer type
pub const INT: &str = "int";
/// The builtin type of expressions that yield nothing
pub const VOID: &str = "void";

/// Where a symbol was declared
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// Provided by the compiler, as part of a module
    Builtin(&'static str),
    Source { source_id: Arc<str>, span: Span },
}

impl Location {
    /// The location of a declaring token
    pub fn of(token: &Token) -> Self {
        Self::Source {
            source_id: token.shared_source_id(),
            span: token.span(),
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Builtin(module) => f.write_str(module),
            Location::Source { source_id, span } => write!(f, "{source_id}:{}", span.start()),
        }
    }
}

/// A named type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeSymbol {
    name: String,
    location: Location,
}

impl TypeSymbol {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }

    /// A type provided by the compiler, such as [INT] or [VOID]
    pub fn builtin(name: impl Into<String>) -> Self {
        Self::new(name, Location::Builtin("builtin"))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}

impl Display for TypeSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// The signature of a function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSymbol {
    pub name: String,
    pub location: Location,
    pub parameters: Vec<TypeSymbol>,
    pub return_type: TypeSymbol,
    pub purity: Purity,
}

/// A value bound in a scope, such as a parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSymbol {
    pub name: String,
    pub location: Location,
    pub ty: TypeSymbol,
}

/// Anything a name can refer to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Function(FunctionSymbol),
    Type(TypeSymbol),
    Variable(VariableSymbol),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Function(f) => &f.name,
            Symbol::Type(t) => &t.name,
            Symbol::Variable(v) => &v.name,
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            Symbol::Function(f) => &f.location,
            Symbol::Type(t) => &t.location,
            Symbol::Variable(v) => &v.location,
        }
    }

    pub fn kind(&self) -> SymbolKind {
        match self {
            Symbol::Function(_) => SymbolKind::Function,
            Symbol::Type(_) => SymbolKind::Type,
            Symbol::Variable(_) => SymbolKind::Variable,
        }
    }
}

/// The kind of a [Symbol]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SymbolKind {
    Function,
    Type,
    Variable,
}

impl Display for SymbolKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolKind::Function => f.write_str("fun"),
            SymbolKind::Type => f.write_str("type"),
            SymbolKind::Variable => f.write_str("variable"),
        }
    }
}

/// A symbol could not be inserted because its name is taken in the innermost scope
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} {} is already declared in scope", .rejected.kind(), .rejected.name())]
pub struct AlreadyDeclared {
    pub rejected: Symbol,
}

/// A chain of scopes, from the global scope to the innermost one.
///
/// The global scope always exists and starts out holding the builtin symbols.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, Symbol>>,
}

impl SymbolTable {
    /// Creates a table holding only the builtin symbols
    pub fn new() -> Self {
        let int = TypeSymbol::builtin(INT);
        let void = TypeSymbol::builtin(VOID);
        let print = FunctionSymbol {
            name: "print".to_string(),
            location: Location::Builtin("std.io"),
            parameters: vec![int.clone()],
            return_type: void.clone(),
            purity: Purity::Impure,
        };
        let global = [Symbol::Type(int), Symbol::Type(void), Symbol::Function(print)]
            .into_iter()
            .map(|symbol| (symbol.name().to_string(), symbol))
            .collect();
        Self {
            scopes: vec![global],
        }
    }

    /// Adds a symbol to the innermost scope.
    ///
    /// Fails if the name is already taken in that scope. Names in outer scopes are shadowed.
    pub fn insert(&mut self, symbol: Symbol) -> Result<(), AlreadyDeclared> {
        let depth = self.scopes.len();
        let Some(scope) = self.scopes.last_mut() else {
            return Err(AlreadyDeclared { rejected: symbol });
        };
        if scope.contains_key(symbol.name()) {
            return Err(AlreadyDeclared { rejected: symbol });
        }
        trace!("declared {} {} at depth {depth}", symbol.kind(), symbol.name());
        scope.insert(symbol.name().to_string(), symbol);
        Ok(())
    }

    /// Finds the symbol a name refers to, searching from the innermost scope outward
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Finds a symbol declared directly in the innermost scope
    pub fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        self.scopes.last().and_then(|scope| scope.get(name))
    }

    /// Finds a symbol declared in the global scope, ignoring any shadowing
    pub fn lookup_global(&self, name: &str) -> Option<&Symbol> {
        self.scopes.first().and_then(|scope| scope.get(name))
    }

    /// Resolves a name that should refer to a type
    pub fn lookup_type(&self, name: &str) -> Option<&TypeSymbol> {
        match self.lookup(name)? {
            Symbol::Type(ty) => Some(ty),
            _ => None,
        }
    }

    /// Resolves a name that should refer to a function
    pub fn lookup_function(&self, name: &str) -> Option<&FunctionSymbol> {
        match self.lookup(name)? {
            Symbol::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Enters a new innermost scope
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Leaves the innermost scope, discarding its symbols.
    ///
    /// The global scope is never popped, `false` is returned instead.
    pub fn pop_scope(&mut self) -> bool {
        if self.scopes.len() > 1 {
            self.scopes.pop();
            true
        } else {
            false
        }
    }

    /// The number of scopes, 1 when only the global scope exists
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variable(name: &str, ty: &str) -> Symbol {
        Symbol::Variable(VariableSymbol {
            name: name.to_string(),
            location: Location::Builtin("test"),
            ty: TypeSymbol::builtin(ty),
        })
    }

    #[test]
    fn test_builtins() {
        let table = SymbolTable::new();
        assert_eq!(table.depth(), 1);
        assert_eq!(
            table.lookup_type("int").map(|t| t.location()),
            Some(&Location::Builtin("builtin"))
        );
        assert!(table.lookup_type("void").is_some());
        let print = table.lookup_function("print").expect("print is builtin");
        assert_eq!(print.purity, Purity::Impure);
        assert_eq!(print.parameters.len(), 1);
        assert_eq!(print.parameters[0].name(), "int");
        assert_eq!(print.return_type.name(), "void");
        assert_eq!(print.location.to_string(), "std.io");
    }

    #[test]
    fn test_builtins_are_per_table() {
        let mut first = SymbolTable::new();
        first.insert(variable("x", "int")).expect("x is new");
        let second = SymbolTable::new();
        assert!(second.lookup("x").is_none());
    }

    #[test]
    fn test_duplicate_in_same_scope() {
        let mut table = SymbolTable::new();
        let error = table
            .insert(variable("int", "int"))
            .expect_err("int is taken");
        assert_eq!(error.to_string(), "variable int is already declared in scope");
        assert!(matches!(table.lookup("int"), Some(Symbol::Type(_))));
    }

    #[test]
    fn test_shadowing_and_popping() {
        let mut table = SymbolTable::new();
        table.push_scope();
        assert_eq!(table.depth(), 2);
        table.insert(variable("print", "int")).expect("shadows global");
        assert!(table.lookup_function("print").is_none());
        assert!(matches!(table.lookup("print"), Some(Symbol::Variable(_))));
        assert!(matches!(table.lookup_global("print"), Some(Symbol::Function(_))));
        assert!(table.lookup_local("int").is_none());
        assert!(table.lookup("int").is_some());

        assert!(table.pop_scope());
        assert!(table.lookup_function("print").is_some());
        assert!(!table.pop_scope());
        assert_eq!(table.depth(), 1);
    }
}
