//! Registers the signature of every function in the global scope

use crate::compiler::error::{SemanticError, SemanticErrorKind};
use crate::resolution::{FunctionSymbol, Location, Symbol, SymbolTable, TypeSymbol};
use plume_ast::items::{FunctionDecl, TypeSpec};
use plume_ast::program::Program;
use plume_tokens::spanned::Spanned;
use tracing::{debug, instrument, trace};

/// Resolves a type specifier against the types visible in `table`
pub fn resolve_type(ty: &TypeSpec, table: &SymbolTable) -> Result<TypeSymbol, SemanticError> {
    table.lookup_type(ty.type_name()).cloned().ok_or_else(|| {
        SemanticError::new(
            SemanticErrorKind::UnknownType(ty.type_name().to_string()),
            ty.name.span(),
        )
    })
}

/// Resolves the signature of a function.
///
/// Parameters are resolved in order, then the return type. The first type that can't be
/// found is reported.
pub fn resolve_signature(
    function: &FunctionDecl,
    table: &SymbolTable,
) -> Result<FunctionSymbol, SemanticError> {
    let parameters = function
        .parameters
        .params
        .iter()
        .map(|param| resolve_type(&param.ty, table))
        .collect::<Result<Vec<_>, _>>()?;
    let return_type = resolve_type(&function.return_type, table)?;
    Ok(FunctionSymbol {
        name: function.name().to_string(),
        location: Location::of(&function.name.token),
        parameters,
        return_type,
        purity: function.purity(),
    })
}

/// Declares every function of `program` in the global scope of `table`.
///
/// Every error is returned rather than stopping at the first. When a name is declared
/// twice, the first declaration stays in the table.
#[instrument(skip_all)]
pub fn discover_declarations(program: &Program, table: &mut SymbolTable) -> Vec<SemanticError> {
    let mut errors = vec![];
    for function in &program.functions {
        let signature = match resolve_signature(function, table) {
            Ok(signature) => signature,
            Err(error) => {
                debug!("could not resolve signature of {}: {error}", function.name());
                errors.push(error);
                continue;
            }
        };
        trace!("found declaration {} {}", signature.purity, signature.name);
        if let Err(already_declared) = table.insert(Symbol::Function(signature)) {
            errors.push(SemanticError::new(
                SemanticErrorKind::AlreadyDeclared {
                    kind: already_declared.rejected.kind(),
                    name: already_declared.rejected.name().to_string(),
                },
                function.name.span(),
            ));
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use plume_ast_parsing::{lex, lower, parse};
    use plume_tokens::source::Source;
    use plume_ast::items::Purity;
    use test_log::test;

    fn program(text: &str) -> Program {
        let source = Source::new("test", text);
        let tokens = lex(&source).expect("lexes");
        lower(parse(tokens, &source).expect("parses")).expect("lowers")
    }

    #[test]
    fn test_signatures_are_declared() {
        let program = program("imp f(x: int, y: int): void { print(x); }\nfun g(): int { 1 }");
        let mut table = SymbolTable::new();
        assert!(discover_declarations(&program, &mut table).is_empty());

        let f = table.lookup_function("f").expect("f declared");
        assert_eq!(f.purity, Purity::Impure);
        assert_eq!(
            f.parameters.iter().map(|p| p.name()).collect::<Vec<_>>(),
            ["int", "int"]
        );
        assert_eq!(f.return_type.name(), "void");
        assert_eq!(f.location.to_string(), "test:1:5");

        let g = table.lookup_function("g").expect("g declared");
        assert_eq!(g.purity, Purity::Pure);
        assert!(g.parameters.is_empty());
    }

    #[test]
    fn test_unknown_type_is_reported_at_type_name() {
        let program = program("fun f(x: foo): int { 1 }");
        let mut table = SymbolTable::new();
        let errors = discover_declarations(&program, &mut table);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].error(),
            &SemanticErrorKind::UnknownType("foo".to_string())
        );
        assert_eq!(errors[0].span().start_col(), 10);
        assert!(table.lookup("f").is_none());
    }

    #[test]
    fn test_first_declaration_wins() {
        let program = program("fun f(): int { 1 }\nimp f(): void { }");
        let mut table = SymbolTable::new();
        let errors = discover_declarations(&program, &mut table);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "fun f is already declared in scope at 2:5");
        let f = table.lookup_function("f").expect("f declared");
        assert_eq!(f.purity, Purity::Pure);
        assert_eq!(f.return_type.name(), "int");
    }

    #[test]
    fn test_builtins_can_not_be_redeclared() {
        let program = program("fun print(x: int): void { }");
        let mut table = SymbolTable::new();
        let errors = discover_declarations(&program, &mut table);
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0].error(),
            SemanticErrorKind::AlreadyDeclared { name, .. } if name == "print"
        ));
    }
}
