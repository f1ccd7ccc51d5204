//! Checks function bodies against the declarations found by
//! [declaration discovery](super::declaration_discovery)

use crate::compiler::error::{SemanticError, SemanticErrorKind};
use crate::compiler::passes::declaration_discovery::resolve_signature;
use crate::compiler::TypeTable;
use crate::resolution::{
    FunctionSymbol, Location, Symbol, SymbolTable, TypeSymbol, VariableSymbol, INT, VOID,
};
use plume_ast::expr::{BinaryOperation, Expr, Expression, FunctionCall, Identifier};
use plume_ast::id::NodeId;
use plume_ast::items::{FunctionDecl, Purity};
use plume_ast::program::Program;
use plume_tokens::spanned::Spanned;
use tracing::{debug, instrument, trace};

type Result<T> = std::result::Result<T, SemanticError>;

/// Checks the body of every function in `program`, recording the type of every visited
/// expression in `types`.
///
/// Every function is checked. Within a body, checking stops at the first error. Functions
/// whose signature can't be resolved are skipped, as declaration discovery already
/// reported them.
#[instrument(skip_all)]
pub fn check_bodies(
    program: &Program,
    table: &mut SymbolTable,
    types: &mut TypeTable,
) -> Vec<SemanticError> {
    let mut errors = vec![];
    for function in &program.functions {
        let Ok(signature) = resolve_signature(function, table) else {
            debug!("skipping body of {}, its signature is unresolved", function.name());
            continue;
        };
        debug!("checking body of {}", function.name());
        table.push_scope();
        let mut checker = TypeChecker {
            table: &mut *table,
            types: &mut *types,
            purity: signature.purity,
            int: TypeSymbol::builtin(INT),
            void: TypeSymbol::builtin(VOID),
        };
        let result = checker.check_function(function, &signature);
        table.pop_scope();
        if let Err(error) = result {
            debug!("body of {} is invalid: {error}", function.name());
            errors.push(error);
        }
    }
    errors
}

struct TypeChecker<'a> {
    table: &'a mut SymbolTable,
    types: &'a mut TypeTable,
    /// purity of the function being checked
    purity: Purity,
    int: TypeSymbol,
    void: TypeSymbol,
}

impl TypeChecker<'_> {
    fn check_function(
        &mut self,
        function: &FunctionDecl,
        signature: &FunctionSymbol,
    ) -> Result<()> {
        for (param, ty) in function.parameters.params.iter().zip(&signature.parameters) {
            let variable = Symbol::Variable(VariableSymbol {
                name: param.name().to_string(),
                location: Location::of(&param.name.token),
                ty: ty.clone(),
            });
            self.table.insert(variable).map_err(|already_declared| {
                SemanticError::new(
                    SemanticErrorKind::AlreadyDeclared {
                        kind: already_declared.rejected.kind(),
                        name: already_declared.rejected.name().to_string(),
                    },
                    param.name.span(),
                )
            })?;
        }

        let actual = self.expression(&function.body)?;
        if actual != signature.return_type {
            return Err(SemanticError::new(
                SemanticErrorKind::ReturnTypeMismatch {
                    expected: signature.return_type.to_string(),
                    actual: actual.to_string(),
                },
                function.return_type.name.span(),
            ));
        }
        Ok(())
    }

    /// The type of an expression is the type of its only non-statement child, which must
    /// come last. Without one, the expression is void.
    fn expression(&mut self, expression: &Expression) -> Result<TypeSymbol> {
        let mut value = None;
        for child in &expression.children {
            if value.is_some() {
                return Err(SemanticError::new(
                    SemanticErrorKind::UnexpectedStatementAfterExpression,
                    child.span(),
                ));
            }
            let ty = self.expr(child)?;
            if !child.is_statement() {
                value = Some(ty);
            }
        }
        let ty = value.unwrap_or_else(|| self.void.clone());
        self.record(expression.id, &ty);
        Ok(ty)
    }

    fn expr(&mut self, expr: &Expr) -> Result<TypeSymbol> {
        let ty = match expr {
            Expr::Expression(expression) => return self.expression(expression),
            Expr::Statement(statement) => {
                self.expr(&statement.child)?;
                self.void.clone()
            }
            Expr::Integer(_) => self.int.clone(),
            Expr::Identifier(identifier) => self.identifier(identifier)?,
            Expr::Call(call) => self.call(call)?,
            Expr::Binary(binary) => self.binary(binary)?,
        };
        self.record(expr.id(), &ty);
        Ok(ty)
    }

    fn identifier(&self, identifier: &Identifier) -> Result<TypeSymbol> {
        match self.table.lookup(&identifier.name) {
            Some(Symbol::Variable(variable)) => Ok(variable.ty.clone()),
            Some(other) => Err(SemanticError::new(
                SemanticErrorKind::NotAValue {
                    kind: other.kind(),
                    name: identifier.name.clone(),
                },
                identifier.token.span(),
            )),
            None => Err(SemanticError::new(
                SemanticErrorKind::UndeclaredSymbol(identifier.name.clone()),
                identifier.token.span(),
            )),
        }
    }

    fn call(&mut self, call: &FunctionCall) -> Result<TypeSymbol> {
        let Some(Symbol::Function(function)) = self.table.lookup(call.name()).cloned() else {
            return Err(SemanticError::new(
                SemanticErrorKind::NotAFunction(call.name().to_string()),
                call.name.span(),
            ));
        };
        if self.purity == Purity::Pure && function.purity == Purity::Impure {
            return Err(SemanticError::new(
                SemanticErrorKind::ImpureCallInPureContext(function.name),
                call.name.span(),
            ));
        }

        let arguments = &call.arguments.args;
        if arguments.len() != function.parameters.len() {
            return Err(SemanticError::new(
                SemanticErrorKind::ArgumentCountMismatch {
                    name: function.name,
                    expected: function.parameters.len(),
                    found: arguments.len(),
                },
                call.arguments.span(),
            ));
        }
        for (position, (argument, expected)) in
            arguments.iter().zip(&function.parameters).enumerate()
        {
            let actual = self.expression(argument)?;
            if &actual != expected {
                return Err(SemanticError::new(
                    SemanticErrorKind::ArgumentTypeMismatch {
                        name: function.name,
                        position: position + 1,
                        expected: expected.to_string(),
                        actual: actual.to_string(),
                    },
                    argument.span(),
                ));
            }
        }
        Ok(function.return_type)
    }

    fn binary(&mut self, binary: &BinaryOperation) -> Result<TypeSymbol> {
        let left = self.expr(&binary.left)?;
        let right = self.expr(&binary.right)?;
        if left != right {
            return Err(SemanticError::new(
                SemanticErrorKind::OperandTypeMismatch {
                    left: left.to_string(),
                    right: right.to_string(),
                },
                binary.op_token.span(),
            ));
        }
        Ok(left)
    }

    fn record(&mut self, id: NodeId, ty: &TypeSymbol) {
        trace!("{id}: {ty}");
        self.types.insert(id, ty.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::passes::declaration_discovery::discover_declarations;
    use plume_ast_parsing::{lex, lower, parse};
    use plume_tokens::source::Source;
    use test_log::test;

    fn check(text: &str) -> (Program, TypeTable, Vec<SemanticError>) {
        let source = Source::new("test", text);
        let tokens = lex(&source).expect("lexes");
        let program = lower(parse(tokens, &source).expect("parses")).expect("lowers");
        let mut table = SymbolTable::new();
        let mut types = TypeTable::default();
        let mut errors = discover_declarations(&program, &mut table);
        errors.extend(check_bodies(&program, &mut table, &mut types));
        assert_eq!(table.depth(), 1, "every function scope is popped");
        (program, types, errors)
    }

    fn kinds(errors: &[SemanticError]) -> Vec<&SemanticErrorKind> {
        errors.iter().map(|e| e.error()).collect()
    }

    #[test]
    fn test_every_expression_is_typed() {
        let (program, types, errors) = check("fun f(x: int): int { x * 2 + f(x) }");
        assert!(errors.is_empty(), "{errors:?}");
        let body = &program.functions[0].body;
        assert_eq!(types.get(body.id).map(|t| t.name()), Some("int"));
        // body, inner expression, +, *, x, 2, call, argument expression, x
        assert_eq!(types.len(), 9);
    }

    #[test]
    fn test_statement_is_void() {
        let (program, types, errors) = check("imp f(): void { print(1); }");
        assert!(errors.is_empty(), "{errors:?}");
        let body = &program.functions[0].body;
        assert_eq!(types.get(body.id).map(|t| t.name()), Some("void"));
        assert_eq!(types.get(body.children[0].id()).map(|t| t.name()), Some("void"));
    }

    #[test]
    fn test_parameters_are_bound() {
        let (_, _, errors) = check("fun f(x: int): int { y }");
        assert_eq!(
            kinds(&errors),
            [&SemanticErrorKind::UndeclaredSymbol("y".to_string())]
        );
    }

    #[test]
    fn test_parameters_do_not_leak() {
        let (_, _, errors) = check("fun f(x: int): int { x }\nfun g(): int { x }");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span().start_row(), 2);
    }

    #[test]
    fn test_duplicate_parameter() {
        let (_, _, errors) = check("fun f(x: int, x: int): int { x }");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "variable x is already declared in scope at 1:15");
    }

    #[test]
    fn test_function_is_not_a_value() {
        let (_, _, errors) = check("fun f(): int { print }");
        assert_eq!(
            errors[0].error().to_string(),
            "fun print can not be used as a value"
        );
    }

    #[test]
    fn test_calling_a_variable() {
        let (_, _, errors) = check("fun f(g: int): int { g(1) }");
        assert_eq!(
            kinds(&errors),
            [&SemanticErrorKind::NotAFunction("g".to_string())]
        );
    }

    #[test]
    fn test_purity_checked_before_arguments() {
        let (_, _, errors) = check("fun f(): void { print() }");
        assert_eq!(
            kinds(&errors),
            [&SemanticErrorKind::ImpureCallInPureContext("print".to_string())]
        );
    }

    #[test]
    fn test_purity_inside_statements() {
        let (_, _, errors) = check("fun f(): int { print(1); 1 }");
        assert_eq!(
            kinds(&errors),
            [&SemanticErrorKind::ImpureCallInPureContext("print".to_string())]
        );
    }

    #[test]
    fn test_argument_checks() {
        let (_, _, errors) = check(
            "imp a(): void { print(1, 2) }\n\
             imp b(): void { print(print(1)) }",
        );
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0].error().to_string(),
            "Function 'print' expects 1 argument(s) but 2 were given"
        );
        assert_eq!(
            errors[1].error().to_string(),
            "Argument 1 of 'print' should be int but was void"
        );
        assert_eq!(errors[1].span().start_col(), 23);
    }

    #[test]
    fn test_operand_mismatch_at_operator() {
        let (_, _, errors) = check("imp f(): int { 1 + print(1) }");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].error(),
            &SemanticErrorKind::OperandTypeMismatch {
                left: "int".to_string(),
                right: "void".to_string()
            }
        );
        assert_eq!(errors[0].span().start_col(), 18);
    }

    #[test]
    fn test_statement_after_value() {
        let (_, _, errors) = check("imp f(): int { 1 print(1); }");
        assert_eq!(
            kinds(&errors),
            [&SemanticErrorKind::UnexpectedStatementAfterExpression]
        );
        assert_eq!(errors[0].span().start_col(), 18);
    }

    #[test]
    fn test_return_mismatch_at_return_type() {
        let (_, _, errors) = check("fun h(): int { }");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "Function body return type void does not match declared return type int at 1:10"
        );
    }
}
