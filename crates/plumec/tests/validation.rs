use plume_tokens::spanned::Spanned;
use plumec::error::{PlumeCErrorKind, SemanticErrorKind, SemanticErrors};
use plumec::passes::declaration_discovery::discover_declarations;
use plumec::resolution::{Symbol, SymbolTable};
use plumec::{validate, PlumeC, ValidationOptions};
use plume_ast::items::Purity;
use plume_ast_parsing::parser::MAX_RULE_DEPTH;
use plume_tokens::source::Source;
use test_log::test;
use tracing::info;

mod common;

fn semantic_errors(text: &str) -> eyre::Result<SemanticErrors> {
    let (_, program) = common::lowered("test", text)?;
    match validate(program, &ValidationOptions::default()) {
        Ok(_) => Err(eyre::eyre!("{text:?} should not validate")),
        Err(errors) => Ok(errors),
    }
}

#[test]
fn test_impure_function_validates() -> eyre::Result<()> {
    let (_, program) = common::lowered("test", "imp f(): int { print(1); 1 }")?;
    let typed = validate(program, &ValidationOptions::default())?;
    let body = &typed.program.functions[0].body;
    assert_eq!(typed.type_of(body.id).map(|t| t.name()), Some("int"));
    Ok(())
}

#[test]
fn test_pure_function_can_not_call_impure() -> eyre::Result<()> {
    let errors = semantic_errors("imp f(): int { print(1); 1 }\nfun g(): int { f() }")?;
    assert_eq!(errors.len(), 1);
    let error = &errors.errors()[0];
    assert_eq!(
        error.error(),
        &SemanticErrorKind::ImpureCallInPureContext("f".to_string())
    );
    assert_eq!(error.span().start_row(), 2);
    assert_eq!(error.span().start_col(), 16);
    Ok(())
}

#[test]
fn test_return_type() -> eyre::Result<()> {
    let (_, program) = common::lowered("test", "fun h(): int { 1 }")?;
    validate(program, &ValidationOptions::default())?;

    let errors = semantic_errors("fun h(): int { }")?;
    assert_eq!(
        errors.errors()[0].error(),
        &SemanticErrorKind::ReturnTypeMismatch {
            expected: "int".to_string(),
            actual: "void".to_string()
        }
    );
    Ok(())
}

#[test]
fn test_duplicate_declaration_keeps_first() -> eyre::Result<()> {
    let (_, program) = common::lowered("test", "fun f(): int { 1 }\nimp f(): void { }")?;
    let mut table = SymbolTable::new();
    let errors = discover_declarations(&program, &mut table);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].span().start_row(), 2);
    let Some(Symbol::Function(f)) = table.lookup("f") else {
        return Err(eyre::eyre!("f should be declared"));
    };
    assert_eq!(f.purity, Purity::Pure);
    assert_eq!(f.location.to_string(), "test:1:5");
    Ok(())
}

#[test]
fn test_unknown_type_stops_before_bodies() -> eyre::Result<()> {
    let errors = semantic_errors("fun f(x: foo): int { 1 }\nfun g(): int { y }")?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.to_string(), "Unknown type foo at 1:10");
    Ok(())
}

#[test]
fn test_keep_going_checks_bodies() -> eyre::Result<()> {
    let (_, program) = common::lowered("test", "fun f(x: foo): int { 1 }\nfun g(): int { y }")?;
    let options = ValidationOptions {
        abort_after_declaration_errors: false,
    };
    let Err(errors) = validate(program, &options) else {
        return Err(eyre::eyre!("should not validate"));
    };
    info!("errors:\n{errors}");
    let kinds = errors.errors().iter().map(|e| e.error()).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        [
            &SemanticErrorKind::UnknownType("foo".to_string()),
            &SemanticErrorKind::UndeclaredSymbol("y".to_string())
        ]
    );
    Ok(())
}

#[test]
fn test_parameter_shadows_function() -> eyre::Result<()> {
    let (_, program) = common::lowered(
        "test",
        "fun f(): int { 1 }\nfun g(f: int): int { f + 1 }",
    )?;
    validate(program, &ValidationOptions::default())?;

    let errors = semantic_errors("fun f(): int { 1 }\nfun g(f: int): int { f() }")?;
    assert_eq!(
        errors.errors()[0].error(),
        &SemanticErrorKind::NotAFunction("f".to_string())
    );
    Ok(())
}

#[test]
fn test_every_body_is_checked() -> eyre::Result<()> {
    let errors = semantic_errors(
        "fun a(): int { x }\n\
         fun b(): int { 1 + print(1) }\n\
         fun c(): int { 1 }\n\
         fun d(): void { 2 }",
    )?;
    let rows = errors
        .errors()
        .iter()
        .map(|e| e.span().start_row())
        .collect::<Vec<_>>();
    assert_eq!(rows, [1, 2, 4]);
    Ok(())
}

#[test]
fn test_compile_reports_origin() -> eyre::Result<()> {
    let compiler = PlumeC::builder().build();
    let good = Source::new("good", "imp main(): void { print(1 + 2 * 3); }");
    let bad = Source::new("bad", "fun main(): int {\n  print(1)\n}");

    let typed = compiler.compile(&good)?;
    assert_eq!(typed.program.functions.len(), 1);

    let error = compiler
        .compile(&bad)
        .err()
        .ok_or_else(|| eyre::eyre!("bad should fail"))?;
    assert!(matches!(error.kind(), PlumeCErrorKind::Semantic(_)));
    let diagnostics = error.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].source_id.as_ref(), "bad");
    assert_eq!(diagnostics[0].line_text, "  print(1)");
    assert_eq!(
        diagnostics[0].message,
        "Can't invoke impure function 'print' from pure context"
    );
    Ok(())
}

#[test]
fn test_compile_all_combines_errors() -> eyre::Result<()> {
    let compiler = PlumeC::builder().build();
    let sources = [
        Source::new("a", "fun a(): int { 1 # 2 }"),
        Source::new("b", "fun b(): int { 1 }"),
        Source::new("c", "fun c(: int { 1 }"),
    ];
    let error = compiler
        .compile_all(&sources, &mut ())
        .err()
        .ok_or_else(|| eyre::eyre!("a and c should fail"))?;
    let PlumeCErrorKind::Multi(errors) = error.kind() else {
        return Err(eyre::eyre!("expected multiple errors, found {error}"));
    };
    let origins = errors
        .iter()
        .filter_map(|e| e.origin().map(|s| s.id()))
        .collect::<Vec<_>>();
    assert_eq!(origins, ["a", "c"]);
    assert!(matches!(errors[0].kind(), PlumeCErrorKind::Lex(_)));
    assert!(matches!(errors[1].kind(), PlumeCErrorKind::Syntax(_)));
    assert_eq!(error.diagnostics().len(), 2);
    Ok(())
}

#[test]
fn test_deeply_nested_input() -> eyre::Result<()> {
    let blocks = |depth: usize| {
        let text = format!("fun f(): int {}1{}", "{".repeat(depth), "}".repeat(depth));
        Source::new("blocks", text)
    };
    let calls = |depth: usize| {
        let text = format!(
            "fun f(x: int): int {{ {}1{} }}",
            "f(".repeat(depth),
            ")".repeat(depth)
        );
        Source::new("calls", text)
    };
    let compiler = PlumeC::builder().build();

    compiler.compile(&blocks(100))?;
    compiler.compile(&calls(20))?;

    for source in [blocks(10_000), calls(10_000)] {
        let error = compiler
            .compile(&source)
            .err()
            .ok_or_else(|| eyre::eyre!("{} should be nested too deeply", source.id()))?;
        let PlumeCErrorKind::Syntax(syntax) = error.kind() else {
            return Err(eyre::eyre!("expected a syntax error, found {error}"));
        };
        assert_eq!(syntax.depth_limit, Some(MAX_RULE_DEPTH));
        assert_eq!(error.diagnostics().len(), 1);
    }
    Ok(())
}
