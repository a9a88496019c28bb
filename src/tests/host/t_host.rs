use super::*;
use crate::core::diag::CompileError;
use crate::core::lexer::LexErrorKind;
use crate::core::parse::ParseErrorKind;
use crate::core::resolve::ResolveErrorKind;
use indoc::indoc;

fn compile(source: &str) -> Compilation {
    Compilation::from_source(source).expect("Failed to compile")
}

fn find(host: &Compilation, pred: impl Fn(&SyntaxKind) -> bool) -> Vec<NodeId> {
    let root = host.root().expect("root");
    host.descendants(root, true)
        .into_iter()
        .filter(|node| host.kind(*node).is_some_and(&pred))
        .collect()
}

#[test]
fn test_from_source_reports_first_lex_error() {
    let errors = Compilation::from_source("fn Main() { # }").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        CompileError::Lex(e) if matches!(e.kind(), LexErrorKind::UnexpectedCharacter('#'))
    ));
}

#[test]
fn test_from_source_reports_parse_error() {
    let errors = Compilation::from_source("fn Main() {").unwrap_err();
    assert!(matches!(
        &errors[0],
        CompileError::Parse(e) if matches!(e.kind(), ParseErrorKind::ExpectedToken(..))
    ));
}

#[test]
fn test_from_source_reports_all_resolve_errors() {
    let errors = Compilation::from_source("fn A(...x, y) { } fn B(z, z) { }").unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(matches!(
        &errors[0],
        CompileError::Resolve(e) if matches!(e.kind(), ResolveErrorKind::VariadicParamNotLast(_))
    ));
    assert!(matches!(
        &errors[1],
        CompileError::Resolve(e) if matches!(e.kind(), ResolveErrorKind::SymbolAlreadyDefined(_))
    ));
}

#[test]
fn test_generated_code_detection() {
    let source = indoc! {"
        @[generated]
        type Gen {
            static fn Use(f) { Use(() => 1); }
        }
        type Hand {
            @[Tools.generated]
            static fn Made(f) { Made(() => 2); }
            static fn Written(f) { Written(() => 3); }
        }
    "};
    let host = compile(source);
    let lambdas = find(&host, SyntaxKind::is_lambda);
    assert_eq!(lambdas.len(), 3);

    assert!(host.is_generated(lambdas[0]));
    assert!(host.is_generated(lambdas[1]));
    assert!(!host.is_generated(lambdas[2]));

    let types = find(&host, |kind| matches!(kind, SyntaxKind::TypeDecl { .. }));
    assert!(host.is_generated(types[0]));
    assert!(!host.is_generated(types[1]));
}

#[test]
fn test_attributes_of_returns_declared_attributes() {
    let host = compile("@[A, B.C] fn Run(@[D] f) { }");
    let run = host.symbols().lookup_by_name("Run").next().expect("Run").id;
    let f = host.symbols().lookup_by_name("f").next().expect("f").id;

    let run_attrs: Vec<&str> = host
        .attributes_of(run)
        .iter()
        .map(|attr| attr.simple_name.as_str())
        .collect();
    assert_eq!(run_attrs, vec!["A", "C"]);
    assert_eq!(host.attributes_of(f).len(), 1);
    assert!(host.attributes_of(SymbolId(999)).is_empty());
}

#[test]
fn test_flow_analysis_is_memoized_per_node() {
    let host = compile("fn Use(f) { } fn Main(a) { Use(() => a); }");
    let lambda = find(&host, SyntaxKind::is_lambda)[0];

    let first = host.flow_analysis(lambda);
    let second = host.flow_analysis(lambda);
    assert!(Arc::ptr_eq(&first, &second));
    assert!(first.succeeded);
}

#[test]
fn test_host_navigation_matches_tree() {
    let host = compile("fn Use(f) { } fn Main() { Use(() => 1); }");
    let lambda = find(&host, SyntaxKind::is_lambda)[0];

    let argument = host.parent(lambda).expect("parent");
    assert!(matches!(host.kind(argument), Some(SyntaxKind::Argument { name: None })));
    assert_eq!(host.children(argument), &[lambda]);
    assert_eq!(host.span(lambda), host.tree().span(lambda));
    assert_eq!(host.descendants(lambda, true)[0], lambda);
}
