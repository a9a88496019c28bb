use super::*;
use crate::core::lexer::{LexError, Lexer, Token};
use crate::core::parse::Parser;
use crate::core::resolve::resolve;
use indoc::indoc;

fn build(source: &str) -> (SyntaxTree, SymbolTable) {
    let tokens = Lexer::new(source)
        .tokenize()
        .collect::<Result<Vec<Token>, LexError>>()
        .expect("Failed to tokenize");
    let tree = Parser::new(&tokens).parse().expect("Failed to parse");
    let symbols = resolve(&tree).expect("Failed to resolve");
    (tree, symbols)
}

fn lambdas(tree: &SyntaxTree) -> Vec<NodeId> {
    // Outermost first.
    let mut found: Vec<NodeId> = tree
        .nodes()
        .filter(|node| node.kind.is_lambda())
        .map(|node| node.id)
        .collect();
    found.sort_by_key(|id| tree.ancestors(*id).count());
    found
}

fn names(symbols: &SymbolTable, set: &IndexSet<SymbolId>) -> Vec<String> {
    set.iter()
        .filter_map(|id| symbols.lookup(*id))
        .map(|symbol| symbol.name.clone())
        .collect()
}

#[test]
fn test_flow_lambda_reading_field_captures_this() {
    let source = indoc! {"
        type Worker {
            var _field;
            static fn Invoke(f) { }
            fn Run() { Invoke(() => _field); }
        }
    "};
    let (tree, symbols) = build(source);
    let flow = analyze(&tree, &symbols, lambdas(&tree)[0]);

    assert!(flow.succeeded);
    assert!(flow.declared.is_empty());
    assert_eq!(names(&symbols, &flow.read_inside), vec!["this"]);
    assert_eq!(names(&symbols, &flow.captured), vec!["this"]);
}

#[test]
fn test_flow_sets_in_first_read_order() {
    let source = indoc! {"
        fn Use(f) { }
        fn Main(a, b) {
            let c = 1;
            Use(x => {
                let y = b + a;
                c = y + x + b;
            });
        }
    "};
    let (tree, symbols) = build(source);
    let flow = analyze(&tree, &symbols, lambdas(&tree)[0]);

    assert!(flow.succeeded);
    assert_eq!(names(&symbols, &flow.declared), vec!["x", "y"]);
    assert_eq!(names(&symbols, &flow.read_inside), vec!["b", "a", "y", "x"]);
    assert_eq!(names(&symbols, &flow.written_inside), vec!["c"]);
    assert_eq!(names(&symbols, &flow.captured), vec!["b", "a", "c"]);
}

#[test]
fn test_flow_nested_lambda_reports_inner_captures() {
    let source = indoc! {"
        fn Use(f) { }
        fn Main() {
            Use(() => {
                let y = 1;
                Use(() => y);
            });
        }
    "};
    let (tree, symbols) = build(source);
    let found = lambdas(&tree);
    let &[outer, inner] = found.as_slice() else {
        panic!("expected two lambdas");
    };

    // `y` is captured by the inner lambda even though the outer one declares it.
    let outer_flow = analyze(&tree, &symbols, outer);
    assert_eq!(names(&symbols, &outer_flow.declared), vec!["y"]);
    assert_eq!(names(&symbols, &outer_flow.read_inside), vec!["y"]);
    assert_eq!(names(&symbols, &outer_flow.captured), vec!["y"]);

    let inner_flow = analyze(&tree, &symbols, inner);
    assert!(inner_flow.declared.is_empty());
    assert_eq!(names(&symbols, &inner_flow.captured), vec!["y"]);
}

#[test]
fn test_flow_block_region_without_lambdas_captures_nothing() {
    let source = indoc! {"
        fn Main(a) {
            let b = a;
            b = b + 1;
        }
    "};
    let (tree, symbols) = build(source);
    let block = tree
        .nodes()
        .find(|node| node.kind == SyntaxKind::Block)
        .map(|node| node.id)
        .expect("block");

    let flow = analyze(&tree, &symbols, block);
    assert!(flow.succeeded);
    assert_eq!(names(&symbols, &flow.declared), vec!["b"]);
    assert_eq!(names(&symbols, &flow.read_inside), vec!["a", "b"]);
    assert_eq!(names(&symbols, &flow.written_inside), vec!["b"]);
    assert!(flow.captured.is_empty());
}

#[test]
fn test_flow_unresolved_identifier_fails() {
    let source = "fn Use(f) { } fn Main() { Use(() => missing); }";
    let (tree, symbols) = build(source);

    let flow = analyze(&tree, &symbols, lambdas(&tree)[0]);
    assert_eq!(flow, FlowAnalysis::failed());
}

#[test]
fn test_flow_unresolved_callee_is_tolerated() {
    let source = "fn Use(f) { } fn Main(a) { Use(() => Missing(a)); }";
    let (tree, symbols) = build(source);

    let flow = analyze(&tree, &symbols, lambdas(&tree)[0]);
    assert!(flow.succeeded);
    assert_eq!(names(&symbols, &flow.captured), vec!["a"]);
}

#[test]
fn test_flow_non_analyzable_root_fails() {
    let (tree, symbols) = build("fn Main() { }");
    let root = tree.root().expect("root");
    assert!(!analyze(&tree, &symbols, root).succeeded);

    let func = tree.children(root)[0];
    assert!(!analyze(&tree, &symbols, func).succeeded);
}

#[test]
fn test_flow_explicit_this_is_read() {
    let source = indoc! {"
        type T {
            var v;
            static fn Use(f) { }
            fn Run() { Use(() => this.v); }
        }
    "};
    let (tree, symbols) = build(source);
    let flow = analyze(&tree, &symbols, lambdas(&tree)[0]);
    assert_eq!(names(&symbols, &flow.captured), vec!["this"]);
}

#[test]
fn test_flow_cache_is_write_once() {
    let (tree, symbols) = build("fn Use(f) { } fn Main(a) { Use(() => a); }");
    let lambda = lambdas(&tree)[0];
    let cache = FlowCache::new(tree.len());

    assert!(cache.cached(lambda).is_none());
    let first = cache.get_or_compute(lambda, || analyze(&tree, &symbols, lambda));
    let second = cache.get_or_compute(lambda, || panic!("computed twice"));
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert!(cache.cached(lambda).is_some());

    // Out-of-range nodes are computed without caching.
    let outside = cache.get_or_compute(NodeId(10_000), FlowAnalysis::failed);
    assert!(!outside.succeeded);
}
