use super::*;
use crate::core::host::Compilation;
use crate::core::lint::DiagnosticValue;
use crate::core::resolve::AttrRef;
use indoc::indoc;

fn compile(source: &str) -> Compilation {
    Compilation::from_source(source).expect("Failed to compile")
}

fn lambdas(host: &Compilation) -> Vec<NodeId> {
    let root = host.root().expect("root");
    host.descendants(root, true)
        .into_iter()
        .filter(|node| host.kind(*node).is_some_and(SyntaxKind::is_lambda))
        .collect()
}

fn check_all(source: &str, config: RuleConfig) -> Vec<Diagnostic> {
    let host = compile(source);
    let rule = NonCapturingLambdaRule::new(config);
    let mut diagnostics: Vec<Diagnostic> = lambdas(&host)
        .into_iter()
        .filter_map(|lambda| rule.check(&host, lambda))
        .collect();
    diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    diagnostics
}

fn messages(source: &str) -> Vec<String> {
    check_all(source, RuleConfig::default())
        .into_iter()
        .map(|diagnostic| diagnostic.message)
        .collect()
}

#[test]
fn test_unconstrained_callee_is_ignored() {
    let source = indoc! {"
        fn Invoke(f) { }
        fn Main(a) { Invoke(() => a); }
    "};
    assert!(messages(source).is_empty());
}

#[test]
fn test_constrained_without_capture_is_ignored() {
    let source = indoc! {"
        type T {
            static var shared;
            static fn Invoke(@[NonCapturing] f) { }
            static fn Main() { Invoke(x => x + shared + 1); }
        }
    "};
    assert!(messages(source).is_empty());
}

#[test]
fn test_field_read_in_instance_method_captures_this() {
    let source = indoc! {"
        type Worker {
            var _field;
            static fn Invoke(@[NonCapturing] func) { }
            fn Run() {
                Invoke(() => _field);
            }
        }
    "};
    let diagnostics = check_all(source, RuleConfig::default());
    assert_eq!(diagnostics.len(), 1);

    let diagnostic = &diagnostics[0];
    assert_eq!(
        diagnostic.message,
        "Invoke( func ) requires a non-capturing lambda. Captured variables: this."
    );
    assert_eq!(diagnostic.code, "CAP0001");
    assert_eq!(diagnostic.category, "Performance");
    assert_eq!(diagnostic.severity, DiagnosticSeverity::Error);
    assert_eq!(
        (diagnostic.span.start.line, diagnostic.span.start.column),
        (5, 16)
    );
    assert_eq!(
        (diagnostic.span.end.line, diagnostic.span.end.column),
        (5, 28)
    );
    assert_eq!(
        diagnostic.metadata.get(report::CALLEE_KEY),
        Some(&DiagnosticValue::String("Invoke".to_string()))
    );
    assert_eq!(
        diagnostic.metadata.get(report::PARAMETER_KEY),
        Some(&DiagnosticValue::String("func".to_string()))
    );
    assert_eq!(
        diagnostic.metadata.get(report::CAPTURES_KEY),
        Some(&DiagnosticValue::StringList(vec!["this".to_string()]))
    );
}

#[test]
fn test_named_arguments_bind_by_name() {
    let source = indoc! {"
        type Worker {
            var _field;
            static fn Invoke(seed, @[NonCapturing] func) { }
            fn Run() {
                Invoke(func: s => s + _field, seed: 64);
            }
        }
    "};
    assert_eq!(
        messages(source),
        vec!["Invoke( func ) requires a non-capturing lambda. Captured variables: this."]
    );
}

#[test]
fn test_overflow_arguments_bind_to_variadic_parameter() {
    let source = indoc! {r#"
        fn Schedule(name, @[NonCapturing] ...jobs) { }
        fn Main(x) {
            Schedule("a", () => 1, () => x, y => y + x);
        }
    "#};
    assert_eq!(
        messages(source),
        vec![
            "Schedule( jobs ) requires a non-capturing lambda. Captured variables: x.",
            "Schedule( jobs ) requires a non-capturing lambda. Captured variables: x.",
        ]
    );
}

#[test]
fn test_marker_on_callee_constrains_every_parameter() {
    let source = indoc! {"
        @[NonCapturing]
        fn Each(items, f) { }
        fn Main(items, limit) { Each(items, v => v < limit); }
    "};
    assert_eq!(
        messages(source),
        vec!["Each( f ) requires a non-capturing lambda. Captured variables: limit."]
    );
}

#[test]
fn test_nested_lambda_locals_are_not_reported() {
    let source = indoc! {"
        type Worker {
            var _field;
            static fn Invoke(@[NonCapturing] func) { }
            static fn Run(f) { }
            fn Start() {
                Invoke(() => {
                    let local = 1;
                    Run(() => local);
                });
                Invoke(() => {
                    let local = _field;
                    Run(x => local + x);
                });
            }
        }
    "};
    assert_eq!(
        messages(source),
        vec!["Invoke( func ) requires a non-capturing lambda. Captured variables: this."]
    );
}

#[test]
fn test_shadowing_lambda_parameter_is_not_reported() {
    let source = indoc! {"
        fn Invoke(@[NonCapturing] f) { }
        fn Run(g) { }
        fn Main(x) {
            Invoke(() => Run(x => x));
            Invoke(() => x + Run(x => x));
        }
    "};
    assert_eq!(
        messages(source),
        vec!["Invoke( f ) requires a non-capturing lambda. Captured variables: x."]
    );
}

#[test]
fn test_parenthesized_lambda_argument_is_ignored() {
    let source = indoc! {"
        fn Invoke(@[NonCapturing] f) { }
        fn Main(x) { Invoke((() => x)); }
    "};
    let host = compile(source);
    let lambda = lambdas(&host)[0];
    let parent = host.parent(lambda).expect("parent");
    assert_eq!(host.kind(parent), Some(&SyntaxKind::Parenthesized));

    assert!(messages(source).is_empty());
}

#[test]
fn test_captures_listed_in_first_read_order() {
    let source = indoc! {"
        fn Invoke(@[NonCapturing] f) { }
        fn Main(a, b) {
            let c = 0;
            Invoke(() => { c = b + a; return c; });
        }
    "};
    assert_eq!(
        messages(source),
        vec!["Invoke( f ) requires a non-capturing lambda. Captured variables: b, a, c."]
    );
}

#[test]
fn test_rerun_is_idempotent() {
    let source = indoc! {"
        fn Invoke(@[NonCapturing] f) { }
        fn Main(a, b) {
            Invoke(() => a);
            Invoke(() => b);
        }
    "};
    let host = compile(source);
    let rule = NonCapturingLambdaRule::default();
    let run = || {
        lambdas(&host)
            .into_iter()
            .filter_map(|lambda| rule.check(&host, lambda))
            .collect::<Vec<_>>()
    };

    let first = run();
    assert_eq!(first.len(), 2);
    assert_eq!(first, run());
}

#[test]
fn test_lambda_outside_argument_position_is_ignored() {
    let source = indoc! {"
        fn Invoke(@[NonCapturing] f) { }
        fn Make(a) { return () => a; }
        fn Main(a) {
            let g = () => a;
            Invoke(g);
        }
    "};
    assert!(messages(source).is_empty());
}

#[test]
fn test_ambiguous_callee_is_ignored() {
    let source = indoc! {"
        fn Invoke(@[NonCapturing] f) { }
        fn Invoke(@[NonCapturing] g) { }
        fn Main(a) { Invoke(() => a); }
    "};
    assert!(messages(source).is_empty());
}

#[test]
fn test_failed_flow_analysis_is_ignored() {
    let source = indoc! {"
        fn Invoke(@[NonCapturing] f) { }
        fn Main(a) { Invoke(() => a + missing); }
    "};
    assert!(messages(source).is_empty());
}

#[test]
fn test_positional_index_counts_named_arguments() {
    let source = indoc! {"
        fn Invoke(seed, @[NonCapturing] func) { }
        fn Main(a) { Invoke(seed: 1, () => a); }
    "};
    assert_eq!(
        messages(source),
        vec!["Invoke( func ) requires a non-capturing lambda. Captured variables: a."]
    );
}

#[test]
fn test_instance_callee_through_this() {
    let source = indoc! {"
        type Worker {
            fn Invoke(@[NonCapturing] f) { }
            fn Run(n) { this.Invoke(() => n); }
        }
    "};
    assert_eq!(
        messages(source),
        vec!["Invoke( f ) requires a non-capturing lambda. Captured variables: n."]
    );
}

#[test]
fn test_match_modes() {
    let source = indoc! {"
        fn A(@[Other.NonCapturing] f) { }
        fn B(@[Perf.NonCapturing] f) { }
        fn C(@[NonCapturing] f) { }
        fn Main(x) { A(() => x); B(() => x); C(() => x); }
    "};
    let callees = |config: RuleConfig| -> Vec<String> {
        check_all(source, config)
            .into_iter()
            .filter_map(|d| match d.metadata.get(report::CALLEE_KEY) {
                Some(DiagnosticValue::String(name)) => Some(name.clone()),
                _ => None,
            })
            .collect()
    };

    assert_eq!(
        callees(RuleConfig::with_marker("Perf.NonCapturing")),
        vec!["A", "B", "C"]
    );
    assert_eq!(
        callees(RuleConfig::with_marker("Perf.NonCapturing").match_mode(MatchMode::Qualified)),
        vec!["B", "C"]
    );
    assert!(callees(RuleConfig::with_marker("NoAlloc")).is_empty());
}

#[test]
fn test_marker_matcher() {
    let attr = |path: &[&str]| {
        let path: Vec<String> = path.iter().map(|s| s.to_string()).collect();
        AttrRef::from_path(&path, Default::default())
    };

    let simple = MarkerMatcher::new(&RuleConfig::with_marker("Perf.NonCapturing"));
    assert_eq!(simple.simple_name(), "NonCapturing");
    assert_eq!(simple.qualified_name(), Some("Perf.NonCapturing"));
    assert!(simple.matches(&attr(&["Other", "NonCapturing"])));
    assert!(!simple.matches(&attr(&["NonCapturingAttr"])));

    let qualified = MarkerMatcher::new(
        &RuleConfig::with_marker("Perf.NonCapturing").match_mode(MatchMode::Qualified),
    );
    assert!(qualified.matches(&attr(&["Perf", "NonCapturing"])));
    assert!(!qualified.matches(&attr(&["Other", "NonCapturing"])));
    assert!(qualified.matches(&attr(&["NonCapturing"])));

    // An unqualified marker falls back to simple names in either mode.
    let bare = MarkerMatcher::new(&RuleConfig::default().match_mode(MatchMode::Qualified));
    assert!(bare.matches(&attr(&["Other", "NonCapturing"])));

    let empty = MarkerMatcher::new(&RuleConfig::with_marker(""));
    assert!(!empty.matches(&attr(&[""])));
}

#[test]
fn test_bind_positional() {
    let params = [SymbolId(3), SymbolId(4)];
    assert_eq!(call_site::bind_positional(&params, 0), Some(SymbolId(3)));
    assert_eq!(call_site::bind_positional(&params, 1), Some(SymbolId(4)));
    assert_eq!(call_site::bind_positional(&params, 7), Some(SymbolId(4)));
    assert_eq!(call_site::bind_positional(&[], 0), None);
}

#[test]
fn test_call_site_binding() {
    let source = indoc! {"
        fn Invoke(seed, f) { }
        fn Main() { Invoke(1, () => 2); }
    "};
    let host = compile(source);
    let lambda = lambdas(&host)[0];

    let binding = call_site::resolve(&host, lambda).expect("binding");
    let name = |id| host.symbol(id).map(|s| s.name.clone());
    assert_eq!(name(binding.callee).as_deref(), Some("Invoke"));
    assert_eq!(name(binding.parameter).as_deref(), Some("f"));
    assert_eq!(host.kind(binding.invocation), Some(&SyntaxKind::Invocation));
}

#[test]
fn test_captured_violations_direct() {
    let source = indoc! {"
        fn Use(f) { }
        fn Main(a) {
            Use(() => {
                let inner = a;
                Use(x => inner + x);
            });
        }
    "};
    let host = compile(source);
    let root = host.root().expect("root");
    let outer = host
        .descendants(root, true)
        .into_iter()
        .find(|node| host.kind(*node).is_some_and(SyntaxKind::is_lambda))
        .expect("outer lambda");

    let violations = capture::captured_violations(&host, outer);
    let names: Vec<String> = violations
        .iter()
        .filter_map(|id| host.symbol(*id).map(|s| s.name.clone()))
        .collect();
    assert_eq!(names, vec!["a"]);
}

#[test]
fn test_check_lambda_ignores_other_nodes() {
    let host = compile("fn Main() { }");
    let root = host.root().expect("root");
    assert!(check_lambda(&host, root, &RuleConfig::default()).is_none());
}

#[test]
fn test_rule_descriptor_and_cancellation() {
    let rule = NonCapturingLambdaRule::default();
    let descriptor = rule.descriptor();
    assert_eq!(descriptor.id, "CAP0001");
    assert_eq!(descriptor.category, "Performance");
    assert_eq!(descriptor.default_severity, DiagnosticSeverity::Error);
    assert!(descriptor.enabled_by_default);
    assert_eq!(
        descriptor.format_message(&["F", "p", "a, b"]),
        "F( p ) requires a non-capturing lambda. Captured variables: a, b."
    );
    assert!(rule.applies_to(&SyntaxKind::SimpleLambda));
    assert!(rule.applies_to(&SyntaxKind::ParenthesizedLambda));
    assert!(!rule.applies_to(&SyntaxKind::Invocation));

    let host = compile("fn Invoke(@[NonCapturing] f) { } fn Main(a) { Invoke(() => a); }");
    let lambda = lambdas(&host)[0];
    let cancel = CancellationToken::new();
    assert!(matches!(rule.check_node(&host, lambda, &cancel), Ok(Some(_))));

    cancel.cancel();
    assert_eq!(
        rule.check_node(&host, lambda, &cancel),
        Err(AnalysisCancelled)
    );
}
