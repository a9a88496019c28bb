use super::*;
use crate::core::tree::format::format_tree;

fn ident(tree: &mut SyntaxTree, name: &str) -> NodeId {
    tree.alloc(
        SyntaxKind::Identifier {
            name: name.to_string(),
        },
        Span::default(),
        Vec::new(),
    )
}

/// SourceFile
///   ExprStmt
///     Binary +
///       Identifier a
///       Identifier b
fn sample_tree() -> (SyntaxTree, [NodeId; 5]) {
    let mut tree = SyntaxTree::new();
    let a = ident(&mut tree, "a");
    let b = ident(&mut tree, "b");
    let add = tree.alloc(
        SyntaxKind::Binary { op: BinaryOp::Add },
        Span::default(),
        vec![a, b],
    );
    let stmt = tree.alloc(SyntaxKind::ExprStmt, Span::default(), vec![add]);
    let file = tree.alloc(SyntaxKind::SourceFile, Span::default(), vec![stmt]);
    (tree, [file, stmt, add, a, b])
}

#[test]
fn test_alloc_links_parents_and_root() {
    let (tree, [file, stmt, add, a, b]) = sample_tree();

    assert_eq!(tree.root(), Some(file));
    assert_eq!(tree.len(), 5);
    assert_eq!(tree.parent(a), Some(add));
    assert_eq!(tree.parent(b), Some(add));
    assert_eq!(tree.parent(add), Some(stmt));
    assert_eq!(tree.parent(file), None);
    assert_eq!(tree.children(add), &[a, b]);
}

#[test]
fn test_descendants_pre_order() {
    let (tree, [file, stmt, add, a, b]) = sample_tree();

    assert_eq!(tree.descendants(file, true), vec![file, stmt, add, a, b]);
    assert_eq!(tree.descendants(stmt, false), vec![add, a, b]);
    assert_eq!(tree.descendants(a, false), Vec::<NodeId>::new());
}

#[test]
fn test_ancestors_nearest_first() {
    let (tree, [file, stmt, add, a, _]) = sample_tree();
    assert_eq!(tree.ancestors(a).collect::<Vec<_>>(), vec![add, stmt, file]);
}

#[test]
fn test_missing_node_queries_are_empty() {
    let (tree, _) = sample_tree();
    let missing = NodeId(99);

    assert!(tree.kind(missing).is_none());
    assert!(tree.children(missing).is_empty());
    assert_eq!(tree.span(missing), Span::default());
}

#[test]
fn test_kind_helpers() {
    assert!(SyntaxKind::SimpleLambda.is_lambda());
    assert!(SyntaxKind::ParenthesizedLambda.is_expr());
    assert!(SyntaxKind::Block.is_stmt());
    assert!(SyntaxKind::Parenthesized.is_expr());
    assert!(!SyntaxKind::Parenthesized.is_lambda());
    assert!(!SyntaxKind::ArgumentList.is_expr());
    assert!(!SyntaxKind::FuncDecl {
        name: "f".to_string(),
        is_static: true
    }
    .is_stmt());
    assert_eq!(
        SyntaxKind::MemberAccess {
            name: "Run".to_string()
        }
        .name(),
        Some("Run")
    );
    assert_eq!(SyntaxKind::Invocation.name(), None);
}

#[test]
fn test_format_tree_indents_children() {
    let (tree, _) = sample_tree();
    let dump = format_tree(&tree);
    let lines: Vec<&str> = dump.lines().collect();

    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("SourceFile [4]"));
    assert!(lines[1].starts_with("  ExprStmt [3]"));
    assert!(lines[2].starts_with("    Binary + [2]"));
    assert!(lines[3].starts_with("      Identifier a [0]"));
}
