//! Indented text dump of a syntax tree, used by `--dump tree`.

use std::fmt::Write;

use crate::core::tree::{NodeId, SyntaxTree};

pub fn format_tree(tree: &SyntaxTree) -> String {
    let mut out = String::new();
    if let Some(root) = tree.root() {
        format_node(tree, root, 0, &mut out);
    }
    out
}

fn format_node(tree: &SyntaxTree, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = tree.node(id) else {
        return;
    };
    let _ = writeln!(
        out,
        "{:indent$}{} [{}] @{}",
        "",
        node.kind,
        node.id,
        node.span,
        indent = depth * 2
    );
    for child in &node.children {
        format_node(tree, *child, depth + 1, out);
    }
}
