//! Region data-flow facts for the semantic host.
//!
//! A region is the subtree rooted at a lambda, block, statement or
//! expression. The analysis reports which variables the region declares,
//! reads and writes, and which variables lambdas inside the region capture
//! from outside themselves. Only variable symbols (parameters, locals and
//! `this`) are tracked.

mod cache;

pub use cache::FlowCache;

use indexmap::IndexSet;
use tracing::trace;

use crate::core::resolve::{SymbolId, SymbolTable};
use crate::core::tree::{NodeId, SyntaxKind, SyntaxTree};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowAnalysis {
    pub succeeded: bool,
    pub declared: IndexSet<SymbolId>,
    /// Variables read in the region, in first-read order.
    pub read_inside: IndexSet<SymbolId>,
    pub written_inside: IndexSet<SymbolId>,
    /// Variables referenced by a lambda in the region (the region included)
    /// and declared outside that lambda.
    pub captured: IndexSet<SymbolId>,
}

impl FlowAnalysis {
    pub fn failed() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Read,
    Write,
}

pub fn analyze(tree: &SyntaxTree, symbols: &SymbolTable, scope: NodeId) -> FlowAnalysis {
    let Some(kind) = tree.kind(scope) else {
        return FlowAnalysis::failed();
    };
    if !(kind.is_expr() || kind.is_stmt()) {
        trace!(node = %scope, kind = %kind, "flow: region root is not analyzable");
        return FlowAnalysis::failed();
    }

    let mut flow = FlowAnalysis {
        succeeded: true,
        ..FlowAnalysis::default()
    };

    for node in tree.descendants(scope, true) {
        let Some(kind) = tree.kind(node) else {
            continue;
        };
        match kind {
            SyntaxKind::Parameter { .. } | SyntaxKind::LocalDecl { .. } => {
                if let Some(symbol) = symbols.declared_symbol(node)
                    && is_variable(symbols, symbol)
                {
                    flow.declared.insert(symbol);
                }
            }
            SyntaxKind::Identifier { .. } => {
                let info = symbols.symbol_info(node);
                if info.is_unresolved() {
                    if is_callee(tree, node) {
                        continue;
                    }
                    trace!(node = %node, "flow: unresolved identifier in value position");
                    return FlowAnalysis::failed();
                }
                if let Some(this) = symbols.implicit_this(node) {
                    record(&mut flow, tree, symbols, scope, node, this, Access::Read);
                }
                if let Some(symbol) = info.symbol
                    && is_variable(symbols, symbol)
                {
                    let access = if is_assignment_target(tree, node) {
                        Access::Write
                    } else {
                        Access::Read
                    };
                    record(&mut flow, tree, symbols, scope, node, symbol, access);
                }
            }
            SyntaxKind::ThisExpr => {
                let Some(this) = symbols.symbol_info(node).symbol else {
                    trace!(node = %node, "flow: `this` outside an instance function");
                    return FlowAnalysis::failed();
                };
                record(&mut flow, tree, symbols, scope, node, this, Access::Read);
            }
            _ => {}
        }
    }

    trace!(
        node = %scope,
        declared = flow.declared.len(),
        read = flow.read_inside.len(),
        written = flow.written_inside.len(),
        captured = flow.captured.len(),
        "flow: analyzed region"
    );
    flow
}

fn record(
    flow: &mut FlowAnalysis,
    tree: &SyntaxTree,
    symbols: &SymbolTable,
    scope: NodeId,
    node: NodeId,
    symbol: SymbolId,
    access: Access,
) {
    match access {
        Access::Read => flow.read_inside.insert(symbol),
        Access::Write => flow.written_inside.insert(symbol),
    };
    if let Some(lambda) = innermost_lambda(tree, scope, node) {
        let decl = symbols.lookup(symbol).and_then(|symbol| symbol.decl);
        let declared_inside = decl.is_some_and(|decl| is_within(tree, decl, lambda));
        if !declared_inside {
            flow.captured.insert(symbol);
        }
    }
}

fn is_variable(symbols: &SymbolTable, symbol: SymbolId) -> bool {
    symbols
        .lookup(symbol)
        .is_some_and(|symbol| symbol.kind.is_variable())
}

/// Nearest lambda enclosing `node`, not looking past `scope`.
fn innermost_lambda(tree: &SyntaxTree, scope: NodeId, node: NodeId) -> Option<NodeId> {
    for ancestor in tree.ancestors(node) {
        if tree.kind(ancestor).is_some_and(SyntaxKind::is_lambda) {
            return Some(ancestor);
        }
        if ancestor == scope {
            break;
        }
    }
    None
}

fn is_within(tree: &SyntaxTree, node: NodeId, ancestor: NodeId) -> bool {
    node == ancestor || tree.ancestors(node).any(|parent| parent == ancestor)
}

fn is_callee(tree: &SyntaxTree, node: NodeId) -> bool {
    tree.parent(node).is_some_and(|parent| {
        matches!(tree.kind(parent), Some(SyntaxKind::Invocation))
            && tree.children(parent).first() == Some(&node)
    })
}

fn is_assignment_target(tree: &SyntaxTree, node: NodeId) -> bool {
    tree.parent(node).is_some_and(|parent| {
        matches!(tree.kind(parent), Some(SyntaxKind::Assignment))
            && tree.children(parent).first() == Some(&node)
    })
}

#[cfg(test)]
#[path = "../../tests/flow/t_flow.rs"]
mod tests;
