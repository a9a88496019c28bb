//! Read-only semantic view that lint rules run against.
//!
//! Rules never touch the syntax tree or symbol table directly; they navigate
//! and query through `SemanticHost`, so the same rule can run over any front
//! end that implements it. `Compilation` is the reference implementation
//! backed by the fixture front end.

mod compilation;

pub use compilation::Compilation;

use std::sync::Arc;

use crate::core::diag::Span;
use crate::core::flow::FlowAnalysis;
use crate::core::resolve::{AttrRef, Symbol, SymbolId, SymbolInfo};
use crate::core::tree::{NodeId, SyntaxKind};

/// Hosts are shared across analysis workers, hence `Sync`.
pub trait SemanticHost: Sync {
    fn root(&self) -> Option<NodeId>;

    fn kind(&self, node: NodeId) -> Option<&SyntaxKind>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn children(&self, node: NodeId) -> &[NodeId];

    /// Pre-order walk of the subtree rooted at `node`.
    fn descendants(&self, node: NodeId, include_self: bool) -> Vec<NodeId>;

    fn span(&self, node: NodeId) -> Span;

    fn symbol_info(&self, node: NodeId) -> SymbolInfo;

    fn symbol(&self, id: SymbolId) -> Option<&Symbol>;

    fn attributes_of(&self, id: SymbolId) -> &[AttrRef] {
        self.symbol(id)
            .map(|symbol| symbol.attrs.as_slice())
            .unwrap_or(&[])
    }

    /// Flow facts for the region rooted at `scope`. Non-analyzable regions
    /// come back with `succeeded == false`.
    fn flow_analysis(&self, scope: NodeId) -> Arc<FlowAnalysis>;

    fn is_generated(&self, node: NodeId) -> bool;
}

#[cfg(test)]
#[path = "../../tests/host/t_host.rs"]
mod tests;
