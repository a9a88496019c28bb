//! Lint rules over a `SemanticHost`.

pub mod diagnostics;
pub mod noncapturing;

pub use diagnostics::{
    Diagnostic, DiagnosticDescriptor, DiagnosticMetadata, DiagnosticSeverity, DiagnosticValue,
};

use crate::core::analysis::{AnalysisCancelled, CancellationToken};
use crate::core::host::SemanticHost;
use crate::core::tree::{NodeId, SyntaxKind};

/// A rule checked independently on each node of the kinds it applies to.
///
/// `check_node` must not keep state between calls; the analysis pass may
/// call it for different nodes from several threads at once.
pub trait Rule: Send + Sync {
    fn descriptor(&self) -> &DiagnosticDescriptor;

    fn applies_to(&self, kind: &SyntaxKind) -> bool;

    fn check_node(
        &self,
        host: &dyn SemanticHost,
        node: NodeId,
        cancel: &CancellationToken,
    ) -> Result<Option<Diagnostic>, AnalysisCancelled>;
}
