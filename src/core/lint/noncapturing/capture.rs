//! Outer variables a lambda actually captures.

use indexmap::IndexSet;
use tracing::debug;

use crate::core::host::SemanticHost;
use crate::core::resolve::SymbolId;
use crate::core::tree::NodeId;

/// Variables read by `lambda` and declared outside it, in first-read order.
///
/// The host reports variables that a nested lambda captures from the
/// analyzed lambda as captured too; anything declared by `lambda` or any
/// lambda nested in it is dropped.
pub fn captured_violations(host: &dyn SemanticHost, lambda: NodeId) -> IndexSet<SymbolId> {
    let flow = host.flow_analysis(lambda);
    if !flow.succeeded {
        debug!(node = %lambda, "non-capturing: flow analysis failed");
        return IndexSet::new();
    }

    let candidates: IndexSet<SymbolId> = flow
        .read_inside
        .iter()
        .copied()
        .filter(|symbol| flow.captured.contains(symbol))
        .collect();
    if candidates.is_empty() {
        return candidates;
    }

    let mut declared_inside = IndexSet::new();
    for nested in host.descendants(lambda, true) {
        if !host.kind(nested).is_some_and(|kind| kind.is_lambda()) {
            continue;
        }
        let nested_flow = host.flow_analysis(nested);
        if nested_flow.succeeded {
            declared_inside.extend(nested_flow.declared.iter().copied());
        }
    }

    candidates
        .into_iter()
        .filter(|symbol| !declared_inside.contains(symbol))
        .collect()
}
