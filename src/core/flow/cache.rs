use std::sync::{Arc, OnceLock};

use crate::core::tree::NodeId;

use super::FlowAnalysis;

/// Write-once flow results, one slot per syntax node.
///
/// Slots are filled on first request and shared afterwards, so concurrent
/// readers see the same `Arc` for a node.
#[derive(Debug, Default)]
pub struct FlowCache {
    slots: Vec<OnceLock<Arc<FlowAnalysis>>>,
}

impl FlowCache {
    pub fn new(node_count: usize) -> Self {
        Self {
            slots: (0..node_count).map(|_| OnceLock::new()).collect(),
        }
    }

    pub fn get_or_compute<F>(&self, node: NodeId, compute: F) -> Arc<FlowAnalysis>
    where
        F: FnOnce() -> FlowAnalysis,
    {
        match self.slots.get(node.index()) {
            Some(slot) => slot.get_or_init(|| Arc::new(compute())).clone(),
            None => Arc::new(compute()),
        }
    }

    pub fn cached(&self, node: NodeId) -> Option<Arc<FlowAnalysis>> {
        self.slots.get(node.index())?.get().cloned()
    }
}
