//! Rule execution over a semantic host.

mod cancel;
mod pass;

pub use cancel::{AnalysisCancelled, CancellationToken};
pub use pass::{AnalysisReport, analyze, default_rules, run_rules};

use crate::core::lint::noncapturing::RuleConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub rule: RuleConfig,
    /// Worker threads; `1` runs on the calling thread.
    pub parallelism: usize,
    /// Also check nodes inside `@[generated]` declarations.
    pub include_generated: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            rule: RuleConfig::default(),
            parallelism: 1,
            include_generated: false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/analysis/t_pass.rs"]
mod tests;
