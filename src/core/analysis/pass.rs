use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::core::analysis::{AnalysisCancelled, AnalysisOptions, CancellationToken};
use crate::core::host::SemanticHost;
use crate::core::lint::noncapturing::{NonCapturingLambdaRule, RuleConfig};
use crate::core::lint::{Diagnostic, Rule};
use crate::core::tree::NodeId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisReport {
    /// Sorted by span, then code.
    pub diagnostics: Vec<Diagnostic>,
    pub checked_nodes: usize,
    /// Set when cancellation stopped the pass before every node was checked.
    pub cancelled: bool,
}

pub fn default_rules(config: &RuleConfig) -> Vec<Box<dyn Rule>> {
    vec![Box::new(NonCapturingLambdaRule::new(config.clone()))]
}

/// Runs the default rule set configured by `options`.
pub fn analyze(
    host: &dyn SemanticHost,
    options: &AnalysisOptions,
    cancel: &CancellationToken,
) -> AnalysisReport {
    let rules = default_rules(&options.rule);
    run_rules(host, &rules, options, cancel)
}

pub fn run_rules(
    host: &dyn SemanticHost,
    rules: &[Box<dyn Rule>],
    options: &AnalysisOptions,
    cancel: &CancellationToken,
) -> AnalysisReport {
    let work = collect_work(host, rules, options);
    let jobs = options.parallelism.max(1).min(work.len().max(1));

    let check = |&(index, node): &(usize, NodeId)| rules[index].check_node(host, node, cancel);
    let outcomes: Vec<Result<Option<Diagnostic>, AnalysisCancelled>> = if jobs == 1 {
        work.iter().map(&check).collect()
    } else {
        match ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(|| work.par_iter().map(&check).collect()),
            Err(e) => {
                warn!(error = %e, "failed to build worker pool, checking sequentially");
                work.iter().map(&check).collect()
            }
        }
    };

    let mut report = AnalysisReport::default();
    for outcome in outcomes {
        match outcome {
            Ok(diagnostic) => {
                report.checked_nodes += 1;
                report.diagnostics.extend(diagnostic);
            }
            Err(AnalysisCancelled) => report.cancelled = true,
        }
    }
    report.diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    info!(
        nodes = work.len(),
        checked = report.checked_nodes,
        diagnostics = report.diagnostics.len(),
        jobs,
        cancelled = report.cancelled,
        "analysis pass finished"
    );
    report
}

/// (rule index, node) pairs in tree order.
fn collect_work(
    host: &dyn SemanticHost,
    rules: &[Box<dyn Rule>],
    options: &AnalysisOptions,
) -> Vec<(usize, NodeId)> {
    let Some(root) = host.root() else {
        return Vec::new();
    };
    let mut work = Vec::new();
    for node in host.descendants(root, true) {
        let Some(kind) = host.kind(node) else {
            continue;
        };
        for (index, rule) in rules.iter().enumerate() {
            if !rule.descriptor().enabled_by_default || !rule.applies_to(kind) {
                continue;
            }
            if !options.include_generated && host.is_generated(node) {
                debug!(node = %node, "skipping generated code");
                continue;
            }
            work.push((index, node));
        }
    }
    work
}
