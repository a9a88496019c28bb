//! Flags lambdas that capture outer variables when passed to a parameter
//! (or a function) marked as requiring a non-capturing lambda.
//!
//! Per lambda: bind it to a formal parameter of the resolved callee, check
//! the marker on the callee and the parameter, then compute the captured
//! variables. Every step that cannot give a definite answer drops the
//! lambda without a diagnostic.

pub mod call_site;
pub mod capture;
pub mod config;
pub mod constraint;
pub mod report;

pub use call_site::ParameterBinding;
pub use config::{DEFAULT_MARKER, MatchMode, RuleConfig};
pub use constraint::MarkerMatcher;

use tracing::debug;

use crate::core::analysis::{AnalysisCancelled, CancellationToken};
use crate::core::host::SemanticHost;
use crate::core::lint::{Diagnostic, DiagnosticDescriptor, DiagnosticSeverity, Rule};
use crate::core::resolve::SymbolId;
use crate::core::tree::{NodeId, SyntaxKind};

pub const DIAGNOSTIC_ID: &str = "CAP0001";

pub static DESCRIPTOR: DiagnosticDescriptor = DiagnosticDescriptor {
    id: DIAGNOSTIC_ID,
    title: "Lambda must not capture",
    message_template: "{0}( {1} ) requires a non-capturing lambda. Captured variables: {2}.",
    category: "Performance",
    default_severity: DiagnosticSeverity::Error,
    enabled_by_default: true,
};

#[derive(Debug, Clone)]
pub struct NonCapturingLambdaRule {
    config: RuleConfig,
    matcher: MarkerMatcher,
}

impl Default for NonCapturingLambdaRule {
    fn default() -> Self {
        Self::new(RuleConfig::default())
    }
}

impl NonCapturingLambdaRule {
    pub fn new(config: RuleConfig) -> Self {
        let matcher = MarkerMatcher::new(&config);
        Self { config, matcher }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn check(&self, host: &dyn SemanticHost, lambda: NodeId) -> Option<Diagnostic> {
        check_with(host, lambda, &self.matcher)
    }
}

impl Rule for NonCapturingLambdaRule {
    fn descriptor(&self) -> &DiagnosticDescriptor {
        &DESCRIPTOR
    }

    fn applies_to(&self, kind: &SyntaxKind) -> bool {
        kind.is_lambda()
    }

    fn check_node(
        &self,
        host: &dyn SemanticHost,
        node: NodeId,
        cancel: &CancellationToken,
    ) -> Result<Option<Diagnostic>, AnalysisCancelled> {
        cancel.check()?;
        Ok(self.check(host, node))
    }
}

/// Checks one lambda against `config`.
pub fn check_lambda(
    host: &dyn SemanticHost,
    lambda: NodeId,
    config: &RuleConfig,
) -> Option<Diagnostic> {
    check_with(host, lambda, &MarkerMatcher::new(config))
}

fn check_with(
    host: &dyn SemanticHost,
    lambda: NodeId,
    matcher: &MarkerMatcher,
) -> Option<Diagnostic> {
    if !host.kind(lambda).is_some_and(SyntaxKind::is_lambda) {
        return None;
    }

    let binding = call_site::resolve(host, lambda)?;
    if !matcher.is_constrained(host, binding.callee)
        && !matcher.is_constrained(host, binding.parameter)
    {
        debug!(node = %lambda, callee = %binding.callee, "non-capturing: not constrained");
        return None;
    }

    let violations = capture::captured_violations(host, lambda);
    if violations.is_empty() {
        return None;
    }

    let name_of = |id: SymbolId| host.symbol(id).map(|symbol| symbol.name.clone());
    let callee = name_of(binding.callee)?;
    let parameter = name_of(binding.parameter)?;
    let captures: Vec<String> = violations.into_iter().filter_map(name_of).collect();

    report::report(host.span(lambda), &callee, &parameter, &captures)
}

#[cfg(test)]
#[path = "../../../tests/lint/t_noncapturing.rs"]
mod tests;
