use crate::core::diag::Span;
use crate::core::lint::{Diagnostic, DiagnosticMetadata, DiagnosticValue};

use super::DESCRIPTOR;

pub const CALLEE_KEY: &str = "callee";
pub const PARAMETER_KEY: &str = "parameter";
pub const CAPTURES_KEY: &str = "captures";

/// One diagnostic for a violating lambda, or `None` when nothing was
/// captured.
pub fn report(span: Span, callee: &str, parameter: &str, captures: &[String]) -> Option<Diagnostic> {
    if captures.is_empty() {
        return None;
    }

    let joined = captures.join(", ");
    let mut metadata = DiagnosticMetadata::new();
    metadata.insert(
        CALLEE_KEY.to_string(),
        DiagnosticValue::String(callee.to_string()),
    );
    metadata.insert(
        PARAMETER_KEY.to_string(),
        DiagnosticValue::String(parameter.to_string()),
    );
    metadata.insert(
        CAPTURES_KEY.to_string(),
        DiagnosticValue::StringList(captures.to_vec()),
    );

    Some(Diagnostic::new(
        &DESCRIPTOR,
        span,
        &[callee, parameter, joined.as_str()],
        metadata,
    ))
}
