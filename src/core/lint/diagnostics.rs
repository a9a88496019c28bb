//! Diagnostic model shared by lint rules and output adapters.
//!
//! Each rule publishes a static `DiagnosticDescriptor`; findings are
//! `Diagnostic` values carrying the descriptor's code and category plus
//! structured metadata for machine consumers.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::core::diag::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Hidden,
    Info,
    Warning,
    Error,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticSeverity::Hidden => "hidden",
            DiagnosticSeverity::Info => "info",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum DiagnosticValue {
    String(String),
    Number(i64),
    Bool(bool),
    StringList(Vec<String>),
}

pub type DiagnosticMetadata = BTreeMap<String, DiagnosticValue>;

/// Static description of a diagnostic a rule can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticDescriptor {
    pub id: &'static str,
    pub title: &'static str,
    /// Message with positional placeholders `{0}`, `{1}`, ...
    pub message_template: &'static str,
    pub category: &'static str,
    pub default_severity: DiagnosticSeverity,
    pub enabled_by_default: bool,
}

impl DiagnosticDescriptor {
    pub fn format_message(&self, args: &[&str]) -> String {
        args.iter()
            .enumerate()
            .fold(self.message_template.to_string(), |message, (i, arg)| {
                message.replace(&format!("{{{i}}}"), arg)
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: String,
    pub severity: DiagnosticSeverity,
    pub category: String,
    pub span: Span,
    pub message: String,
    pub metadata: DiagnosticMetadata,
}

impl Diagnostic {
    pub fn new(
        descriptor: &DiagnosticDescriptor,
        span: Span,
        args: &[&str],
        metadata: DiagnosticMetadata,
    ) -> Self {
        Self {
            code: descriptor.id.to_string(),
            severity: descriptor.default_severity,
            category: descriptor.category.to_string(),
            span,
            message: descriptor.format_message(args),
            metadata,
        }
    }

    /// Ordering key used to report diagnostics deterministically.
    pub fn sort_key(&self) -> (usize, usize, &str, &str) {
        (
            self.span.start.offset,
            self.span.end.offset,
            self.code.as_str(),
            self.message.as_str(),
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {}: {}",
            self.severity, self.code, self.span, self.message
        )
    }
}
