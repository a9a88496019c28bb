use std::path::Path;

use serde::Serialize;

use crate::core::diag::{CompileError, format_error};
use crate::core::lint::Diagnostic;

#[derive(Serialize)]
struct FileDiagnostic<'a> {
    file: String,
    #[serde(flatten)]
    diagnostic: &'a Diagnostic,
}

/// `path:line:col: severity[code]` header followed by a source snippet.
pub fn render_human(path: &Path, source: &str, diagnostic: &Diagnostic) -> String {
    let header = format!(
        "{}:{}: {}[{}]",
        path.display(),
        diagnostic.span.start,
        diagnostic.severity,
        diagnostic.code
    );
    format!(
        "{header}\n{}",
        format_error(source, diagnostic.span, &diagnostic.message)
    )
}

/// One JSON object per line, tagged with the file it came from.
pub fn render_json(path: &Path, diagnostic: &Diagnostic) -> serde_json::Result<String> {
    serde_json::to_string(&FileDiagnostic {
        file: path.display().to_string(),
        diagnostic,
    })
}

pub fn render_compile_error(path: &Path, source: Option<&str>, error: &CompileError) -> String {
    match (source, error.span()) {
        (Some(source), Some(span)) => format!(
            "{}:{}: error\n{}",
            path.display(),
            span.start,
            format_error(source, span, error)
        ),
        _ => format!("{}: error: {error}", path.display()),
    }
}
