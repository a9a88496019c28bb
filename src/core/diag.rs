use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::core::lexer::LexError;
use crate::core::parse::ParseError;
use crate::core::resolve::ResolveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Smallest span covering both inputs.
    pub fn cover(self, other: Span) -> Span {
        let start = if other.start.offset < self.start.offset {
            other.start
        } else {
            self.start
        };
        let end = if other.end.offset > self.end.offset {
            other.end
        } else {
            self.end
        };
        Span::new(start, end)
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// An error kind paired with the source span it was raised at.
#[derive(Debug, Clone)]
pub struct SpannedError<K> {
    kind: K,
    span: Span,
}

impl<K> SpannedError<K> {
    pub fn new(kind: K, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn into_kind(self) -> K {
        self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

impl<K: Display> Display for SpannedError<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl<K: fmt::Debug + Display> std::error::Error for SpannedError<K> {}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("IO error: {}: {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),
}

impl CompileError {
    /// Source span for front-end errors; I/O errors have none.
    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::Lex(e) => Some(e.span()),
            CompileError::Parse(e) => Some(e.span()),
            CompileError::Resolve(e) => Some(e.span()),
            CompileError::Io(..) => None,
        }
    }
}

fn build_marker(len: usize, single_line: bool) -> String {
    if single_line && len == 1 {
        "^".to_string()
    } else {
        "-".repeat(len.max(1))
    }
}

/// Formats a message with a source snippet and marker lines highlighting
/// the span.
///
/// Single-line spans get a caret for one char and dashes otherwise;
/// multi-line spans get a dash underline on every covered line. One line of
/// context is shown before and after.
///
/// ```text
/// (4:16) Invoke( func ) requires a non-capturing lambda. Captured variables: this.
/// │ 3 │     fn Run() {
/// │ 4 │         Invoke(() => _field);
/// │   │                ------------
/// │ 5 │     }
/// ```
pub fn format_error(source: &str, span: Span, error: impl Display) -> String {
    let start_line = span.start.line.max(1);
    let end_line = span.end.line.max(start_line);
    let lines: Vec<&str> = source.lines().collect();

    let first_line = start_line.saturating_sub(1).max(1);
    let last_line = (end_line + 1).min(lines.len()).max(first_line);

    let number_width = last_line.to_string().len();

    let mut out = String::new();
    out.push_str(&format!(
        "({}:{}) {}\n",
        span.start.line, span.start.column, error
    ));

    let single_line = start_line == end_line;

    for line_no in first_line..=last_line {
        let content = lines.get(line_no - 1).copied().unwrap_or("");
        out.push_str(&format!("│ {line_no:>number_width$} │ {content}\n"));

        // Markers only for lines inside the span.
        if line_no < start_line || line_no > end_line {
            continue;
        }

        let start_col = if line_no == span.start.line {
            span.start.column.max(1)
        } else {
            1
        };
        let end_col_excl = if line_no == span.end.line {
            span.end.column.max(start_col)
        } else {
            content.chars().count() + 1
        };

        if end_col_excl > start_col {
            let len = end_col_excl - start_col;
            let mut marker = String::with_capacity(start_col - 1 + len);
            marker.push_str(&" ".repeat(start_col - 1));
            marker.push_str(&build_marker(len, single_line));
            out.push_str(&format!("│ {:>number_width$} │ {marker}\n", ""));
        }
    }
    out
}

#[cfg(test)]
#[path = "../tests/t_diag.rs"]
mod tests;
