use std::path::Path;

use tracing::info;

use crate::core::analysis::{self, AnalysisOptions, AnalysisReport, CancellationToken};
use crate::core::diag::CompileError;
use crate::core::host::Compilation;
use crate::core::tree::format::format_tree;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpFlags {
    pub tree: bool,
    pub symbols: bool,
}

impl DumpFlags {
    /// Parses a comma-separated list, e.g. `tree,symbols`. Unknown entries
    /// are ignored.
    pub fn parse(list: &str) -> Self {
        let mut flags = Self::default();
        for item in list.split(',').map(str::trim) {
            match item {
                "tree" => flags.tree = true,
                "symbols" => flags.symbols = true,
                "all" => {
                    flags.tree = true;
                    flags.symbols = true;
                }
                _ => {}
            }
        }
        flags
    }
}

#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub analysis: AnalysisOptions,
    pub dump: DumpFlags,
}

#[derive(Debug)]
pub struct CheckOutput {
    pub compilation: Compilation,
    pub report: AnalysisReport,
    pub tree_dump: Option<String>,
    pub symbols_dump: Option<String>,
}

pub fn check_source(source: &str, options: &CheckOptions) -> Result<CheckOutput, Vec<CompileError>> {
    check_source_with_cancel(source, options, &CancellationToken::new())
}

pub fn check_source_with_cancel(
    source: &str,
    options: &CheckOptions,
    cancel: &CancellationToken,
) -> Result<CheckOutput, Vec<CompileError>> {
    let compilation = Compilation::from_source(source)?;

    let tree_dump = options.dump.tree.then(|| format_tree(compilation.tree()));
    let symbols_dump = options
        .dump
        .symbols
        .then(|| compilation.symbols().to_string());

    let report = analysis::analyze(&compilation, &options.analysis, cancel);
    Ok(CheckOutput {
        compilation,
        report,
        tree_dump,
        symbols_dump,
    })
}

/// Reads and checks one file. The source text is returned alongside the
/// output so callers can render snippets.
pub fn check_path(
    path: &Path,
    options: &CheckOptions,
) -> Result<(String, CheckOutput), (Option<String>, Vec<CompileError>)> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| (None, vec![CompileError::Io(path.to_path_buf(), e)]))?;
    info!(path = %path.display(), bytes = source.len(), "checking file");
    match check_source(&source, options) {
        Ok(output) => Ok((source, output)),
        Err(errors) => Err((Some(source), errors)),
    }
}
