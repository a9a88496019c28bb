//! File-level entry points used by the CLI and integration tests.

pub mod check;
pub mod render;

pub use check::{
    CheckOptions, CheckOutput, DumpFlags, check_path, check_source, check_source_with_cancel,
};
pub use render::{render_compile_error, render_human, render_json};
