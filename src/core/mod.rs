//! Front end, semantic host and lint rules.

pub mod analysis;
pub mod diag;
pub mod flow;
pub mod host;
pub mod lexer;
pub mod lint;
pub mod parse;
pub mod resolve;
pub mod tree;
