pub mod errors;
mod resolver;
pub mod symbol;
pub mod symbol_table;

pub use errors::{ResolveError, ResolveErrorKind};
pub use resolver::{SymbolResolver, resolve, resolve_partial};
pub use symbol::{AttrRef, Symbol, SymbolId, SymbolKind};
pub use symbol_table::{SymbolInfo, SymbolTable, SymbolTableBuilder};

#[cfg(test)]
#[path = "../../tests/resolve/t_resolve.rs"]
mod tests;
