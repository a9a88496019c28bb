use thiserror::Error;

use crate::core::diag::{Span, SpannedError};

#[derive(Clone, Debug, Error)]
pub enum ResolveErrorKind {
    #[error("Symbol already defined in current scope: {0}")]
    SymbolAlreadyDefined(String),

    #[error("Type already defined: {0}")]
    TypeAlreadyDefined(String),

    #[error("Variadic parameter `{0}` must be the last parameter")]
    VariadicParamNotLast(String),

    #[error("Invalid assignment target")]
    InvalidAssignmentTarget,
}

pub type ResolveError = SpannedError<ResolveErrorKind>;

impl ResolveErrorKind {
    pub fn at(self, span: Span) -> ResolveError {
        ResolveError::new(self, span)
    }
}
