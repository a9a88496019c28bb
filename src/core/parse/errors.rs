use thiserror::Error;

use crate::core::diag::{Span, SpannedError};
use crate::core::lexer::{Token, TokenKind};

#[derive(Debug, Clone, Error)]
#[allow(clippy::enum_variant_names)]
pub enum ParseErrorKind {
    #[error("Expected declaration, found: {0}")]
    ExpectedDecl(Token),

    #[error("Expected {0}, found: {1}")]
    ExpectedToken(TokenKind, Token),

    #[error("Expected identifier, found: {0}")]
    ExpectedIdent(Token),

    #[error("Expected type member, found: {0}")]
    ExpectedMember(Token),

    #[error("Expected primary expression, found: {0}")]
    ExpectedPrimary(Token),

    #[error("Expected lambda parameter, found: {0}")]
    ExpectedLambdaParam(Token),
}

pub type ParseError = SpannedError<ParseErrorKind>;

impl ParseErrorKind {
    pub fn at(self, span: Span) -> ParseError {
        ParseError::new(self, span)
    }
}
