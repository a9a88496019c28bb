//! Recursive-descent parser for `.lf` fixture sources.
//!
//! The parser builds the arena `SyntaxTree` directly. Nodes are allocated
//! bottom-up, so every `parse_*` helper returns the `NodeId` of the subtree
//! it just closed.

use crate::core::diag::{Position, Span};
use crate::core::lexer::{Token, TokenKind, TokenKind as TK};
use crate::core::tree::{NodeId, SyntaxKind, SyntaxTree};

mod decl;
mod errors;
mod expr;
mod stmt;

pub use errors::{ParseError, ParseErrorKind};
use errors::ParseErrorKind as PEK;

/// Start of a node under construction: where it begins in the source and
/// which token it begins at.
#[derive(Debug, Clone, Copy)]
struct Marker {
    start: Position,
    first: usize,
}

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    tree: SyntaxTree,
}

impl<'a> Parser<'a> {
    /// `tokens` must be non-empty and end with `Eof`, as produced by the
    /// lexer.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            tree: SyntaxTree::new(),
        }
    }

    pub fn parse(mut self) -> Result<SyntaxTree, ParseError> {
        let marker = self.mark();
        let mut items = Vec::new();
        while !self.at(&TK::Eof) {
            items.push(self.parse_item()?);
        }
        self.node(SyntaxKind::SourceFile, marker, items);
        Ok(self.tree)
    }

    fn curr(&self) -> &'a Token {
        let tokens: &'a [Token] = self.tokens;
        &tokens[self.pos.min(tokens.len().saturating_sub(1))]
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos + 1)
    }

    fn at(&self, kind: &TokenKind) -> bool {
        self.curr().kind == *kind
    }

    /// Consumes the current token if it is `kind`.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        let found = self.at(kind);
        if found {
            self.advance();
        }
        found
    }

    /// Moves to the next token; stays on the final `Eof`.
    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn unexpected(&self, kind: impl FnOnce(Token) -> ParseErrorKind) -> ParseError {
        let token = self.curr();
        kind(token.clone()).at(token.span)
    }

    fn mark(&self) -> Marker {
        Marker {
            start: self.curr().span.start,
            first: self.pos,
        }
    }

    /// Span from `marker` to the end of the last consumed token. A node that
    /// consumed nothing covers the current token.
    fn close(&self, marker: Marker) -> Span {
        let last = if self.pos > marker.first {
            &self.tokens[self.pos - 1]
        } else {
            self.curr()
        };
        Span::new(marker.start, last.span.end)
    }

    fn node(&mut self, kind: SyntaxKind, marker: Marker, children: Vec<NodeId>) -> NodeId {
        let span = self.close(marker);
        self.tree.alloc(kind, span, children)
    }

    fn expect(&mut self, expected: &TokenKind) -> Result<(), ParseError> {
        if !self.at(expected) {
            return Err(self.unexpected(|found| PEK::ExpectedToken(expected.clone(), found)));
        }
        self.advance();
        Ok(())
    }

    /// Items separated by `sep` up to (not including) `end`. A trailing
    /// separator is accepted.
    fn parse_list<T>(
        &mut self,
        sep: TokenKind,
        end: TokenKind,
        mut item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = Vec::new();
        while !self.at(&end) {
            items.push(item(self)?);
            if self.at(&sep) {
                self.advance();
            } else if !self.at(&end) {
                return Err(self.unexpected(|found| PEK::ExpectedToken(end.clone(), found)));
            }
        }
        Ok(items)
    }

    fn parse_ident(&mut self) -> Result<String, ParseError> {
        let TK::Ident(name) = &self.curr().kind else {
            return Err(self.unexpected(PEK::ExpectedIdent));
        };
        self.advance();
        Ok(name.clone())
    }

    /// `@[A, b.C]` groups, possibly repeated. Each path becomes one
    /// `Attribute` node.
    fn parse_attributes(&mut self) -> Result<Vec<NodeId>, ParseError> {
        let mut attrs = Vec::new();
        while self.at(&TK::At) {
            self.advance();
            self.expect(&TK::LBracket)?;
            let group = self.parse_list(TK::Comma, TK::RBracket, |parser| {
                let marker = parser.mark();
                let mut path = vec![parser.parse_ident()?];
                while parser.at(&TK::Dot) {
                    parser.advance();
                    path.push(parser.parse_ident()?);
                }
                Ok(parser.node(SyntaxKind::Attribute { path }, marker, Vec::new()))
            })?;
            self.expect(&TK::RBracket)?;
            attrs.extend(group);
        }
        Ok(attrs)
    }

    /// Whether the paren group starting at the current token is closed and
    /// then followed by `=>`.
    fn paren_group_followed_by_arrow(&self) -> bool {
        let mut depth = 0usize;
        let mut rest = self.tokens[self.pos..].iter().map(|token| &token.kind);
        while let Some(kind) = rest.next() {
            match kind {
                TK::LParen => depth += 1,
                TK::RParen if depth <= 1 => return rest.next() == Some(&TK::FatArrow),
                TK::RParen => depth -= 1,
                TK::Eof | TK::LBrace | TK::RBrace | TK::Semicolon => return false,
                _ => {}
            }
        }
        false
    }
}

#[cfg(test)]
#[path = "../../tests/t_parser.rs"]
mod tests;
