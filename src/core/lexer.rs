use crate::core::diag::{Position, Span, SpannedError};
use enum_display::EnumDisplay;
use std::fmt::{Display, Formatter};
use std::num::ParseIntError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, EnumDisplay)]
pub enum TokenKind {
    // Identifiers
    #[display("Ident({0})")]
    Ident(String),

    // Literals
    #[display("IntLit({0})")]
    IntLit(u64),
    #[display("BoolLit({0})")]
    BoolLit(bool),
    #[display("StringLit({0})")]
    StringLit(String),

    // Keywords
    #[display("type")]
    KwType,
    #[display("fn")]
    KwFn,
    #[display("var")]
    KwVar,
    #[display("let")]
    KwLet,
    #[display("static")]
    KwStatic,
    #[display("return")]
    KwReturn,
    #[display("if")]
    KwIf,
    #[display("else")]
    KwElse,
    #[display("while")]
    KwWhile,
    #[display("this")]
    KwThis,

    // Brackets
    #[display("[")]
    LBracket,
    #[display("]")]
    RBracket,
    #[display("(")]
    LParen,
    #[display(")")]
    RParen,
    #[display("{{")]
    LBrace,
    #[display("}}")]
    RBrace,

    // Punctuation
    #[display(",")]
    Comma,
    #[display(".")]
    Dot,
    #[display("...")]
    Ellipsis,
    #[display(":")]
    Colon,
    #[display(";")]
    Semicolon,
    #[display("@")]
    At,
    #[display("=>")]
    FatArrow,

    // Arithmetic operators
    #[display("+")]
    Plus,
    #[display("-")]
    Minus,
    #[display("*")]
    Star,
    #[display("/")]
    Slash,
    #[display("%")]
    Percent,

    // Assignment operator
    #[display("=")]
    Equals,

    // Comparison operators
    #[display("==")]
    EqEq,
    #[display("!=")]
    NotEq,
    #[display("<")]
    LessThan,
    #[display(">")]
    GreaterThan,
    #[display("<=")]
    LessThanEq,
    #[display(">=")]
    GreaterThanEq,

    // Logical operators
    #[display("&&")]
    LogicalAnd,
    #[display("||")]
    LogicalOr,
    #[display("!")]
    LogicalNot,

    // End of file
    #[display("EOF")]
    Eof,
}

#[derive(Debug, Clone, Error)]
pub enum LexErrorKind {
    #[error("Unexpected character: {0}")]
    UnexpectedCharacter(char),

    #[error("Invalid integer: {0}")]
    InvalidInteger(ParseIntError),

    #[error("Invalid escape sequence: {0}")]
    InvalidEscapeSequence(String),

    #[error("Unterminated string literal")]
    UnterminatedString,
}

pub type LexError = SpannedError<LexErrorKind>;
pub use LexErrorKind as LEK;

impl LexErrorKind {
    pub fn at(self, span: Span) -> LexError {
        LexError::new(self, span)
    }
}

/// Longest-match punctuation and operator table, keyed on up to three
/// lookahead characters. Returns the kind and its length in chars.
fn punctuation(lookahead: [Option<char>; 3]) -> Option<(TokenKind, usize)> {
    use TokenKind as TK;

    let matched = match lookahead {
        [Some('.'), Some('.'), Some('.')] => (TK::Ellipsis, 3),
        [Some('='), Some('>'), _] => (TK::FatArrow, 2),
        [Some('='), Some('='), _] => (TK::EqEq, 2),
        [Some('!'), Some('='), _] => (TK::NotEq, 2),
        [Some('<'), Some('='), _] => (TK::LessThanEq, 2),
        [Some('>'), Some('='), _] => (TK::GreaterThanEq, 2),
        [Some('&'), Some('&'), _] => (TK::LogicalAnd, 2),
        [Some('|'), Some('|'), _] => (TK::LogicalOr, 2),
        [Some(ch), ..] => {
            let kind = match ch {
                '(' => TK::LParen,
                ')' => TK::RParen,
                '[' => TK::LBracket,
                ']' => TK::RBracket,
                '{' => TK::LBrace,
                '}' => TK::RBrace,
                ',' => TK::Comma,
                '.' => TK::Dot,
                ':' => TK::Colon,
                ';' => TK::Semicolon,
                '@' => TK::At,
                '=' => TK::Equals,
                '!' => TK::LogicalNot,
                '<' => TK::LessThan,
                '>' => TK::GreaterThan,
                '+' => TK::Plus,
                '-' => TK::Minus,
                '*' => TK::Star,
                '/' => TK::Slash,
                '%' => TK::Percent,
                _ => return None,
            };
            (kind, 1)
        }
        [None, ..] => return None,
    };
    Some(matched)
}

fn keyword(word: &str) -> Option<TokenKind> {
    let kind = match word {
        "type" => TokenKind::KwType,
        "fn" => TokenKind::KwFn,
        "var" => TokenKind::KwVar,
        "let" => TokenKind::KwLet,
        "static" => TokenKind::KwStatic,
        "return" => TokenKind::KwReturn,
        "if" => TokenKind::KwIf,
        "else" => TokenKind::KwElse,
        "while" => TokenKind::KwWhile,
        "this" => TokenKind::KwThis,
        "true" => TokenKind::BoolLit(true),
        "false" => TokenKind::BoolLit(false),
        _ => return None,
    };
    Some(kind)
}

/// Cursor over the source text. Positions are 1-based line/column with a
/// byte offset; token spans are end-exclusive.
pub struct Lexer<'a> {
    source: &'a str,
    pos: Position,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: Position::default(),
            done: false,
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn lookahead(&self) -> [Option<char>; 3] {
        let mut chars = self.rest().chars();
        [chars.next(), chars.next(), chars.next()]
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos.offset += ch.len_utf8();
        if ch == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else {
            self.pos.column += 1;
        }
        Some(ch)
    }

    /// Consumes characters while `pred` holds and returns them as a slice.
    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let from = self.pos.offset;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &self.source[from..self.pos.offset]
    }

    fn skip_trivia(&mut self) {
        loop {
            self.eat_while(char::is_whitespace);
            if !self.rest().starts_with("//") {
                return;
            }
            self.eat_while(|ch| ch != '\n');
        }
    }

    fn error_from(&self, start: Position, kind: LexErrorKind) -> LexError {
        kind.at(Span::new(start, self.pos))
    }

    fn lex_string(&mut self, start: Position) -> Result<TokenKind, LexError> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error_from(start, LEK::UnterminatedString)),
                Some('"') => return Ok(TokenKind::StringLit(value)),
                Some('\\') => {
                    let escaped = match self.bump() {
                        None => return Err(self.error_from(start, LEK::UnterminatedString)),
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('0') => '\0',
                        Some(ch @ ('\\' | '"')) => ch,
                        Some(other) => {
                            let sequence = format!("\\{other}");
                            return Err(self.error_from(start, LEK::InvalidEscapeSequence(sequence)));
                        }
                    };
                    value.push(escaped);
                }
                Some(ch) => value.push(ch),
            }
        }
    }

    fn lex_number(&mut self, start: Position) -> Result<TokenKind, LexError> {
        // Trailing letters are swallowed so `12abc` fails as one literal.
        let text = self.eat_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        text.replace('_', "")
            .parse::<u64>()
            .map(TokenKind::IntLit)
            .map_err(|e| self.error_from(start, LEK::InvalidInteger(e)))
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia();
        let start = self.pos;

        let kind = match self.peek() {
            None => {
                self.done = true;
                TokenKind::Eof
            }
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let word = self.eat_while(|ch| ch.is_alphanumeric() || ch == '_');
                keyword(word).unwrap_or_else(|| TokenKind::Ident(word.to_string()))
            }
            Some(ch) if ch.is_ascii_digit() => self.lex_number(start)?,
            Some('"') => self.lex_string(start)?,
            Some(ch) => {
                let Some((kind, len)) = punctuation(self.lookahead()) else {
                    self.bump();
                    return Err(self.error_from(start, LEK::UnexpectedCharacter(ch)));
                };
                for _ in 0..len {
                    self.bump();
                }
                kind
            }
        };

        Ok(Token {
            kind,
            span: Span::new(start, self.pos),
        })
    }

    pub fn tokenize(self) -> impl Iterator<Item = Result<Token, LexError>> {
        self
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        (!self.done).then(|| self.next_token())
    }
}

#[cfg(test)]
#[path = "../tests/t_lexer.rs"]
mod tests;
