use super::*;
use crate::core::tree::{BinaryOp, Literal, UnaryOp};

impl<'a> Parser<'a> {
    pub(super) fn parse_expr(&mut self) -> Result<NodeId, ParseError> {
        if self.at_lambda_start() {
            return self.parse_lambda();
        }

        let marker = self.mark();
        let lhs = self.parse_binary(0)?;
        if self.eat(&TK::Equals) {
            let rhs = self.parse_expr()?;
            return Ok(self.node(SyntaxKind::Assignment, marker, vec![lhs, rhs]));
        }
        Ok(lhs)
    }

    fn at_lambda_start(&self) -> bool {
        match self.curr().kind {
            TK::Ident(_) => matches!(self.peek().map(|t| &t.kind), Some(TK::FatArrow)),
            TK::LParen => self.paren_group_followed_by_arrow(),
            _ => false,
        }
    }

    /// `x => body` or `(a, b) => body`, where body is a block or an
    /// expression.
    fn parse_lambda(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        let (kind, head) = if self.at(&TK::LParen) {
            let list_marker = self.mark();
            self.advance();
            let params = self.parse_list(TK::Comma, TK::RParen, |parser| {
                let param_marker = parser.mark();
                let TK::Ident(name) = &parser.curr().kind else {
                    return Err(parser.unexpected(PEK::ExpectedLambdaParam));
                };
                let name = name.clone();
                parser.advance();
                Ok(parser.node(
                    SyntaxKind::Parameter {
                        name,
                        variadic: false,
                    },
                    param_marker,
                    Vec::new(),
                ))
            })?;
            self.expect(&TK::RParen)?;
            let list = self.node(SyntaxKind::ParamList, list_marker, params);
            (SyntaxKind::ParenthesizedLambda, list)
        } else {
            let param_marker = self.mark();
            let name = self.parse_ident()?;
            let param = self.node(
                SyntaxKind::Parameter {
                    name,
                    variadic: false,
                },
                param_marker,
                Vec::new(),
            );
            (SyntaxKind::SimpleLambda, param)
        };

        self.expect(&TK::FatArrow)?;
        let body = if self.at(&TK::LBrace) {
            self.parse_block()?
        } else {
            self.parse_expr()?
        };

        Ok(self.node(kind, marker, vec![head, body]))
    }

    /// Pratt parsing for binary operator precedence.
    fn parse_binary(&mut self, min_bp: u8) -> Result<NodeId, ParseError> {
        let marker = self.mark();

        let mut lhs = match self.curr().kind {
            TK::Minus => {
                self.advance();
                let operand = self.parse_binary(10)?;
                self.node(SyntaxKind::Unary { op: UnaryOp::Neg }, marker, vec![operand])
            }
            TK::LogicalNot => {
                self.advance();
                let operand = self.parse_binary(10)?;
                self.node(
                    SyntaxKind::Unary {
                        op: UnaryOp::LogicalNot,
                    },
                    marker,
                    vec![operand],
                )
            }
            _ => self.parse_postfix()?,
        };

        while let Some((op, bp)) = Self::token_to_binary_op(&self.curr().kind) {
            if bp < min_bp {
                break;
            }
            self.advance();

            let rhs = self.parse_binary(bp + 1)?;
            lhs = self.node(SyntaxKind::Binary { op }, marker, vec![lhs, rhs]);
        }

        Ok(lhs)
    }

    /// Maps a token to a binary operator and its precedence
    fn token_to_binary_op(token: &TokenKind) -> Option<(BinaryOp, u8)> {
        match token {
            TK::LogicalOr => Some((BinaryOp::LogicalOr, 0)),
            TK::LogicalAnd => Some((BinaryOp::LogicalAnd, 1)),
            TK::EqEq => Some((BinaryOp::Eq, 5)),
            TK::NotEq => Some((BinaryOp::Ne, 5)),
            TK::LessThan => Some((BinaryOp::Lt, 5)),
            TK::GreaterThan => Some((BinaryOp::Gt, 5)),
            TK::LessThanEq => Some((BinaryOp::LtEq, 5)),
            TK::GreaterThanEq => Some((BinaryOp::GtEq, 5)),
            TK::Plus => Some((BinaryOp::Add, 7)),
            TK::Minus => Some((BinaryOp::Sub, 7)),
            TK::Star => Some((BinaryOp::Mul, 8)),
            TK::Slash => Some((BinaryOp::Div, 8)),
            TK::Percent => Some((BinaryOp::Mod, 8)),
            _ => None,
        }
    }

    fn parse_postfix(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        let mut expr = self.parse_primary()?;

        loop {
            expr = match self.curr().kind {
                TK::LParen => self.parse_call_postfix(expr, marker)?,
                TK::Dot => {
                    self.advance();
                    let name = self.parse_ident()?;
                    self.node(SyntaxKind::MemberAccess { name }, marker, vec![expr])
                }
                _ => break,
            };
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        let kind = match &self.curr().kind {
            TK::IntLit(value) => SyntaxKind::Literal {
                value: Literal::Int(*value),
            },
            TK::BoolLit(value) => SyntaxKind::Literal {
                value: Literal::Bool(*value),
            },
            TK::StringLit(value) => SyntaxKind::Literal {
                value: Literal::Str(value.clone()),
            },
            TK::Ident(name) => SyntaxKind::Identifier { name: name.clone() },
            TK::KwThis => SyntaxKind::ThisExpr,
            TK::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TK::RParen)?;
                return Ok(self.node(SyntaxKind::Parenthesized, marker, vec![inner]));
            }
            _ => return Err(self.unexpected(PEK::ExpectedPrimary)),
        };
        self.advance();
        Ok(self.node(kind, marker, Vec::new()))
    }

    fn parse_call_postfix(&mut self, callee: NodeId, marker: Marker) -> Result<NodeId, ParseError> {
        let args_marker = self.mark();
        self.advance();
        let args = self.parse_list(TK::Comma, TK::RParen, |parser| parser.parse_call_arg())?;
        self.expect(&TK::RParen)?;
        let arg_list = self.node(SyntaxKind::ArgumentList, args_marker, args);
        Ok(self.node(SyntaxKind::Invocation, marker, vec![callee, arg_list]))
    }

    /// `expr` or `name: expr`.
    fn parse_call_arg(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        let name = match &self.curr().kind {
            TK::Ident(name) if matches!(self.peek().map(|t| &t.kind), Some(TK::Colon)) => {
                let name = name.clone();
                self.advance();
                self.advance();
                Some(name)
            }
            _ => None,
        };
        let expr = self.parse_expr()?;
        Ok(self.node(SyntaxKind::Argument { name }, marker, vec![expr]))
    }
}
