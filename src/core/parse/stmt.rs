use super::*;

impl<'a> Parser<'a> {
    pub(super) fn parse_block(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        self.expect(&TK::LBrace)?;
        let mut stmts = Vec::new();
        while !self.at(&TK::RBrace) {
            if self.at(&TK::Eof) {
                return Err(self.unexpected(|found| PEK::ExpectedToken(TK::RBrace, found)));
            }
            stmts.push(self.parse_stmt()?);
        }
        self.expect(&TK::RBrace)?;
        Ok(self.node(SyntaxKind::Block, marker, stmts))
    }

    fn parse_stmt(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        match &self.curr().kind {
            TK::KwLet => {
                self.advance();
                let name = self.parse_ident()?;
                let mut children = Vec::new();
                if self.eat(&TK::Equals) {
                    children.push(self.parse_expr()?);
                }
                self.expect(&TK::Semicolon)?;
                Ok(self.node(SyntaxKind::LocalDecl { name }, marker, children))
            }
            TK::KwReturn => {
                self.advance();
                let mut children = Vec::new();
                if !self.at(&TK::Semicolon) {
                    children.push(self.parse_expr()?);
                }
                self.expect(&TK::Semicolon)?;
                Ok(self.node(SyntaxKind::ReturnStmt, marker, children))
            }
            TK::KwIf => self.parse_if(),
            TK::KwWhile => {
                self.advance();
                self.expect(&TK::LParen)?;
                let cond = self.parse_expr()?;
                self.expect(&TK::RParen)?;
                let body = self.parse_block()?;
                Ok(self.node(SyntaxKind::WhileStmt, marker, vec![cond, body]))
            }
            TK::LBrace => self.parse_block(),
            _ => {
                let expr = self.parse_expr()?;
                self.expect(&TK::Semicolon)?;
                Ok(self.node(SyntaxKind::ExprStmt, marker, vec![expr]))
            }
        }
    }

    fn parse_if(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        self.expect(&TK::KwIf)?;
        self.expect(&TK::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(&TK::RParen)?;
        let then_block = self.parse_block()?;

        let mut children = vec![cond, then_block];
        if self.eat(&TK::KwElse) {
            let else_branch = if self.at(&TK::KwIf) {
                self.parse_if()?
            } else {
                self.parse_block()?
            };
            children.push(else_branch);
        }
        Ok(self.node(SyntaxKind::IfStmt, marker, children))
    }
}
