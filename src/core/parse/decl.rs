use super::*;

impl<'a> Parser<'a> {
    pub(super) fn parse_item(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        let attrs = self.parse_attributes()?;
        match &self.curr().kind {
            TK::KwType => self.parse_type_decl(marker, attrs),
            // Free functions have no receiver.
            TK::KwFn => self.parse_func(marker, attrs, true),
            _ => Err(self.unexpected(PEK::ExpectedDecl)),
        }
    }

    fn parse_type_decl(&mut self, marker: Marker, attrs: Vec<NodeId>) -> Result<NodeId, ParseError> {
        self.expect(&TK::KwType)?;
        let name = self.parse_ident()?;
        self.expect(&TK::LBrace)?;

        let mut children = attrs;
        while !self.at(&TK::RBrace) {
            children.push(self.parse_member()?);
        }
        self.expect(&TK::RBrace)?;

        Ok(self.node(SyntaxKind::TypeDecl { name }, marker, children))
    }

    fn parse_member(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        let attrs = self.parse_attributes()?;
        let is_static = self.eat(&TK::KwStatic);

        match &self.curr().kind {
            TK::KwVar => {
                self.advance();
                let name = self.parse_ident()?;
                self.expect(&TK::Semicolon)?;
                Ok(self.node(SyntaxKind::FieldDecl { name, is_static }, marker, attrs))
            }
            TK::KwFn => self.parse_func(marker, attrs, is_static),
            _ => Err(self.unexpected(PEK::ExpectedMember)),
        }
    }

    fn parse_func(
        &mut self,
        marker: Marker,
        attrs: Vec<NodeId>,
        is_static: bool,
    ) -> Result<NodeId, ParseError> {
        self.expect(&TK::KwFn)?;
        let name = self.parse_ident()?;

        let params_marker = self.mark();
        self.expect(&TK::LParen)?;
        let params = self.parse_list(TK::Comma, TK::RParen, |parser| parser.parse_param())?;
        self.expect(&TK::RParen)?;
        let param_list = self.node(SyntaxKind::ParamList, params_marker, params);

        let body = self.parse_block()?;

        let mut children = attrs;
        children.push(param_list);
        children.push(body);
        Ok(self.node(SyntaxKind::FuncDecl { name, is_static }, marker, children))
    }

    fn parse_param(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        let attrs = self.parse_attributes()?;
        let variadic = self.eat(&TK::Ellipsis);
        let name = self.parse_ident()?;
        Ok(self.node(SyntaxKind::Parameter { name, variadic }, marker, attrs))
    }
}
