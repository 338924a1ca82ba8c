//! Expression parsing: a straightforward precedence-climbing parser over
//! the chain assignment → or → and → equality → relational → range →
//! additive → multiplicative → unary → postfix → primary.

use vesper_ast::nodes::expressions::{
    AccessExpr,
    AssignExpr,
    BinaryExpr,
    BinaryOp,
    BooleanExpr,
    CallExpr,
    CastExpr,
    DictionaryExpr,
    FloatExpr,
    GroupExpr,
    IntegerExpr,
    ListExpr,
    LogicalExpr,
    LogicalOp,
    ObjectExpr,
    PropertyExpr,
    RangeExpr,
    SliceExpr,
    StringExpr,
    UnaryExpr,
    UnaryOp,
    VariableExpr,
};
use vesper_ast::nodes::{AnyNode, NodeID, NodeKind};
use vesper_source::types::Span;

use super::Parser;
use crate::error::ParseResult;
use crate::lexer::TokenKind;

impl Parser<'_> {
    pub(super) fn parse_expression(&mut self) -> ParseResult<NodeID> { self.parse_assignment() }

    fn parse_assignment(&mut self) -> ParseResult<NodeID> {
        let start = self.current().span;
        let target = self.parse_or()?;

        if self.matches(TokenKind::Equal)? {
            let value = self.parse_assignment()?;
            let span = start.merge(&self.span_of(value));
            let node = AssignExpr::new(target, value, NodeID::placeholder(), span);
            return Ok(self.alloc(NodeKind::Expression, AnyNode::Assign(node), span));
        }

        Ok(target)
    }

    fn parse_or(&mut self) -> ParseResult<NodeID> {
        let mut left = self.parse_and()?;
        while self.matches(TokenKind::Or)? {
            let right = self.parse_and()?;
            left = self.alloc_logical(LogicalOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ParseResult<NodeID> {
        let mut left = self.parse_equality()?;
        while self.matches(TokenKind::And)? {
            let right = self.parse_equality()?;
            left = self.alloc_logical(LogicalOp::And, left, right);
        }
        Ok(left)
    }

    fn alloc_logical(&mut self, op: LogicalOp, left: NodeID, right: NodeID) -> NodeID {
        let span = self.span_of(left).merge(&self.span_of(right));
        let node = LogicalExpr::new(op, left, right, NodeID::placeholder(), span);
        self.alloc(NodeKind::Expression, AnyNode::Logical(node), span)
    }

    fn parse_equality(&mut self) -> ParseResult<NodeID> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.current().kind {
                TokenKind::EqualEqual => BinaryOp::Eq,
                TokenKind::BangEqual => BinaryOp::NotEq,
                _ => break,
            };
            self.expect(self.current().kind)?;
            let right = self.parse_relational()?;
            left = self.alloc_binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> ParseResult<NodeID> {
        let mut left = self.parse_range()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Less => BinaryOp::Less,
                TokenKind::LessEqual => BinaryOp::LessEq,
                TokenKind::Greater => BinaryOp::Greater,
                TokenKind::GreaterEqual => BinaryOp::GreaterEq,
                _ => break,
            };
            self.expect(self.current().kind)?;
            let right = self.parse_range()?;
            left = self.alloc_binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_range(&mut self) -> ParseResult<NodeID> {
        let start = self.current().span;
        let left = self.parse_additive()?;
        let inclusive = if self.check(TokenKind::DotDot) {
            false
        } else if self.check(TokenKind::DotDotEqual) {
            true
        } else {
            return Ok(left);
        };
        self.advance_one()?;
        let right = self.parse_additive()?;
        let span = start.merge(&self.span_of(right));
        let node = RangeExpr::new(left, right, inclusive, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Expression, AnyNode::Range(node), span))
    }

    fn parse_additive(&mut self) -> ParseResult<NodeID> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance_one()?;
            let right = self.parse_multiplicative()?;
            left = self.alloc_binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<NodeID> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance_one()?;
            let right = self.parse_unary()?;
            left = self.alloc_binary(op, left, right);
        }
        Ok(left)
    }

    fn alloc_binary(&mut self, op: BinaryOp, left: NodeID, right: NodeID) -> NodeID {
        let span = self.span_of(left).merge(&self.span_of(right));
        let node = BinaryExpr::new(op, left, right, NodeID::placeholder(), span);
        self.alloc(NodeKind::Expression, AnyNode::Binary(node), span)
    }

    fn parse_unary(&mut self) -> ParseResult<NodeID> {
        let start = self.current().span;
        let op = match self.current().kind {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Minus,
            TokenKind::Plus => UnaryOp::Plus,
            _ => return self.parse_postfix(),
        };
        self.advance_one()?;
        let operand = self.parse_unary()?;
        let span = start.merge(&self.span_of(operand));
        let node = UnaryExpr::new(op, operand, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Expression, AnyNode::Unary(node), span))
    }

    fn parse_postfix(&mut self) -> ParseResult<NodeID> {
        let mut expr = self.parse_primary()?;
        loop {
            expr = match self.current().kind {
                TokenKind::LeftParen => self.parse_call(expr)?,
                TokenKind::LeftBracket => self.parse_index_or_slice(expr)?,
                TokenKind::Dot => self.parse_property(expr)?,
                TokenKind::As => self.parse_cast(expr)?,
                _ => break,
            };
        }
        Ok(expr)
    }

    fn parse_call(&mut self, target: NodeID) -> ParseResult<NodeID> {
        let start = self.span_of(target);
        self.expect(TokenKind::LeftParen)?;
        let mut arguments = Vec::new();
        if !self.check(TokenKind::RightParen) {
            arguments.push(self.parse_expression()?);
            while self.matches(TokenKind::Comma)? {
                arguments.push(self.parse_expression()?);
            }
        }
        let end = self.expect(TokenKind::RightParen)?;
        let span = start.merge(&end.span);
        let node = CallExpr::new(target, arguments, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Expression, AnyNode::Call(node), span))
    }

    fn parse_index_or_slice(&mut self, target: NodeID) -> ParseResult<NodeID> {
        let start = self.span_of(target);
        self.expect(TokenKind::LeftBracket)?;

        // `[` immediately followed by `:` means the start bound is omitted.
        let start_bound =
            if self.check(TokenKind::Colon) { None } else { Some(self.parse_expression()?) };

        if self.matches(TokenKind::Colon)? {
            let end_bound = if self.check(TokenKind::Colon) || self.check(TokenKind::RightBracket)
            {
                None
            } else {
                Some(self.parse_expression()?)
            };
            let step = if self.matches(TokenKind::Colon)? {
                if self.check(TokenKind::RightBracket) { None } else { Some(self.parse_expression()?) }
            } else {
                None
            };
            let end = self.expect(TokenKind::RightBracket)?;
            let span = start.merge(&end.span);
            let node = SliceExpr::new(target, start_bound, end_bound, step, NodeID::placeholder(), span);
            return Ok(self.alloc(NodeKind::Expression, AnyNode::Slice(node), span));
        }

        let index = start_bound.ok_or_else(|| self.unexpected("an index expression"))?;
        let end = self.expect(TokenKind::RightBracket)?;
        let span = start.merge(&end.span);
        let node = AccessExpr::new(target, index, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Expression, AnyNode::Access(node), span))
    }

    fn parse_property(&mut self, target: NodeID) -> ParseResult<NodeID> {
        let start = self.span_of(target);
        self.expect(TokenKind::Dot)?;
        let name = self.expect_identifier()?;
        let span = start.merge(&self.current().span);
        let node = PropertyExpr::new(target, name, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Expression, AnyNode::Property(node), span))
    }

    fn parse_cast(&mut self, target: NodeID) -> ParseResult<NodeID> {
        let start = self.span_of(target);
        self.expect(TokenKind::As)?;
        let target_type = self.parse_type_annotation()?;
        let span = start.merge(&self.current().span);
        let node = CastExpr::new(target, target_type, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Expression, AnyNode::Cast(node), span))
    }

    fn parse_primary(&mut self) -> ParseResult<NodeID> {
        let token = self.current();
        match token.kind {
            TokenKind::IntLiteral => {
                self.advance_one()?;
                let text: String = self.text(token.span).chars().filter(|c| *c != '_').collect();
                let value = text
                    .parse::<i64>()
                    .map_err(|_| crate::error::ParseError::InvalidIntLiteral {
                        text: text.clone(),
                        span: token.span,
                    })?;
                let node = IntegerExpr::new(value, NodeID::placeholder(), token.span);
                Ok(self.alloc(NodeKind::Expression, AnyNode::Integer(node), token.span))
            }
            TokenKind::FloatLiteral => {
                self.advance_one()?;
                let text: String = self.text(token.span).chars().filter(|c| *c != '_').collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| crate::error::ParseError::InvalidFloatLiteral {
                        text: text.clone(),
                        span: token.span,
                    })?;
                let node = FloatExpr::new(value, NodeID::placeholder(), token.span);
                Ok(self.alloc(NodeKind::Expression, AnyNode::Float(node), token.span))
            }
            TokenKind::StringLiteral => {
                self.advance_one()?;
                let value = self.unescape_string(token.span)?;
                let node = StringExpr::new(value, NodeID::placeholder(), token.span);
                Ok(self.alloc(NodeKind::Expression, AnyNode::StringLit(node), token.span))
            }
            TokenKind::True => {
                self.advance_one()?;
                let node = BooleanExpr::new(true, NodeID::placeholder(), token.span);
                Ok(self.alloc(NodeKind::Expression, AnyNode::Boolean(node), token.span))
            }
            TokenKind::False => {
                self.advance_one()?;
                let node = BooleanExpr::new(false, NodeID::placeholder(), token.span);
                Ok(self.alloc(NodeKind::Expression, AnyNode::Boolean(node), token.span))
            }
            TokenKind::Identifier => {
                if self.check_peek(TokenKind::LeftBrace) {
                    return self.parse_object_literal();
                }
                self.advance_one()?;
                let name = self.text(token.span).to_string();
                let node = VariableExpr::new(name, NodeID::placeholder(), token.span);
                Ok(self.alloc(NodeKind::Expression, AnyNode::Variable(node), token.span))
            }
            TokenKind::LeftParen => {
                self.advance_one()?;
                let inner = self.parse_expression()?;
                let end = self.expect(TokenKind::RightParen)?;
                let span = token.span.merge(&end.span);
                let node = GroupExpr::new(inner, NodeID::placeholder(), span);
                Ok(self.alloc(NodeKind::Expression, AnyNode::Group(node), span))
            }
            TokenKind::LeftBracket => self.parse_list_literal(),
            TokenKind::LeftBrace => self.parse_dict_literal(),
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn parse_list_literal(&mut self) -> ParseResult<NodeID> {
        let start = self.expect(TokenKind::LeftBracket)?;
        let mut elements = Vec::new();
        if !self.check(TokenKind::RightBracket) {
            elements.push(self.parse_expression()?);
            while self.matches(TokenKind::Comma)? {
                if self.check(TokenKind::RightBracket) {
                    break;
                }
                elements.push(self.parse_expression()?);
            }
        }
        let end = self.expect(TokenKind::RightBracket)?;
        let span = start.span.merge(&end.span);
        let node = ListExpr::new(elements, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Expression, AnyNode::List(node), span))
    }

    fn parse_dict_literal(&mut self) -> ParseResult<NodeID> {
        let start = self.expect(TokenKind::LeftBrace)?;
        let mut entries = Vec::new();
        if !self.check(TokenKind::RightBrace) {
            entries.push(self.parse_dict_entry()?);
            while self.matches(TokenKind::Comma)? {
                if self.check(TokenKind::RightBrace) {
                    break;
                }
                entries.push(self.parse_dict_entry()?);
            }
        }
        let end = self.expect(TokenKind::RightBrace)?;
        let span = start.span.merge(&end.span);
        let node = DictionaryExpr::new(entries, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Expression, AnyNode::Dictionary(node), span))
    }

    fn parse_dict_entry(&mut self) -> ParseResult<(String, NodeID)> {
        let key_token = self.current();
        let key = if self.check(TokenKind::StringLiteral) {
            self.advance_one()?;
            self.unescape_string(key_token.span)?
        } else {
            self.expect_identifier()?
        };
        self.expect(TokenKind::Colon)?;
        let value = self.parse_expression()?;
        Ok((key, value))
    }

    fn parse_object_literal(&mut self) -> ParseResult<NodeID> {
        let class_token = self.current();
        let class_name = self.expect_identifier()?;
        self.expect(TokenKind::LeftBrace)?;
        let mut arguments = Vec::new();
        if !self.check(TokenKind::RightBrace) {
            arguments.push(self.parse_field_init()?);
            while self.matches(TokenKind::Comma)? {
                if self.check(TokenKind::RightBrace) {
                    break;
                }
                arguments.push(self.parse_field_init()?);
            }
        }
        let end = self.expect(TokenKind::RightBrace)?;
        let span = class_token.span.merge(&end.span);
        let node = ObjectExpr::new(class_name, arguments, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Expression, AnyNode::Object(node), span))
    }

    fn parse_field_init(&mut self) -> ParseResult<(String, NodeID)> {
        let name = self.expect_identifier()?;
        self.expect(TokenKind::Colon)?;
        let value = self.parse_expression()?;
        Ok((name, value))
    }

    /// Consumes the current token unconditionally, for operators whose kind
    /// has already been matched by the caller.
    fn advance_one(&mut self) -> ParseResult<()> {
        let _ = self.advance()?;
        Ok(())
    }

    pub(super) fn span_of(&self, id: NodeID) -> Span {
        self.ast().get_node(id).map_or_else(|| Span::new(0, 0), |node| node.span)
    }

    pub(super) fn unescape_string(&self, span: Span) -> ParseResult<String> {
        let raw = self.text(span);
        let inner = &raw[1..raw.len() - 1];
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some('0') => out.push('\0'),
                _ => return Err(crate::error::ParseError::InvalidEscape { span }),
            }
        }
        Ok(out)
    }
}
