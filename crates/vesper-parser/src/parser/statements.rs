//! Statement parsing: declarations, control flow, and the module system.
//!
//! The grammar has no distinct top-level vs. nested-statement production —
//! `parse_statement` is used uniformly by `parse_program`, block bodies, and
//! class bodies alike, the same contract `parser/mod.rs` already documents.

use vesper_ast::nodes::{
    AnyNode,
    ClassDecl,
    DeclarationStmt,
    ExportStmt,
    ExpressionStmt,
    ForStmt,
    FunctionDecl,
    IfStmt,
    NodeID,
    NodeKind,
    PrintStmt,
    ReturnStmt,
    UseStmt,
    WhileStmt,
};
use vesper_source::types::Span;

use super::Parser;
use crate::error::ParseResult;
use crate::lexer::TokenKind;

impl Parser<'_> {
    pub(super) fn parse_statement(&mut self) -> ParseResult<NodeID> {
        match self.current().kind {
            TokenKind::Fun => self.parse_function_decl(),
            TokenKind::Class => self.parse_class_decl(),
            TokenKind::Use => self.parse_use_stmt(),
            TokenKind::Export => self.parse_export_stmt(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Print => self.parse_print_stmt(),
            TokenKind::Identifier if self.is_declaration_start() => self.parse_declaration_stmt(),
            _ => self.parse_expression_stmt(),
        }
    }

    /// A `name: type` or `name = value` pair that only an identifier
    /// immediately followed by `:` or `=` can start; everything else
    /// beginning with an identifier (a call, a property access, a bare
    /// assignment target) is an expression statement instead.
    fn is_declaration_start(&self) -> bool {
        self.check_peek(TokenKind::Colon) || self.check_peek(TokenKind::Equal)
    }

    fn parse_declaration_stmt(&mut self) -> ParseResult<NodeID> {
        let start = self.current().span;
        let name = self.expect_identifier()?;
        let type_annotation = self.parse_optional_type_annotation()?;
        let initializer =
            if self.matches(TokenKind::Equal)? { Some(self.parse_expression()?) } else { None };
        let span = start.merge(&self.current().span);
        self.expect_statement_end()?;
        let node =
            DeclarationStmt::new(name, type_annotation, initializer, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Declaration, AnyNode::Declaration(node), span))
    }

    fn parse_expression_stmt(&mut self) -> ParseResult<NodeID> {
        let expr = self.parse_expression()?;
        let span = self.span_of(expr);
        self.expect_statement_end()?;
        let node = ExpressionStmt::new(expr, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Statement, AnyNode::ExpressionStmt(node), span))
    }

    fn parse_print_stmt(&mut self) -> ParseResult<NodeID> {
        let start = self.expect(TokenKind::Print)?;
        let value = self.parse_expression()?;
        let span = start.span.merge(&self.span_of(value));
        self.expect_statement_end()?;
        let node = PrintStmt::new(value, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Statement, AnyNode::Print(node), span))
    }

    fn parse_return_stmt(&mut self) -> ParseResult<NodeID> {
        let start = self.expect(TokenKind::Return)?;
        let value = if self.starts_statement_end() {
            None
        } else {
            Some(self.parse_expression()?)
        };
        let span = value.map_or(start.span, |v| start.span.merge(&self.span_of(v)));
        self.expect_statement_end()?;
        let node = ReturnStmt::new(value, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Statement, AnyNode::Return(node), span))
    }

    fn starts_statement_end(&self) -> bool {
        self.check(TokenKind::Semicolon) || self.check(TokenKind::RightBrace) || self.check(TokenKind::Eof)
    }

    fn parse_if_stmt(&mut self) -> ParseResult<NodeID> {
        let start = self.expect(TokenKind::If)?;
        let condition = self.parse_expression()?;
        let (then_body, then_span) = self.parse_block()?;
        let mut span = start.span.merge(&then_span);

        let mut elif_clauses = Vec::new();
        while self.matches(TokenKind::Elif)? {
            let elif_condition = self.parse_expression()?;
            let (elif_body, elif_span) = self.parse_block()?;
            span = span.merge(&elif_span);
            elif_clauses.push((elif_condition, elif_body));
        }

        let else_body = if self.matches(TokenKind::Else)? {
            let (body, else_span) = self.parse_block()?;
            span = span.merge(&else_span);
            Some(body)
        } else {
            None
        };

        self.expect_statement_end()?;
        let node =
            IfStmt::new(condition, then_body, elif_clauses, else_body, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Statement, AnyNode::If(node), span))
    }

    fn parse_while_stmt(&mut self) -> ParseResult<NodeID> {
        let start = self.expect(TokenKind::While)?;
        let condition = self.parse_expression()?;
        let (body, body_span) = self.parse_block()?;
        let span = start.span.merge(&body_span);
        self.expect_statement_end()?;
        let node = WhileStmt::new(condition, body, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Statement, AnyNode::While(node), span))
    }

    fn parse_for_stmt(&mut self) -> ParseResult<NodeID> {
        let start = self.expect(TokenKind::For)?;
        let variable = self.expect_identifier()?;
        let index = if self.matches(TokenKind::Comma)? { Some(self.expect_identifier()?) } else { None };
        self.expect(TokenKind::In)?;
        let iterator = self.parse_expression()?;
        let (body, body_span) = self.parse_block()?;
        let span = start.span.merge(&body_span);
        self.expect_statement_end()?;
        let node = ForStmt::new(variable, index, iterator, body, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Statement, AnyNode::For(node), span))
    }

    fn parse_function_decl(&mut self) -> ParseResult<NodeID> {
        let start = self.expect(TokenKind::Fun)?;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::LeftParen)?;
        let mut parameters = Vec::new();
        if !self.check(TokenKind::RightParen) {
            parameters.push(self.parse_parameter()?);
            while self.matches(TokenKind::Comma)? {
                parameters.push(self.parse_parameter()?);
            }
        }
        self.expect(TokenKind::RightParen)?;
        let return_type = self.parse_optional_type_annotation()?;
        let (body, body_span) = self.parse_block()?;
        let span = start.span.merge(&body_span);
        self.expect_statement_end()?;
        let node =
            FunctionDecl::new(name, parameters, return_type, body, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Declaration, AnyNode::Function(node), span))
    }

    /// A function parameter: `name: type`, modeled as a `Declaration` with no
    /// initializer, same as the specification describes.
    fn parse_parameter(&mut self) -> ParseResult<NodeID> {
        let start = self.current().span;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type_annotation()?;
        let span = start.merge(&self.current().span);
        let node = DeclarationStmt::new(name, Some(ty), None, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Declaration, AnyNode::Declaration(node), span))
    }

    fn parse_class_decl(&mut self) -> ParseResult<NodeID> {
        let start = self.expect(TokenKind::Class)?;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::LeftBrace)?;
        self.skip_terminators_pub();
        let mut body = Vec::new();
        while !self.check(TokenKind::RightBrace) {
            let member =
                if self.check(TokenKind::Fun) { self.parse_function_decl()? } else { self.parse_field_decl()? };
            body.push(member);
            self.skip_terminators_pub();
        }
        let end = self.expect(TokenKind::RightBrace)?;
        let span = start.span.merge(&end.span);
        self.expect_statement_end()?;
        let node = ClassDecl::new(name, body, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Declaration, AnyNode::Class(node), span))
    }

    /// A class field: `name: type`, no initializer — fields are populated
    /// through an object literal (`ClassName { field: value, ... }`), not a
    /// default expression on the declaration itself.
    fn parse_field_decl(&mut self) -> ParseResult<NodeID> {
        let start = self.current().span;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type_annotation()?;
        let span = start.merge(&self.current().span);
        self.expect_statement_end()?;
        let node = DeclarationStmt::new(name, Some(ty), None, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Declaration, AnyNode::Declaration(node), span))
    }

    /// `use A, B from "module"` (explicit targets) or `use "module"`
    /// (wildcard import, empty `targets`).
    fn parse_use_stmt(&mut self) -> ParseResult<NodeID> {
        let start = self.expect(TokenKind::Use)?;

        if self.check(TokenKind::StringLiteral) {
            let path_token = self.current();
            self.expect(TokenKind::StringLiteral)?;
            let module_path = self.unescape_string(path_token.span)?;
            let span = start.span.merge(&path_token.span);
            self.expect_statement_end()?;
            let node = UseStmt::new(Vec::new(), module_path, NodeID::placeholder(), span);
            return Ok(self.alloc(NodeKind::Statement, AnyNode::Use(node), span));
        }

        let mut targets = vec![self.expect_identifier()?];
        while self.matches(TokenKind::Comma)? {
            targets.push(self.expect_identifier()?);
        }
        self.expect(TokenKind::From)?;
        let path_token = self.current();
        self.expect(TokenKind::StringLiteral)?;
        let module_path = self.unescape_string(path_token.span)?;
        let span = start.span.merge(&path_token.span);
        self.expect_statement_end()?;
        let node = UseStmt::new(targets, module_path, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Statement, AnyNode::Use(node), span))
    }

    /// `export <fun|class|use|declaration>`: the inner statement parses and
    /// terminates itself, so only its span is folded into the wrapper.
    fn parse_export_stmt(&mut self) -> ParseResult<NodeID> {
        let start = self.expect(TokenKind::Export)?;
        let inner = match self.current().kind {
            TokenKind::Fun => self.parse_function_decl()?,
            TokenKind::Class => self.parse_class_decl()?,
            TokenKind::Use => self.parse_use_stmt()?,
            TokenKind::Identifier if self.is_declaration_start() => self.parse_declaration_stmt()?,
            _ => return Err(self.unexpected("a function, class, use, or declaration")),
        };
        let span = start.span.merge(&self.span_of(inner));
        let node = ExportStmt::new(inner, NodeID::placeholder(), span);
        Ok(self.alloc(NodeKind::Statement, AnyNode::Export(node), span))
    }

    /// Parses a brace-delimited statement list, returning the statements and
    /// the span from `{` to `}`.
    fn parse_block(&mut self) -> ParseResult<(Vec<NodeID>, Span)> {
        let start = self.expect(TokenKind::LeftBrace)?;
        self.skip_terminators_pub();
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) {
            statements.push(self.parse_statement()?);
            self.skip_terminators_pub();
        }
        let end = self.expect(TokenKind::RightBrace)?;
        Ok((statements, start.span.merge(&end.span)))
    }

    /// Consumes a run of stray `;` tokens between statements inside a block
    /// or class body, mirroring `parse_top_level_statement`'s behavior.
    fn skip_terminators_pub(&mut self) {
        while self.matches(TokenKind::Semicolon).unwrap_or(false) {}
    }
}
