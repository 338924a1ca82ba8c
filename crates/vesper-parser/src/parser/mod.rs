//! The recursive-descent parser: turns a token stream into an [`AST`].
//!
//! There is no error recovery. The grammar has no ambiguous or optional
//! constructs that benefit from it, and a partially-built AST is never
//! handed to the analyzer — the first [`ParseError`] aborts the parse, the
//! same fail-fast contract the rest of the pipeline follows.

mod expressions;
mod statements;
mod types;

use vesper_ast::ast::AST;
use vesper_ast::nodes::{AnyNode, NodeID, NodeKind};
use vesper_source::types::Span;

use crate::error::{ParseError, ParseResult};
use crate::lexer::{Lexer, Token, TokenKind};

/// Drives token consumption and node allocation for every `parse_*` method
/// spread across this module and its `expressions`/`statements`/`types`
/// siblings.
pub struct Parser<'src> {
    source: &'src str,
    ast: AST,
    lexer: Lexer<'src>,
    current: Token,
    peek: Token,
}

impl<'src> Parser<'src> {
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the first two tokens of `source` can't be
    /// lexed.
    pub fn new(source: &'src str) -> ParseResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        let peek = lexer.next_token()?;
        Ok(Self { source, ast: AST::new(), lexer, current, peek })
    }

    /// Parses `source` to completion, returning the built [`AST`] and the
    /// ordered list of top-level statement node ids.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] encountered.
    pub fn parse_program(source: &'src str) -> ParseResult<(AST, Vec<NodeID>)> {
        let mut parser = Self::new(source)?;
        let mut statements = Vec::new();
        parser.skip_terminators();
        while !parser.check(TokenKind::Eof) {
            statements.push(parser.parse_top_level_statement()?);
            parser.skip_terminators();
        }
        Ok((parser.ast, statements))
    }

    pub(super) fn ast(&self) -> &AST { &self.ast }

    pub(super) fn ast_mut(&mut self) -> &mut AST { &mut self.ast }

    pub(super) fn alloc(&mut self, kind: NodeKind, data: AnyNode, span: Span) -> NodeID {
        self.ast.alloc_node(kind, data, span)
    }

    pub(super) fn alloc_str(&self, s: &str) -> String { self.ast.alloc_str(s).to_string() }

    fn advance(&mut self) -> ParseResult<Token> {
        let next = self.lexer.next_token()?;
        let previous = std::mem::replace(&mut self.current, self.peek);
        self.peek = next;
        Ok(previous)
    }

    pub(super) fn current(&self) -> Token { self.current }

    pub(super) fn peek(&self) -> Token { self.peek }

    pub(super) fn check(&self, kind: TokenKind) -> bool { self.current.kind == kind }

    pub(super) fn check_peek(&self, kind: TokenKind) -> bool { self.peek.kind == kind }

    /// Consumes the current token if it matches `kind`, returning whether it
    /// did.
    pub(super) fn matches(&mut self, kind: TokenKind) -> ParseResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consumes the current token, requiring it to be `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnexpectedToken`] (or `UnexpectedEof` at end of
    /// input) if it isn't.
    pub(super) fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    pub(super) fn unexpected(&self, expected: &str) -> ParseError {
        if self.current.kind == TokenKind::Eof {
            ParseError::UnexpectedEof { expected: expected.to_string(), span: self.current.span }
        } else {
            ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.current.kind,
                span: self.current.span,
            }
        }
    }

    /// Consumes an identifier token, returning its source text.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnexpectedToken`] if the current token isn't an
    /// identifier.
    pub(super) fn expect_identifier(&mut self) -> ParseResult<String> {
        if !self.check(TokenKind::Identifier) {
            return Err(self.unexpected("an identifier"));
        }
        let token = self.advance()?;
        Ok(self.text(token.span).to_string())
    }

    pub(super) fn text(&self, span: Span) -> &'src str { &self.source[span.start..span.end] }

    /// Consumes the `;` that every statement form requires (automatic
    /// semicolon insertion already folded a trailing newline into one).
    /// A statement immediately followed by `}` or end-of-file needs no
    /// explicit terminator of its own.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingTerminator`] otherwise.
    pub(super) fn expect_statement_end(&mut self) -> ParseResult<()> {
        if self.matches(TokenKind::Semicolon)? {
            return Ok(());
        }
        if self.check(TokenKind::RightBrace) || self.check(TokenKind::Eof) {
            return Ok(());
        }
        Err(ParseError::MissingTerminator { span: self.current.span })
    }

    /// Skips any run of stray `;` left over between statements (e.g. a blank
    /// line that got folded into a semicolon and then another explicit `;`).
    fn skip_terminators(&mut self) {
        while self.check(TokenKind::Semicolon) {
            let _ = self.advance();
        }
    }

    fn parse_top_level_statement(&mut self) -> ParseResult<NodeID> {
        let id = self.parse_statement()?;
        self.skip_terminators();
        Ok(id)
    }
}
