//! Type-annotation parsing (`int`, `[string]`, `{int}`, `fun(int) -> bool`,
//! and bare class names).

use vesper_ast::type_annotation::TypeAnnotation;

use super::Parser;
use crate::error::ParseResult;
use crate::lexer::TokenKind;

impl Parser<'_> {
    /// Parses one type annotation.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::ParseError`] if the current token doesn't
    /// start a type.
    pub(super) fn parse_type_annotation(&mut self) -> ParseResult<TypeAnnotation> {
        match self.current().kind {
            TokenKind::IntType => {
                self.expect(TokenKind::IntType)?;
                Ok(TypeAnnotation::Int)
            }
            TokenKind::FloatType => {
                self.expect(TokenKind::FloatType)?;
                Ok(TypeAnnotation::Float)
            }
            TokenKind::BoolType => {
                self.expect(TokenKind::BoolType)?;
                Ok(TypeAnnotation::Bool)
            }
            TokenKind::StringType => {
                self.expect(TokenKind::StringType)?;
                Ok(TypeAnnotation::String)
            }
            TokenKind::LeftBracket => {
                self.expect(TokenKind::LeftBracket)?;
                let element = self.parse_type_annotation()?;
                self.expect(TokenKind::RightBracket)?;
                Ok(TypeAnnotation::List(Box::new(element)))
            }
            TokenKind::LeftBrace => {
                self.expect(TokenKind::LeftBrace)?;
                let value = self.parse_type_annotation()?;
                self.expect(TokenKind::RightBrace)?;
                Ok(TypeAnnotation::Dict(Box::new(value)))
            }
            TokenKind::Fun => {
                self.expect(TokenKind::Fun)?;
                self.expect(TokenKind::LeftParen)?;
                let mut parameters = Vec::new();
                if !self.check(TokenKind::RightParen) {
                    parameters.push(self.parse_type_annotation()?);
                    while self.matches(TokenKind::Comma)? {
                        parameters.push(self.parse_type_annotation()?);
                    }
                }
                self.expect(TokenKind::RightParen)?;
                let return_type = if self.matches(TokenKind::Arrow)? {
                    Some(Box::new(self.parse_type_annotation()?))
                } else {
                    None
                };
                Ok(TypeAnnotation::Fun { parameters, return_type })
            }
            TokenKind::Identifier => {
                let name = self.expect_identifier()?;
                Ok(TypeAnnotation::Object(name))
            }
            _ => Err(self.unexpected("a type annotation")),
        }
    }

    /// Parses an optional `: Type` annotation, as used by declarations and
    /// function parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::ParseError`] if a `:` is present but isn't
    /// followed by a valid type.
    pub(super) fn parse_optional_type_annotation(&mut self) -> ParseResult<Option<TypeAnnotation>> {
        if self.matches(TokenKind::Colon)? {
            Ok(Some(self.parse_type_annotation()?))
        } else {
            Ok(None)
        }
    }
}
