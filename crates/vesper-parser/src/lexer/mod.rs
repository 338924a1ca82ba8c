//! The `Lexer` wraps a `logos`-generated token stream and turns it into the
//! flat, position-tracked `Token` sequence the parser consumes.
//!
//! The grammar accepts either an explicit `;` or a newline as a statement
//! terminator. Rather than making every grammar rule newline-aware (the
//! approach the indentation-sensitive languages in this corpus need), the
//! lexer performs Go-style automatic semicolon insertion: a newline
//! immediately following a token that can legally end a statement is
//! rewritten into a `Semicolon`; every other newline is discarded. The
//! parser downstream never sees a `Newline` token.

pub mod token;

pub use token::{Token, TokenKind};

use logos::Logos;
use vesper_source::types::Span;

use crate::error::LexError;

/// Wraps a `logos::Lexer` over `TokenKind`, normalizing newlines into
/// automatic semicolons and translating lex failures into [`LexError`].
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
    /// The kind of the last token handed back by [`Lexer::next_token`],
    /// used to decide whether a following newline ends a statement.
    last: Option<TokenKind>,
    eof_emitted: bool,
}

/// Token kinds after which a newline is significant and should be turned
/// into an automatic `;`.
fn ends_statement(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier
            | TokenKind::IntLiteral
            | TokenKind::FloatLiteral
            | TokenKind::StringLiteral
            | TokenKind::True
            | TokenKind::False
            | TokenKind::RightParen
            | TokenKind::RightBracket
            | TokenKind::RightBrace
            | TokenKind::Return
            | TokenKind::IntType
            | TokenKind::FloatType
            | TokenKind::BoolType
            | TokenKind::StringType
    )
}

impl<'src> Lexer<'src> {
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { inner: TokenKind::lexer(source), source, last: None, eof_emitted: false }
    }

    /// Returns the next non-newline token, with automatic-semicolon
    /// insertion already applied.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] when the source contains a character or
    /// sequence `logos` has no rule for, or an unterminated string literal.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        loop {
            let Some(result) = self.inner.next() else {
                if self.eof_emitted {
                    // Callers that keep pulling past EOF get EOF forever.
                    let end = self.source.len();
                    return Ok(Token::new(TokenKind::Eof, Span::new(end, end)));
                }
                self.eof_emitted = true;
                let end = self.source.len();
                let kind = if self.last.is_some_and(ends_statement) {
                    TokenKind::Semicolon
                } else {
                    TokenKind::Eof
                };
                self.last = Some(kind);
                return Ok(Token::new(kind, Span::new(end, end)));
            };

            let span: Span = self.inner.span().into();

            match result {
                Ok(TokenKind::Newline) => {
                    if self.last.is_some_and(ends_statement) {
                        self.last = Some(TokenKind::Semicolon);
                        return Ok(Token::new(TokenKind::Semicolon, span));
                    }
                    continue;
                }
                Ok(kind) => {
                    self.last = Some(kind);
                    return Ok(Token::new(kind, span));
                }
                Err(()) => {
                    let character = self.source[span.start..].chars().next().unwrap_or('\0');
                    if character == '"' {
                        return Err(LexError::UnterminatedString { span });
                    }
                    return Err(LexError::UnexpectedCharacter { character, span });
                }
            }
        }
    }

    /// Lexes the whole source into a `Vec<Token>`, ending in exactly one
    /// `Eof` token. Convenience for tests and the disassembler-style
    /// `--tokens` CLI dump.
    ///
    /// # Errors
    ///
    /// Returns the first [`LexError`] encountered.
    pub fn tokenize(source: &'src str) -> Result<Vec<Token>, LexError> {
        let mut lexer = Self::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}
