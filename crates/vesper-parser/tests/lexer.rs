//! Tests for the lexer: token kinds, automatic semicolon insertion, and
//! lexical error reporting.

use vesper_parser::error::LexError;
use vesper_parser::lexer::{Lexer, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
}

#[test]
fn simple_tokens() {
    let tokens = kinds("x = 42");
    assert_eq!(
        tokens,
        vec![TokenKind::Identifier, TokenKind::Equal, TokenKind::IntLiteral, TokenKind::Semicolon, TokenKind::Eof]
    );
}

#[test]
fn newline_after_identifier_becomes_semicolon() {
    let tokens = kinds("x\ny");
    assert_eq!(
        tokens,
        vec![TokenKind::Identifier, TokenKind::Semicolon, TokenKind::Identifier, TokenKind::Semicolon, TokenKind::Eof]
    );
}

#[test]
fn newline_after_operator_is_not_a_statement_end() {
    // A trailing `+` can't end a statement, so the newline is discarded and
    // the expression keeps parsing on the next line.
    let tokens = kinds("1 +\n2");
    assert_eq!(
        tokens,
        vec![
            TokenKind::IntLiteral,
            TokenKind::Plus,
            TokenKind::IntLiteral,
            TokenKind::Semicolon,
            TokenKind::Eof
        ]
    );
}

#[test]
fn newline_inside_a_statement_that_has_not_ended_is_discarded() {
    let tokens = kinds("(\n1\n)");
    assert_eq!(
        tokens,
        vec![
            TokenKind::LeftParen,
            TokenKind::IntLiteral,
            TokenKind::Semicolon,
            TokenKind::RightParen,
            TokenKind::Semicolon,
            TokenKind::Eof
        ]
    );
}

#[test]
fn string_escapes_are_recognized_at_the_token_level() {
    let tokens = kinds(r#""hello\nworld""#);
    assert_eq!(tokens, vec![TokenKind::StringLiteral, TokenKind::Semicolon, TokenKind::Eof]);
}

#[test]
fn unterminated_string_is_a_lex_error() {
    let mut lexer = Lexer::new("\"unterminated");
    let err = lexer.next_token().unwrap_err();
    assert!(matches!(err, LexError::UnterminatedString { .. }));
}

#[test]
fn unexpected_character_is_a_lex_error() {
    let mut lexer = Lexer::new("`");
    let err = lexer.next_token().unwrap_err();
    assert!(matches!(err, LexError::UnexpectedCharacter { character: '`', .. }));
}

#[test]
fn keywords_are_not_identifiers() {
    let tokens = kinds("fun class if elif else while for return print use export from true false");
    assert_eq!(
        tokens,
        vec![
            TokenKind::Fun,
            TokenKind::Class,
            TokenKind::If,
            TokenKind::Elif,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::For,
            TokenKind::Return,
            TokenKind::Print,
            TokenKind::Use,
            TokenKind::Export,
            TokenKind::From,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn repeated_calls_past_eof_keep_returning_eof() {
    let mut lexer = Lexer::new("x");
    let _ = lexer.next_token().unwrap();
    let _ = lexer.next_token().unwrap();
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}
