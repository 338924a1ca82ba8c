//! Token definitions for the language's lexer.

use std::fmt::{self, Display, Formatter};

use logos::Logos;

/// Every lexical token the grammar admits.
///
/// Identifiers are a single unified token; keyword/type-name distinctions are
/// made by the parser, not the lexer, except for the reserved words below
/// which would otherwise collide with identifiers.
#[derive(Logos, Debug, Eq, PartialEq, Clone, Copy, Hash)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum TokenKind {
    // Keywords
    #[token("fun")]
    Fun,
    #[token("class")]
    Class,
    #[token("use")]
    Use,
    #[token("from")]
    From,
    #[token("export")]
    Export,
    #[token("if")]
    If,
    #[token("elif")]
    Elif,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("return")]
    Return,
    #[token("print")]
    Print,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("as")]
    As,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // Type keywords
    #[token("int")]
    IntType,
    #[token("float")]
    FloatType,
    #[token("bool")]
    BoolType,
    #[token("string")]
    StringType,

    // Literals
    #[regex(r"[0-9][0-9_]*")]
    IntLiteral,
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    FloatLiteral,
    #[regex(r#""([^\\"]|\\.)*""#)]
    StringLiteral,

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    // Operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("=")]
    Equal,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    BangEqual,
    #[token("!")]
    Bang,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEqual,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEqual,
    #[token("..")]
    DotDot,
    #[token("..=")]
    DotDotEqual,
    #[token("->")]
    Arrow,

    // Delimiters
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token(";")]
    Semicolon,

    #[regex(r"\n")]
    Newline,

    Eof,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fun => "fun",
            Self::Class => "class",
            Self::Use => "use",
            Self::From => "from",
            Self::Export => "export",
            Self::If => "if",
            Self::Elif => "elif",
            Self::Else => "else",
            Self::While => "while",
            Self::For => "for",
            Self::In => "in",
            Self::Return => "return",
            Self::Print => "print",
            Self::And => "and",
            Self::Or => "or",
            Self::As => "as",
            Self::True => "true",
            Self::False => "false",
            Self::IntType => "int",
            Self::FloatType => "float",
            Self::BoolType => "bool",
            Self::StringType => "string",
            Self::IntLiteral => "<int literal>",
            Self::FloatLiteral => "<float literal>",
            Self::StringLiteral => "<string literal>",
            Self::Identifier => "<identifier>",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Equal => "=",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::Bang => "!",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::DotDot => "..",
            Self::DotDotEqual => "..=",
            Self::Arrow => "->",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::LeftBrace => "{",
            Self::RightBrace => "}",
            Self::LeftBracket => "[",
            Self::RightBracket => "]",
            Self::Comma => ",",
            Self::Colon => ":",
            Self::Dot => ".",
            Self::Semicolon => ";",
            Self::Newline => "<newline>",
            Self::Eof => "<eof>",
        };
        f.write_str(s)
    }
}

/// A single lexed token: its kind and source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: vesper_source::types::Span,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, span: vesper_source::types::Span) -> Self { Self { kind, span } }
}
