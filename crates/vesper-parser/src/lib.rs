//! # Vesper Parser
//!
//! Lexing, parsing, and module resolution for the Vesper language: a small
//! statically-typed scripting language with brace-delimited blocks,
//! semicolon-or-newline statement termination, and a single flat module
//! system (`use`/`export`) resolved relative to the referencing file or a
//! stdlib directory.
//!
//! ## Pipeline
//!
//! - [`lexer`] turns source text into a `Token` stream, folding newlines into
//!   automatic semicolons.
//! - [`parser`] is a recursive-descent parser with no error recovery: the
//!   first [`error::ParseError`] aborts the parse.
//! - [`resolver`] turns a `use` statement's module path into a parsed,
//!   cached [`vesper_ast::ast::AST`], detecting cyclic imports along the way.
//! - [`error`] collects the [`error::LexError`], [`error::ParseError`], and
//!   [`error::ResolveError`] taxonomies shared by the three stages above.
//!
//! ## Example
//!
//! ```rust,ignore
//! use vesper_parser::parser::Parser;
//!
//! let source = "fun main(args: [string]) {\n    print \"hello\"\n}\n";
//! let (ast, top_level) = Parser::parse_program(source)?;
//! ```

pub mod error;
pub mod lexer;
pub mod parser;
pub mod resolver;
