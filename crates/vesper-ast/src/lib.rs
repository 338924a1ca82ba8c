//! Abstract Syntax Tree (AST) definitions for the Vesper programming language.

#[macro_use]
pub mod macros;

pub mod ast;
pub mod nodes;
pub mod type_annotation;
pub mod visitor;
