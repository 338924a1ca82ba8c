//! Source-level type syntax.
//!
//! `TypeAnnotation` is what the parser produces when it reads a `: type`
//! suffix on a declaration, parameter, or cast target. It is deliberately not
//! an arena node: the grammar's type syntax never needs a parent pointer or a
//! visitor dispatch of its own, and a plain recursive enum is cheap to clone,
//! matching the semantic `Type` it is resolved into during analysis.

use std::fmt;

/// The syntax of a type as written in source, e.g. `[int]`, `fun(int) -> bool`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeAnnotation {
    /// `int`
    Int,
    /// `float`
    Float,
    /// `bool`
    Bool,
    /// `string`
    String,
    /// `[T]`
    List(Box<TypeAnnotation>),
    /// `{T}`
    Dict(Box<TypeAnnotation>),
    /// `fun(T1, T2) -> R` or `fun(T1, T2)` with no return
    Fun { parameters: Vec<TypeAnnotation>, return_type: Option<Box<TypeAnnotation>> },
    /// A user-defined class name
    Object(String),
}

impl fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Bool => write!(f, "bool"),
            Self::String => write!(f, "string"),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::Dict(inner) => write!(f, "{{{inner}}}"),
            Self::Fun { parameters, return_type } => {
                write!(f, "fun(")?;
                for (i, p) in parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ")")?;
                if let Some(ret) = return_type {
                    write!(f, " -> {ret}")?;
                }
                Ok(())
            }
            Self::Object(name) => write!(f, "{name}"),
        }
    }
}
