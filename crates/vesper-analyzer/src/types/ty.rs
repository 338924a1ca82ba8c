//! Type representation for the Vesper type system.

use std::fmt;

/// A resolved semantic type, assigned to every expression node during the
/// code pass.
///
/// Equality is structural and recursive on inner types; `Object` equality
/// compares `class_name` only. Types are cheap to clone and are embedded in
/// the analyzer's side-table annotations as they are resolved (see
/// `crate::context::Annotations`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Float,
    Bool,
    String,
    /// A homogeneous list; `Dict` keys are always `String`, so only the
    /// value type is carried.
    List(Box<Type>),
    Dict(Box<Type>),
    Fun { parameters: Vec<Type>, return_type: Option<Box<Type>> },
    Object { class_name: String },
    /// Placeholder for expressions without a value (a no-return `Call` used
    /// as an expression statement).
    NoType,
}

impl Type {
    #[must_use]
    pub fn list(elem: Self) -> Self { Self::List(Box::new(elem)) }

    #[must_use]
    pub fn dict(value: Self) -> Self { Self::Dict(Box::new(value)) }

    #[must_use]
    pub const fn is_numeric(&self) -> bool { matches!(self, Self::Int | Self::Float) }

    /// Walks this type collecting every `Object` class name it mentions, for
    /// `check_classes` in the TLD pass.
    pub fn collect_class_names(&self, out: &mut Vec<String>) {
        match self {
            Self::Object { class_name } => out.push(class_name.clone()),
            Self::List(inner) | Self::Dict(inner) => inner.collect_class_names(out),
            Self::Fun { parameters, return_type } => {
                for p in parameters {
                    p.collect_class_names(out);
                }
                if let Some(r) = return_type {
                    r.collect_class_names(out);
                }
            }
            Self::Int | Self::Float | Self::Bool | Self::String | Self::NoType => {}
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Bool => write!(f, "bool"),
            Self::String => write!(f, "string"),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::Dict(inner) => write!(f, "{{{inner}}}"),
            Self::Fun { parameters, return_type } => {
                write!(f, "(")?;
                for (i, p) in parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ")")?;
                if let Some(r) = return_type {
                    write!(f, " -> {r}")?;
                }
                Ok(())
            }
            Self::Object { class_name } => write!(f, "{class_name}"),
            Self::NoType => write!(f, "<no type>"),
        }
    }
}
