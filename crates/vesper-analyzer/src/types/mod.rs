//! Type system for semantic analysis.
//!
//! - [`Type`]: the resolved semantic type embedded in analyzer annotations
//! - [`resolve_annotation`]: converts the parser's source-level `TypeAnnotation`
//!   into a semantic `Type`
//! - [`tables`]: the cast/unary/binary/access operator tables §4.2 specifies

mod ty;

pub mod tables;

pub use ty::Type;
use vesper_ast::type_annotation::TypeAnnotation;

/// Converts a source-level type annotation into the semantic `Type` it denotes.
///
/// This is a purely structural conversion; whether an `Object` annotation
/// names a class that actually exists is validated separately by
/// `crate::context::check_classes`.
#[must_use]
pub fn resolve_annotation(annotation: &TypeAnnotation) -> Type {
    match annotation {
        TypeAnnotation::Int => Type::Int,
        TypeAnnotation::Float => Type::Float,
        TypeAnnotation::Bool => Type::Bool,
        TypeAnnotation::String => Type::String,
        TypeAnnotation::List(inner) => Type::list(resolve_annotation(inner)),
        TypeAnnotation::Dict(inner) => Type::dict(resolve_annotation(inner)),
        TypeAnnotation::Fun { parameters, return_type } => Type::Fun {
            parameters: parameters.iter().map(resolve_annotation).collect(),
            return_type: return_type.as_ref().map(|r| Box::new(resolve_annotation(r))),
        },
        TypeAnnotation::Object(name) => Type::Object { class_name: name.clone() },
    }
}
