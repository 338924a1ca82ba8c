//! Semantic error types and reporting.
//!
//! Every diagnostic belongs to exactly one of the four kinds laid out in
//! `SPEC_FULL.md` §7: [resolution](SemanticError#variants.UndefinedVariable),
//! type, access, and structural errors. The CLI is the sole boundary that
//! turns these into process exit codes; everywhere else they propagate with
//! `?` through `Result<_, Vec<SemanticError>>` or `Result<_, SemanticError>`.

use thiserror::Error;
use vesper_source::types::Span;

use crate::types::Type;

/// Semantic analysis errors, one variant per `SPEC_FULL.md` §7 diagnostic.
#[derive(Debug, Error, Clone)]
pub enum SemanticError {
    // --- Resolution errors -------------------------------------------------
    /// Reference to a variable name with no visible declaration.
    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String, span: Span },

    /// Reference to a class name with no visible declaration.
    #[error("undefined class '{name}'")]
    UndefinedClass { name: String, span: Span },

    /// A name was declared twice in the same block.
    #[error("'{name}' is already declared in this scope")]
    DuplicateDeclaration { name: String, original_span: Span, duplicate_span: Span },

    /// `use` names a module that cannot be resolved or loaded.
    #[error("cannot resolve module '{module_path}'")]
    UnresolvedModule { module_path: String, span: Span },

    /// `use` imports a name the target module never declares.
    #[error("module '{module_path}' has no member '{name}'")]
    ImportOfUndefined { name: String, module_path: String, span: Span },

    /// `use` imports a name the target module declares but does not `export`.
    #[error("'{name}' is not exported by module '{module_path}'")]
    ImportNotExported { name: String, module_path: String, span: Span },

    // --- Type errors ---------------------------------------------------------
    /// A declaration's initializer does not match its annotated type.
    #[error("'{name}' declared as {declared} but initialized with {found}")]
    DeclarationTypeMismatch { name: String, declared: Box<Type>, found: Box<Type>, span: Span },

    /// An assignment's right-hand side does not match the variable's type.
    #[error("cannot assign {found} to '{name}' of type {expected}")]
    AssignmentTypeMismatch { name: String, expected: Box<Type>, found: Box<Type>, span: Span },

    /// A `return` expression's type does not match the enclosing function's
    /// declared return type.
    #[error("expected return type {expected}, found {found}")]
    ReturnTypeMismatch { expected: Box<Type>, found: Box<Type>, span: Span },

    /// A call passes a different number of arguments than the callee expects.
    #[error("'{function_name}' expects {expected} argument(s), found {found}")]
    ArgumentCountMismatch { function_name: String, expected: usize, found: usize, span: Span },

    /// A call argument's type does not match the corresponding parameter.
    #[error("'{function_name}' argument {index} expects {expected}, found {found}")]
    ArgumentTypeMismatch {
        function_name: String,
        index: usize,
        expected: Box<Type>,
        found: Box<Type>,
        span: Span,
    },

    /// A cast expression names a (source, target) pair absent from the cast table.
    #[error("cannot cast {from} to {to}")]
    InvalidCast { from: Box<Type>, to: Box<Type>, span: Span },

    /// A unary operator has no table entry for the operand's type.
    #[error("operator '{operator}' is not defined for {operand}")]
    NoMatchingUnaryOperator { operator: String, operand: Box<Type>, span: Span },

    /// A binary operator has no table entry for the operand types.
    #[error("operator '{operator}' is not defined for {left} and {right}")]
    NoMatchingBinaryOperator { operator: String, left: Box<Type>, right: Box<Type>, span: Span },

    /// The target of a call expression is not a function type.
    #[error("{found} is not callable")]
    NotCallable { found: Box<Type>, span: Span },

    /// An `if`/`while` condition is not `bool`.
    #[error("condition must be bool, found {found}")]
    ConditionNotBool { found: Box<Type>, span: Span },

    // --- Access errors ---------------------------------------------------------
    /// An index expression's index type doesn't fit the container kind
    /// (e.g. a `Dict` indexed with a non-`string`).
    #[error("{container} cannot be indexed with {index_type}")]
    InvalidIndexType { container: Box<Type>, index_type: Box<Type>, span: Span },

    /// An index expression's target is not `List`, `Dict`, or `String`.
    #[error("{found} is not indexable")]
    NotIndexable { found: Box<Type>, span: Span },

    /// A property access's target is not an `Object`.
    #[error("{found} has no properties")]
    PropertyOnNonObject { found: Box<Type>, span: Span },

    /// A property access names a member the target class does not declare.
    #[error("class '{class_name}' has no member '{property}'")]
    UnknownProperty { class_name: String, property: String, span: Span },

    // --- Structural errors -------------------------------------------------
    /// The module is the program's entry point but declares no `main` function.
    #[error("module '{module_path}' has no 'main' function")]
    MissingMain { module_path: String },

    /// `main` exists but its signature is not `fun main(args: [string])`.
    #[error("'main' must take one parameter of type [string] and return nothing, found {found}")]
    MainIllTyped { found: Box<Type>, span: Span },

    /// A function with a non-`NoType` return type has a path that falls off
    /// its end without a `return`.
    #[error("function '{function_name}' does not return a value on all paths")]
    MissingTopLevelReturn { function_name: String, span: Span },
}

impl SemanticError {
    /// Returns the span associated with this error, if any. `MissingMain`
    /// names a whole module rather than a single node, so it has none.
    #[must_use]
    pub const fn span(&self) -> Option<Span> {
        match self {
            Self::UndefinedVariable { span, .. }
            | Self::UndefinedClass { span, .. }
            | Self::DuplicateDeclaration { duplicate_span: span, .. }
            | Self::UnresolvedModule { span, .. }
            | Self::ImportOfUndefined { span, .. }
            | Self::ImportNotExported { span, .. }
            | Self::DeclarationTypeMismatch { span, .. }
            | Self::AssignmentTypeMismatch { span, .. }
            | Self::ReturnTypeMismatch { span, .. }
            | Self::ArgumentCountMismatch { span, .. }
            | Self::ArgumentTypeMismatch { span, .. }
            | Self::InvalidCast { span, .. }
            | Self::NoMatchingUnaryOperator { span, .. }
            | Self::NoMatchingBinaryOperator { span, .. }
            | Self::NotCallable { span, .. }
            | Self::ConditionNotBool { span, .. }
            | Self::InvalidIndexType { span, .. }
            | Self::NotIndexable { span, .. }
            | Self::PropertyOnNonObject { span, .. }
            | Self::UnknownProperty { span, .. }
            | Self::MainIllTyped { span, .. }
            | Self::MissingTopLevelReturn { span, .. } => Some(*span),
            Self::MissingMain { .. } => None,
        }
    }
}
