//! Semantic analysis for the Vesper programming language.
//!
//! Analysis runs in two passes over a module's AST, per `SPEC_FULL.md` §4.2:
//!
//! 1. The [`passes::tld`] pass declares every top-level `fun`, `class`,
//!    `use`, and `Declaration` into the module's top [`symbol::Block`],
//!    so later references (including forward references) resolve.
//! 2. The [`passes::code`] pass walks every statement and expression body,
//!    assigning each expression a [`types::Type`] and, where relevant, a
//!    monomorphized operator variant — both recorded in
//!    [`context::Annotations`] rather than mutating the AST in place.
//!
//! [`error::SemanticError`] is the sole error type either pass produces,
//! grouped into the resolution/type/access/structural kinds from
//! `SPEC_FULL.md` §7.

pub mod context;
pub mod error;
pub mod passes;
pub mod symbol;
pub mod types;

use vesper_ast::ast::AST;
use vesper_ast::nodes::NodeID;

use context::SemanticContext;
use error::SemanticError;

/// Analyzes one module's top-level statement list, running the TLD pass
/// followed by the code pass.
///
/// `module_path` is the module's absolute path, used to qualify the class
/// names this module declares (`"<module_path>:<ClassName>"`, per
/// `SPEC_FULL.md` §3).
///
/// ## Errors
///
/// Returns every [`SemanticError`] found across both passes. If the TLD
/// pass fails, the code pass does not run — its results would reference a
/// block table with absent or malformed top-level bindings.
pub fn analyze_module(
    ast: &AST,
    module_path: &str,
    statements: &[NodeID],
) -> Result<SemanticContext, Vec<SemanticError>> {
    let mut context = SemanticContext::new();

    let tld_errors = passes::tld::run(ast, module_path, statements, &mut context);
    if !tld_errors.is_empty() {
        return Err(tld_errors);
    }

    let code_errors = passes::code::run(ast, statements, &mut context);
    if !code_errors.is_empty() {
        return Err(code_errors);
    }

    Ok(context)
}

/// Validates that a module's top block declares a `main` function taking
/// exactly one parameter of type `[string]`, as an entry module must. The
/// driver calls this only for the module named on the command line, not for
/// every module analyzed.
///
/// ## Errors
///
/// Returns [`SemanticError::MissingMain`] if no `main` binding exists, or
/// [`SemanticError::MainIllTyped`] if it exists with the wrong signature.
pub fn validate_entry_module(
    context: &SemanticContext,
    module_path: &str,
) -> Result<(), SemanticError> {
    let top = context.blocks.top_block();
    let Some(block) = context.blocks.get_block(top) else {
        return Err(SemanticError::MissingMain { module_path: module_path.to_string() });
    };

    let Some(main) = block.get_variable("main") else {
        return Err(SemanticError::MissingMain { module_path: module_path.to_string() });
    };

    let expected_param = types::Type::list(types::Type::String);
    match &main.ty {
        types::Type::Fun { parameters, return_type }
            if parameters.len() == 1 && parameters[0] == expected_param && return_type.is_none() =>
        {
            Ok(())
        }
        other => {
            Err(SemanticError::MainIllTyped { found: Box::new(other.clone()), span: main.span })
        }
    }
}
