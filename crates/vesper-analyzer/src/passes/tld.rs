//! The top-level-declaration pass.
//!
//! Walks a module's statement list exactly one level deep (it never
//! descends into a function body or an initializer expression) and declares
//! every `fun`, `class`, `use`, and top-level `Declaration` into the
//! module's top [`Block`](crate::symbol::Block). Running this pass to
//! completion before the code pass starts means forward references — a
//! function calling another function declared later in the file — resolve
//! correctly.

use rustc_hash::FxHashSet;
use vesper_ast::ast::AST;
use vesper_ast::nodes::{AnyNode, NodeID};

use crate::context::SemanticContext;
use crate::error::SemanticError;
use crate::symbol::{ClassBinding, VariableBinding};
use crate::types::{Type, resolve_annotation};

/// Runs the TLD pass over `statements`, declaring top-level names into
/// `context`'s top block. Errors are accumulated rather than short-circuited,
/// so one bad declaration doesn't hide the rest.
pub fn run(
    ast: &AST,
    module_path: &str,
    statements: &[NodeID],
    context: &mut SemanticContext,
) -> Vec<SemanticError> {
    let mut errors = Vec::new();

    for &stmt_id in statements {
        declare_top_level(ast, module_path, stmt_id, context, &mut errors);
    }

    check_classes(context, &mut errors);

    errors
}

/// Declares a single top-level statement. `exported` is threaded down so an
/// `export` wrapping a `use`/`fun`/`class`/`Declaration` marks the binding
/// underneath, rather than needing its own namespace entry.
fn declare_top_level(
    ast: &AST,
    module_path: &str,
    stmt_id: NodeID,
    context: &mut SemanticContext,
    errors: &mut Vec<SemanticError>,
) {
    declare_top_level_inner(ast, module_path, stmt_id, context, errors, false);
}

fn declare_top_level_inner(
    ast: &AST,
    module_path: &str,
    stmt_id: NodeID,
    context: &mut SemanticContext,
    errors: &mut Vec<SemanticError>,
    exported: bool,
) {
    let Some(node) = ast.get_node(stmt_id) else { return };

    match &node.data {
        AnyNode::Export(export) => {
            declare_top_level_inner(ast, module_path, export.inner, context, errors, true);
        }
        AnyNode::Function(function) => {
            let parameters = function
                .parameters
                .iter()
                .filter_map(|&p| ast.get_as::<vesper_ast::nodes::DeclarationStmt>(p).ok())
                .map(|decl| {
                    decl.type_annotation.as_ref().map_or(Type::NoType, resolve_annotation)
                })
                .collect();
            let return_type =
                function.return_type.as_ref().map(|r| Box::new(resolve_annotation(r)));
            let ty = Type::Fun { parameters, return_type };
            let binding = VariableBinding::new(
                function.name.clone(),
                ty,
                stmt_id,
                function.span,
                exported,
            );
            if let Err(err) = context.blocks.declare_variable(binding) {
                errors.push(err);
            }
        }
        AnyNode::Class(class) => {
            let qualified_name = format!("{module_path}:{}", class.name);
            let members_id = context.blocks.create_block(Some(context.blocks.top_block()));
            context.blocks.enter_block(members_id);
            for &member_id in &class.body {
                declare_class_member(ast, member_id, context, errors);
            }
            let _ = context.blocks.exit_block();

            let binding =
                ClassBinding::new(qualified_name, members_id, stmt_id, class.span, exported);
            if let Err(err) = context.blocks.declare_class(class.name.clone(), binding) {
                errors.push(err);
            }
        }
        AnyNode::Use(use_stmt) => {
            // Cross-module resolution happens once the module is loaded
            // through the resolver (SPEC_FULL.md §4.1); at single-module
            // analysis time each imported name is bound with an unresolved
            // placeholder type, refined when the driver links modules.
            let names: Vec<String> = if use_stmt.targets.is_empty() {
                Vec::new()
            } else {
                use_stmt.targets.clone()
            };
            for name in names {
                let binding =
                    VariableBinding::new(name, Type::NoType, stmt_id, use_stmt.span, exported);
                if let Err(err) = context.blocks.declare_variable(binding) {
                    errors.push(err);
                }
            }
        }
        AnyNode::Declaration(decl) => {
            let ty = decl.type_annotation.as_ref().map_or(Type::NoType, resolve_annotation);
            let binding =
                VariableBinding::new(decl.name.clone(), ty, stmt_id, decl.span, exported);
            if let Err(err) = context.blocks.declare_variable(binding) {
                errors.push(err);
            }
        }
        _ => {}
    }
}

/// Declares a class body member (a field `Declaration` or a method
/// `Function`) into the class's own block, already entered by the caller.
fn declare_class_member(
    ast: &AST,
    member_id: NodeID,
    context: &mut SemanticContext,
    errors: &mut Vec<SemanticError>,
) {
    let Some(node) = ast.get_node(member_id) else { return };

    match &node.data {
        AnyNode::Declaration(decl) => {
            let ty = decl.type_annotation.as_ref().map_or(Type::NoType, resolve_annotation);
            let binding = VariableBinding::new(decl.name.clone(), ty, member_id, decl.span, false);
            if let Err(err) = context.blocks.declare_variable(binding) {
                errors.push(err);
            }
        }
        AnyNode::Function(function) => {
            let parameters = function
                .parameters
                .iter()
                .filter_map(|&p| ast.get_as::<vesper_ast::nodes::DeclarationStmt>(p).ok())
                .map(|decl| {
                    decl.type_annotation.as_ref().map_or(Type::NoType, resolve_annotation)
                })
                .collect();
            let return_type =
                function.return_type.as_ref().map(|r| Box::new(resolve_annotation(r)));
            let ty = Type::Fun { parameters, return_type };
            let binding =
                VariableBinding::new(function.name.clone(), ty, member_id, function.span, false);
            if let Err(err) = context.blocks.declare_variable(binding) {
                errors.push(err);
            }
        }
        _ => {}
    }
}

/// Validates that every `Object` type mentioned by a top-level declaration's
/// resolved type names a class that was actually declared somewhere in this
/// module.
///
/// Cross-module class references are validated once the importing module's
/// `use` bindings are refined by the driver; this only catches references to
/// undeclared local (bare, unqualified) classes.
fn check_classes(context: &mut SemanticContext, errors: &mut Vec<SemanticError>) {
    let top = context.blocks.top_block();

    let Some(block) = context.blocks.get_block(top) else { return };

    let known: FxHashSet<String> = block.class_names().map(str::to_string).collect();

    let mut referenced = Vec::new();
    for variable in block.variables() {
        let mut names = Vec::new();
        variable.ty.collect_class_names(&mut names);
        for name in names {
            referenced.push((name, variable.span));
        }
    }

    for (bare_name, span) in referenced {
        if !known.contains(&bare_name) {
            errors.push(SemanticError::UndefinedClass { name: bare_name, span });
        }
    }
}
