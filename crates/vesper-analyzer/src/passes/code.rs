//! The code pass.
//!
//! Walks every statement and expression body (module top level and every
//! function body), assigning each expression node a [`Type`] — and, for
//! cast/unary/binary/access expressions, the monomorphized operator variant
//! the compiler will later map onto a typed opcode. Diagnostics are
//! accumulated rather than short-circuited so one bad expression doesn't
//! suppress the rest of the module's errors.

use vesper_ast::ast::AST;
use vesper_ast::nodes::{AnyNode, DeclarationStmt, NodeID};

use crate::context::{AssignTargetKind, SemanticContext};
use crate::error::SemanticError;
use crate::symbol::VariableBinding;
use crate::types::tables::{access_kind, binary_variant, cast_variant, unary_variant};
use crate::types::{Type, resolve_annotation};

/// Runs the code pass over a module's top-level statements. The TLD pass
/// must already have populated `context.blocks`'s top block.
pub fn run(
    ast: &AST,
    statements: &[NodeID],
    context: &mut SemanticContext,
) -> Vec<SemanticError> {
    let mut errors = Vec::new();
    check_block(ast, statements, None, context, &mut errors);
    errors
}

/// Checks a statement sequence. `expected_return` is `Some` inside a
/// function body (the function's declared return type, `NoType` if it
/// declares none); `None` at module top level, where `return` is illegal.
fn check_block(
    ast: &AST,
    statements: &[NodeID],
    expected_return: Option<&Type>,
    context: &mut SemanticContext,
    errors: &mut Vec<SemanticError>,
) {
    for &stmt_id in statements {
        check_statement(ast, stmt_id, expected_return, context, errors);
    }
}

#[allow(clippy::too_many_lines)]
fn check_statement(
    ast: &AST,
    stmt_id: NodeID,
    expected_return: Option<&Type>,
    context: &mut SemanticContext,
    errors: &mut Vec<SemanticError>,
) {
    let Some(node) = ast.get_node(stmt_id) else { return };

    match &node.data {
        AnyNode::Export(export) => {
            check_statement(ast, export.inner, expected_return, context, errors);
        }
        AnyNode::Use(_) => {}
        AnyNode::Declaration(decl) => {
            check_declaration(ast, stmt_id, decl, context, errors);
        }
        AnyNode::ExpressionStmt(stmt) => {
            // The grammar only ever wraps a `Call` in an `ExpressionStmt`;
            // its value, if any, is simply discarded.
            let _ = infer_expr(ast, stmt.expr, context, errors);
        }
        AnyNode::Print(stmt) => {
            let _ = infer_expr(ast, stmt.value, context, errors);
        }
        AnyNode::Return(stmt) => {
            let Some(expected) = expected_return else {
                // `return` outside a function body is a parser-level
                // invariant violation; the grammar never emits one here.
                return;
            };
            let found = stmt
                .value
                .map_or(Type::NoType, |v| infer_expr(ast, v, context, errors));
            if found != *expected {
                errors.push(SemanticError::ReturnTypeMismatch {
                    expected: Box::new(expected.clone()),
                    found: Box::new(found),
                    span: stmt.span,
                });
            }
        }
        AnyNode::If(stmt) => {
            let cond_ty = infer_expr(ast, stmt.condition, context, errors);
            require_bool(&cond_ty, stmt.span, errors);
            enter_nested(context, |context| {
                check_block(ast, &stmt.then_body, expected_return, context, errors);
            });
            for (cond, body) in &stmt.elif_clauses {
                let elif_ty = infer_expr(ast, *cond, context, errors);
                require_bool(&elif_ty, node.span, errors);
                enter_nested(context, |context| {
                    check_block(ast, body, expected_return, context, errors);
                });
            }
            if let Some(else_body) = &stmt.else_body {
                enter_nested(context, |context| {
                    check_block(ast, else_body, expected_return, context, errors);
                });
            }
        }
        AnyNode::While(stmt) => {
            let cond_ty = infer_expr(ast, stmt.condition, context, errors);
            require_bool(&cond_ty, stmt.span, errors);
            enter_nested(context, |context| {
                check_block(ast, &stmt.body, expected_return, context, errors);
            });
        }
        AnyNode::For(stmt) => {
            let iter_ty = infer_expr(ast, stmt.iterator, context, errors);
            let (elem_ty, index_ty) = match &iter_ty {
                Type::List(elem) => ((**elem).clone(), Type::Int),
                Type::String => (Type::String, Type::Int),
                Type::Dict(value) => ((**value).clone(), Type::String),
                _ => {
                    errors.push(SemanticError::NotIndexable {
                        found: Box::new(iter_ty.clone()),
                        span: stmt.span,
                    });
                    (Type::NoType, Type::Int)
                }
            };
            enter_nested(context, |context| {
                let binding = VariableBinding::new(
                    stmt.variable.clone(),
                    elem_ty,
                    stmt_id,
                    stmt.span,
                    false,
                );
                let _ = context.blocks.declare_variable(binding);
                if let Some(index_name) = &stmt.index {
                    let index_binding = VariableBinding::new(
                        index_name.clone(),
                        index_ty,
                        stmt_id,
                        stmt.span,
                        false,
                    );
                    let _ = context.blocks.declare_variable(index_binding);
                }
                check_block(ast, &stmt.body, expected_return, context, errors);
            });
        }
        AnyNode::Function(function) => {
            enter_nested(context, |context| {
                for &param_id in &function.parameters {
                    if let Ok(param) = ast.get_as::<DeclarationStmt>(param_id) {
                        let ty =
                            param.type_annotation.as_ref().map_or(Type::NoType, resolve_annotation);
                        let binding = VariableBinding::new(
                            param.name.clone(),
                            ty,
                            param_id,
                            param.span,
                            false,
                        );
                        let _ = context.blocks.declare_variable(binding);
                    }
                }
                let return_type =
                    function.return_type.as_ref().map_or(Type::NoType, resolve_annotation);
                check_block(ast, &function.body, Some(&return_type), context, errors);

                let returns = block_always_returns(ast, &function.body);
                context.annotations.has_return.insert(stmt_id, returns);
                if !matches!(return_type, Type::NoType) && !returns {
                    errors.push(SemanticError::MissingTopLevelReturn {
                        function_name: function.name.clone(),
                        span: function.span,
                    });
                }
            });
        }
        AnyNode::Class(class) => {
            for &member_id in &class.body {
                if let Some(member) = ast.get_node(member_id)
                    && let AnyNode::Function(_) = &member.data
                {
                    check_statement(ast, member_id, None, context, errors);
                }
            }
        }
    }
}

fn check_declaration(
    ast: &AST,
    stmt_id: NodeID,
    decl: &DeclarationStmt,
    context: &mut SemanticContext,
    errors: &mut Vec<SemanticError>,
) {
    let declared = decl.type_annotation.as_ref().map(resolve_annotation);
    let found = decl.initializer.map(|init| infer_expr(ast, init, context, errors));

    let resolved = match (&declared, &found) {
        (Some(declared), Some(found)) => {
            if declared != found {
                errors.push(SemanticError::DeclarationTypeMismatch {
                    name: decl.name.clone(),
                    declared: Box::new(declared.clone()),
                    found: Box::new(found.clone()),
                    span: decl.span,
                });
            }
            declared.clone()
        }
        (Some(declared), None) => declared.clone(),
        (None, Some(found)) => found.clone(),
        (None, None) => Type::NoType,
    };

    // Module top-level declarations were already bound by the TLD pass with
    // a possibly-placeholder type; refine it now that the initializer's
    // type (if any) is known. Nested declarations (inside a function/if/
    // while/for body) have no TLD-pass entry and are declared here.
    if let Some(existing) = context.blocks.lookup_variable(&decl.name).cloned() {
        if existing.defining_node == stmt_id {
            if let Some(block_id) = context.blocks.current()
                && let Some(block) = context.blocks.get_block_mut(block_id)
                && let Some(binding) = block.get_variable_mut(&decl.name)
            {
                binding.ty = resolved;
            }
            return;
        }
    }

    let binding = VariableBinding::new(decl.name.clone(), resolved, stmt_id, decl.span, false);
    if let Err(err) = context.blocks.declare_variable(binding) {
        errors.push(err);
    }
}

fn require_bool(ty: &Type, span: vesper_source::types::Span, errors: &mut Vec<SemanticError>) {
    if *ty != Type::Bool {
        errors.push(SemanticError::ConditionNotBool { found: Box::new(ty.clone()), span });
    }
}

/// Enters a fresh child block for the duration of `body`, then restores the
/// previous current block — mirrors how the teacher's `SymbolTable` threaded
/// `enter_scope`/`exit_scope` around a single visitor call.
fn enter_nested(context: &mut SemanticContext, body: impl FnOnce(&mut SemanticContext)) {
    let parent = context.blocks.current();
    let child = context.blocks.create_block(parent);
    context.blocks.enter_block(child);
    body(context);
    let _ = context.blocks.exit_block();
}

/// True if `statements`, executed in order, is guaranteed to hit a `return`
/// on every control path. `while`/`for` bodies can't guarantee execution, so
/// a `return` inside one never counts toward the enclosing function's
/// return coverage.
fn block_always_returns(ast: &AST, statements: &[NodeID]) -> bool {
    statements.iter().any(|&id| statement_always_returns(ast, id))
}

fn statement_always_returns(ast: &AST, stmt_id: NodeID) -> bool {
    let Some(node) = ast.get_node(stmt_id) else { return false };
    match &node.data {
        AnyNode::Return(_) => true,
        AnyNode::If(stmt) => {
            let Some(else_body) = &stmt.else_body else { return false };
            block_always_returns(ast, &stmt.then_body)
                && stmt.elif_clauses.iter().all(|(_, body)| block_always_returns(ast, body))
                && block_always_returns(ast, else_body)
        }
        _ => false,
    }
}

#[allow(clippy::too_many_lines)]
fn infer_expr(
    ast: &AST,
    node_id: NodeID,
    context: &mut SemanticContext,
    errors: &mut Vec<SemanticError>,
) -> Type {
    let Some(node) = ast.get_node(node_id) else { return Type::NoType };
    let span = node.span;

    let ty = match &node.data {
        AnyNode::Integer(_) => Type::Int,
        AnyNode::Float(_) => Type::Float,
        AnyNode::StringLit(_) => Type::String,
        AnyNode::Boolean(_) => Type::Bool,
        AnyNode::Group(expr) => infer_expr(ast, expr.inner, context, errors),
        AnyNode::List(expr) => {
            let mut elem_ty = Type::NoType;
            for (i, &element_id) in expr.elements.iter().enumerate() {
                let element_ty = infer_expr(ast, element_id, context, errors);
                if i == 0 {
                    elem_ty = element_ty;
                } else if element_ty != elem_ty {
                    errors.push(SemanticError::DeclarationTypeMismatch {
                        name: "<list element>".to_string(),
                        declared: Box::new(elem_ty.clone()),
                        found: Box::new(element_ty),
                        span,
                    });
                }
            }
            Type::list(elem_ty)
        }
        AnyNode::Dictionary(expr) => {
            let mut value_ty = Type::NoType;
            for (i, (_, value_id)) in expr.entries.iter().enumerate() {
                let entry_ty = infer_expr(ast, *value_id, context, errors);
                if i == 0 {
                    value_ty = entry_ty;
                } else if entry_ty != value_ty {
                    errors.push(SemanticError::DeclarationTypeMismatch {
                        name: "<dict value>".to_string(),
                        declared: Box::new(value_ty.clone()),
                        found: Box::new(entry_ty),
                        span,
                    });
                }
            }
            Type::dict(value_ty)
        }
        AnyNode::Object(expr) => {
            let members = context
                .blocks
                .lookup_class(&expr.class_name)
                .map(|class| class.members)
                .and_then(|members_id| context.blocks.get_block(members_id));
            for (field_name, value_id) in &expr.arguments {
                let value_ty = infer_expr(ast, *value_id, context, errors);
                match members.and_then(|block| block.get_variable(field_name)) {
                    Some(binding) if binding.ty != value_ty => {
                        errors.push(SemanticError::AssignmentTypeMismatch {
                            name: field_name.clone(),
                            expected: Box::new(binding.ty.clone()),
                            found: Box::new(value_ty),
                            span,
                        });
                    }
                    Some(_) => {}
                    None if members.is_some() => {
                        errors.push(SemanticError::UnknownProperty {
                            class_name: expr.class_name.clone(),
                            property: field_name.clone(),
                            span,
                        });
                    }
                    None => {}
                }
            }
            match members {
                Some(_) => Type::Object { class_name: expr.class_name.clone() },
                None => {
                    errors.push(SemanticError::UndefinedClass {
                        name: expr.class_name.clone(),
                        span,
                    });
                    Type::NoType
                }
            }
        }
        AnyNode::Cast(expr) => {
            let source = infer_expr(ast, expr.expr, context, errors);
            let target = resolve_annotation(&expr.target_type);
            match cast_variant(&source, &target) {
                Some((variant, result)) => {
                    context.annotations.cast_variants.insert(node_id, variant);
                    result
                }
                None => {
                    errors.push(SemanticError::InvalidCast {
                        from: Box::new(source),
                        to: Box::new(target),
                        span,
                    });
                    Type::NoType
                }
            }
        }
        AnyNode::Unary(expr) => {
            let operand = infer_expr(ast, expr.operand, context, errors);
            match unary_variant(expr.op, &operand) {
                Some((variant, result)) => {
                    context.annotations.unary_variants.insert(node_id, variant);
                    result
                }
                None => {
                    errors.push(SemanticError::NoMatchingUnaryOperator {
                        operator: expr.op.to_string(),
                        operand: Box::new(operand),
                        span,
                    });
                    Type::NoType
                }
            }
        }
        AnyNode::Binary(expr) => {
            let left = infer_expr(ast, expr.left, context, errors);
            let right = infer_expr(ast, expr.right, context, errors);
            match binary_variant(expr.op, &left, &right) {
                Some((variant, result)) => {
                    context.annotations.binary_variants.insert(node_id, variant);
                    result
                }
                None => {
                    errors.push(SemanticError::NoMatchingBinaryOperator {
                        operator: expr.op.to_string(),
                        left: Box::new(left),
                        right: Box::new(right),
                        span,
                    });
                    Type::NoType
                }
            }
        }
        AnyNode::Logical(expr) => {
            let left = infer_expr(ast, expr.left, context, errors);
            let right = infer_expr(ast, expr.right, context, errors);
            require_bool(&left, span, errors);
            require_bool(&right, span, errors);
            Type::Bool
        }
        AnyNode::Variable(expr) => match context.blocks.lookup_variable(&expr.name) {
            Some(binding) => binding.ty.clone(),
            None => {
                errors.push(SemanticError::UndefinedVariable { name: expr.name.clone(), span });
                Type::NoType
            }
        },
        AnyNode::Assign(expr) => {
            let value_ty = infer_expr(ast, expr.value, context, errors);
            let target_kind = target_kind_of(ast, expr.target);
            context.annotations.assign_targets.insert(node_id, target_kind);

            match target_kind {
                AssignTargetKind::Variable => {
                    if let Some(name) = variable_name(ast, expr.target) {
                        match context.blocks.lookup_variable(&name) {
                            Some(binding) if binding.ty == value_ty => {}
                            Some(binding) => {
                                errors.push(SemanticError::AssignmentTypeMismatch {
                                    name,
                                    expected: Box::new(binding.ty.clone()),
                                    found: Box::new(value_ty.clone()),
                                    span,
                                });
                            }
                            None => {
                                errors.push(SemanticError::UndefinedVariable { name, span });
                            }
                        }
                    }
                }
                AssignTargetKind::Access | AssignTargetKind::Property => {
                    let _ = infer_expr(ast, expr.target, context, errors);
                }
            }
            value_ty
        }
        AnyNode::Call(expr) => {
            let target_ty = infer_expr(ast, expr.target, context, errors);
            let arg_types: Vec<Type> =
                expr.arguments.iter().map(|&a| infer_expr(ast, a, context, errors)).collect();

            match &target_ty {
                Type::Fun { parameters, return_type } => {
                    if parameters.len() != arg_types.len() {
                        let name = variable_name(ast, expr.target).unwrap_or_default();
                        errors.push(SemanticError::ArgumentCountMismatch {
                            function_name: name,
                            expected: parameters.len(),
                            found: arg_types.len(),
                            span,
                        });
                    } else {
                        for (index, (expected, found)) in
                            parameters.iter().zip(arg_types.iter()).enumerate()
                        {
                            if expected != found {
                                let name = variable_name(ast, expr.target).unwrap_or_default();
                                errors.push(SemanticError::ArgumentTypeMismatch {
                                    function_name: name,
                                    index,
                                    expected: Box::new(expected.clone()),
                                    found: Box::new(found.clone()),
                                    span,
                                });
                            }
                        }
                    }
                    return_type.as_ref().map_or(Type::NoType, |r| (**r).clone())
                }
                _ => {
                    errors
                        .push(SemanticError::NotCallable { found: Box::new(target_ty), span });
                    Type::NoType
                }
            }
        }
        AnyNode::Access(expr) => {
            let target_ty = infer_expr(ast, expr.target, context, errors);
            let index_ty = infer_expr(ast, expr.index, context, errors);
            match access_kind(&target_ty) {
                Some((kind, result)) => {
                    let index_ok = match kind {
                        vesper_ast::nodes::AccessKind::Dict => index_ty == Type::String,
                        vesper_ast::nodes::AccessKind::List
                        | vesper_ast::nodes::AccessKind::String => index_ty == Type::Int,
                    };
                    if index_ok {
                        context.annotations.access_kinds.insert(node_id, kind);
                        result
                    } else {
                        errors.push(SemanticError::InvalidIndexType {
                            container: Box::new(target_ty),
                            index_type: Box::new(index_ty),
                            span,
                        });
                        Type::NoType
                    }
                }
                None => {
                    errors.push(SemanticError::NotIndexable {
                        found: Box::new(target_ty),
                        span,
                    });
                    Type::NoType
                }
            }
        }
        AnyNode::Slice(expr) => {
            let target_ty = infer_expr(ast, expr.target, context, errors);
            for bound in [expr.start, expr.end, expr.step].into_iter().flatten() {
                let bound_ty = infer_expr(ast, bound, context, errors);
                if bound_ty != Type::Int {
                    errors.push(SemanticError::InvalidIndexType {
                        container: Box::new(target_ty.clone()),
                        index_type: Box::new(bound_ty),
                        span,
                    });
                }
            }
            match &target_ty {
                Type::String | Type::List(_) => target_ty,
                _ => {
                    errors.push(SemanticError::NotIndexable {
                        found: Box::new(target_ty),
                        span,
                    });
                    Type::NoType
                }
            }
        }
        AnyNode::Range(expr) => {
            let start = infer_expr(ast, expr.start, context, errors);
            let end = infer_expr(ast, expr.end, context, errors);
            if start != Type::Int {
                errors.push(SemanticError::InvalidIndexType {
                    container: Box::new(Type::list(Type::Int)),
                    index_type: Box::new(start),
                    span,
                });
            }
            if end != Type::Int {
                errors.push(SemanticError::InvalidIndexType {
                    container: Box::new(Type::list(Type::Int)),
                    index_type: Box::new(end),
                    span,
                });
            }
            Type::list(Type::Int)
        }
        AnyNode::Property(expr) => {
            let object_ty = infer_expr(ast, expr.object, context, errors);
            match &object_ty {
                Type::Object { class_name } => {
                    let member = context
                        .blocks
                        .lookup_class(class_name)
                        .map(|class| class.members)
                        .and_then(|members_id| context.blocks.get_block(members_id))
                        .and_then(|members| members.get_variable(&expr.name));
                    match member {
                        Some(binding) => binding.ty.clone(),
                        None => {
                            errors.push(SemanticError::UnknownProperty {
                                class_name: class_name.clone(),
                                property: expr.name.clone(),
                                span,
                            });
                            Type::NoType
                        }
                    }
                }
                _ => {
                    errors.push(SemanticError::PropertyOnNonObject {
                        found: Box::new(object_ty),
                        span,
                    });
                    Type::NoType
                }
            }
        }
        // Statement/declaration kinds never appear as expression children.
        _ => Type::NoType,
    };

    context.annotations.types.insert(node_id, ty.clone());
    ty
}

fn target_kind_of(ast: &AST, target_id: NodeID) -> AssignTargetKind {
    match ast.get_node(target_id).map(|n| &n.data) {
        Some(AnyNode::Access(_)) => AssignTargetKind::Access,
        Some(AnyNode::Property(_)) => AssignTargetKind::Property,
        _ => AssignTargetKind::Variable,
    }
}

fn variable_name(ast: &AST, node_id: NodeID) -> Option<String> {
    match ast.get_node(node_id).map(|n| &n.data) {
        Some(AnyNode::Variable(expr)) => Some(expr.name.clone()),
        _ => None,
    }
}
