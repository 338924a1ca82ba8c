//! Statement node types: declarations, control flow, and the module system.

use std::fmt;

use vesper_source::types::Span;

use super::{ASTNode, NodeID, NodeKind};
use crate::type_annotation::TypeAnnotation;

// ============================================================================
// Declaration
// ============================================================================

/// `name[: type] [= initializer]`.
///
/// Also used, with `initializer` always `None`, for function parameters —
/// the specification models a parameter as a `Declaration` node rather than
/// inventing a separate parameter kind.
#[derive(Debug, Clone)]
pub struct DeclarationStmt {
    /// The declared name
    pub name: String,
    /// The explicit type annotation, if written
    pub type_annotation: Option<TypeAnnotation>,
    /// The initializer expression, if any
    pub initializer: Option<NodeID>,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl DeclarationStmt {
    #[must_use]
    pub fn new(
        name: String,
        type_annotation: Option<TypeAnnotation>,
        initializer: Option<NodeID>,
        id: NodeID,
        span: Span,
    ) -> Self {
        Self { name, type_annotation, initializer, id, parent: None, span }
    }
}

impl ASTNode for DeclarationStmt {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Declaration }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> { self.initializer.into_iter().collect() }
}

impl_visitable!(DeclarationStmt, visit_declaration);

impl fmt::Display for DeclarationStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Declaration({})", self.name) }
}

// ============================================================================
// ExpressionStmt
// ============================================================================

/// An expression used as a statement; only legal when `expr` is a `Call` to a
/// function with no declared return.
#[derive(Debug, Clone, Copy)]
pub struct ExpressionStmt {
    pub expr: NodeID,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl ExpressionStmt {
    #[must_use]
    pub const fn new(expr: NodeID, id: NodeID, span: Span) -> Self {
        Self { expr, id, parent: None, span }
    }
}

impl ASTNode for ExpressionStmt {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Statement }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> { vec![self.expr] }
}

impl_visitable!(ExpressionStmt, visit_expression_stmt);

impl fmt::Display for ExpressionStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "ExpressionStmt") }
}

// ============================================================================
// Print
// ============================================================================

/// `print expr`
#[derive(Debug, Clone, Copy)]
pub struct PrintStmt {
    pub value: NodeID,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl PrintStmt {
    #[must_use]
    pub const fn new(value: NodeID, id: NodeID, span: Span) -> Self {
        Self { value, id, parent: None, span }
    }
}

impl ASTNode for PrintStmt {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Statement }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> { vec![self.value] }
}

impl_visitable!(PrintStmt, visit_print);

impl fmt::Display for PrintStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Print") }
}

// ============================================================================
// Return
// ============================================================================

/// `return [value]`
#[derive(Debug, Clone, Copy)]
pub struct ReturnStmt {
    pub value: Option<NodeID>,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl ReturnStmt {
    #[must_use]
    pub const fn new(value: Option<NodeID>, id: NodeID, span: Span) -> Self {
        Self { value, id, parent: None, span }
    }
}

impl ASTNode for ReturnStmt {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Statement }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> { self.value.into_iter().collect() }
}

impl_visitable!(ReturnStmt, visit_return);

impl fmt::Display for ReturnStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Return(has_value: {})", self.value.is_some())
    }
}

// ============================================================================
// If
// ============================================================================

/// One `elif` clause: a condition and its body.
pub type ElifClause = (NodeID, Vec<NodeID>);

/// `if cond { .. } elif cond { .. } ... else { .. }`
#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: NodeID,
    pub then_body: Vec<NodeID>,
    pub elif_clauses: Vec<ElifClause>,
    pub else_body: Option<Vec<NodeID>>,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl IfStmt {
    #[must_use]
    pub fn new(
        condition: NodeID,
        then_body: Vec<NodeID>,
        elif_clauses: Vec<ElifClause>,
        else_body: Option<Vec<NodeID>>,
        id: NodeID,
        span: Span,
    ) -> Self {
        Self { condition, then_body, elif_clauses, else_body, id, parent: None, span }
    }
}

impl ASTNode for IfStmt {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Statement }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> {
        let mut children = vec![self.condition];
        children.extend(&self.then_body);
        for (cond, body) in &self.elif_clauses {
            children.push(*cond);
            children.extend(body);
        }
        if let Some(else_body) = &self.else_body {
            children.extend(else_body);
        }
        children
    }
}

impl_visitable!(IfStmt, visit_if);

impl fmt::Display for IfStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "If(elifs: {}, has_else: {})", self.elif_clauses.len(), self.else_body.is_some())
    }
}

// ============================================================================
// While
// ============================================================================

/// `while cond { .. }`
#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: NodeID,
    pub body: Vec<NodeID>,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl WhileStmt {
    #[must_use]
    pub fn new(condition: NodeID, body: Vec<NodeID>, id: NodeID, span: Span) -> Self {
        Self { condition, body, id, parent: None, span }
    }
}

impl ASTNode for WhileStmt {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Statement }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> {
        let mut children = vec![self.condition];
        children.extend(&self.body);
        children
    }
}

impl_visitable!(WhileStmt, visit_while);

impl fmt::Display for WhileStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "While") }
}

// ============================================================================
// For
// ============================================================================

/// `for variable[, index] in iterator { .. }`
#[derive(Debug, Clone)]
pub struct ForStmt {
    pub variable: String,
    pub index: Option<String>,
    pub iterator: NodeID,
    pub body: Vec<NodeID>,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl ForStmt {
    #[must_use]
    pub fn new(
        variable: String,
        index: Option<String>,
        iterator: NodeID,
        body: Vec<NodeID>,
        id: NodeID,
        span: Span,
    ) -> Self {
        Self { variable, index, iterator, body, id, parent: None, span }
    }
}

impl ASTNode for ForStmt {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Statement }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> {
        let mut children = vec![self.iterator];
        children.extend(&self.body);
        children
    }
}

impl_visitable!(ForStmt, visit_for);

impl fmt::Display for ForStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "For({}, has_index: {})", self.variable, self.index.is_some())
    }
}

// ============================================================================
// Use / Export
// ============================================================================

/// `use A, B from "module"` (explicit targets) or `use "module"` (wildcard
/// import — `targets` is empty).
#[derive(Debug, Clone)]
pub struct UseStmt {
    pub targets: Vec<String>,
    pub module_path: String,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl UseStmt {
    #[must_use]
    pub fn new(targets: Vec<String>, module_path: String, id: NodeID, span: Span) -> Self {
        Self { targets, module_path, id, parent: None, span }
    }
}

impl ASTNode for UseStmt {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Statement }

    fn span(&self) -> Span { self.span }
}

impl_visitable!(UseStmt, visit_use);

impl fmt::Display for UseStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Use({})", self.module_path)
    }
}

/// `export <inner>`: marks a TLD statement (`class`, `fun`, `use`, or a
/// top-level `Declaration`) as visible to importers.
#[derive(Debug, Clone, Copy)]
pub struct ExportStmt {
    pub inner: NodeID,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl ExportStmt {
    #[must_use]
    pub const fn new(inner: NodeID, id: NodeID, span: Span) -> Self {
        Self { inner, id, parent: None, span }
    }
}

impl ASTNode for ExportStmt {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Statement }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> { vec![self.inner] }
}

impl_visitable!(ExportStmt, visit_export);

impl fmt::Display for ExportStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Export") }
}
