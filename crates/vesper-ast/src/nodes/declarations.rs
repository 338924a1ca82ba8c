//! Function and class declarations.

use std::fmt;

use vesper_source::types::Span;

use super::{ASTNode, NodeID, NodeKind};
use crate::type_annotation::TypeAnnotation;

// ============================================================================
// Function
// ============================================================================

/// `fun name(params) [: return_type] { body }`
///
/// Parameters are represented as `Declaration` nodes (see
/// [`super::DeclarationStmt`]), each with an explicit type and no initializer.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub parameters: Vec<NodeID>,
    pub return_type: Option<TypeAnnotation>,
    pub body: Vec<NodeID>,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl FunctionDecl {
    #[must_use]
    pub fn new(
        name: String,
        parameters: Vec<NodeID>,
        return_type: Option<TypeAnnotation>,
        body: Vec<NodeID>,
        id: NodeID,
        span: Span,
    ) -> Self {
        Self { name, parameters, return_type, body, id, parent: None, span }
    }
}

impl ASTNode for FunctionDecl {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Declaration }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> {
        let mut children = self.parameters.clone();
        children.extend(&self.body);
        children
    }
}

impl_visitable!(FunctionDecl, visit_function);

impl fmt::Display for FunctionDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fun {}(...)", self.name)
    }
}

// ============================================================================
// Class
// ============================================================================

/// `class Name { field declarations and methods }`
///
/// `body` holds a mix of `Declaration` nodes (typed fields, no initializer)
/// and `Function` nodes (methods).
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: String,
    pub body: Vec<NodeID>,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl ClassDecl {
    #[must_use]
    pub fn new(name: String, body: Vec<NodeID>, id: NodeID, span: Span) -> Self {
        Self { name, body, id, parent: None, span }
    }
}

impl ASTNode for ClassDecl {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Declaration }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> { self.body.clone() }
}

impl_visitable!(ClassDecl, visit_class);

impl fmt::Display for ClassDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "class {}", self.name) }
}
