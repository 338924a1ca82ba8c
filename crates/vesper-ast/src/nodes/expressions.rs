//! Expression node types.
//!
//! This file contains every expression form the grammar admits: literals,
//! containers, casts, the unary/binary/logical operator forms, variable
//! references and assignment, calls, indexing/slicing/ranges, and property
//! access. Each corresponds 1:1 to an entry in the operator tables the
//! analyzer consults (see `vesper-analyzer::tables`).

use std::fmt;

use vesper_source::types::Span;

use super::{ASTNode, NodeID, NodeKind};
use crate::type_annotation::TypeAnnotation;

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `!`
    Not,
    /// `+`
    Plus,
    /// `-`
    Minus,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Not => "!",
            Self::Plus => "+",
            Self::Minus => "-",
        })
    }
}

/// Binary operators (arithmetic and comparison).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
        })
    }
}

/// Logical connectives. Distinct precedence levels per the resolved Open
/// Question on `or`/`and` (see `SPEC_FULL.md` §4.0 and §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::And => "and",
            Self::Or => "or",
        })
    }
}

/// What kind of container an `Access` expression indexes into; selected
/// during analysis from the target's resolved type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    String,
    List,
    Dict,
}

macro_rules! literal_node {
    ($name:ident, $doc:literal, $value_ty:ty, $visit:ident) => {
        #[doc = $doc]
        #[derive(Debug, Clone)]
        pub struct $name {
            pub value: $value_ty,
            pub id: NodeID,
            pub parent: Option<NodeID>,
            pub span: Span,
        }

        impl $name {
            #[must_use]
            pub fn new(value: $value_ty, id: NodeID, span: Span) -> Self {
                Self { value, id, parent: None, span }
            }
        }

        impl ASTNode for $name {
            fn id(&self) -> NodeID { self.id }

            fn parent(&self) -> Option<NodeID> { self.parent }

            fn with_parent(mut self, parent: NodeID) -> Self {
                self.parent = Some(parent);
                self
            }

            fn kind(&self) -> NodeKind { NodeKind::Expression }

            fn span(&self) -> Span { self.span }
        }

        impl_visitable!($name, $visit);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.value)
            }
        }
    };
}

literal_node!(IntegerExpr, "An integer literal.", i64, visit_integer);
literal_node!(FloatExpr, "A floating point literal.", f64, visit_float);
literal_node!(StringExpr, "A string literal.", String, visit_string_lit);
literal_node!(BooleanExpr, "A boolean literal.", bool, visit_boolean);

// ============================================================================
// List / Dictionary / Object
// ============================================================================

/// `[e1, e2, ...]`; every element must share element 0's type.
#[derive(Debug, Clone)]
pub struct ListExpr {
    pub elements: Vec<NodeID>,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl ListExpr {
    #[must_use]
    pub fn new(elements: Vec<NodeID>, id: NodeID, span: Span) -> Self {
        Self { elements, id, parent: None, span }
    }
}

impl ASTNode for ListExpr {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Expression }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> { self.elements.clone() }
}

impl_visitable!(ListExpr, visit_list_expr);

impl fmt::Display for ListExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "List(len: {})", self.elements.len())
    }
}

/// `{k1: v1, k2: v2, ...}`; keys are bare identifiers naming `String` keys,
/// values must all share the first value's type, in insertion order.
#[derive(Debug, Clone)]
pub struct DictionaryExpr {
    pub entries: Vec<(String, NodeID)>,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl DictionaryExpr {
    #[must_use]
    pub fn new(entries: Vec<(String, NodeID)>, id: NodeID, span: Span) -> Self {
        Self { entries, id, parent: None, span }
    }
}

impl ASTNode for DictionaryExpr {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Expression }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> { self.entries.iter().map(|(_, v)| *v).collect() }
}

impl_visitable!(DictionaryExpr, visit_dictionary);

impl fmt::Display for DictionaryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dictionary(len: {})", self.entries.len())
    }
}

/// `ClassName { field: value, ... }`
#[derive(Debug, Clone)]
pub struct ObjectExpr {
    pub class_name: String,
    pub arguments: Vec<(String, NodeID)>,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl ObjectExpr {
    #[must_use]
    pub fn new(
        class_name: String,
        arguments: Vec<(String, NodeID)>,
        id: NodeID,
        span: Span,
    ) -> Self {
        Self { class_name, arguments, id, parent: None, span }
    }
}

impl ASTNode for ObjectExpr {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Expression }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> { self.arguments.iter().map(|(_, v)| *v).collect() }
}

impl_visitable!(ObjectExpr, visit_object);

impl fmt::Display for ObjectExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ ... }}", self.class_name)
    }
}

// ============================================================================
// Group / Cast
// ============================================================================

/// `(expr)`
#[derive(Debug, Clone, Copy)]
pub struct GroupExpr {
    pub inner: NodeID,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl GroupExpr {
    #[must_use]
    pub const fn new(inner: NodeID, id: NodeID, span: Span) -> Self {
        Self { inner, id, parent: None, span }
    }
}

impl ASTNode for GroupExpr {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Expression }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> { vec![self.inner] }
}

impl_visitable!(GroupExpr, visit_group);

impl fmt::Display for GroupExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Group") }
}

/// `expr as target_type`
#[derive(Debug, Clone)]
pub struct CastExpr {
    pub expr: NodeID,
    pub target_type: TypeAnnotation,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl CastExpr {
    #[must_use]
    pub fn new(expr: NodeID, target_type: TypeAnnotation, id: NodeID, span: Span) -> Self {
        Self { expr, target_type, id, parent: None, span }
    }
}

impl ASTNode for CastExpr {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Expression }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> { vec![self.expr] }
}

impl_visitable!(CastExpr, visit_cast);

impl fmt::Display for CastExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cast(as {})", self.target_type)
    }
}

// ============================================================================
// Unary / Binary / Logical
// ============================================================================

/// `op operand`
#[derive(Debug, Clone, Copy)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: NodeID,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl UnaryExpr {
    #[must_use]
    pub const fn new(op: UnaryOp, operand: NodeID, id: NodeID, span: Span) -> Self {
        Self { op, operand, id, parent: None, span }
    }
}

impl ASTNode for UnaryExpr {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Expression }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> { vec![self.operand] }
}

impl_visitable!(UnaryExpr, visit_unary);

impl fmt::Display for UnaryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Unary({})", self.op) }
}

/// `left op right`
#[derive(Debug, Clone, Copy)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: NodeID,
    pub right: NodeID,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl BinaryExpr {
    #[must_use]
    pub const fn new(op: BinaryOp, left: NodeID, right: NodeID, id: NodeID, span: Span) -> Self {
        Self { op, left, right, id, parent: None, span }
    }
}

impl ASTNode for BinaryExpr {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Expression }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> { vec![self.left, self.right] }
}

impl_visitable!(BinaryExpr, visit_binary);

impl fmt::Display for BinaryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Binary({})", self.op) }
}

/// `left and right` / `left or right`
#[derive(Debug, Clone, Copy)]
pub struct LogicalExpr {
    pub op: LogicalOp,
    pub left: NodeID,
    pub right: NodeID,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl LogicalExpr {
    #[must_use]
    pub const fn new(op: LogicalOp, left: NodeID, right: NodeID, id: NodeID, span: Span) -> Self {
        Self { op, left, right, id, parent: None, span }
    }
}

impl ASTNode for LogicalExpr {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Expression }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> { vec![self.left, self.right] }
}

impl_visitable!(LogicalExpr, visit_logical);

impl fmt::Display for LogicalExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Logical({})", self.op) }
}

// ============================================================================
// Variable / Assign / Call
// ============================================================================

/// A bare identifier reference.
#[derive(Debug, Clone)]
pub struct VariableExpr {
    pub name: String,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl VariableExpr {
    #[must_use]
    pub fn new(name: String, id: NodeID, span: Span) -> Self { Self { name, id, parent: None, span } }
}

impl ASTNode for VariableExpr {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Expression }

    fn span(&self) -> Span { self.span }
}

impl_visitable!(VariableExpr, visit_variable);

impl fmt::Display for VariableExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.name) }
}

/// `target = value`. `target` is a `Variable`, `Access`, or `Property`
/// expression; `is_access` records which, set during analysis.
#[derive(Debug, Clone, Copy)]
pub struct AssignExpr {
    pub target: NodeID,
    pub value: NodeID,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl AssignExpr {
    #[must_use]
    pub const fn new(target: NodeID, value: NodeID, id: NodeID, span: Span) -> Self {
        Self { target, value, id, parent: None, span }
    }
}

impl ASTNode for AssignExpr {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Expression }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> { vec![self.target, self.value] }
}

impl_visitable!(AssignExpr, visit_assign);

impl fmt::Display for AssignExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Assign") }
}

/// `target(arguments...)`
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub target: NodeID,
    pub arguments: Vec<NodeID>,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl CallExpr {
    #[must_use]
    pub fn new(target: NodeID, arguments: Vec<NodeID>, id: NodeID, span: Span) -> Self {
        Self { target, arguments, id, parent: None, span }
    }
}

impl ASTNode for CallExpr {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Expression }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> {
        let mut children = vec![self.target];
        children.extend(&self.arguments);
        children
    }
}

impl_visitable!(CallExpr, visit_call);

impl fmt::Display for CallExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Call(argc: {})", self.arguments.len())
    }
}

// ============================================================================
// Access / Slice / Range / Property
// ============================================================================

/// `target[index]`
#[derive(Debug, Clone, Copy)]
pub struct AccessExpr {
    pub target: NodeID,
    pub index: NodeID,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl AccessExpr {
    #[must_use]
    pub const fn new(target: NodeID, index: NodeID, id: NodeID, span: Span) -> Self {
        Self { target, index, id, parent: None, span }
    }
}

impl ASTNode for AccessExpr {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Expression }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> { vec![self.target, self.index] }
}

impl_visitable!(AccessExpr, visit_access);

impl fmt::Display for AccessExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Access") }
}

/// `target[start?:end?:step?]`
#[derive(Debug, Clone)]
pub struct SliceExpr {
    pub target: NodeID,
    pub start: Option<NodeID>,
    pub end: Option<NodeID>,
    pub step: Option<NodeID>,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl SliceExpr {
    #[must_use]
    pub fn new(
        target: NodeID,
        start: Option<NodeID>,
        end: Option<NodeID>,
        step: Option<NodeID>,
        id: NodeID,
        span: Span,
    ) -> Self {
        Self { target, start, end, step, id, parent: None, span }
    }
}

impl ASTNode for SliceExpr {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Expression }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> {
        let mut children = vec![self.target];
        children.extend(self.start);
        children.extend(self.end);
        children.extend(self.step);
        children
    }
}

impl_visitable!(SliceExpr, visit_slice);

impl fmt::Display for SliceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Slice") }
}

/// `start..end` (exclusive) or `start..=end` (inclusive)
#[derive(Debug, Clone, Copy)]
pub struct RangeExpr {
    pub start: NodeID,
    pub end: NodeID,
    pub inclusive: bool,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl RangeExpr {
    #[must_use]
    pub const fn new(
        start: NodeID,
        end: NodeID,
        inclusive: bool,
        id: NodeID,
        span: Span,
    ) -> Self {
        Self { start, end, inclusive, id, parent: None, span }
    }
}

impl ASTNode for RangeExpr {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Expression }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> { vec![self.start, self.end] }
}

impl_visitable!(RangeExpr, visit_range);

impl fmt::Display for RangeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Range(inclusive: {})", self.inclusive)
    }
}

/// `object.name`
#[derive(Debug, Clone)]
pub struct PropertyExpr {
    pub object: NodeID,
    pub name: String,
    pub id: NodeID,
    pub parent: Option<NodeID>,
    pub span: Span,
}

impl PropertyExpr {
    #[must_use]
    pub fn new(object: NodeID, name: String, id: NodeID, span: Span) -> Self {
        Self { object, name, id, parent: None, span }
    }
}

impl ASTNode for PropertyExpr {
    fn id(&self) -> NodeID { self.id }

    fn parent(&self) -> Option<NodeID> { self.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.parent = Some(parent);
        self
    }

    fn kind(&self) -> NodeKind { NodeKind::Expression }

    fn span(&self) -> Span { self.span }

    fn children(&self) -> Vec<NodeID> { vec![self.object] }
}

impl_visitable!(PropertyExpr, visit_property);

impl fmt::Display for PropertyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Property(.{})", self.name)
    }
}
