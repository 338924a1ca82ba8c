//! AST node type definitions
//!
//! This module provides the consolidated AST node types organized in a flat structure.

mod declarations;
mod expressions;
mod statements;

use std::{fmt, process};

pub use declarations::*;
pub use expressions::*;
pub use statements::*;
use vesper_source::types::Span;

/// A type-safe identifier for nodes in the AST arena.
///
/// `NodeID` is a handle that uniquely identifies a node in the arena. It includes
/// a generation counter to prevent use-after-free bugs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct NodeID {
    /// The index of the node in the arena.
    pub(crate) index: u32,
    /// The generation counter for this node.
    pub(crate) generation: u32,
}

impl NodeID {
    /// Creates a new `NodeID` with the given index and generation.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self { Self { index, generation } }

    /// Creates a placeholder `NodeID` for struct initialization.
    ///
    /// This is used when creating AST node structs that need an ID field
    /// before being allocated. The actual `NodeID` returned by `alloc_node()`
    /// should be used for references.
    #[must_use]
    pub const fn placeholder() -> Self { Self { index: 0, generation: 0 } }

    /// Returns the index of this node.
    #[must_use]
    pub const fn index(&self) -> u32 { self.index }

    /// Returns the generation of this node.
    #[must_use]
    pub const fn generation(&self) -> u32 { self.generation }
}

// Display implementation for NodeID
impl fmt::Display for NodeID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeID({}, {})", self.index, self.generation)
    }
}

impl process::Termination for NodeID {
    fn report(self) -> process::ExitCode { process::ExitCode::SUCCESS }
}

/// Main AST node type - discriminated union with all node variants.
///
/// Unlike a general-purpose language AST, this set is intentionally small: it
/// mirrors exactly the statement and expression forms the grammar in the
/// language specification admits (declarations, control flow, the primitive
/// operator forms, and the container/object/module forms), rather than a
/// broad surface of syntactic sugar.
#[derive(Debug, Clone)]
pub enum AnyNode {
    /// `name[: type] [= initializer]`, also used for function parameters
    Declaration(DeclarationStmt),
    /// An expression used as a statement (must be a call to a function with no return)
    ExpressionStmt(ExpressionStmt),
    /// `print expr`
    Print(PrintStmt),
    /// `return [value]`
    Return(ReturnStmt),
    /// `if cond { .. } elif cond { .. } else { .. }`
    If(IfStmt),
    /// `while cond { .. }`
    While(WhileStmt),
    /// `for var[, index] in iterator { .. }`
    For(ForStmt),
    /// `fun name(params) [: type] { .. }`
    Function(FunctionDecl),
    /// `class Name { .. }`
    Class(ClassDecl),
    /// `use A, B from "module"` or `use "module"`
    Use(UseStmt),
    /// `export <statement>`
    Export(ExportStmt),
    /// Integer literal
    Integer(IntegerExpr),
    /// Floating point literal
    Float(FloatExpr),
    /// String literal
    StringLit(StringExpr),
    /// Boolean literal
    Boolean(BooleanExpr),
    /// `[e1, e2, ...]`
    List(ListExpr),
    /// `{k1: v1, k2: v2, ...}`
    Dictionary(DictionaryExpr),
    /// `ClassName { field: value, ... }`
    Object(ObjectExpr),
    /// `(expr)`
    Group(GroupExpr),
    /// `expr as type`
    Cast(CastExpr),
    /// `-expr`, `+expr`, `!expr`
    Unary(UnaryExpr),
    /// `left op right` for arithmetic/comparison operators
    Binary(BinaryExpr),
    /// `left and right`, `left or right`
    Logical(LogicalExpr),
    /// A bare identifier reference
    Variable(VariableExpr),
    /// `target = value`
    Assign(AssignExpr),
    /// `target(args...)`
    Call(CallExpr),
    /// `target[index]`
    Access(AccessExpr),
    /// `target[start?:end?:step?]`
    Slice(SliceExpr),
    /// `start..end` or `start..=end`
    Range(RangeExpr),
    /// `object.name`
    Property(PropertyExpr),
}

// Generate get_as() method implementation using macro
for_each_node_variant!(impl_get_as_for_anynode);

/// A trait for AST nodes that can be stored in the arena.
pub trait ASTNode: fmt::Display {
    /// Returns the kind of this node.
    fn kind(&self) -> NodeKind;

    /// Returns the span of this node in the source code.
    fn span(&self) -> Span;

    /// Returns the children of this node.
    fn children(&self) -> Vec<NodeID> { vec![] }

    /// Returns the ID of this node.
    fn id(&self) -> NodeID;

    /// Returns the parent of this node, if it has one.
    fn parent(&self) -> Option<NodeID>;

    /// Builder pattern method to set the parent of this node.
    #[must_use]
    fn with_parent(self, parent: NodeID) -> Self;
}

// Generate ASTNode trait implementation using macro
for_each_node_variant!(impl_astnode_for_anynode);

// Generate Visitable trait implementation using macro
for_each_node_variant!(impl_visitable_for_anynode);

// Generate Display trait implementation using macro
for_each_node_variant!(impl_display_for_anynode);

/// High-level node categorization for quick filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// `Declaration`, `Function`, `Class` — things that bind a name
    Declaration,
    /// All expression forms
    Expression,
    /// All statement forms that are not declarations
    Statement,
}

/// The node structure that contains common metadata and node-specific data
#[derive(Debug, Clone)]
pub struct Node {
    /// The kind of node
    pub kind: NodeKind,
    /// Node-specific data
    pub data: AnyNode,
    /// Source code span
    pub span: Span,
    /// Parent node reference
    pub parent: Option<NodeID>,
}
