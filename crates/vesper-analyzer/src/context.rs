//! Semantic analysis context: the side tables the two passes populate.

use rustc_hash::FxHashMap;
use vesper_ast::nodes::{AccessKind, NodeID};

use crate::symbol::BlockTable;
use crate::types::Type;
use crate::types::tables::{BinaryVariant, CastVariant, UnaryVariant};

/// How an `Assign` expression's `target` resolves, recorded so the compiler
/// can pick the right store opcode without re-deriving it from the AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignTargetKind {
    Variable,
    Access,
    Property,
}

/// The resolved annotations the code pass attaches to AST nodes, keyed by
/// `NodeID` rather than written back into the (otherwise immutable) AST —
/// see `SPEC_FULL.md` §4.2's side-table design note.
#[derive(Debug, Default)]
pub struct Annotations {
    /// Every expression's resolved type.
    pub types: FxHashMap<NodeID, Type>,
    /// `Binary` node -> monomorphized variant.
    pub binary_variants: FxHashMap<NodeID, BinaryVariant>,
    /// `Unary` node -> monomorphized variant.
    pub unary_variants: FxHashMap<NodeID, UnaryVariant>,
    /// `Cast` node -> monomorphized variant.
    pub cast_variants: FxHashMap<NodeID, CastVariant>,
    /// `Access` node -> which container kind it indexes.
    pub access_kinds: FxHashMap<NodeID, AccessKind>,
    /// `Assign` node -> what kind of target it assigns to.
    pub assign_targets: FxHashMap<NodeID, AssignTargetKind>,
    /// `Function` node -> whether every control path returns a value.
    pub has_return: FxHashMap<NodeID, bool>,
}

impl Annotations {
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

/// Brings together the block/binding model and the resolved-type side
/// tables produced by analyzing one module.
#[derive(Debug)]
pub struct SemanticContext {
    pub blocks: BlockTable,
    pub annotations: Annotations,
}

impl SemanticContext {
    #[must_use]
    pub fn new() -> Self { Self { blocks: BlockTable::new(), annotations: Annotations::new() } }
}

impl Default for SemanticContext {
    fn default() -> Self { Self::new() }
}
