//! Scope and binding model for semantic analysis.
//!
//! - [`Block`]: a lexical scope (module top block, function body, or
//!   control-flow body), holding variables and classes in separate
//!   namespaces (`SPEC_FULL.md` §3)
//! - [`BlockTable`]: the arena of `Block`s plus the traversal stack used
//!   while walking a module

mod block;

pub use block::*;
