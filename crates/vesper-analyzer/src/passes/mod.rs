//! The two passes semantic analysis makes over a module, per `SPEC_FULL.md`
//! §4.2: [`tld`] declares every top-level name before anything is type
//! checked, then [`code`] walks statement and expression bodies assigning a
//! `Type` (and, where relevant, an operator variant) to every node.

pub mod code;
pub mod tld;
