// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The Vesper Project
// SPDX-FileName: crates/vesper-compiler/src/error.rs
// SPDX-FileType: SOURCE
// SPDX-License-Identifier: Apache-2.0
// -------------------------------------------------------------------------
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
// -------------------------------------------------------------------------
//! Compiler errors.
//!
//! Semantic analysis already proves every expression well-typed before the
//! compiler ever walks it; these variants exist only for states analysis
//! doesn't cover — an unresolved name that should have been caught as
//! `SemanticError::UndefinedVariable` but wasn't (a bug in the two phases
//! disagreeing about scope), or a frame outgrowing its register budget.

use thiserror::Error;
use vesper_source::types::Span;

/// Errors the compiler itself can raise while lowering an already-analyzed
/// module to bytecode.
#[derive(Debug, Error, Clone)]
pub enum CompileError {
    /// A `Variable` reference has no compile-time binding — the analyzer
    /// should have rejected this as [`UndefinedVariable`] before the
    /// compiler ever saw it.
    ///
    /// [`UndefinedVariable`]: vesper_analyzer::error::SemanticError::UndefinedVariable
    #[error("'{name}' has no register or global slot bound at compile time")]
    UnboundVariable { name: String, span: Span },

    /// An `Object` expression names a class the compiler never registered a
    /// field layout for — the analyzer should have rejected this as
    /// [`UndefinedClass`] before the compiler ever saw it.
    ///
    /// [`UndefinedClass`]: vesper_analyzer::error::SemanticError::UndefinedClass
    #[error("class '{name}' was never compiled")]
    UnknownClass { name: String, span: Span },

    /// A single frame's live registers exceeded the 16-bit register index
    /// space. Real programs never approach this; it exists so overflow is a
    /// diagnostic rather than a silent wraparound.
    #[error("function body needs more than {max} registers")]
    RegisterBudgetExceeded { max: u16 },

    /// The module's global register file exceeded the 16-bit slot index
    /// space.
    #[error("module needs more than {max} global slots")]
    GlobalBudgetExceeded { max: u16 },

    /// A `for` loop's iterator resolved to a type with no positional-access
    /// primitive in the bytecode format. `List`, `String`, and `Dict` all
    /// iterate by counting against a length cast (`ListToInt`/`StringLen`/
    /// `DictToInt`) and a positional read; scalars have neither, so the
    /// analyzer should have already rejected them — this exists as a
    /// defensive backstop.
    #[error("'{kind}' cannot be iterated by the current bytecode format")]
    UnsupportedIteration { kind: &'static str, span: Span },
}
