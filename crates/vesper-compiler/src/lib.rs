// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The Vesper Project
// SPDX-FileName: crates/vesper-compiler/src/lib.rs
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
//! Vesper Compiler Library
//!
//! Lowers an already-analyzed module (an [`vesper_ast::ast::AST`] plus the
//! [`vesper_analyzer::context::SemanticContext`] the code pass produced for
//! it) to a register-based [`vesper_runtime::Program`]. See `compiler.rs`'s
//! module doc comment for the single-module scoping this crate works under,
//! and `disasm.rs` for the `--opcodes` CLI flag's renderer.

/// Version of the Vesper compiler
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod class;
mod compiler;
mod disasm;
mod expr;
mod frame;
mod scope;
mod stmt;

pub mod error;

pub use compiler::compile_module;
pub use disasm::disassemble;
