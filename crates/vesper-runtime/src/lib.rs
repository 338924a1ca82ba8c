// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The Vesper Project
// SPDX-FileName: crates/vesper-runtime/src/lib.rs
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
//! Vesper Runtime Support Library
//!
//! The register-based bytecode format and virtual machine that executes a
//! compiled Vesper program: [`value::Value`] (the tagged union every
//! register holds), [`opcode::Opcode`] (the instruction vocabulary),
//! [`program::Program`] (code, constants, and per-instruction locations),
//! and [`vm::VirtualMachine`] (the dispatch loop).

pub mod errors;
pub mod frame;
pub mod opcode;
pub mod program;
pub mod value;
pub mod vm;

pub use errors::{Fault, RuntimeError};
pub use opcode::{Opcode, OperandKind};
pub use program::{Instruction, Memory, Program, Region};
pub use value::{Dict, Fun, Value};
pub use vm::VirtualMachine;

/// Version of the Vesper runtime.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runs a compiled program to completion.
///
/// # Errors
///
/// Returns a [`Fault`] if execution raises an uncaught runtime error.
pub fn run(program: Program) -> Result<(), Fault> { VirtualMachine::new(program).run() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn empty_program_runs_without_error() {
        assert!(run(Program::new()).is_ok());
    }
}
