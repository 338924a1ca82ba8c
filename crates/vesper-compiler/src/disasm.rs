// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The Vesper Project
// SPDX-FileName: crates/vesper-compiler/src/disasm.rs
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
//! Renders a compiled [`Program`]'s three memory regions as text, driven by
//! [`Opcode::operands`]/[`Opcode::mnemonic`] — the same table the emitter in
//! `compiler.rs`/`expr.rs`/`stmt.rs` consults, so the two can never drift
//! silently apart within one build.

use std::fmt::Write as _;

use vesper_runtime::{Memory, OperandKind, Program, Region, Value};

/// Disassembles every region of `program`, one section per region, each
/// preceded by its constant pool.
#[must_use]
pub fn disassemble(program: &Program) -> String {
    let mut out = String::new();
    for region in [Region::Program, Region::Functions, Region::Classes] {
        write_region(&mut out, region, program.memory(region));
    }
    out
}

fn write_region(out: &mut String, region: Region, memory: &Memory) {
    let _ = writeln!(out, "; -- {region:?} --");
    if !memory.constants.is_empty() {
        let _ = writeln!(out, "; constants:");
        for (index, value) in memory.constants.iter().enumerate() {
            let _ = writeln!(out, ";   c{index} = {}", format_constant(value));
        }
    }
    for (offset, instruction) in memory.code.iter().enumerate() {
        let kinds = instruction.opcode.operands();
        let mut rendered = format!("{offset:>6}  {}", instruction.opcode);
        for (slot, kind) in kinds.iter().enumerate() {
            let value = instruction.operands[slot];
            let _ = write!(rendered, " {}", format_operand(*kind, value));
        }
        let _ = writeln!(out, "{rendered}");
    }
    let _ = writeln!(out);
}

fn format_operand(kind: OperandKind, value: i64) -> String {
    match kind {
        OperandKind::Register => format!("r{value}"),
        OperandKind::Constant => format!("c{value}"),
        OperandKind::Global => format!("g{value}"),
        OperandKind::Literal => format!("{value:+}"),
        OperandKind::Property => format!("r{value}"),
    }
}

fn format_constant(value: &Value) -> String {
    match value {
        Value::Int(n) => n.to_string(),
        Value::Float(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => format!("{s:?}"),
        Value::List(_) => "<list>".to_string(),
        Value::Dict(_) => "<dict>".to_string(),
        Value::Fun(fun) => format!("fun@{:?}:{}", fun.region, fun.entry_offset),
        Value::None => "none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesper_runtime::{Instruction, Opcode};

    #[test]
    fn disassembles_a_single_exit() {
        let mut program = Program::new();
        program.program.emit(Instruction::new(Opcode::Exit, [0; 5]), Default::default());
        let text = disassemble(&program);
        assert!(text.contains("Exit"));
    }

    #[test]
    fn renders_constant_pool_entries() {
        let mut program = Program::new();
        let index = program.program.intern(Value::Int(42));
        program.program.emit(
            Instruction::new(Opcode::LoadConst, [0, index as i64, 0, 0, 0]),
            Default::default(),
        );
        let text = disassemble(&program);
        assert!(text.contains("c0 = 42"));
        assert!(text.contains("LoadConst r0 c0"));
    }
}
