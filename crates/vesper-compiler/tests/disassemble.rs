// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The Vesper Project
// SPDX-FileName: crates/vesper-compiler/tests/disassemble.rs
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
//! A full lex→parse→analyze→compile→disassemble run over a small fixture,
//! asserting on the opcode mnemonics the listing contains rather than on
//! exact byte offsets, which would be brittle against register-allocation
//! changes.

use vesper_analyzer::analyze_module;
use vesper_compiler::{compile_module, disassemble};
use vesper_parser::parser::Parser;

fn disassemble_source(source: &str) -> String {
    let (ast, top_level) = Parser::parse_program(source).expect("parse");
    let context = analyze_module(&ast, "fixture", &top_level).expect("analyze");
    let program = compile_module(&ast, &context, &top_level, None).expect("compile");
    disassemble(&program)
}

#[test]
fn arithmetic_expression_emits_a_binary_op_and_a_print() {
    let listing = disassemble_source("x: int = 1 + 2\nprint x\n");
    assert!(listing.contains("AddInt") || listing.contains("Add"));
    assert!(listing.contains("SetGlobal"));
    assert!(listing.contains("Print"));
    assert!(listing.contains("Exit"));
}

#[test]
fn if_statement_emits_a_conditional_jump() {
    let listing = disassemble_source("x: bool = true\nif x {\n  print x\n}\n");
    assert!(listing.contains("CondForwardJump"));
}

#[test]
fn while_loop_emits_a_backward_jump() {
    let listing = disassemble_source("x: int = 0\nwhile x < 1 {\n  x = x + 1\n}\n");
    assert!(listing.contains("CondBackwardJump") || listing.contains("BackwardJump"));
}

#[test]
fn int_division_emits_the_monomorphized_div_int_int_opcode() {
    let listing = disassemble_source("x: float = 1 / 2\nprint x\n");
    assert!(listing.contains("DivIntInt"));
}

#[test]
fn string_division_emits_the_monomorphized_div_string_int_opcode() {
    let listing = disassemble_source(r#"x: [string] = "hi" / 2"#);
    assert!(listing.contains("DivStringInt"));
}

#[test]
fn list_for_loop_emits_a_length_cast_and_a_positional_read() {
    let listing = disassemble_source("xs: [int] = [1, 2]\nfor v in xs {\n  print v\n}\n");
    assert!(listing.contains("ListToInt"));
    assert!(listing.contains("ListGet"));
}

#[test]
fn string_for_loop_emits_a_char_length_and_a_char_read() {
    let listing = disassemble_source(r#"for c in "hi" {
  print c
}
"#);
    assert!(listing.contains("StringLen"));
    assert!(listing.contains("StringGet"));
}

#[test]
fn dict_for_loop_emits_a_key_at_position_read_followed_by_a_by_key_get() {
    let listing = disassemble_source(
        "d: {int} = {\"a\": 1}\nfor v, k in d {\n  print k\n}\n",
    );
    assert!(listing.contains("DictToInt"));
    assert!(listing.contains("DictKeyAt"));
    assert!(listing.contains("DictGet"));
}
