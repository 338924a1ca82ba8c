// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The Vesper Project
// SPDX-FileName: crates/vesper-compiler/src/stmt.rs
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
//! Statement lowering.
//!
//! `Function`/`Class` are no-ops here — `compiler.rs`'s two pre-passes
//! already emitted their bodies into the functions/classes regions before a
//! single top-level statement reaches [`Compiler::compile_block`]. `Use` is a
//! no-op for the same single-module reason documented on `compile_module`.
//!
//! There is no opcode that jumps only when a register is `false`
//! (`CondForwardJump`/`CondBackwardJump` jump only on `true` — see
//! `vesper-runtime`'s `vm.rs`), so every conditional here negates its
//! condition with `NotBool` first and branches on the negation.

use vesper_ast::nodes::{
    AnyNode, ForStmt, IfStmt, NodeID, PrintStmt, ReturnStmt, WhileStmt,
};
use vesper_runtime::{Opcode, Value};

use crate::compiler::Compiler;
use crate::error::CompileError;
use crate::scope::Slot;

impl Compiler<'_> {
    /// Compiles a list of statements in source order. Does not open a new
    /// scope itself — callers that need one (a function body, an `if`/`while`/
    /// `for` body) go through [`Compiler::compile_nested`] instead.
    pub(crate) fn compile_block(&mut self, statements: &[NodeID]) -> Result<(), CompileError> {
        for &stmt_id in statements {
            self.compile_statement(stmt_id)?;
        }
        Ok(())
    }

    fn compile_statement(&mut self, stmt_id: NodeID) -> Result<(), CompileError> {
        let node = self.ast.get_node(stmt_id).expect("statement node exists");
        let span = node.span;
        match node.data.clone() {
            AnyNode::Declaration(decl) => {
                let value = match decl.initializer {
                    Some(init_id) => Some(self.compile_expr(init_id)?),
                    None => None,
                };
                if self.scopes.at_top() {
                    let Some(Slot::Global(slot)) = self.scopes.resolve(&decl.name) else {
                        return Err(CompileError::UnboundVariable { name: decl.name.clone(), span });
                    };
                    if let Some(value) = value {
                        self.emit(Opcode::SetGlobal, [i64::from(slot), i64::from(value), 0, 0, 0], span);
                        self.frame.free_register(value, false);
                    }
                } else {
                    let register = self.frame.get_register(true)?;
                    if let Some(value) = value {
                        self.emit(Opcode::Move, [i64::from(register), i64::from(value), 0, 0, 0], span);
                        self.frame.free_register(value, false);
                    }
                    self.scopes.bind(decl.name.clone(), register);
                }
                Ok(())
            }
            AnyNode::ExpressionStmt(stmt) => {
                let reg = self.compile_expr(stmt.expr)?;
                self.frame.free_register(reg, false);
                Ok(())
            }
            AnyNode::Print(PrintStmt { value, span, .. }) => {
                let reg = self.compile_expr(value)?;
                self.emit(Opcode::Print, [i64::from(reg), 0, 0, 0, 0], span);
                self.frame.free_register(reg, false);
                Ok(())
            }
            AnyNode::Return(ReturnStmt { value, span, .. }) => {
                let reg = match value {
                    Some(value_id) => self.compile_expr(value_id)?,
                    None => self.frame.get_register(false)?,
                };
                self.emit(Opcode::Return, [i64::from(reg), 0, 0, 0, 0], span);
                self.frame.free_register(reg, false);
                Ok(())
            }
            AnyNode::If(if_stmt) => self.compile_if(&if_stmt),
            AnyNode::While(while_stmt) => self.compile_while(&while_stmt),
            AnyNode::For(for_stmt) => self.compile_for(&for_stmt),
            AnyNode::Function(_) | AnyNode::Class(_) | AnyNode::Use(_) => Ok(()),
            AnyNode::Export(export) => self.compile_statement(export.inner),
            other => unreachable!("not a statement node: {other:?}"),
        }
    }

    /// Emits `NotBool` over a freshly compiled condition and a placeholder
    /// `CondForwardJump`, returning the jump's offset for a later
    /// [`Compiler::patch_forward`] once the skipped region's length is known.
    fn negate_and_branch(&mut self, condition: NodeID, span: vesper_source::types::Span) -> Result<usize, CompileError> {
        let cond_reg = self.compile_expr(condition)?;
        let negated = self.frame.get_register(false)?;
        self.emit(Opcode::NotBool, [i64::from(negated), i64::from(cond_reg), 0, 0, 0], span);
        self.frame.free_register(cond_reg, false);
        let jump_offset = self.emit(Opcode::CondForwardJump, [0, i64::from(negated), 0, 0, 0], span);
        self.frame.free_register(negated, false);
        Ok(jump_offset)
    }

    fn compile_if(&mut self, if_stmt: &IfStmt) -> Result<(), CompileError> {
        let mut end_jumps = Vec::new();

        let mut skip = self.negate_and_branch(if_stmt.condition, if_stmt.span)?;
        self.compile_nested(&if_stmt.then_body)?;

        let has_more = !if_stmt.elif_clauses.is_empty() || if_stmt.else_body.is_some();
        if has_more {
            end_jumps.push(self.emit(Opcode::ForwardJump, [0, 0, 0, 0, 0], if_stmt.span));
        }
        self.patch_forward(skip);

        let elif_count = if_stmt.elif_clauses.len();
        for (i, (condition, body)) in if_stmt.elif_clauses.iter().enumerate() {
            skip = self.negate_and_branch(*condition, if_stmt.span)?;
            self.compile_nested(body)?;
            let is_last_branch = i + 1 == elif_count && if_stmt.else_body.is_none();
            if !is_last_branch {
                end_jumps.push(self.emit(Opcode::ForwardJump, [0, 0, 0, 0, 0], if_stmt.span));
            }
            self.patch_forward(skip);
        }

        if let Some(else_body) = &if_stmt.else_body {
            self.compile_nested(else_body)?;
        }

        for jump in end_jumps {
            self.patch_forward(jump);
        }
        Ok(())
    }

    fn compile_while(&mut self, while_stmt: &WhileStmt) -> Result<(), CompileError> {
        let loop_start = self.program.memory(self.region).code.len();
        let skip = self.negate_and_branch(while_stmt.condition, while_stmt.span)?;
        self.compile_nested(&while_stmt.body)?;
        let back_from = self.program.memory(self.region).code.len();
        let offset = self.backward_offset(back_from, loop_start);
        self.emit(Opcode::BackwardJump, [offset, 0, 0, 0, 0], while_stmt.span);
        self.patch_forward(skip);
        Ok(())
    }

    /// Compiles `for variable[, index] in iterator { body }` over a `List`,
    /// `String`, or `Dict` iterator. All three share one counting loop
    /// (`0..length`); only the length opcode and the per-iteration element
    /// fetch differ. `Dict` iterates its entries in insertion order (see
    /// `vesper_runtime::value::Dict`), binding `variable` to the value and
    /// `index` to the key; `String` iterates one-character strings, binding
    /// `index` to the character's position, matching `List`.
    fn compile_for(&mut self, for_stmt: &ForStmt) -> Result<(), CompileError> {
        use vesper_analyzer::types::Type;

        #[derive(Clone, Copy)]
        enum IterKind { List, String, Dict }

        let iter_type = self.context.annotations.types.get(&for_stmt.iterator).cloned();
        let kind = match iter_type {
            Some(Type::List(_)) => IterKind::List,
            Some(Type::String) => IterKind::String,
            Some(Type::Dict(_)) => IterKind::Dict,
            other => {
                let kind = match other {
                    Some(Type::Int | Type::Float | Type::Bool) => "scalar",
                    _ => "<unknown>",
                };
                return Err(CompileError::UnsupportedIteration { kind, span: for_stmt.span });
            }
        };

        let container = self.compile_expr(for_stmt.iterator)?;
        let length = self.frame.get_register(false)?;
        let length_opcode = match kind {
            IterKind::List => Opcode::ListToInt,
            IterKind::String => Opcode::StringLen,
            IterKind::Dict => Opcode::DictToInt,
        };
        self.emit(length_opcode, [i64::from(length), i64::from(container), 0, 0, 0], for_stmt.span);

        self.scopes.push();
        let counter = self.frame.get_register(true)?;
        let zero = self.load_constant(Value::Int(0), for_stmt.span)?;
        self.emit(Opcode::Move, [i64::from(counter), i64::from(zero), 0, 0, 0], for_stmt.span);
        self.frame.free_register(zero, false);

        if matches!(kind, IterKind::List | IterKind::String) {
            if let Some(index_name) = &for_stmt.index {
                self.scopes.bind(index_name.clone(), counter);
            }
        }

        let loop_start = self.program.memory(self.region).code.len();
        let cond = self.frame.get_register(false)?;
        self.emit(Opcode::LtInt, [i64::from(cond), i64::from(counter), i64::from(length), 0, 0], for_stmt.span);
        let negated = self.frame.get_register(false)?;
        self.emit(Opcode::NotBool, [i64::from(negated), i64::from(cond), 0, 0, 0], for_stmt.span);
        self.frame.free_register(cond, false);
        let skip = self.emit(Opcode::CondForwardJump, [0, i64::from(negated), 0, 0, 0], for_stmt.span);
        self.frame.free_register(negated, false);

        self.scopes.push();
        match kind {
            IterKind::List => {
                let element = self.frame.get_register(true)?;
                self.emit(
                    Opcode::ListGet,
                    [i64::from(element), i64::from(container), i64::from(counter), 0, 0],
                    for_stmt.span,
                );
                self.scopes.bind(for_stmt.variable.clone(), element);
            }
            IterKind::String => {
                let element = self.frame.get_register(true)?;
                self.emit(
                    Opcode::StringGet,
                    [i64::from(element), i64::from(container), i64::from(counter), 0, 0],
                    for_stmt.span,
                );
                self.scopes.bind(for_stmt.variable.clone(), element);
            }
            IterKind::Dict => {
                let key = self.frame.get_register(true)?;
                self.emit(
                    Opcode::DictKeyAt,
                    [i64::from(key), i64::from(container), i64::from(counter), 0, 0],
                    for_stmt.span,
                );
                let value = self.frame.get_register(true)?;
                self.emit(
                    Opcode::DictGet,
                    [i64::from(value), i64::from(container), i64::from(key), 0, 0],
                    for_stmt.span,
                );
                self.scopes.bind(for_stmt.variable.clone(), value);
                if let Some(index_name) = &for_stmt.index {
                    self.scopes.bind(index_name.clone(), key);
                } else {
                    self.frame.free_register(key, true);
                }
            }
        }
        self.compile_block(&for_stmt.body)?;
        for register in self.scopes.pop() {
            self.frame.free_register(register, true);
        }

        let one = self.load_constant(Value::Int(1), for_stmt.span)?;
        self.emit(Opcode::AddInt, [i64::from(counter), i64::from(counter), i64::from(one), 0, 0], for_stmt.span);
        self.frame.free_register(one, false);

        let back_from = self.program.memory(self.region).code.len();
        let offset = self.backward_offset(back_from, loop_start);
        self.emit(Opcode::BackwardJump, [offset, 0, 0, 0, 0], for_stmt.span);
        self.patch_forward(skip);

        self.frame.free_register(length, false);
        self.frame.free_register(container, false);
        for register in self.scopes.pop() {
            self.frame.free_register(register, true);
        }
        Ok(())
    }
}
