// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The Vesper Project
// SPDX-FileName: crates/vesper-compiler/src/compiler.rs
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
//! The compiler driver: walks an already-analyzed module's top-level
//! statements twice — once to register every global, function, and class,
//! once to emit the entry region's code — then hands back a finished
//! [`Program`].
//!
//! Single-module only: `vesper_analyzer::analyze_module` leaves imported
//! `use` bindings with a placeholder `Type::NoType`, since cross-module
//! linking happens in the driver that loads and orders a module graph. That
//! driver does not exist yet (see `DESIGN.md`), so a module containing a
//! non-wildcard `use` compiles today only to the extent its imported names
//! are never actually called — calling one fails at [`CompileError::UnboundVariable`]
//! the same way an analyzer bug would. This is a scoping decision, not an
//! oversight: implementing it fully requires the module graph the CLI driver
//! is responsible for building.

use log::debug;
use rustc_hash::FxHashMap;
use vesper_ast::ast::AST;
use vesper_ast::nodes::{AnyNode, ClassDecl, FunctionDecl, NodeID};
use vesper_analyzer::context::SemanticContext;
use vesper_runtime::{Fun, Instruction, Opcode, Program, Region, Value};
use vesper_source::types::Span;

use crate::class::{self, ClassLayout};
use crate::error::CompileError;
use crate::frame::FrameInfo;
use crate::scope::{Scopes, Slot};

/// Compiles one module's statement list (the TLD + code passes must already
/// have run over it) into a finished [`Program`].
///
/// `entry_args` is `Some` only for the module the CLI is actually running:
/// after the top-level statements run (populating globals, defining
/// functions and classes), the program region calls `main` with the given
/// command-line arguments as a `List<String>` before exiting. A module
/// compiled as someone else's library dependency (not yet wired up — see
/// this file's module doc comment) passes `None` and just runs its
/// top-level statements to completion, exactly as today.
///
/// # Errors
///
/// Returns [`CompileError`] if a name the analyzer should have resolved has
/// no compile-time binding, a class was never registered, or a frame/the
/// global file overflows its 16-bit index space.
pub fn compile_module(
    ast: &AST,
    context: &SemanticContext,
    statements: &[NodeID],
    entry_args: Option<Vec<String>>,
) -> Result<Program, CompileError> {
    let mut compiler = Compiler::new(ast, context);
    compiler.declare_globals(statements)?;
    compiler.compile_classes(statements)?;
    compiler.compile_functions(statements)?;
    compiler.compile_entry(statements, entry_args)?;
    Ok(compiler.finish())
}

/// Bundles the AST/analysis being compiled from and the in-progress
/// [`Program`] being emitted into. One instance lives for the whole module;
/// `region`/`frame` are swapped out for the duration of each function or
/// method body and restored once it's compiled.
pub(crate) struct Compiler<'a> {
    pub(crate) ast: &'a AST,
    pub(crate) context: &'a SemanticContext,
    pub(crate) program: Program,
    pub(crate) scopes: Scopes,
    pub(crate) frame: FrameInfo,
    pub(crate) region: Region,
    pub(crate) classes: FxHashMap<String, ClassLayout>,
    next_global: u16,
}

impl<'a> Compiler<'a> {
    fn new(ast: &'a AST, context: &'a SemanticContext) -> Self {
        Self {
            ast,
            context,
            program: Program::new(),
            scopes: Scopes::new(),
            frame: FrameInfo::new(),
            region: Region::Program,
            classes: FxHashMap::default(),
            next_global: 0,
        }
    }

    /// Walks the top-level statements once, binding every `fun`, `class`,
    /// `use` target, and top-level `Declaration` to a fresh global slot. Does
    /// not emit any code — this pass exists only so a forward reference (a
    /// function calling another declared later in the file) resolves to a
    /// slot before either function's body is compiled.
    fn declare_globals(&mut self, statements: &[NodeID]) -> Result<(), CompileError> {
        for &stmt_id in statements {
            self.declare_global(stmt_id)?;
        }
        Ok(())
    }

    fn declare_global(&mut self, stmt_id: NodeID) -> Result<(), CompileError> {
        let Some(node) = self.ast.get_node(stmt_id) else { return Ok(()) };
        match &node.data {
            AnyNode::Export(export) => self.declare_global(export.inner),
            AnyNode::Function(function) => self.bind_global(function.name.clone()),
            AnyNode::Declaration(decl) => self.bind_global(decl.name.clone()),
            AnyNode::Use(use_stmt) => {
                for name in &use_stmt.targets {
                    self.bind_global(name.clone())?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn bind_global(&mut self, name: String) -> Result<(), CompileError> {
        let slot = self.next_global;
        self.next_global =
            self.next_global.checked_add(1).ok_or(CompileError::GlobalBudgetExceeded { max: u16::MAX })?;
        self.scopes.bind(name, slot);
        Ok(())
    }

    /// Compiles every top-level class's methods into the classes region,
    /// recording each class's field/method layout for `Object` construction.
    fn compile_classes(&mut self, statements: &[NodeID]) -> Result<(), CompileError> {
        for &stmt_id in statements {
            self.compile_class_if_present(stmt_id)?;
        }
        Ok(())
    }

    fn compile_class_if_present(&mut self, stmt_id: NodeID) -> Result<(), CompileError> {
        let Some(node) = self.ast.get_node(stmt_id) else { return Ok(()) };
        match &node.data {
            AnyNode::Export(export) => self.compile_class_if_present(export.inner),
            AnyNode::Class(class) => self.compile_class(class),
            _ => Ok(()),
        }
    }

    fn compile_class(&mut self, class: &ClassDecl) -> Result<(), CompileError> {
        let fields = class::field_names(self.ast, class);
        let (_, method_ids) = class::split_members(self.ast, class);

        let mut methods = Vec::with_capacity(method_ids.len());
        for method_id in method_ids {
            let method = self.ast.get_as::<FunctionDecl>(method_id).map_err(|_| {
                CompileError::UnknownClass { name: class.name.clone(), span: class.span }
            })?;
            let value = self.compile_function_value(Region::Classes, method, method_id)?;
            methods.push((method.name.clone(), value));
        }

        debug!("compiled class '{}': {} field(s), {} method(s)", class.name, fields.len(), methods.len());
        self.classes.insert(class.name.clone(), ClassLayout { fields, methods });
        Ok(())
    }

    /// Compiles every top-level function into the functions region, storing
    /// its `Value::Fun` constant into the function's own global slot (bound
    /// during [`Self::declare_globals`]) via `Program.globals`.
    fn compile_functions(&mut self, statements: &[NodeID]) -> Result<(), CompileError> {
        for &stmt_id in statements {
            self.compile_function_if_present(stmt_id)?;
        }
        Ok(())
    }

    fn compile_function_if_present(&mut self, stmt_id: NodeID) -> Result<(), CompileError> {
        let Some(node) = self.ast.get_node(stmt_id) else { return Ok(()) };
        match &node.data {
            AnyNode::Export(export) => self.compile_function_if_present(export.inner),
            AnyNode::Function(function) => {
                let value = self.compile_function_value(Region::Functions, function, stmt_id)?;
                let Some(Slot::Global(slot)) = self.scopes.resolve(&function.name) else {
                    return Err(CompileError::UnboundVariable {
                        name: function.name.clone(),
                        span: function.span,
                    });
                };
                self.set_global(slot, value);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Compiles one function or method body into `region`, returning the
    /// `Value::Fun` a caller uses to invoke it. Swaps in a fresh frame/scope
    /// for the duration, then restores whatever was compiling before.
    pub(crate) fn compile_function_value(
        &mut self,
        region: Region,
        decl: &FunctionDecl,
        node_id: NodeID,
    ) -> Result<Value, CompileError> {
        let entry_offset = self.program.memory(region).code.len();

        let saved_region = std::mem::replace(&mut self.region, region);
        let saved_frame = std::mem::replace(&mut self.frame, FrameInfo::new());
        self.scopes.push();

        for &param_id in &decl.parameters {
            let param = self
                .ast
                .get_as::<vesper_ast::nodes::DeclarationStmt>(param_id)
                .map_err(|_| CompileError::UnboundVariable { name: decl.name.clone(), span: decl.span })?;
            let register = self.frame.get_register(true)?;
            self.scopes.bind(param.name.clone(), register);
        }

        self.compile_block(&decl.body)?;

        let has_return = self.context.annotations.has_return.get(&node_id).copied().unwrap_or(false);
        if !has_return {
            let register = self.frame.get_register(false)?;
            self.emit(Opcode::Return, [i64::from(register), 0, 0, 0, 0], decl.span);
        }

        let arity = decl.parameters.len() as u16;
        let register_frame_size = self.frame.frame_size().max(arity);
        self.scopes.pop();
        self.region = saved_region;
        self.frame = saved_frame;

        Ok(Value::Fun(Fun { entry_offset, region, register_frame_size, arity }))
    }

    /// Compiles the module's top-level statements (skipping `Function`/
    /// `Class`, already handled by the two pre-passes above) into the
    /// program region, which is where VM execution begins. When `entry_args`
    /// is given, appends a call to `main` with those arguments (as a
    /// `List<String>` constant) before the closing `Exit` —
    /// `vesper_analyzer::validate_entry_module` is what guarantees `main`
    /// exists with the right signature by the time this runs.
    fn compile_entry(&mut self, statements: &[NodeID], entry_args: Option<Vec<String>>) -> Result<(), CompileError> {
        self.region = Region::Program;
        self.compile_block(statements)?;

        if let Some(args) = entry_args {
            let span = Span::default();
            let Some(Slot::Global(main_slot)) = self.scopes.resolve("main") else {
                return Err(CompileError::UnboundVariable { name: "main".to_string(), span });
            };
            let main_reg = self.frame.get_register(false)?;
            self.emit(Opcode::LoadGlobal, [i64::from(main_reg), i64::from(main_slot), 0, 0, 0], span);

            let argv = Value::List(args.into_iter().map(Value::String).collect());
            let argv_const = self.intern(argv);
            let argv_reg = self.frame.get_register(false)?;
            self.emit(Opcode::LoadConst, [i64::from(argv_reg), argv_const as i64, 0, 0, 0], span);

            let dest = self.frame.get_register(false)?;
            self.emit(Opcode::Call, [i64::from(main_reg), i64::from(argv_reg), 1, i64::from(dest), 0], span);
        }

        self.emit(Opcode::Exit, [0; 5], Span::default());
        self.program.entry_frame_size = self.frame.frame_size();
        Ok(())
    }

    /// Functions claimed their global slots via [`Self::set_global`] as they
    /// were compiled; a top-level `Declaration`'s slot is only ever written
    /// at run time by the `SetGlobal` its initializer compiles to. Either
    /// way every slot up to `next_global` needs to exist before the VM
    /// clones this vector into its own mutable copy.
    fn finish(mut self) -> Program {
        if self.program.globals.len() < self.next_global as usize {
            self.program.globals.resize(self.next_global as usize, Value::None);
        }
        self.program
    }

    pub(crate) fn emit(&mut self, opcode: Opcode, operands: [i64; 5], span: Span) -> usize {
        let location: vesper_source::types::SourceSpan = span.into();
        self.program.memory_mut(self.region).emit(Instruction::new(opcode, operands), location)
    }

    /// Patches a previously emitted `ForwardJump`/`CondForwardJump`'s literal
    /// operand to land at the current end of the region's code — the
    /// reserve-then-patch technique: the jump is emitted with a placeholder
    /// before its body, and only patched once the body's length is known.
    pub(crate) fn patch_forward(&mut self, jump_offset: usize) {
        let target = self.program.memory(self.region).code.len();
        let relative = target as i64 - (jump_offset as i64 + 1);
        self.program.memory_mut(self.region).code[jump_offset].operands[0] = relative;
    }

    /// Emits a `BackwardJump`/`CondBackwardJump`-shaped literal operand
    /// targeting `target_offset`, which must already have been emitted.
    pub(crate) fn backward_offset(&self, from: usize, target_offset: usize) -> i64 {
        (from as i64 + 1) - target_offset as i64
    }

    pub(crate) fn intern(&mut self, value: Value) -> usize {
        self.program.memory_mut(self.region).intern(value)
    }

    fn set_global(&mut self, slot: u16, value: Value) {
        let idx = slot as usize;
        if self.program.globals.len() <= idx {
            self.program.globals.resize(idx + 1, Value::None);
        }
        self.program.globals[idx] = value;
    }

    /// Compiles `body` inside a fresh nested scope, freeing every register it
    /// bound on the way out — the compiler's stand-in for the analyzer's
    /// `enter_nested`, which the two passes must visit in the same order so
    /// sibling blocks (an `if`'s `then`/`elif`/`else` arms, a loop body run
    /// again) reuse the same register range instead of growing the frame.
    pub(crate) fn compile_nested(&mut self, body: &[NodeID]) -> Result<(), CompileError> {
        self.scopes.push();
        let result = self.compile_block(body);
        for register in self.scopes.pop() {
            self.frame.free_register(register, true);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use vesper_analyzer::analyze_module;
    use vesper_parser::parser::Parser;
    use vesper_runtime::Opcode;

    use super::*;

    fn compile(source: &str, entry_args: Option<Vec<String>>) -> Program {
        let (ast, top_level) = Parser::parse_program(source).unwrap();
        let context = analyze_module(&ast, "test", &top_level).unwrap();
        compile_module(&ast, &context, &top_level, entry_args).unwrap()
    }

    #[test]
    fn top_level_declaration_claims_a_global_slot() {
        let program = compile("x: int = 1\n", None);
        assert_eq!(program.globals.len(), 1);
        assert!(matches!(
            program.program.code.last().map(|instr| instr.opcode),
            Some(Opcode::Exit)
        ));
    }

    #[test]
    fn entry_args_emits_a_call_to_main_before_exit() {
        let source = "fun main(args: [string]) {\n}\n";
        let program = compile(source, Some(vec!["a".to_string()]));
        let opcodes: Vec<Opcode> = program.program.code.iter().map(|instr| instr.opcode).collect();
        assert!(opcodes.contains(&Opcode::Call));
        assert_eq!(opcodes.last(), Some(&Opcode::Exit));
    }

    #[test]
    fn without_entry_args_main_is_compiled_but_never_called() {
        let source = "fun main(args: [string]) {\n}\n";
        let program = compile(source, None);
        let opcodes: Vec<Opcode> = program.program.code.iter().map(|instr| instr.opcode).collect();
        assert!(!opcodes.contains(&Opcode::Call));
        assert!(!program.functions.code.is_empty());
    }
}
