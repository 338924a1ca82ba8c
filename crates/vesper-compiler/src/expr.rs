// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The Vesper Project
// SPDX-FileName: crates/vesper-compiler/src/expr.rs
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
//! Expression lowering: every `AnyNode` expression variant compiles to a
//! register holding its value.
//!
//! The monomorphized opcode for a `Cast`/`Unary`/`Binary`/`Access` node is
//! never re-derived here — it's read straight out of the side tables the
//! code pass already populated (`context.annotations`), keyed by the same
//! `NodeID` the AST hands back. Doing the type dispatch twice would risk the
//! two passes disagreeing; this module trusts analysis completely and only
//! panics (via `expect`) when a table lookup for an already-analyzed node
//! comes back empty, which would be an analyzer bug, not a user error.

use vesper_ast::nodes::{
    AccessExpr, AnyNode, AssignExpr, BinaryExpr, CallExpr, CastExpr, DictionaryExpr, GroupExpr,
    ListExpr, LogicalExpr, LogicalOp, NodeID, ObjectExpr, PropertyExpr, RangeExpr, SliceExpr,
    UnaryExpr, VariableExpr,
};
use vesper_analyzer::context::AssignTargetKind;
use vesper_analyzer::types::tables::{BinaryVariant, CastVariant, UnaryVariant};
use vesper_ast::nodes::AccessKind;
use vesper_analyzer::types::Type;
use vesper_runtime::{Opcode, Value};

use crate::compiler::Compiler;
use crate::error::CompileError;
use crate::scope::Slot;

impl Compiler<'_> {
    /// Compiles `node_id` and returns the register holding its value. The
    /// register is a scratch temporary unless the node is a `Variable`
    /// resolving to a local, in which case it's the binding's own register —
    /// callers must not assume ownership of it for mutation.
    pub(crate) fn compile_expr(&mut self, node_id: NodeID) -> Result<u16, CompileError> {
        let node = self.ast.get_node(node_id).expect("expression node exists");
        let span = node.span;
        match node.data.clone() {
            AnyNode::Integer(lit) => self.load_constant(Value::Int(lit.value), span),
            AnyNode::Float(lit) => self.load_constant(Value::Float(lit.value), span),
            AnyNode::StringLit(lit) => self.load_constant(Value::String(lit.value), span),
            AnyNode::Boolean(lit) => self.load_constant(Value::Bool(lit.value), span),
            AnyNode::List(list) => self.compile_list(&list),
            AnyNode::Dictionary(dict) => self.compile_dictionary(&dict),
            AnyNode::Object(object) => self.compile_object(&object),
            AnyNode::Group(group) => self.compile_group(&group),
            AnyNode::Cast(cast) => self.compile_cast(node_id, &cast),
            AnyNode::Unary(unary) => self.compile_unary(node_id, &unary),
            AnyNode::Binary(binary) => self.compile_binary(node_id, &binary),
            AnyNode::Logical(logical) => self.compile_logical(&logical),
            AnyNode::Variable(variable) => self.compile_variable(&variable),
            AnyNode::Assign(assign) => self.compile_assign(node_id, &assign),
            AnyNode::Call(call) => self.compile_call(&call),
            AnyNode::Access(access) => self.compile_access(node_id, &access),
            AnyNode::Slice(slice) => self.compile_slice(&slice),
            AnyNode::Range(range) => self.compile_range(&range),
            AnyNode::Property(property) => self.compile_property(&property),
            other => unreachable!("not an expression node: {other:?}"),
        }
    }

    fn load_constant(&mut self, value: Value, span: vesper_source::types::Span) -> Result<u16, CompileError> {
        let index = self.intern(value);
        let dest = self.frame.get_register(false)?;
        self.emit(Opcode::LoadConst, [i64::from(dest), index as i64, 0, 0, 0], span);
        Ok(dest)
    }

    fn compile_list(&mut self, list: &ListExpr) -> Result<u16, CompileError> {
        let dest = self.frame.get_register(false)?;
        self.emit(Opcode::NewList, [i64::from(dest), 0, 0, 0, 0], list.span);
        for &element_id in &list.elements {
            let item = self.compile_expr(element_id)?;
            self.emit(Opcode::ListPush, [i64::from(dest), i64::from(item), 0, 0, 0], list.span);
            self.frame.free_register(item, false);
        }
        Ok(dest)
    }

    fn compile_dictionary(&mut self, dict: &DictionaryExpr) -> Result<u16, CompileError> {
        let dest = self.frame.get_register(false)?;
        self.emit(Opcode::NewDict, [i64::from(dest), 0, 0, 0, 0], dict.span);
        for (key, value_id) in &dict.entries {
            let key_reg = self.load_constant(Value::String(key.clone()), dict.span)?;
            let value_reg = self.compile_expr(*value_id)?;
            self.emit(Opcode::DictSet, [i64::from(dest), i64::from(key_reg), i64::from(value_reg), 0, 0], dict.span);
            self.frame.free_register(key_reg, false);
            self.frame.free_register(value_reg, false);
        }
        Ok(dest)
    }

    /// `ClassName { field: value, ... }`: a fresh `Dict` seeded with every
    /// constructor argument and then every one of the class's methods, each
    /// stored under its name exactly like a field — see `class.rs`.
    fn compile_object(&mut self, object: &ObjectExpr) -> Result<u16, CompileError> {
        let layout = self
            .classes
            .get(&object.class_name)
            .cloned()
            .ok_or_else(|| CompileError::UnknownClass { name: object.class_name.clone(), span: object.span })?;

        let dest = self.frame.get_register(false)?;
        let class_name_const = self.intern(Value::String(object.class_name.clone()));
        self.emit(
            Opcode::NewObject,
            [i64::from(dest), class_name_const as i64, i64::from(dest), 0, 0],
            object.span,
        );

        for (field, value_id) in &object.arguments {
            let key_reg = self.load_constant(Value::String(field.clone()), object.span)?;
            let value_reg = self.compile_expr(*value_id)?;
            self.emit(
                Opcode::SetProperty,
                [i64::from(dest), i64::from(key_reg), i64::from(value_reg), 0, 0],
                object.span,
            );
            self.frame.free_register(key_reg, false);
            self.frame.free_register(value_reg, false);
        }

        for (method, value) in layout.methods {
            let key_reg = self.load_constant(Value::String(method), object.span)?;
            let method_const = self.intern(value);
            let value_reg = self.frame.get_register(false)?;
            self.emit(Opcode::LoadConst, [i64::from(value_reg), method_const as i64, 0, 0, 0], object.span);
            self.emit(
                Opcode::SetProperty,
                [i64::from(dest), i64::from(key_reg), i64::from(value_reg), 0, 0],
                object.span,
            );
            self.frame.free_register(key_reg, false);
            self.frame.free_register(value_reg, false);
        }

        Ok(dest)
    }

    fn compile_group(&mut self, group: &GroupExpr) -> Result<u16, CompileError> { self.compile_expr(group.inner) }

    fn compile_cast(&mut self, node_id: NodeID, cast: &CastExpr) -> Result<u16, CompileError> {
        let source = self.compile_expr(cast.expr)?;
        let variant = *self
            .context
            .annotations
            .cast_variants
            .get(&node_id)
            .expect("analyzed Cast node has a recorded variant");
        let opcode = cast_opcode(variant);
        let dest = self.frame.get_register(false)?;
        self.emit(opcode, [i64::from(dest), i64::from(source), 0, 0, 0], cast.span);
        self.frame.free_register(source, false);
        Ok(dest)
    }

    fn compile_unary(&mut self, node_id: NodeID, unary: &UnaryExpr) -> Result<u16, CompileError> {
        let operand = self.compile_expr(unary.operand)?;
        let variant = *self
            .context
            .annotations
            .unary_variants
            .get(&node_id)
            .expect("analyzed Unary node has a recorded variant");
        let opcode = unary_opcode(variant);
        let dest = self.frame.get_register(false)?;
        self.emit(opcode, [i64::from(dest), i64::from(operand), 0, 0, 0], unary.span);
        self.frame.free_register(operand, false);
        Ok(dest)
    }

    fn compile_binary(&mut self, node_id: NodeID, binary: &BinaryExpr) -> Result<u16, CompileError> {
        let left = self.compile_expr(binary.left)?;
        let right = self.compile_expr(binary.right)?;
        let variant = *self
            .context
            .annotations
            .binary_variants
            .get(&node_id)
            .expect("analyzed Binary node has a recorded variant");
        let opcode = binary_opcode(variant);
        let dest = self.frame.get_register(false)?;
        self.emit(opcode, [i64::from(dest), i64::from(left), i64::from(right), 0, 0], binary.span);
        self.frame.free_register(left, false);
        self.frame.free_register(right, false);
        Ok(dest)
    }

    /// `and`/`or` evaluate both sides eagerly — the virtual machine's `And`
    /// and `Or` opcodes are plain boolean combinators over two already-loaded
    /// registers, not a short-circuiting branch, so there is no jump to emit.
    fn compile_logical(&mut self, logical: &LogicalExpr) -> Result<u16, CompileError> {
        let left = self.compile_expr(logical.left)?;
        let right = self.compile_expr(logical.right)?;
        let opcode = match logical.op {
            LogicalOp::And => Opcode::And,
            LogicalOp::Or => Opcode::Or,
        };
        let dest = self.frame.get_register(false)?;
        self.emit(opcode, [i64::from(dest), i64::from(left), i64::from(right), 0, 0], logical.span);
        self.frame.free_register(left, false);
        self.frame.free_register(right, false);
        Ok(dest)
    }

    fn compile_variable(&mut self, variable: &VariableExpr) -> Result<u16, CompileError> {
        match self.scopes.resolve(&variable.name) {
            Some(Slot::Local(register)) => Ok(register),
            Some(Slot::Global(slot)) => {
                let dest = self.frame.get_register(false)?;
                self.emit(Opcode::LoadGlobal, [i64::from(dest), i64::from(slot), 0, 0, 0], variable.span);
                Ok(dest)
            }
            None => Err(CompileError::UnboundVariable { name: variable.name.clone(), span: variable.span }),
        }
    }

    fn compile_assign(&mut self, node_id: NodeID, assign: &AssignExpr) -> Result<u16, CompileError> {
        let value = self.compile_expr(assign.value)?;
        let kind = *self
            .context
            .annotations
            .assign_targets
            .get(&node_id)
            .expect("analyzed Assign node has a recorded target kind");

        match kind {
            AssignTargetKind::Variable => {
                let target = self.ast.get_as::<VariableExpr>(assign.target).expect("Variable assign target");
                match self.scopes.resolve(&target.name) {
                    Some(Slot::Local(register)) => {
                        if register != value {
                            self.emit(Opcode::Move, [i64::from(register), i64::from(value), 0, 0, 0], assign.span);
                        }
                    }
                    Some(Slot::Global(slot)) => {
                        self.emit(Opcode::SetGlobal, [i64::from(slot), i64::from(value), 0, 0, 0], assign.span);
                    }
                    None => {
                        return Err(CompileError::UnboundVariable { name: target.name.clone(), span: target.span });
                    }
                }
            }
            AssignTargetKind::Access => {
                let target = self.ast.get_as::<AccessExpr>(assign.target).expect("Access assign target");
                let container = self.compile_expr(target.target)?;
                let index = self.compile_expr(target.index)?;
                let element_kind = *self
                    .context
                    .annotations
                    .access_kinds
                    .get(&assign.target)
                    .expect("analyzed Access node has a recorded kind");
                let opcode = match element_kind {
                    AccessKind::List => Opcode::ListSet,
                    AccessKind::Dict => Opcode::DictSet,
                    AccessKind::String => {
                        return Err(CompileError::UnboundVariable {
                            name: "<string index assignment>".to_string(),
                            span: assign.span,
                        });
                    }
                };
                self.emit(opcode, [i64::from(container), i64::from(index), i64::from(value), 0, 0], assign.span);
                self.frame.free_register(index, false);
            }
            AssignTargetKind::Property => {
                let target = self.ast.get_as::<PropertyExpr>(assign.target).expect("Property assign target");
                let object = self.compile_expr(target.object)?;
                let key = self.load_constant(Value::String(target.name.clone()), assign.span)?;
                self.emit(Opcode::SetProperty, [i64::from(object), i64::from(key), i64::from(value), 0, 0], assign.span);
                self.frame.free_register(key, false);
            }
        }
        Ok(value)
    }

    /// `target(arguments...)`: arguments must land in contiguous registers
    /// before `Call`, so they're reserved as a block up front and each
    /// argument's value is moved in rather than computed in place.
    fn compile_call(&mut self, call: &CallExpr) -> Result<u16, CompileError> {
        let callee = self.compile_expr(call.target)?;
        let args_start = self.frame.reserve_contiguous(call.arguments.len() as u16)?;
        for (i, &argument_id) in call.arguments.iter().enumerate() {
            let value = self.compile_expr(argument_id)?;
            let slot = args_start + i as u16;
            if slot != value {
                self.emit(Opcode::Move, [i64::from(slot), i64::from(value), 0, 0, 0], call.span);
                self.frame.free_register(value, false);
            }
        }
        let dest = self.frame.get_register(false)?;
        self.emit(
            Opcode::Call,
            [i64::from(callee), i64::from(args_start), call.arguments.len() as i64, i64::from(dest), 0],
            call.span,
        );
        for i in 0..call.arguments.len() as u16 {
            self.frame.free_register(args_start + i, true);
        }
        self.frame.free_register(callee, false);
        Ok(dest)
    }

    fn compile_access(&mut self, node_id: NodeID, access: &AccessExpr) -> Result<u16, CompileError> {
        let target = self.compile_expr(access.target)?;
        let index = self.compile_expr(access.index)?;
        let kind = *self
            .context
            .annotations
            .access_kinds
            .get(&node_id)
            .expect("analyzed Access node has a recorded kind");
        let opcode = match kind {
            AccessKind::List => Opcode::ListGet,
            AccessKind::Dict => Opcode::DictGet,
            AccessKind::String => Opcode::StringGet,
        };
        let dest = self.frame.get_register(false)?;
        self.emit(opcode, [i64::from(dest), i64::from(target), i64::from(index), 0, 0], access.span);
        self.frame.free_register(target, false);
        self.frame.free_register(index, false);
        Ok(dest)
    }

    /// `target[start?:end?:step?]`: an omitted bound is materialized as a
    /// sentinel constant rather than special-cased at the opcode level — the
    /// virtual machine's `slice_bounds` already clamps `start`/`end` into
    /// `[0, len]`, so `0`/`i64::MAX` behave exactly like "from the beginning"
    /// / "to the end" once clamped.
    fn compile_slice(&mut self, slice: &SliceExpr) -> Result<u16, CompileError> {
        let target = self.compile_expr(slice.target)?;
        let start = match slice.start {
            Some(id) => self.compile_expr(id)?,
            None => self.load_constant(Value::Int(0), slice.span)?,
        };
        let end = match slice.end {
            Some(id) => self.compile_expr(id)?,
            None => self.load_constant(Value::Int(i64::MAX), slice.span)?,
        };
        let step = match slice.step {
            Some(id) => self.compile_expr(id)?,
            None => self.load_constant(Value::Int(1), slice.span)?,
        };

        let target_type = self.context.annotations.types.get(&slice.target);
        let opcode = match target_type {
            Some(Type::String) => Opcode::StringSlice,
            _ => Opcode::ListSlice,
        };

        let dest = self.frame.get_register(false)?;
        self.emit(
            opcode,
            [i64::from(dest), i64::from(target), i64::from(start), i64::from(end), i64::from(step)],
            slice.span,
        );
        self.frame.free_register(target, false);
        self.frame.free_register(start, false);
        self.frame.free_register(end, false);
        self.frame.free_register(step, false);
        Ok(dest)
    }

    fn compile_range(&mut self, range: &RangeExpr) -> Result<u16, CompileError> {
        let start = self.compile_expr(range.start)?;
        let end = self.compile_expr(range.end)?;
        let opcode = if range.inclusive { Opcode::RangeInclusive } else { Opcode::RangeExclusive };
        let dest = self.frame.get_register(false)?;
        self.emit(opcode, [i64::from(dest), i64::from(start), i64::from(end), 0, 0], range.span);
        self.frame.free_register(start, false);
        self.frame.free_register(end, false);
        Ok(dest)
    }

    fn compile_property(&mut self, property: &PropertyExpr) -> Result<u16, CompileError> {
        let object = self.compile_expr(property.object)?;
        let key = self.load_constant(Value::String(property.name.clone()), property.span)?;
        let dest = self.frame.get_register(false)?;
        self.emit(Opcode::GetProperty, [i64::from(dest), i64::from(object), i64::from(key), 0, 0], property.span);
        self.frame.free_register(key, false);
        Ok(dest)
    }
}

const fn cast_opcode(variant: CastVariant) -> Opcode {
    match variant {
        CastVariant::IntToFloat => Opcode::IntToFloat,
        CastVariant::IntToBool => Opcode::IntToBool,
        CastVariant::IntToString => Opcode::IntToString,
        CastVariant::FloatToInt => Opcode::FloatToInt,
        CastVariant::FloatToBool => Opcode::FloatToBool,
        CastVariant::FloatToString => Opcode::FloatToString,
        CastVariant::BoolToInt => Opcode::BoolToInt,
        CastVariant::BoolToFloat => Opcode::BoolToFloat,
        CastVariant::BoolToString => Opcode::BoolToString,
        CastVariant::ListToBool => Opcode::ListToBool,
        CastVariant::ListToString => Opcode::ListToString,
        CastVariant::ListToInt => Opcode::ListToInt,
        CastVariant::DictToBool => Opcode::DictToBool,
        CastVariant::DictToString => Opcode::DictToString,
        CastVariant::DictToInt => Opcode::DictToInt,
        CastVariant::StringToBool => Opcode::StringToBool,
        CastVariant::StringToInt => Opcode::StringToInt,
    }
}

const fn unary_opcode(variant: UnaryVariant) -> Opcode {
    match variant {
        UnaryVariant::NotBool => Opcode::NotBool,
        UnaryVariant::PlusInt => Opcode::PlusInt,
        UnaryVariant::PlusFloat => Opcode::PlusFloat,
        UnaryVariant::PlusBool => Opcode::PlusBool,
        UnaryVariant::MinusInt => Opcode::MinusInt,
        UnaryVariant::MinusFloat => Opcode::MinusFloat,
        UnaryVariant::MinusBool => Opcode::MinusBool,
    }
}

const fn binary_opcode(variant: BinaryVariant) -> Opcode {
    match variant {
        BinaryVariant::AddInt => Opcode::AddInt,
        BinaryVariant::AddFloat => Opcode::AddFloat,
        BinaryVariant::AddString => Opcode::AddString,
        BinaryVariant::AddBool => Opcode::AddBool,
        BinaryVariant::AddList => Opcode::AddList,
        BinaryVariant::AddDict => Opcode::AddDict,
        BinaryVariant::SubInt => Opcode::SubInt,
        BinaryVariant::SubFloat => Opcode::SubFloat,
        BinaryVariant::SubBool => Opcode::SubBool,
        BinaryVariant::MulInt => Opcode::MulInt,
        BinaryVariant::MulFloat => Opcode::MulFloat,
        BinaryVariant::MulBool => Opcode::MulBool,
        BinaryVariant::MulIntString => Opcode::MulIntString,
        BinaryVariant::MulStringInt => Opcode::MulStringInt,
        BinaryVariant::MulIntList => Opcode::MulIntList,
        BinaryVariant::MulListInt => Opcode::MulListInt,
        BinaryVariant::DivIntInt => Opcode::DivIntInt,
        BinaryVariant::DivFloatFloat => Opcode::DivFloatFloat,
        BinaryVariant::DivStringInt => Opcode::DivStringInt,
        BinaryVariant::DivListInt => Opcode::DivListInt,
        BinaryVariant::EqInt => Opcode::EqInt,
        BinaryVariant::EqFloat => Opcode::EqFloat,
        BinaryVariant::EqString => Opcode::EqString,
        BinaryVariant::EqBool => Opcode::EqBool,
        BinaryVariant::EqList => Opcode::EqList,
        BinaryVariant::EqDict => Opcode::EqDict,
        BinaryVariant::NotEqInt => Opcode::NotEqInt,
        BinaryVariant::NotEqFloat => Opcode::NotEqFloat,
        BinaryVariant::NotEqString => Opcode::NotEqString,
        BinaryVariant::NotEqBool => Opcode::NotEqBool,
        BinaryVariant::NotEqList => Opcode::NotEqList,
        BinaryVariant::NotEqDict => Opcode::NotEqDict,
        BinaryVariant::LtInt => Opcode::LtInt,
        BinaryVariant::LtFloat => Opcode::LtFloat,
        BinaryVariant::LtString => Opcode::LtString,
        BinaryVariant::LtBool => Opcode::LtBool,
        BinaryVariant::LeInt => Opcode::LeInt,
        BinaryVariant::LeFloat => Opcode::LeFloat,
        BinaryVariant::LeString => Opcode::LeString,
        BinaryVariant::LeBool => Opcode::LeBool,
        BinaryVariant::GtInt => Opcode::GtInt,
        BinaryVariant::GtFloat => Opcode::GtFloat,
        BinaryVariant::GtString => Opcode::GtString,
        BinaryVariant::GtBool => Opcode::GtBool,
        BinaryVariant::GeInt => Opcode::GeInt,
        BinaryVariant::GeFloat => Opcode::GeFloat,
        BinaryVariant::GeString => Opcode::GeString,
        BinaryVariant::GeBool => Opcode::GeBool,
    }
}
