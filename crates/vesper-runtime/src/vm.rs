// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The Vesper Project
// SPDX-FileName: crates/vesper-runtime/src/vm.rs
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
//! The register-based bytecode interpreter.
//!
//! Dispatch is a plain `match` over [`Opcode`] in a loop; there is no
//! indirect-threaded or computed-goto trick here, matching the rest of the
//! codebase's preference for straightforward control flow over micro
//! optimization.

use log::trace;
use vesper_source::types::SourceSpan;

use crate::errors::{Fault, RuntimeError};
use crate::frame::Frame;
use crate::opcode::{Opcode, MAX_OPERANDS};
use crate::program::{Instruction, Program, Region};
use crate::value::{Dict, Value};

type VmResult<T> = std::result::Result<T, Fault>;
type Operands = [i64; MAX_OPERANDS];

/// Owns a [`Program`] and executes it to completion (or to the first
/// uncaught runtime error).
pub struct VirtualMachine {
    program: Program,
    globals: Vec<Value>,
    frames: Vec<Frame>,
    region: Region,
    ip: usize,
}

impl VirtualMachine {
    #[must_use]
    pub fn new(program: Program) -> Self {
        let globals = program.globals.clone();
        Self { program, globals, frames: Vec::new(), region: Region::Program, ip: 0 }
    }

    /// Runs the program from the first instruction of its `program` region
    /// until an `Exit` instruction or the instruction stream is exhausted.
    ///
    /// # Errors
    ///
    /// Returns a [`Fault`] carrying the source location active at the point
    /// of the error.
    pub fn run(&mut self) -> VmResult<()> {
        self.region = Region::Program;
        self.ip = 0;
        self.frames.push(Frame::new(self.program.entry_frame_size, Region::Program, 0, None));
        self.dispatch()
    }

    fn dispatch(&mut self) -> VmResult<()> {
        loop {
            let memory = self.program.memory(self.region);
            let Some(instruction) = memory.code.get(self.ip).copied() else {
                return Ok(());
            };
            let location = memory.location_at(self.ip).unwrap_or_default();
            trace!("{:?} {:?} @ {}", self.region, instruction.opcode, self.ip);

            match self.execute(instruction, location)? {
                Control::Advance => self.ip += 1,
                Control::Jump(target) => self.ip = target,
                Control::Halt => return Ok(()),
            }
        }
    }

    fn frame(&mut self) -> &mut Frame { self.frames.last_mut().expect("dispatch always holds a frame") }

    fn reg(&mut self, index: i64) -> Value { self.frame().get(index as u16).clone() }

    fn set_reg(&mut self, index: i64, value: Value) { self.frame().set(index as u16, value); }

    #[allow(clippy::too_many_lines)]
    fn execute(&mut self, instr: Instruction, location: SourceSpan) -> VmResult<Control> {
        let op = instr.operands;
        match instr.opcode {
            Opcode::Move => {
                let v = self.reg(op[1]);
                self.set_reg(op[0], v);
            }
            Opcode::LoadConst => {
                let constant = self.program.memory(self.region).constants[op[1] as usize].clone();
                self.set_reg(op[0], constant);
            }
            Opcode::LoadGlobal => {
                let v = self.globals[op[1] as usize].clone();
                self.set_reg(op[0], v);
            }
            Opcode::SetGlobal => {
                let v = self.reg(op[1]);
                self.globals[op[0] as usize] = v;
            }

            Opcode::NewList => self.set_reg(op[0], Value::List(Vec::new())),
            Opcode::NewDict => self.set_reg(op[0], Value::Dict(Dict::new())),
            Opcode::ListPush => {
                let item = self.reg(op[1]);
                let mut items = self.list_reg(op[0], location)?;
                items.push(item);
                self.set_reg(op[0], Value::List(items));
            }
            Opcode::ListPop => {
                let mut items = self.list_reg(op[1], location)?;
                let popped = items
                    .pop()
                    .ok_or_else(|| RuntimeError::index_error("pop from empty list").at(location))?;
                self.set_reg(op[1], Value::List(items));
                self.set_reg(op[0], popped);
            }
            Opcode::ListGet => {
                let index = self.int_reg(op[2], location)?;
                let items = self.list_reg(op[1], location)?;
                let item = Self::index_into(&items, index).ok_or_else(|| {
                    RuntimeError::index_error(format!("list index {index} out of range")).at(location)
                })?;
                self.set_reg(op[0], item);
            }
            Opcode::ListSet => {
                let index = self.int_reg(op[1], location)?;
                let value = self.reg(op[2]);
                let mut items = self.list_reg(op[0], location)?;
                let pos = Self::normalize_index(index, items.len() as i64).ok_or_else(|| {
                    RuntimeError::index_error(format!("list index {index} out of range")).at(location)
                })?;
                items[pos] = value;
                self.set_reg(op[0], Value::List(items));
            }
            Opcode::ListDelete => {
                let index = self.int_reg(op[1], location)?;
                let mut items = self.list_reg(op[0], location)?;
                let pos = Self::normalize_index(index, items.len() as i64).ok_or_else(|| {
                    RuntimeError::index_error(format!("list index {index} out of range")).at(location)
                })?;
                let _ = items.remove(pos);
                self.set_reg(op[0], Value::List(items));
            }

            Opcode::DictGet | Opcode::GetProperty => {
                let key = self.string_reg(op[2], location)?;
                let dict = self.dict_reg(op[1], location)?;
                let value = dict
                    .get(&key)
                    .cloned()
                    .ok_or_else(|| RuntimeError::key_error(format!("key '{key}' not found")).at(location))?;
                self.set_reg(op[0], value);
            }
            Opcode::DictSet | Opcode::SetProperty => {
                let key = self.string_reg(op[1], location)?;
                let value = self.reg(op[2]);
                let mut dict = self.dict_reg(op[0], location)?;
                dict.insert(key, value);
                self.set_reg(op[0], Value::Dict(dict));
            }
            Opcode::DictDelete => {
                let key = self.string_reg(op[1], location)?;
                let mut dict = self.dict_reg(op[0], location)?;
                let _ = dict.remove(&key);
                self.set_reg(op[0], Value::Dict(dict));
            }
            Opcode::DictKeyAt => {
                let index = self.int_reg(op[2], location)?;
                let dict = self.dict_reg(op[1], location)?;
                let key = Self::index_into(dict.keys(), index).ok_or_else(|| {
                    RuntimeError::index_error(format!("dict position {index} out of range")).at(location)
                })?;
                self.set_reg(op[0], Value::String(key));
            }

            Opcode::StringGet => {
                let index = self.int_reg(op[2], location)?;
                let s = self.string_reg(op[1], location)?;
                let chars: Vec<char> = s.chars().collect();
                let ch = Self::index_into(&chars, index).ok_or_else(|| {
                    RuntimeError::index_error(format!("string index {index} out of range")).at(location)
                })?;
                self.set_reg(op[0], Value::String(ch.to_string()));
            }
            Opcode::StringSet | Opcode::StringDelete => {
                return Err(RuntimeError::value_error("strings are immutable").at(location));
            }
            Opcode::StringLen => {
                let s = self.string_reg(op[1], location)?;
                self.set_reg(op[0], Value::Int(s.chars().count() as i64));
            }

            Opcode::NewObject => self.set_reg(op[0], Value::Dict(Dict::new())),

            Opcode::Call => {
                let callee = self.reg(op[0]);
                let Value::Fun(fun) = callee else {
                    return Err(self.type_mismatch("fun", &callee, location));
                };
                let args_start = op[1] as u16;
                let arg_count = op[2] as u16;
                let dest = op[3] as u16;
                let mut callee_frame =
                    Frame::new(fun.register_frame_size, self.region, self.ip + 1, Some(dest));
                for i in 0..arg_count.min(fun.arity) {
                    callee_frame.set(i, self.frame().get(args_start + i).clone());
                }
                self.frames.push(callee_frame);
                self.region = fun.region;
                return Ok(Control::Jump(fun.entry_offset));
            }
            Opcode::Return => {
                let value = self.reg(op[0]);
                let finished = self.frames.pop().expect("return always has a frame to pop");
                if self.frames.is_empty() {
                    return Ok(Control::Halt);
                }
                self.region = finished.return_region;
                let return_address = finished.return_address;
                if let Some(dest) = finished.return_register {
                    self.frame().set(dest, value);
                }
                return Ok(Control::Jump(return_address));
            }
            Opcode::ForwardJump => return Ok(Control::Jump(self.ip + 1 + op[0] as usize)),
            Opcode::BackwardJump => return Ok(Control::Jump(self.ip + 1 - op[0] as usize)),
            Opcode::CondForwardJump => {
                if self.bool_reg(op[1], location)? {
                    return Ok(Control::Jump(self.ip + 1 + op[0] as usize));
                }
            }
            Opcode::CondBackwardJump => {
                if self.bool_reg(op[1], location)? {
                    return Ok(Control::Jump(self.ip + 1 - op[0] as usize));
                }
            }

            Opcode::IntToFloat => {
                let v = self.int_reg(op[1], location)?;
                self.set_reg(op[0], Value::Float(v as f64));
            }
            Opcode::IntToBool => {
                let v = self.int_reg(op[1], location)?;
                self.set_reg(op[0], Value::Bool(v != 0));
            }
            Opcode::IntToString => {
                let v = self.int_reg(op[1], location)?;
                self.set_reg(op[0], Value::String(v.to_string()));
            }
            Opcode::FloatToInt => {
                let v = self.float_reg(op[1], location)?;
                self.set_reg(op[0], Value::Int(v as i64));
            }
            Opcode::FloatToBool => {
                let v = self.float_reg(op[1], location)?;
                self.set_reg(op[0], Value::Bool(v != 0.0));
            }
            Opcode::FloatToString => {
                let v = self.float_reg(op[1], location)?;
                self.set_reg(op[0], Value::String(Value::Float(v).to_string()));
            }
            Opcode::BoolToInt => {
                let v = self.bool_reg(op[1], location)?;
                self.set_reg(op[0], Value::Int(i64::from(v)));
            }
            Opcode::BoolToFloat => {
                let v = self.bool_reg(op[1], location)?;
                self.set_reg(op[0], Value::Float(f64::from(v)));
            }
            Opcode::BoolToString => {
                let v = self.bool_reg(op[1], location)?;
                self.set_reg(op[0], Value::String(v.to_string()));
            }
            Opcode::ListToBool => {
                let v = self.list_reg(op[1], location)?;
                self.set_reg(op[0], Value::Bool(!v.is_empty()));
            }
            Opcode::ListToString => {
                let v = self.list_reg(op[1], location)?;
                self.set_reg(op[0], Value::String(Value::List(v).to_string()));
            }
            Opcode::ListToInt => {
                let v = self.list_reg(op[1], location)?;
                self.set_reg(op[0], Value::Int(v.len() as i64));
            }
            Opcode::DictToBool => {
                let v = self.dict_reg(op[1], location)?;
                self.set_reg(op[0], Value::Bool(!v.is_empty()));
            }
            Opcode::DictToString => {
                let v = self.dict_reg(op[1], location)?;
                self.set_reg(op[0], Value::String(Value::Dict(v).to_string()));
            }
            Opcode::DictToInt => {
                let v = self.dict_reg(op[1], location)?;
                self.set_reg(op[0], Value::Int(v.len() as i64));
            }
            Opcode::StringToBool => {
                let v = self.string_reg(op[1], location)?;
                self.set_reg(op[0], Value::Bool(!v.is_empty()));
            }
            Opcode::StringToInt => {
                let s = self.string_reg(op[1], location)?;
                let parsed = s
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| RuntimeError::value_error(format!("cannot cast '{s}' to int")).at(location))?;
                self.set_reg(op[0], Value::Int(parsed));
            }

            Opcode::NotBool => {
                let v = self.bool_reg(op[1], location)?;
                self.set_reg(op[0], Value::Bool(!v));
            }
            Opcode::PlusInt => {
                let v = self.int_reg(op[1], location)?;
                self.set_reg(op[0], Value::Int(v));
            }
            Opcode::MinusInt => {
                let v = self.int_reg(op[1], location)?;
                self.set_reg(op[0], Value::Int(-v));
            }
            Opcode::PlusFloat => {
                let v = self.float_reg(op[1], location)?;
                self.set_reg(op[0], Value::Float(v));
            }
            Opcode::MinusFloat => {
                let v = self.float_reg(op[1], location)?;
                self.set_reg(op[0], Value::Float(-v));
            }
            Opcode::PlusBool => {
                let v = i64::from(self.bool_reg(op[1], location)?);
                self.set_reg(op[0], Value::Int(v));
            }
            Opcode::MinusBool => {
                let v = i64::from(self.bool_reg(op[1], location)?);
                self.set_reg(op[0], Value::Int(-v));
            }

            Opcode::AddInt => self.binary_int(op, i64::checked_add, location)?,
            Opcode::SubInt => self.binary_int(op, i64::checked_sub, location)?,
            Opcode::MulInt => self.binary_int(op, i64::checked_mul, location)?,
            Opcode::AddFloat => self.binary_float(op, |a, b| a + b, location)?,
            Opcode::SubFloat => self.binary_float(op, |a, b| a - b, location)?,
            Opcode::MulFloat => self.binary_float(op, |a, b| a * b, location)?,
            Opcode::AddBool => {
                let a = i64::from(self.bool_reg(op[1], location)?);
                let b = i64::from(self.bool_reg(op[2], location)?);
                self.set_reg(op[0], Value::Int(a + b));
            }
            Opcode::SubBool => {
                let a = i64::from(self.bool_reg(op[1], location)?);
                let b = i64::from(self.bool_reg(op[2], location)?);
                self.set_reg(op[0], Value::Int(a - b));
            }
            Opcode::MulBool => {
                let a = i64::from(self.bool_reg(op[1], location)?);
                let b = i64::from(self.bool_reg(op[2], location)?);
                self.set_reg(op[0], Value::Int(a * b));
            }
            Opcode::AddString => {
                let a = self.string_reg(op[1], location)?;
                let b = self.string_reg(op[2], location)?;
                self.set_reg(op[0], Value::String(a + &b));
            }
            Opcode::AddList => {
                let mut a = self.list_reg(op[1], location)?;
                let b = self.list_reg(op[2], location)?;
                a.extend(b);
                self.set_reg(op[0], Value::List(a));
            }
            Opcode::AddDict => {
                let mut a = self.dict_reg(op[1], location)?;
                let b = self.dict_reg(op[2], location)?;
                for (k, v) in b.iter() {
                    a.insert(k.to_string(), v.clone());
                }
                self.set_reg(op[0], Value::Dict(a));
            }
            Opcode::MulIntString => {
                let n = self.int_reg(op[1], location)?;
                let s = self.string_reg(op[2], location)?;
                self.set_reg(op[0], Value::String(s.repeat(n.max(0) as usize)));
            }
            Opcode::MulStringInt => {
                let s = self.string_reg(op[1], location)?;
                let n = self.int_reg(op[2], location)?;
                self.set_reg(op[0], Value::String(s.repeat(n.max(0) as usize)));
            }
            Opcode::MulIntList => {
                let n = self.int_reg(op[1], location)?;
                let list = self.list_reg(op[2], location)?;
                self.set_reg(op[0], Value::List(Self::repeat_list(&list, n)));
            }
            Opcode::MulListInt => {
                let list = self.list_reg(op[1], location)?;
                let n = self.int_reg(op[2], location)?;
                self.set_reg(op[0], Value::List(Self::repeat_list(&list, n)));
            }
            Opcode::DivIntInt => {
                let a = self.int_reg(op[1], location)?;
                let b = self.int_reg(op[2], location)?;
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero.at(location));
                }
                self.set_reg(op[0], Value::Float(a as f64 / b as f64));
            }
            Opcode::DivFloatFloat => {
                let a = self.float_reg(op[1], location)?;
                let b = self.float_reg(op[2], location)?;
                if b == 0.0 {
                    return Err(RuntimeError::DivisionByZero.at(location));
                }
                self.set_reg(op[0], Value::Float(a / b));
            }
            Opcode::DivStringInt => {
                let s = self.string_reg(op[1], location)?;
                let n = self.int_reg(op[2], location)?;
                if n == 0 {
                    return Err(RuntimeError::DivisionByZero.at(location));
                }
                let chars: Vec<char> = s.chars().collect();
                let parts = Self::partition(&chars, n.unsigned_abs() as usize)
                    .into_iter()
                    .map(|chunk| Value::String(chunk.into_iter().collect()))
                    .collect();
                self.set_reg(op[0], Value::List(parts));
            }
            Opcode::DivListInt => {
                let list = self.list_reg(op[1], location)?;
                let n = self.int_reg(op[2], location)?;
                if n == 0 {
                    return Err(RuntimeError::DivisionByZero.at(location));
                }
                let parts = Self::partition(&list, n.unsigned_abs() as usize)
                    .into_iter()
                    .map(Value::List)
                    .collect();
                self.set_reg(op[0], Value::List(parts));
            }

            Opcode::EqInt | Opcode::NotEqInt => {
                let eq = self.int_reg(op[1], location)? == self.int_reg(op[2], location)?;
                self.set_reg(op[0], Value::Bool(eq != (instr.opcode == Opcode::NotEqInt)));
            }
            Opcode::EqFloat | Opcode::NotEqFloat => {
                let eq = (self.float_reg(op[1], location)? - self.float_reg(op[2], location)?).abs() < f64::EPSILON;
                self.set_reg(op[0], Value::Bool(eq != (instr.opcode == Opcode::NotEqFloat)));
            }
            Opcode::EqString | Opcode::NotEqString => {
                let eq = self.string_reg(op[1], location)? == self.string_reg(op[2], location)?;
                self.set_reg(op[0], Value::Bool(eq != (instr.opcode == Opcode::NotEqString)));
            }
            Opcode::EqBool | Opcode::NotEqBool => {
                let eq = self.bool_reg(op[1], location)? == self.bool_reg(op[2], location)?;
                self.set_reg(op[0], Value::Bool(eq != (instr.opcode == Opcode::NotEqBool)));
            }
            Opcode::EqList | Opcode::NotEqList => {
                let eq = self.list_reg(op[1], location)? == self.list_reg(op[2], location)?;
                self.set_reg(op[0], Value::Bool(eq != (instr.opcode == Opcode::NotEqList)));
            }
            Opcode::EqDict | Opcode::NotEqDict => {
                let eq = self.dict_reg(op[1], location)? == self.dict_reg(op[2], location)?;
                self.set_reg(op[0], Value::Bool(eq != (instr.opcode == Opcode::NotEqDict)));
            }

            Opcode::LtInt => self.compare_int(op, |a, b| a < b, location)?,
            Opcode::LeInt => self.compare_int(op, |a, b| a <= b, location)?,
            Opcode::GtInt => self.compare_int(op, |a, b| a > b, location)?,
            Opcode::GeInt => self.compare_int(op, |a, b| a >= b, location)?,
            Opcode::LtFloat => self.compare_float(op, |a, b| a < b, location)?,
            Opcode::LeFloat => self.compare_float(op, |a, b| a <= b, location)?,
            Opcode::GtFloat => self.compare_float(op, |a, b| a > b, location)?,
            Opcode::GeFloat => self.compare_float(op, |a, b| a >= b, location)?,
            Opcode::LtString => self.compare_string(op, |a, b| a < b, location)?,
            Opcode::LeString => self.compare_string(op, |a, b| a <= b, location)?,
            Opcode::GtString => self.compare_string(op, |a, b| a > b, location)?,
            Opcode::GeString => self.compare_string(op, |a, b| a >= b, location)?,
            Opcode::LtBool => self.compare_bool(op, |a, b| a < b, location)?,
            Opcode::LeBool => self.compare_bool(op, |a, b| a <= b, location)?,
            Opcode::GtBool => self.compare_bool(op, |a, b| a > b, location)?,
            Opcode::GeBool => self.compare_bool(op, |a, b| a >= b, location)?,

            Opcode::StringSlice => {
                let s = self.string_reg(op[1], location)?;
                let chars: Vec<char> = s.chars().collect();
                let (start, end) = self.slice_bounds(op[2], op[3], chars.len() as i64, location)?;
                let step = self.int_reg(op[4], location)?;
                let picked = Self::strided_slice(&chars, start, end, step, location)?;
                self.set_reg(op[0], Value::String(picked.into_iter().collect()));
            }
            Opcode::ListSlice => {
                let list = self.list_reg(op[1], location)?;
                let (start, end) = self.slice_bounds(op[2], op[3], list.len() as i64, location)?;
                let step = self.int_reg(op[4], location)?;
                let picked = Self::strided_slice(&list, start, end, step, location)?;
                self.set_reg(op[0], Value::List(picked));
            }
            Opcode::RangeExclusive => {
                let start = self.int_reg(op[1], location)?;
                let end = self.int_reg(op[2], location)?;
                self.set_reg(op[0], Value::List((start..end).map(Value::Int).collect()));
            }
            Opcode::RangeInclusive => {
                let start = self.int_reg(op[1], location)?;
                let end = self.int_reg(op[2], location)?;
                self.set_reg(op[0], Value::List((start..=end).map(Value::Int).collect()));
            }

            Opcode::And => {
                let v = self.bool_reg(op[1], location)? && self.bool_reg(op[2], location)?;
                self.set_reg(op[0], Value::Bool(v));
            }
            Opcode::Or => {
                let v = self.bool_reg(op[1], location)? || self.bool_reg(op[2], location)?;
                self.set_reg(op[0], Value::Bool(v));
            }

            Opcode::Print => {
                let v = self.reg(op[0]);
                println!("{v}");
            }
            Opcode::PrintConst => {
                let v = self.program.memory(self.region).constants[op[0] as usize].clone();
                println!("{v}");
            }
            Opcode::Exit => return Ok(Control::Halt),
        }
        Ok(Control::Advance)
    }

    fn type_mismatch(&self, expected: &str, found: &Value, location: SourceSpan) -> Fault {
        RuntimeError::type_error(expected, found.type_name(), "operand has the wrong type").at(location)
    }

    fn int_reg(&mut self, index: i64, location: SourceSpan) -> VmResult<i64> {
        match self.reg(index) {
            Value::Int(v) => Ok(v),
            other => Err(self.type_mismatch("int", &other, location)),
        }
    }

    fn float_reg(&mut self, index: i64, location: SourceSpan) -> VmResult<f64> {
        match self.reg(index) {
            Value::Float(v) => Ok(v),
            other => Err(self.type_mismatch("float", &other, location)),
        }
    }

    fn bool_reg(&mut self, index: i64, location: SourceSpan) -> VmResult<bool> {
        match self.reg(index) {
            Value::Bool(v) => Ok(v),
            other => Err(self.type_mismatch("bool", &other, location)),
        }
    }

    fn string_reg(&mut self, index: i64, location: SourceSpan) -> VmResult<String> {
        match self.reg(index) {
            Value::String(v) => Ok(v),
            other => Err(self.type_mismatch("string", &other, location)),
        }
    }

    fn list_reg(&mut self, index: i64, location: SourceSpan) -> VmResult<Vec<Value>> {
        match self.reg(index) {
            Value::List(v) => Ok(v),
            other => Err(self.type_mismatch("list", &other, location)),
        }
    }

    fn dict_reg(&mut self, index: i64, location: SourceSpan) -> VmResult<Dict> {
        match self.reg(index) {
            Value::Dict(v) => Ok(v),
            other => Err(self.type_mismatch("dict", &other, location)),
        }
    }

    fn slice_bounds(
        &mut self,
        start_op: i64,
        end_op: i64,
        len: i64,
        location: SourceSpan,
    ) -> VmResult<(usize, usize)> {
        let start = self.int_reg(start_op, location)?.clamp(0, len);
        let end = self.int_reg(end_op, location)?.clamp(0, len).max(start);
        Ok((start as usize, end as usize))
    }

    /// Picks elements of `items[start..end]` every `step` positions. A
    /// negative step walks the range backward, starting from `end - 1`.
    fn strided_slice<T: Clone>(
        items: &[T],
        start: usize,
        end: usize,
        step: i64,
        location: SourceSpan,
    ) -> VmResult<Vec<T>> {
        if step == 0 {
            return Err(RuntimeError::value_error("slice step cannot be zero").at(location));
        }
        let span = &items[start..end];
        if step > 0 {
            Ok(span.iter().step_by(step as usize).cloned().collect())
        } else {
            Ok(span.iter().rev().step_by((-step) as usize).cloned().collect())
        }
    }

    fn repeat_list(items: &[Value], times: i64) -> Vec<Value> {
        let mut result = Vec::with_capacity(items.len() * times.max(0) as usize);
        for _ in 0..times.max(0) {
            result.extend(items.iter().cloned());
        }
        result
    }

    /// Splits `items` into `parts` chunks of as-even-as-possible size: the
    /// first `items.len() % parts` chunks get one extra element. `parts == 0`
    /// yields no chunks at all rather than dividing by zero.
    fn partition<T: Clone>(items: &[T], parts: usize) -> Vec<Vec<T>> {
        if parts == 0 {
            return Vec::new();
        }
        let base = items.len() / parts;
        let remainder = items.len() % parts;
        let mut chunks = Vec::with_capacity(parts);
        let mut offset = 0;
        for i in 0..parts {
            let size = base + usize::from(i < remainder);
            chunks.push(items[offset..offset + size].to_vec());
            offset += size;
        }
        chunks
    }

    fn index_into<T: Clone>(items: &[T], index: i64) -> Option<T> {
        let pos = Self::normalize_index(index, items.len() as i64)?;
        items.get(pos).cloned()
    }

    fn normalize_index(index: i64, len: i64) -> Option<usize> {
        let actual = if index < 0 { index + len } else { index };
        if actual < 0 || actual >= len {
            None
        } else {
            Some(actual as usize)
        }
    }

    fn binary_int(&mut self, op: Operands, f: impl Fn(i64, i64) -> Option<i64>, location: SourceSpan) -> VmResult<()> {
        let a = self.int_reg(op[1], location)?;
        let b = self.int_reg(op[2], location)?;
        let result = f(a, b).ok_or_else(|| RuntimeError::value_error("integer overflow").at(location))?;
        self.set_reg(op[0], Value::Int(result));
        Ok(())
    }

    fn binary_float(&mut self, op: Operands, f: impl Fn(f64, f64) -> f64, location: SourceSpan) -> VmResult<()> {
        let a = self.float_reg(op[1], location)?;
        let b = self.float_reg(op[2], location)?;
        self.set_reg(op[0], Value::Float(f(a, b)));
        Ok(())
    }

    fn compare_int(&mut self, op: Operands, f: impl Fn(i64, i64) -> bool, location: SourceSpan) -> VmResult<()> {
        let a = self.int_reg(op[1], location)?;
        let b = self.int_reg(op[2], location)?;
        self.set_reg(op[0], Value::Bool(f(a, b)));
        Ok(())
    }

    fn compare_float(&mut self, op: Operands, f: impl Fn(f64, f64) -> bool, location: SourceSpan) -> VmResult<()> {
        let a = self.float_reg(op[1], location)?;
        let b = self.float_reg(op[2], location)?;
        self.set_reg(op[0], Value::Bool(f(a, b)));
        Ok(())
    }

    fn compare_string(&mut self, op: Operands, f: impl Fn(&str, &str) -> bool, location: SourceSpan) -> VmResult<()> {
        let a = self.string_reg(op[1], location)?;
        let b = self.string_reg(op[2], location)?;
        self.set_reg(op[0], Value::Bool(f(&a, &b)));
        Ok(())
    }

    fn compare_bool(&mut self, op: Operands, f: impl Fn(bool, bool) -> bool, location: SourceSpan) -> VmResult<()> {
        let a = self.bool_reg(op[1], location)?;
        let b = self.bool_reg(op[2], location)?;
        self.set_reg(op[0], Value::Bool(f(a, b)));
        Ok(())
    }
}

/// Where the dispatch loop goes after executing one instruction.
enum Control {
    Advance,
    Jump(usize),
    Halt,
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use vesper_source::types::SourceSpan;

    use super::*;
    use crate::program::Memory;

    fn instr(opcode: Opcode, operands: &[i64]) -> Instruction {
        let mut slots = [0i64; MAX_OPERANDS];
        slots[..operands.len()].copy_from_slice(operands);
        Instruction::new(opcode, slots)
    }

    #[test]
    fn runs_simple_arithmetic_and_prints() {
        let mut memory = Memory::new();
        let c0 = memory.intern(Value::Int(2));
        let c1 = memory.intern(Value::Int(3));
        let _ = memory.emit(instr(Opcode::LoadConst, &[0, c0 as i64]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::LoadConst, &[1, c1 as i64]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::AddInt, &[2, 0, 1]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::Print, &[2]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::Exit, &[]), SourceSpan::default());

        let mut program = Program::new();
        program.program = memory;
        program.entry_frame_size = 3;

        let mut vm = VirtualMachine::new(program);
        vm.run().unwrap();
    }

    #[test]
    fn division_by_zero_is_a_fault() {
        let mut memory = Memory::new();
        let c0 = memory.intern(Value::Int(1));
        let c1 = memory.intern(Value::Int(0));
        let _ = memory.emit(instr(Opcode::LoadConst, &[0, c0 as i64]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::LoadConst, &[1, c1 as i64]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::DivIntInt, &[2, 0, 1]), SourceSpan::default());

        let mut program = Program::new();
        program.program = memory;
        program.entry_frame_size = 3;

        let mut vm = VirtualMachine::new(program);
        let err = vm.run().unwrap_err();
        assert!(matches!(err.error, RuntimeError::DivisionByZero));
    }

    #[test]
    fn div_int_int_produces_a_float_not_a_euclidean_quotient() {
        let mut memory = Memory::new();
        let c0 = memory.intern(Value::Int(1));
        let c1 = memory.intern(Value::Int(2));
        let _ = memory.emit(instr(Opcode::LoadConst, &[0, c0 as i64]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::LoadConst, &[1, c1 as i64]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::DivIntInt, &[2, 0, 1]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::SetGlobal, &[0, 2]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::Exit, &[]), SourceSpan::default());

        let mut program = Program::new();
        program.program = memory;
        program.entry_frame_size = 3;
        program.globals = vec![Value::None];

        let mut vm = VirtualMachine::new(program);
        vm.run().unwrap();
        assert_eq!(vm.globals[0], Value::Float(0.5));
    }

    #[test]
    fn div_string_int_splits_into_n_roughly_equal_chunks() {
        let mut memory = Memory::new();
        let c0 = memory.intern(Value::String("hello!".into()));
        let c1 = memory.intern(Value::Int(4));
        let _ = memory.emit(instr(Opcode::LoadConst, &[0, c0 as i64]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::LoadConst, &[1, c1 as i64]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::DivStringInt, &[2, 0, 1]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::SetGlobal, &[0, 2]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::Exit, &[]), SourceSpan::default());

        let mut program = Program::new();
        program.program = memory;
        program.entry_frame_size = 3;
        program.globals = vec![Value::None];

        let mut vm = VirtualMachine::new(program);
        vm.run().unwrap();
        assert_eq!(
            vm.globals[0],
            Value::List(vec![
                Value::String("he".into()),
                Value::String("ll".into()),
                Value::String("o".into()),
                Value::String("!".into()),
            ])
        );
    }

    #[test]
    fn div_list_int_splits_into_n_sublists() {
        let mut memory = Memory::new();
        let c0 = memory.intern(Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));
        let c1 = memory.intern(Value::Int(2));
        let _ = memory.emit(instr(Opcode::LoadConst, &[0, c0 as i64]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::LoadConst, &[1, c1 as i64]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::DivListInt, &[2, 0, 1]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::SetGlobal, &[0, 2]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::Exit, &[]), SourceSpan::default());

        let mut program = Program::new();
        program.program = memory;
        program.entry_frame_size = 3;
        program.globals = vec![Value::None];

        let mut vm = VirtualMachine::new(program);
        vm.run().unwrap();
        assert_eq!(
            vm.globals[0],
            Value::List(vec![
                Value::List(vec![Value::Int(1), Value::Int(2)]),
                Value::List(vec![Value::Int(3)]),
            ])
        );
    }

    #[test]
    fn dict_key_at_reads_keys_by_insertion_position() {
        let mut dict = Dict::new();
        dict.insert("b".into(), Value::Int(2));
        dict.insert("a".into(), Value::Int(1));

        let mut memory = Memory::new();
        let c0 = memory.intern(Value::Dict(dict));
        let c1 = memory.intern(Value::Int(1));
        let _ = memory.emit(instr(Opcode::LoadConst, &[0, c0 as i64]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::LoadConst, &[1, c1 as i64]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::DictKeyAt, &[2, 0, 1]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::SetGlobal, &[0, 2]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::Exit, &[]), SourceSpan::default());

        let mut program = Program::new();
        program.program = memory;
        program.entry_frame_size = 3;
        program.globals = vec![Value::None];

        let mut vm = VirtualMachine::new(program);
        vm.run().unwrap();
        assert_eq!(vm.globals[0], Value::String("a".into()));
    }

    #[test]
    fn string_len_counts_characters_not_bytes() {
        let mut memory = Memory::new();
        let c0 = memory.intern(Value::String("héllo".into()));
        let _ = memory.emit(instr(Opcode::LoadConst, &[0, c0 as i64]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::StringLen, &[1, 0]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::SetGlobal, &[0, 1]), SourceSpan::default());
        let _ = memory.emit(instr(Opcode::Exit, &[]), SourceSpan::default());

        let mut program = Program::new();
        program.program = memory;
        program.entry_frame_size = 2;
        program.globals = vec![Value::None];

        let mut vm = VirtualMachine::new(program);
        vm.run().unwrap();
        assert_eq!(vm.globals[0], Value::Int(5));
    }

    #[test]
    fn call_copies_args_and_returns_value() {
        let mut functions = Memory::new();
        let _ = functions.emit(instr(Opcode::AddInt, &[1, 0, 0]), SourceSpan::default());
        let _ = functions.emit(instr(Opcode::Return, &[1]), SourceSpan::default());

        let mut program = Program::new();
        let fun = Value::Fun(crate::value::Fun {
            entry_offset: 0,
            region: Region::Functions,
            register_frame_size: 2,
            arity: 1,
        });
        let fun_const = program.program.intern(fun);
        let five = program.program.intern(Value::Int(5));
        let _ = program.program.emit(instr(Opcode::LoadConst, &[0, fun_const as i64]), SourceSpan::default());
        let _ = program.program.emit(instr(Opcode::LoadConst, &[1, five as i64]), SourceSpan::default());
        let _ = program.program.emit(instr(Opcode::Call, &[0, 1, 1, 2]), SourceSpan::default());
        let _ = program.program.emit(instr(Opcode::Print, &[2]), SourceSpan::default());
        program.functions = functions;
        program.entry_frame_size = 3;

        let mut vm = VirtualMachine::new(program);
        vm.run().unwrap();
    }

    proptest! {
        /// `AddInt` must agree with checked integer addition's own
        /// commutativity regardless of operand order — a stand-in for the
        /// "universally-quantified invariants" a well-typed expression tree
        /// should hold after evaluation.
        #[test]
        fn add_int_is_commutative(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
            let mut memory = Memory::new();
            let c0 = memory.intern(Value::Int(a));
            let c1 = memory.intern(Value::Int(b));
            let _ = memory.emit(instr(Opcode::LoadConst, &[0, c0 as i64]), SourceSpan::default());
            let _ = memory.emit(instr(Opcode::LoadConst, &[1, c1 as i64]), SourceSpan::default());
            let _ = memory.emit(instr(Opcode::AddInt, &[2, 0, 1]), SourceSpan::default());
            let _ = memory.emit(instr(Opcode::AddInt, &[3, 1, 0]), SourceSpan::default());
            let _ = memory.emit(instr(Opcode::SetGlobal, &[0, 2]), SourceSpan::default());
            let _ = memory.emit(instr(Opcode::SetGlobal, &[1, 3]), SourceSpan::default());
            let _ = memory.emit(instr(Opcode::Exit, &[]), SourceSpan::default());

            let mut program = Program::new();
            program.program = memory;
            program.entry_frame_size = 4;
            program.globals = vec![Value::None, Value::None];

            let mut vm = VirtualMachine::new(program);
            vm.run().unwrap();
            prop_assert_eq!(&vm.globals[0], &vm.globals[1]);
        }
    }

    #[test]
    fn value_display_snapshot() {
        let mut dict = crate::value::Dict::new();
        dict.insert("count".into(), Value::Int(3));
        dict.insert("items".into(), Value::List(vec![Value::String("a".into()), Value::String("b".into())]));
        insta::assert_snapshot!(Value::Dict(dict).to_string(), @r#"{"count": 3, "items": [a, b]}"#);
    }
}
