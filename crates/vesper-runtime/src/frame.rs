// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The Vesper Project
// SPDX-FileName: crates/vesper-runtime/src/frame.rs
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
//! Call frames: one per active function call, sized to exactly the number
//! of registers its callee needs.

use crate::program::Region;
use crate::value::Value;

/// A single activation record. `registers` is allocated once at call time
/// and never resized — the compiler's register allocator guarantees every
/// register index the callee's code uses is within bounds.
#[derive(Debug, Clone)]
pub struct Frame {
    pub registers: Vec<Value>,
    /// Region and instruction offset to resume at in the caller once this
    /// frame returns.
    pub return_region: Region,
    pub return_address: usize,
    /// Caller's register to receive the return value, if the call's result
    /// is used.
    pub return_register: Option<u16>,
}

impl Frame {
    #[must_use]
    pub fn new(register_count: u16, return_region: Region, return_address: usize, return_register: Option<u16>) -> Self {
        Self {
            registers: vec![Value::None; register_count as usize],
            return_region,
            return_address,
            return_register,
        }
    }

    #[must_use]
    pub fn get(&self, register: u16) -> &Value {
        &self.registers[register as usize]
    }

    pub fn set(&mut self, register: u16, value: Value) {
        self.registers[register as usize] = value;
    }
}
