// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The Vesper Project
// SPDX-FileName: crates/vesper-runtime/src/opcode.rs
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
//! The opcode vocabulary: the single source of truth the compiler's emitter
//! and the disassembler both read from, so they can never drift silently out
//! of sync within one build.
//!
//! Monomorphized cast/unary/binary opcode names mirror the operator-variant
//! names `vesper-analyzer`'s tables produce one-for-one (e.g. `AddInt`
//! corresponds to `BinaryVariant::AddInt`); the compiler is the place that
//! bridges a variant to its opcode, since this crate does not depend on the
//! analyzer.

use std::fmt;

/// The maximum number of operand slots any single instruction uses.
pub const MAX_OPERANDS: usize = 5;

/// The kind of value a single operand slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// A register index within the current frame.
    Register,
    /// An index into the current memory region's constant pool.
    Constant,
    /// An index into the global register file.
    Global,
    /// A literal value used directly (jump offsets, object field counts).
    Literal,
    /// An index into a class's field layout.
    Property,
}

macro_rules! opcodes {
    ($($variant:ident => [$($operand:ident),*]),* $(,)?) => {
        /// One bytecode operation. The operand *kinds* (not values) are
        /// fixed per opcode and recorded in [`Opcode::operands`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Opcode {
            $($variant,)*
        }

        impl Opcode {
            /// The ordered operand-kind shape this opcode's instructions carry.
            #[must_use]
            pub const fn operands(self) -> &'static [OperandKind] {
                match self {
                    $(Self::$variant => &[$(OperandKind::$operand),*],)*
                }
            }

            /// The disassembler mnemonic, matching the opcode's variant name.
            #[must_use]
            pub const fn mnemonic(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)*
                }
            }
        }

        impl fmt::Display for Opcode {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.mnemonic()) }
        }
    };
}

opcodes! {
    // Movement
    Move => [Register, Register],
    LoadConst => [Register, Constant],
    LoadGlobal => [Register, Global],
    SetGlobal => [Global, Register],

    // Containers
    NewList => [Register],
    NewDict => [Register],
    ListPush => [Register, Register],
    ListPop => [Register, Register],
    ListGet => [Register, Register, Register],
    ListSet => [Register, Register, Register],
    ListDelete => [Register, Register],
    DictGet => [Register, Register, Register],
    DictSet => [Register, Register, Register],
    DictDelete => [Register, Register],
    /// Reads the key at insertion-order position `RZ` of dict `RY` into `RX`
    /// — the by-position counterpart to `DictGet`'s by-key lookup, used to
    /// walk a dict's entries in order.
    DictKeyAt => [Register, Register, Register],
    StringGet => [Register, Register, Register],
    StringSet => [Register, Register, Register],
    StringDelete => [Register, Register],
    /// Character count of string `RY` into `RX`. Distinct from `StringToInt`,
    /// which parses the string's text as a number.
    StringLen => [Register, Register],

    // Objects
    NewObject => [Register, Constant, Register],
    GetProperty => [Register, Register, Property],
    SetProperty => [Register, Property, Register],

    // Control. Call's operands are (callee, first argument register,
    // argument count, destination register for the return value).
    Call => [Register, Register, Literal, Register],
    Return => [Register],
    ForwardJump => [Literal],
    BackwardJump => [Literal],
    CondForwardJump => [Literal, Register],
    CondBackwardJump => [Literal, Register],

    // Casts
    IntToFloat => [Register, Register],
    IntToBool => [Register, Register],
    IntToString => [Register, Register],
    FloatToInt => [Register, Register],
    FloatToBool => [Register, Register],
    FloatToString => [Register, Register],
    BoolToInt => [Register, Register],
    BoolToFloat => [Register, Register],
    BoolToString => [Register, Register],
    ListToBool => [Register, Register],
    ListToString => [Register, Register],
    ListToInt => [Register, Register],
    DictToBool => [Register, Register],
    DictToString => [Register, Register],
    DictToInt => [Register, Register],
    StringToBool => [Register, Register],
    StringToInt => [Register, Register],

    // Unary
    NotBool => [Register, Register],
    PlusInt => [Register, Register],
    PlusFloat => [Register, Register],
    PlusBool => [Register, Register],
    MinusInt => [Register, Register],
    MinusFloat => [Register, Register],
    MinusBool => [Register, Register],

    // Binary: addition
    AddInt => [Register, Register, Register],
    AddFloat => [Register, Register, Register],
    AddString => [Register, Register, Register],
    AddBool => [Register, Register, Register],
    AddList => [Register, Register, Register],
    AddDict => [Register, Register, Register],
    // Binary: subtraction
    SubInt => [Register, Register, Register],
    SubFloat => [Register, Register, Register],
    SubBool => [Register, Register, Register],
    // Binary: multiplication
    MulInt => [Register, Register, Register],
    MulFloat => [Register, Register, Register],
    MulBool => [Register, Register, Register],
    MulIntString => [Register, Register, Register],
    MulStringInt => [Register, Register, Register],
    MulIntList => [Register, Register, Register],
    MulListInt => [Register, Register, Register],
    // Binary: division
    DivIntInt => [Register, Register, Register],
    DivFloatFloat => [Register, Register, Register],
    DivStringInt => [Register, Register, Register],
    DivListInt => [Register, Register, Register],
    // Binary: equality
    EqInt => [Register, Register, Register],
    EqFloat => [Register, Register, Register],
    EqString => [Register, Register, Register],
    EqBool => [Register, Register, Register],
    EqList => [Register, Register, Register],
    EqDict => [Register, Register, Register],
    NotEqInt => [Register, Register, Register],
    NotEqFloat => [Register, Register, Register],
    NotEqString => [Register, Register, Register],
    NotEqBool => [Register, Register, Register],
    NotEqList => [Register, Register, Register],
    NotEqDict => [Register, Register, Register],
    // Binary: relational
    LtInt => [Register, Register, Register],
    LtFloat => [Register, Register, Register],
    LtString => [Register, Register, Register],
    LtBool => [Register, Register, Register],
    LeInt => [Register, Register, Register],
    LeFloat => [Register, Register, Register],
    LeString => [Register, Register, Register],
    LeBool => [Register, Register, Register],
    GtInt => [Register, Register, Register],
    GtFloat => [Register, Register, Register],
    GtString => [Register, Register, Register],
    GtBool => [Register, Register, Register],
    GeInt => [Register, Register, Register],
    GeFloat => [Register, Register, Register],
    GeString => [Register, Register, Register],
    GeBool => [Register, Register, Register],

    // Slicing / ranges
    StringSlice => [Register, Register, Register, Register, Register],
    ListSlice => [Register, Register, Register, Register, Register],
    RangeExclusive => [Register, Register, Register],
    RangeInclusive => [Register, Register, Register],

    // Logical
    And => [Register, Register, Register],
    Or => [Register, Register, Register],

    // Utility
    Print => [Register],
    PrintConst => [Constant],
    Exit => [],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonic_matches_variant_name() {
        assert_eq!(Opcode::AddInt.mnemonic(), "AddInt");
        assert_eq!(Opcode::Exit.operands(), &[]);
        assert_eq!(Opcode::AddInt.operands().len(), 3);
    }
}
