// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The Vesper Project
// SPDX-FileName: crates/vesper-compiler/src/scope.rs
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
//! The compiler's own binding table.
//!
//! `BlockTable::node_to_block` is never populated by either analysis pass
//! (see `vesper_analyzer::symbol::BlockTable`), so the compiler can't ask
//! "what scope did this name resolve in" — it re-derives the same answer by
//! walking the AST in exactly the order the code pass did, entering and
//! exiting a child scope at the same `if`/`while`/`for`/function bodies the
//! analyzer's `enter_nested` does, and recording `name -> register` instead
//! of `name -> VariableBinding`.
//!
//! One binding table is shared by the whole module: a name bound directly in
//! the top scope is a global (`Program.globals` slot); everything nested
//! inside it is a register in whichever frame is currently being compiled.

use rustc_hash::FxHashMap;

/// Where a resolved name's value lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Global(u16),
    Local(u16),
}

/// A stack of lexical scopes, mirroring `BlockTable`'s push/pop discipline.
/// `scopes[0]` is the module's top scope, whose bindings are globals;
/// everything pushed after it is local to the frame currently compiling.
#[derive(Debug)]
pub struct Scopes {
    scopes: Vec<FxHashMap<String, u16>>,
}

impl Scopes {
    #[must_use]
    pub fn new() -> Self { Self { scopes: vec![FxHashMap::default()] } }

    /// Enters a new, empty nested scope.
    pub fn push(&mut self) { self.scopes.push(FxHashMap::default()); }

    /// Exits the innermost scope, returning the registers it bound so the
    /// caller can free them. The top (module) scope is never popped.
    pub fn pop(&mut self) -> Vec<u16> {
        if self.scopes.len() > 1 {
            self.scopes.pop().map(|scope| scope.into_values().collect()).unwrap_or_default()
        } else {
            Vec::new()
        }
    }

    #[must_use]
    pub fn at_top(&self) -> bool { self.scopes.len() == 1 }

    /// Binds `name` in the innermost scope to `slot`. Shadows an
    /// outer-scope binding of the same name; duplicate-in-block detection
    /// already happened during analysis.
    pub fn bind(&mut self, name: String, slot: u16) {
        let scope = self.scopes.last_mut().expect("Scopes always has a current scope");
        let _ = scope.insert(name, slot);
    }

    /// Resolves `name`, searching from the innermost scope outward. A hit in
    /// `scopes[0]` is a global; anything else is local to the current frame.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<Slot> {
        for (depth, scope) in self.scopes.iter().enumerate().rev() {
            if let Some(&register) = scope.get(name) {
                return Some(if depth == 0 { Slot::Global(register) } else { Slot::Local(register) });
            }
        }
        None
    }
}

impl Default for Scopes {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_scope_bindings_resolve_as_global() {
        let mut scopes = Scopes::new();
        scopes.bind("x".to_string(), 3);
        assert_eq!(scopes.resolve("x"), Some(Slot::Global(3)));
    }

    #[test]
    fn nested_scope_bindings_resolve_as_local_and_shadow() {
        let mut scopes = Scopes::new();
        scopes.bind("x".to_string(), 0);
        scopes.push();
        scopes.bind("x".to_string(), 5);
        assert_eq!(scopes.resolve("x"), Some(Slot::Local(5)));
        let freed = scopes.pop();
        assert_eq!(freed, vec![5]);
        assert_eq!(scopes.resolve("x"), Some(Slot::Global(0)));
    }
}
