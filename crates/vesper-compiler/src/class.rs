// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The Vesper Project
// SPDX-FileName: crates/vesper-compiler/src/class.rs
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
//! Class layout: what `Object` construction needs baked in at each call site.
//!
//! A class has no runtime representation of its own — an instance is a
//! `Value::Dict` keyed by field name, and a method is just a `Value::Fun`
//! stored under its name the same way a field value is. Method bodies are
//! checked by the analyzer exactly like free functions (`code.rs`'s `Class`
//! arm calls `check_statement` with no injected receiver binding), so there
//! is no implicit `self`: a method that needs to read the instance it was
//! called on must take it as an explicit parameter, the same as any other
//! value. Compiling a method is therefore identical to compiling a top-level
//! function; what's class-specific is only the grouping below.

use vesper_ast::ast::AST;
use vesper_ast::nodes::{AnyNode, ClassDecl, NodeID};
use vesper_runtime::Value;

/// One class's compiled shape: its declared field names (for disassembly and
/// for `Object` argument-to-field matching) and its methods, already
/// compiled into the classes region as `Value::Fun` constants ready to be
/// baked into a `SetProperty` sequence at every `Object` construction site.
#[derive(Debug, Clone, Default)]
pub struct ClassLayout {
    pub fields: Vec<String>,
    pub methods: Vec<(String, Value)>,
}

/// Splits a class body into its field declarations and method declarations,
/// in the AST's source order — `ClassDecl.body` is the only ordered view of
/// a class's members; `Block::variables()`/`classes()` are `FxHashMap`-backed
/// and would scramble emission order across compiler runs.
pub fn split_members(ast: &AST, class: &ClassDecl) -> (Vec<NodeID>, Vec<NodeID>) {
    let mut fields = Vec::new();
    let mut methods = Vec::new();
    for &member_id in &class.body {
        match ast.get_node(member_id).map(|n| &n.data) {
            Some(AnyNode::Declaration(_)) => fields.push(member_id),
            Some(AnyNode::Function(_)) => methods.push(member_id),
            _ => {}
        }
    }
    (fields, methods)
}

/// Field names only, in declaration order — used at `Object` construction to
/// emit each constructor argument against the class's layout.
pub fn field_names(ast: &AST, class: &ClassDecl) -> Vec<String> {
    let (fields, _) = split_members(ast, class);
    fields
        .into_iter()
        .filter_map(|id| ast.get_as::<vesper_ast::nodes::DeclarationStmt>(id).ok())
        .map(|decl| decl.name.clone())
        .collect()
}
