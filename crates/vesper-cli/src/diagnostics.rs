// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The Vesper Project
// SPDX-FileName: crates/vesper-cli/src/diagnostics.rs
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
//! The language's own user-facing error channel, kept separate from the
//! `log` records the rest of the toolchain emits.
//!
//! Every stage's error type carries a byte-offset [`Span`] rather than a
//! line/column pair, so a [`Diagnostic`] is only ever produced here, at the
//! boundary, once the entry file's [`SourceFile`] is available to resolve
//! the offset into a [`Position`].

use std::fmt;

use vesper_source::types::{SourceFile, SourceSpan, Span};

/// One `(file, line, column, message)` entry.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}: {}", self.file, self.line, self.column, self.message)
    }
}

impl Diagnostic {
    #[must_use]
    pub fn from_span(file: &SourceFile, span: Span, message: impl Into<String>) -> Self {
        let position = file.position_from_offset(span.start);
        Self { file: file.name.clone(), line: position.line, column: position.column, message: message.into() }
    }

    #[must_use]
    pub fn from_source_span(location: SourceSpan, file_name: &str, message: impl Into<String>) -> Self {
        Self { file: file_name.to_string(), line: location.start.line, column: location.start.column, message: message.into() }
    }
}

/// An append-only collection of diagnostics, drained to standard error in
/// insertion order on the first non-zero exit.
#[derive(Debug, Default)]
pub struct DiagnosticSink(Vec<Diagnostic>);

impl DiagnosticSink {
    #[must_use]
    pub fn new() -> Self { Self(Vec::new()) }

    pub fn push(&mut self, diagnostic: Diagnostic) { self.0.push(diagnostic); }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn drain_to_stderr(&self) {
        for diagnostic in &self.0 {
            eprintln!("{diagnostic}");
        }
    }
}
