// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The Vesper Project
// SPDX-FileName: crates/vesper-cli/src/main.rs
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
//! Vesper CLI
//!
//! Drives the full pipeline — lex/parse/resolve, analyze, compile, run —
//! over a single source file, and is the one place in the workspace allowed
//! to turn a `Result` into a process exit code. Library crates never call
//! `std::process::exit`; they return typed errors that flow here.

mod diagnostics;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use log::{debug, info};
use vesper_analyzer::{analyze_module, validate_entry_module};
use vesper_compiler::{compile_module, disassemble};
use vesper_parser::resolver::ModuleCache;
use vesper_source::types::{FileID, SourceFile};

use diagnostics::{Diagnostic, DiagnosticSink};

/// Exit code for command-line misuse (missing path, file not found).
const EXIT_MISUSE: u8 = 64;
/// Exit code for any diagnostic-driven failure (lex/parse/resolve/analyze/
/// compile/runtime error).
const EXIT_FAILURE: u8 = 1;

/// The Vesper programming language compiler and virtual machine.
#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the `.vsp` source file to run.
    path: PathBuf,

    /// Dump the token stream before parsing.
    #[arg(long)]
    tokens: bool,

    /// Dump the parsed AST's top-level nodes before analysis.
    #[arg(long)]
    ast: bool,

    /// Disassemble each compiled memory region before running.
    #[arg(long)]
    opcodes: bool,

    /// Dump the file/line/column map recorded for each emitted instruction.
    #[arg(long)]
    references: bool,

    /// Raise log verbosity one level per repetition.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-fatal diagnostics below error level.
    #[arg(short, long)]
    quiet: bool,

    /// Arguments forwarded to the script's own `main(args: [string])`.
    #[arg(trailing_var_arg = true)]
    script_args: Vec<String>,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(EXIT_MISUSE);
        }
    };

    init_logging(args.verbose, args.quiet);

    match run(&args) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("vesper: {err}");
            ExitCode::from(EXIT_MISUSE)
        }
    }
}

/// Initializes the `log` facade from `RUST_LOG` if set, falling back to a
/// level derived from `-v`/`-q`. Independent of the diagnostic sink, which
/// is the language's own user-facing error channel, not an operator log.
fn init_logging(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

/// Returns the stdlib directory the module resolver's second resolution
/// order consults: `VESPER_STDLIB_DIR` if set, otherwise a `stdlib`
/// directory next to the running executable.
fn stdlib_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("VESPER_STDLIB_DIR") {
        return Some(PathBuf::from(path));
    }
    std::env::current_exe().ok().and_then(|exe| exe.parent().map(|dir| dir.join("stdlib")))
}

fn run(args: &Args) -> anyhow::Result<u8> {
    let mut cache = ModuleCache::new(stdlib_dir());
    let module = match cache.resolve_root(&args.path) {
        Ok(module) => module,
        Err(err) => {
            debug!("module resolution failed: {err}");
            eprintln!("vesper: {err}");
            return Ok(EXIT_MISUSE);
        }
    };
    info!("resolved entry module {}", module.path.display());

    let file = SourceFile::with_path(
        FileID::new(0),
        module.path.display().to_string(),
        module.path.clone(),
        module.source.clone(),
    );

    if args.tokens {
        match vesper_parser::lexer::Lexer::tokenize(&module.source) {
            Ok(tokens) => {
                for token in &tokens {
                    println!("{:?} {:?}", token.kind, token.span);
                }
            }
            Err(err) => eprintln!("vesper: {err}"),
        }
    }

    if args.ast {
        for &id in &module.top_level {
            if let Some(node) = module.ast.get_node(id) {
                println!("{node:#?}");
            }
        }
    }

    let mut sink = DiagnosticSink::new();

    let context = match analyze_module(&module.ast, &module.path.display().to_string(), &module.top_level) {
        Ok(context) => context,
        Err(errors) => {
            for error in &errors {
                sink.push(semantic_diagnostic(&file, error));
            }
            sink.drain_to_stderr();
            return Ok(EXIT_FAILURE);
        }
    };

    if let Err(error) = validate_entry_module(&context, &module.path.display().to_string()) {
        sink.push(semantic_diagnostic(&file, &error));
        sink.drain_to_stderr();
        return Ok(EXIT_FAILURE);
    }

    let program =
        match compile_module(&module.ast, &context, &module.top_level, Some(args.script_args.clone())) {
            Ok(program) => program,
            Err(error) => {
                sink.push(compile_diagnostic(&file, &error));
                sink.drain_to_stderr();
                return Ok(EXIT_FAILURE);
            }
        };

    if args.opcodes {
        println!("{}", disassemble(&program));
    }

    if args.references {
        print_references(&program, &file);
    }

    debug!("entering virtual machine");
    if let Err(fault) = vesper_runtime::run(program) {
        sink.push(Diagnostic::from_source_span(fault.location, &file.name, fault.error.to_string()));
        sink.drain_to_stderr();
        return Ok(EXIT_FAILURE);
    }

    Ok(0)
}

fn semantic_diagnostic(file: &SourceFile, error: &vesper_analyzer::error::SemanticError) -> Diagnostic {
    match error.span() {
        Some(span) => Diagnostic::from_span(file, span, error.to_string()),
        None => Diagnostic { file: file.name.clone(), line: 0, column: 0, message: error.to_string() },
    }
}

fn compile_diagnostic(file: &SourceFile, error: &vesper_compiler::error::CompileError) -> Diagnostic {
    use vesper_compiler::error::CompileError;
    let span = match error {
        CompileError::UnboundVariable { span, .. }
        | CompileError::UnknownClass { span, .. }
        | CompileError::UnsupportedIteration { span, .. } => Some(*span),
        CompileError::RegisterBudgetExceeded { .. } | CompileError::GlobalBudgetExceeded { .. } => None,
    };
    match span {
        Some(span) => Diagnostic::from_span(file, span, error.to_string()),
        None => Diagnostic { file: file.name.clone(), line: 0, column: 0, message: error.to_string() },
    }
}

/// The file/line/column map the `--references` flag dumps: each emitted
/// instruction's recorded [`vesper_source::types::SourceSpan`] carries a
/// real byte offset in its `Position::offset` field even though the
/// `Span -> SourceSpan` conversion `compiler.rs` uses leaves `line`/`column`
/// as placeholders — re-resolving that offset against the entry file's line
/// table is what recovers the real position here.
fn print_references(program: &vesper_runtime::Program, file: &SourceFile) {
    for region in
        [vesper_runtime::Region::Program, vesper_runtime::Region::Functions, vesper_runtime::Region::Classes]
    {
        let memory = program.memory(region);
        for (offset, location) in memory.locations.iter().enumerate() {
            let start = file.position_from_offset(location.start.offset);
            let end = file.position_from_offset(location.end.offset);
            println!("{region:?} {offset}: {}:{start}-{end}", file.name);
        }
    }
}
