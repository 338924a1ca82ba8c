// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The Vesper Project
// SPDX-FileName: crates/vesper-cli/tests/run.rs
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
//! A full compile→execute run of the built binary, asserting on captured
//! stdout and the exit code — the three exit classes SPEC_FULL.md assigns
//! (0 clean, 64 misuse, 1 diagnostic-driven failure).

use std::fs;
use std::process::Command;

use tempfile::tempdir;

fn vesper_cli() -> Command { Command::new(env!("CARGO_BIN_EXE_vesper-cli")) }

#[test]
fn runs_a_script_and_prints_its_output() {
    let dir = tempdir().unwrap();
    let entry = dir.path().join("main.vsp");
    fs::write(&entry, "fun main(args: [string]) {\n  print \"hello\"\n}\n").unwrap();

    let output = vesper_cli().arg(&entry).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
}

#[test]
fn missing_path_exits_with_the_misuse_code() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.vsp");

    let output = vesper_cli().arg(&missing).output().unwrap();
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn int_division_produces_a_float() {
    let dir = tempdir().unwrap();
    let entry = dir.path().join("main.vsp");
    fs::write(&entry, "fun main(args: [string]) {\n  print 1 / 2\n}\n").unwrap();

    let output = vesper_cli().arg(&entry).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "0.5");
}

#[test]
fn dict_for_loop_visits_keys_in_insertion_order() {
    let dir = tempdir().unwrap();
    let entry = dir.path().join("main.vsp");
    fs::write(
        &entry,
        "fun main(args: [string]) {\n  d: {int} = {\"b\": 2, \"a\": 1}\n  for v, k in d {\n    print k\n  }\n}\n",
    )
    .unwrap();

    let output = vesper_cli().arg(&entry).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().collect::<Vec<_>>(), vec!["b", "a"]);
}

#[test]
fn string_for_loop_visits_one_character_strings() {
    let dir = tempdir().unwrap();
    let entry = dir.path().join("main.vsp");
    fs::write(&entry, "fun main(args: [string]) {\n  for c in \"hi\" {\n    print c\n  }\n}\n").unwrap();

    let output = vesper_cli().arg(&entry).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().collect::<Vec<_>>(), vec!["h", "i"]);
}

#[test]
fn a_type_error_exits_with_the_failure_code_and_a_diagnostic() {
    let dir = tempdir().unwrap();
    let entry = dir.path().join("main.vsp");
    fs::write(
        &entry,
        "fun main(args: [string]) {\n  x: int = \"not an int\"\n}\n",
    )
    .unwrap();

    let output = vesper_cli().arg(&entry).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(!String::from_utf8_lossy(&output.stderr).is_empty());
}
