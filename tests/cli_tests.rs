// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI integration tests.
//!
//! These tests run the actual protocodec binary and verify its behavior.

mod common;

use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use common::{address_book_pool, address_book_schema, sample_book, temp_path};

/// Get the path to the built protocodec binary
fn protocodec_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    // The test binary is in target/debug/deps/
    // The protocodec binary is in target/debug/
    path.pop(); // deps
    path.pop(); // debug or release
    path.push("protocodec");
    path
}

/// Run protocodec with arguments
fn run(args: &[&str]) -> Output {
    let bin = protocodec_bin();
    Command::new(&bin)
        .args(args)
        .output()
        .unwrap_or_else(|_| panic!("Failed to run {:?}", bin))
}

/// Run protocodec and assert success
fn run_ok(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        output.status.success(),
        "Command failed: {:?}\nstdout: {}\nstderr: {}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run protocodec and assert failure
fn run_err(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        !output.status.success(),
        "Command should have failed but succeeded: {:?}",
        args
    );
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    let output = run_ok(&["--help"]);
    assert!(output.contains("Schema-driven protobuf wire format toolkit"));
    assert!(output.contains("addressbook"));
    assert!(output.contains("inspect"));
    assert!(output.contains("decode"));
}

#[test]
fn test_cli_version() {
    let output = run_ok(&["--version"]);
    assert!(output.contains("protocodec"));
}

#[test]
fn test_cli_invalid_subcommand() {
    let stderr = run_err(&["nonexistent"]);
    assert!(stderr.contains("unrecognized") || stderr.contains("unknown"));
}

// ============================================================================
// Address Book Tests
// ============================================================================

#[test]
fn test_addressbook_write_read() {
    let (path, _guard) = temp_path("cli", "addressbook.bin");
    let file = path_str(&path);

    let output = run_ok(&["addressbook", "write", &file]);
    assert!(output.contains("Wrote 2 people"));

    // the CLI writes the same bytes the library does
    let written = fs::read(&path).unwrap();
    assert_eq!(written, sample_book(&address_book_pool()).encode());

    let output = run_ok(&["addressbook", "read", &file]);
    assert!(output.contains("\"John Doe\""));
    assert!(output.contains("1234"));
    assert!(output.contains("\"jdoe@example.com\""));
    assert!(output.contains("HOME"));
    assert!(output.contains("\"Jane Doe\""));
    assert!(output.contains("\"777-4321\""));
    assert!(output.contains("WORK"));
    assert!(output.find("John Doe") < output.find("Jane Doe"));
}

#[test]
fn test_addressbook_read_missing_file() {
    let (path, _guard) = temp_path("cli", "missing.bin");
    let stderr = run_err(&["addressbook", "read", &path_str(&path)]);
    assert!(stderr.contains("Failed to read"));
}

#[test]
fn test_addressbook_read_corrupt_file() {
    let (path, _guard) = temp_path("cli", "corrupt.bin");
    fs::write(&path, [0x0Au8, 0x7F, 0x01]).unwrap();
    let stderr = run_err(&["addressbook", "read", &path_str(&path)]);
    assert!(stderr.contains("Truncated buffer"), "{stderr}");
}

// ============================================================================
// Inspect Tests
// ============================================================================

#[test]
fn test_inspect_entries() {
    let (path, _guard) = temp_path("cli", "inspect.bin");
    fs::write(&path, sample_book(&address_book_pool()).encode()).unwrap();

    let output = run_ok(&["inspect", &path_str(&path)]);
    assert!(output.contains("field 1 (length-delimited)"));
    assert!(output.contains("Entries: 2"));

    let output = run_ok(&["inspect", "--recursive", &path_str(&path)]);
    assert!(output.contains("\"John Doe\""));
    assert!(output.contains("field 2 (varint): 1234"));
}

// ============================================================================
// Decode Tests
// ============================================================================

#[test]
fn test_decode_with_json_schema() {
    let (data, _guard) = temp_path("cli", "book.bin");
    let schema = data.with_file_name("addressbook.json");
    fs::write(&data, sample_book(&address_book_pool()).encode()).unwrap();
    fs::write(&schema, address_book_schema().to_json().unwrap()).unwrap();

    let output = run_ok(&[
        "decode",
        "--schema",
        &path_str(&schema),
        "--type",
        "tutorial.AddressBook",
        &path_str(&data),
    ]);
    assert!(output.contains("AddressBook"));
    assert!(output.contains("\"Jane Doe\""));
    assert!(output.contains("WORK"));
}

#[test]
fn test_decode_unknown_type() {
    let (data, _guard) = temp_path("cli", "book.bin");
    let schema = data.with_file_name("addressbook.json");
    fs::write(&data, b"").unwrap();
    fs::write(&schema, address_book_schema().to_json().unwrap()).unwrap();

    let stderr = run_err(&[
        "decode",
        "--schema",
        &path_str(&schema),
        "--type",
        "tutorial.Company",
        &path_str(&data),
    ]);
    assert!(stderr.contains("Unknown type"), "{stderr}");
}

#[test]
fn test_decode_recursion_limit_flag() {
    let (data, _guard) = temp_path("cli", "book.bin");
    let schema = data.with_file_name("addressbook.json");
    fs::write(&data, sample_book(&address_book_pool()).encode()).unwrap();
    fs::write(&schema, address_book_schema().to_json().unwrap()).unwrap();

    let stderr = run_err(&[
        "decode",
        "--schema",
        &path_str(&schema),
        "--type",
        "tutorial.AddressBook",
        "--recursion-limit",
        "1",
        &path_str(&data),
    ]);
    assert!(stderr.contains("recursion limit of 1"), "{stderr}");
}
