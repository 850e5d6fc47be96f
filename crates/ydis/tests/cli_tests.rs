//! CLI integration tests for ydis.
//!
//! These tests run the ydis binary against machine code written to
//! temporary files and check the listing and the console output.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Get the path to the ydis binary.
fn ydis_bin() -> String {
    env!("CARGO_BIN_EXE_ydis").to_string()
}

/// Run ydis with the given arguments.
fn run_ydis(args: &[&str]) -> Output {
    Command::new(ydis_bin())
        .args(args)
        .output()
        .expect("Failed to execute ydis")
}

/// Writes `bytes` to `input.mem` in a fresh directory.
fn machine_code(bytes: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("input.mem");
    fs::write(&path, bytes).expect("Failed to write input");
    (dir, path)
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path is not UTF-8")
}

/// Disassembles `bytes` into a file and returns the listing.
fn listing(bytes: &[u8], extra: &[&str]) -> String {
    let (dir, input) = machine_code(bytes);
    let output = dir.path().join("out.s");
    let mut args = vec![path_str(&input), path_str(&output)];
    args.extend_from_slice(extra);

    let result = run_ydis(&args);
    assert!(
        result.status.success(),
        "ydis failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    fs::read_to_string(&output).expect("Failed to read listing")
}

// =============================================================================
// Basic Command Tests
// =============================================================================

#[test]
fn test_help() {
    let output = run_ydis(&["--help"]);
    assert!(output.status.success(), "ydis --help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Y86-64 disassembler"),
        "Help should mention disassembler"
    );
    assert!(stdout.contains("--format"), "Help should show --format option");
    assert!(
        stdout.contains("--no-skip-padding"),
        "Help should show --no-skip-padding option"
    );
}

#[test]
fn test_missing_arguments() {
    let output = run_ydis(&["only-input.mem"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "stderr: {stderr}");
}

#[test]
fn test_banner() {
    let (dir, input) = machine_code(&[0x10]);
    let output = dir.path().join("out.s");
    let result = run_ydis(&[path_str(&input), path_str(&output), "0x0"]);
    assert!(result.status.success());

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert_eq!(
        stdout,
        format!(
            "Opened {}, starting offset 0x0\nSaving output to {}\n",
            input.display(),
            output.display()
        )
    );
}

#[test]
fn test_banner_offset_is_uppercase_hex() {
    let (dir, input) = machine_code(&[0u8; 0x30]);
    let output = dir.path().join("out.s");
    let result = run_ydis(&[path_str(&input), path_str(&output), "42"]);
    assert!(result.status.success());
    assert!(String::from_utf8_lossy(&result.stdout).contains("starting offset 0x2A"));
}

#[test]
fn test_invalid_offset_fails() {
    let (dir, input) = machine_code(&[0x10]);
    let output = dir.path().join("out.s");
    let result = run_ydis(&[path_str(&input), path_str(&output), "12zz"]);
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("invalid offset"), "stderr: {stderr}");
}

#[test]
fn test_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("missing.mem");
    let output = dir.path().join("out.s");
    let result = run_ydis(&[path_str(&input), path_str(&output)]);
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Failed to open"), "stderr: {stderr}");
}

// =============================================================================
// Listing Tests
// =============================================================================

#[test]
fn test_no_operand_lines_keep_padding() {
    assert_eq!(
        listing(&[0x10, 0x90], &[]),
        "0000000000000000: 10                    nop     \n\
         0000000000000001: 90                    ret     \n"
    );
}

#[test]
fn test_start_offset_skips_prefix() {
    let bytes = [0xFF, 0xFF, 0x20, 0x12];
    assert_eq!(
        listing(&bytes, &["2"]),
        "0000000000000002: 2012                  rrmovq  %rcx, %rdx\n"
    );
}

#[test]
fn test_octal_offset() {
    let mut bytes = vec![0xFF; 8];
    bytes.push(0x90);
    assert_eq!(
        listing(&bytes, &["010"]),
        "0000000000000008: 90                    ret     \n"
    );
}

#[test]
fn test_trailing_bytes_are_byte_directives() {
    let text = listing(&[0x90, 0x30, 0xF2, 0x10], &[]);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "0000000000000001: 30                    .byte 0x30");
    assert_eq!(lines[3], "0000000000000003: 10                    .byte 0x10");
}

#[test]
fn test_no_skip_padding_lists_every_halt() {
    let skipped = listing(&[0x00, 0x00, 0x10], &[]);
    assert_eq!(skipped.lines().count(), 1);

    let all = listing(&[0x00, 0x00, 0x10], &["--no-skip-padding"]);
    assert_eq!(all.lines().count(), 3);
    assert!(all.lines().take(2).all(|line| line.ends_with("halt    ")));
}

#[test]
fn test_stdout_output_moves_banner_to_stderr() {
    let (_dir, input) = machine_code(&[0x10]);
    let result = run_ydis(&[path_str(&input), "-"]);
    assert!(result.status.success());

    let stdout = String::from_utf8_lossy(&result.stdout);
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert_eq!(stdout, "0000000000000000: 10                    nop     \n");
    assert!(stderr.contains("Saving output to -"), "stderr: {stderr}");
}

#[test]
fn test_json_format() {
    let text = listing(&[0x60, 0x01, 0x05], &["--format", "json"]);
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).expect("line is not JSON"))
        .collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["mnemonic"], "addq");
    assert_eq!(lines[0]["operands"], "%rax, %rcx");
    assert_eq!(lines[0]["instruction"]["class"], "opq");
    assert_eq!(lines[1]["address"], 2);
    assert_eq!(lines[1]["mnemonic"], ".byte");
    assert!(lines[1]["fault"].as_str().unwrap().contains("unknown opcode"));
}

#[test]
fn test_verbose_logs_recovery_to_stderr() {
    let (dir, input) = machine_code(&[0xC0]);
    let output = dir.path().join("out.s");
    let result = Command::new(ydis_bin())
        .args([path_str(&input), path_str(&output), "-v"])
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute ydis");
    assert!(result.status.success());

    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("recovering"), "stderr: {stderr}");
    let listing = fs::read_to_string(&output).unwrap();
    assert!(!listing.contains("recovering"));
}
