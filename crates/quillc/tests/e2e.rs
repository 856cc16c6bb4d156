//! End-to-end integration tests for the Quill compiler (`spec.md` §8).
//!
//! Each test compiles a source string, assembles and links the result
//! against the test runtime object (`runtime/runtime.c`), runs the
//! resulting binary, and asserts on its stdout.

use std::path::{Path, PathBuf};
use std::process::Command;

fn compile_and_run(source: &str) -> String {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let asm_path = dir.path().join("out.s");
    let bin_path = dir.path().join("out");

    let assembly = quillc::compile(source).expect("compilation failed");
    std::fs::write(&asm_path, &assembly).expect("failed to write assembly");

    let status = Command::new("cc")
        .arg(&asm_path)
        .arg(runtime_source_path())
        .arg("-o")
        .arg(&bin_path)
        .status()
        .expect("failed to invoke cc");
    assert!(status.success(), "assembling/linking failed for:\n{assembly}");

    let output = Command::new(&bin_path).output().expect("failed to run compiled binary");
    assert!(
        output.status.success(),
        "binary exited with {:?}:\nstdout: {}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn compile_expect_error(source: &str) {
    assert!(quillc::compile(source).is_err(), "expected compilation to fail for: {source}");
}

fn runtime_source_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("runtime").join("runtime.c")
}

#[test]
fn sc1_arithmetic_precedence_prints_seven() {
    assert_eq!(compile_and_run("1 + 2 * 3"), "7\n");
}

#[test]
fn sc2_variable_declaration_and_use() {
    assert_eq!(compile_and_run("{ var x = 5; x + 1 }"), "6\n");
}

#[test]
fn sc3_if_else_prints_the_taken_branch() {
    assert_eq!(compile_and_run("if 2 < 3 then 10 else 20"), "10\n");
}

#[test]
fn sc4_while_loop_counts_to_three() {
    assert_eq!(compile_and_run("{ var i = 0; while i < 3 do i = i + 1; i }"), "3\n");
}

#[test]
fn sc5_boolean_result_prints_false() {
    assert_eq!(compile_and_run("true and false"), "false\n");
}

#[test]
fn sc6_reassignment_accumulates() {
    assert_eq!(compile_and_run("{ var x = 1; x = x + 41; x }"), "42\n");
}

#[test]
fn neg1_trailing_identifier_is_a_parse_error() {
    compile_expect_error("a + b c");
}

#[test]
fn neg2_missing_semicolon_in_block_is_a_parse_error() {
    compile_expect_error("{ a b }");
}

#[test]
fn neg3_operator_type_mismatch_is_a_type_error() {
    compile_expect_error("1 + true");
}

#[test]
fn neg4_var_outside_block_top_is_a_parse_error() {
    compile_expect_error("1 + var x = 1");
}
