//! End-to-end tests for the Syn compiler (spec.md §8 "Testable
//! properties").
//!
//! Every scenario lexes, parses and lowers a full program, then asserts
//! on the shape of the emitted `.ll` text. Where `cc` is available on
//! `PATH` the IR is additionally linked against a tiny embedded C
//! runtime stub and run, asserting the process exit code against
//! spec.md §8's six numbered scenarios; that step is skipped
//! gracefully otherwise; linking a real program is an external
//! collaborator, not something this crate's own tests depend on.

use std::path::Path;
use std::process::Command;
use std::rc::Rc;

use inkwell::context::Context;
use tempfile::tempdir;

use synlang::codegen::Codegen;
use synlang::lexer::Lexer;
use synlang::parser::Parser;
use synlang::token::Span;

/// A C translation of the runtime ABI (spec.md §6), kept inline so
/// these tests don't depend on `syn-runtime`'s build artifacts.
const RUNTIME_STUB_C: &str = r#"
#include <stdio.h>
#include <stdlib.h>
#include <stdarg.h>

void print(const char *fmt, ...) {
    va_list args;
    va_start(args, fmt);
    vprintf(fmt, args);
    va_end(args);
}

int get_num(void) {
    char line[256];
    if (!fgets(line, sizeof(line), stdin)) return 0;
    return atoi(line);
}

int *alloc_dyn_arr(int n) {
    if (n < 0) n = 0;
    return calloc((size_t)n, sizeof(int));
}
"#;

fn compile_to_ir(source: &str, output_path: &Path) -> Result<String, String> {
    let file = Rc::new(std::path::PathBuf::from("<test>"));
    let file_span = Span::synthetic(file.clone());

    let mut lexer = Lexer::new(source, file);
    let tokens = lexer.tokenize().map_err(|e| e.to_string())?;

    let mut parser = Parser::new(tokens);
    let program = parser.parse().map_err(|e| e.to_string())?;
    let registry = parser.into_registry();

    let context = Context::create();
    let mut codegen = Codegen::new(&context, "integration_test", &registry);
    codegen.compile(&program, &file_span).map_err(|e| e.to_string())?;
    codegen.emit(output_path, &file_span).map_err(|e| e.to_string())?;

    std::fs::read_to_string(output_path).map_err(|e| e.to_string())
}

/// Runs a program's `.ll` text end-to-end by linking it against the
/// embedded C runtime stub with `cc` and executing it, feeding `stdin`
/// if given. Returns `None` if `cc` isn't on `PATH`.
fn run_linked(ir_path: &Path, dir: &Path, stdin: Option<&str>) -> Option<i32> {
    let runtime_path = dir.join("runtime.c");
    std::fs::write(&runtime_path, RUNTIME_STUB_C).ok()?;

    let exe_path = dir.join("prog");
    let link = Command::new("cc").args([ir_path, &runtime_path]).arg("-o").arg(&exe_path).output().ok()?;
    if !link.status.success() {
        return None;
    }

    use std::io::Write;
    let mut child = Command::new(&exe_path)
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::null())
        .spawn()
        .ok()?;
    if let Some(input) = stdin {
        child.stdin.take().unwrap().write_all(input.as_bytes()).ok()?;
    }
    let status = child.wait().ok()?;
    status.code()
}

fn cc_available() -> bool {
    Command::new("cc").arg("--version").output().map(|o| o.status.success()).unwrap_or(false)
}

fn assert_exit_code(source: &str, stdin: Option<&str>, expected: i32) {
    let dir = tempdir().unwrap();
    let ir_path = dir.path().join("out.ll");
    let ir = compile_to_ir(source, &ir_path).expect("expected successful compilation");
    assert!(ir.contains("define"), "emitted IR has no function definition:\n{ir}");

    if !cc_available() {
        return;
    }
    if let Some(code) = run_linked(&ir_path, dir.path(), stdin) {
        assert_eq!(code, expected, "unexpected exit code for program: {source}");
    }
}

// ===================
// spec.md §8 end-to-end scenarios
// ===================

#[test]
fn scenario_1_arithmetic_precedence() {
    assert_exit_code("fnc main(): i32 { ret 2 + 3 * 4; }", None, 14);
}

#[test]
fn scenario_2_while_loop_counter() {
    assert_exit_code("fnc main(): i32 { x : i32; x = 0; while x < 5 { x = x + 1; } ret x; }", None, 5);
}

#[test]
fn scenario_3_array_literal_indexing() {
    assert_exit_code("fnc main(): i32 { a : i32[3] = [1, 2, 3]; ret a[2]; }", None, 3);
}

#[test]
fn scenario_4_dynamic_allocation_through_pointer() {
    assert_exit_code("fnc main(): i32 { p : ptr<i32>; p = alloc_dyn_arr(4); p[0] = 7; ret p[0]; }", None, 7);
}

#[test]
fn scenario_5_if_elif_else_positive() {
    let src = "fnc main(): i32 { x : i32 = get_num(); if x > 0 { ret 1; } elif x == 0 { ret 0; } else { ret -1; } }";
    assert_exit_code(src, Some("0\n"), 0);
}

#[test]
fn scenario_5_if_elif_else_negative_truncates_to_255() {
    let src = "fnc main(): i32 { x : i32 = get_num(); if x > 0 { ret 1; } elif x == 0 { ret 0; } else { ret -1; } }";
    assert_exit_code(src, Some("-5\n"), 255);
}

#[test]
fn scenario_6_struct_member_access() {
    let src = "struct P { x : i32; y : i32; } fnc main(): i32 { q : P; q.x = 3; q.y = 4; ret q.x + q.y; }";
    assert_exit_code(src, None, 7);
}

// ===================
// Boundary cases
// ===================

fn compile_err(source: &str) -> String {
    let dir = tempdir().unwrap();
    let ir_path = dir.path().join("out.ll");
    compile_to_ir(source, &ir_path).expect_err("expected this program to be rejected")
}

#[test]
fn break_outside_loop_is_rejected() {
    let msg = compile_err("fnc main(): i32 { brk; ret 0; }");
    assert!(msg.contains("outside of loop"), "unexpected message: {msg}");
}

#[test]
fn continue_outside_loop_is_rejected() {
    let msg = compile_err("fnc main(): i32 { cont; ret 0; }");
    assert!(msg.contains("outside of loop"), "unexpected message: {msg}");
}

#[test]
fn calling_undeclared_function_is_rejected() {
    let msg = compile_err("fnc main(): i32 { ret nope(); }");
    assert!(msg.contains("Cannot call undeclared function"), "unexpected message: {msg}");
}

#[test]
fn void_function_used_in_expression_is_rejected() {
    let src = "fnc noop(): void { ret; } fnc main(): i32 { ret noop() + 1; }";
    let msg = compile_err(src);
    assert!(msg.contains("Cannot use void function"), "unexpected message: {msg}");
}

#[test]
fn double_pointer_parameter_parses_and_lowers() {
    let dir = tempdir().unwrap();
    let ir_path = dir.path().join("out.ll");
    let ir = compile_to_ir("fnc take(p: ptr<ptr<i32>>): i32 { ret 0; }", &ir_path).unwrap();
    assert!(ir.contains("ptr"), "expected a pointer type in emitted IR:\n{ir}");
}

#[test]
fn shift_operator_tokenizes_separately_from_pointer_brackets() {
    // `a >> b` after a statement boundary is two separate `>` tokens
    // once reshaped into a binary expression; `ptr<ptr<i32>>` collapses
    // back into a single declaration. Both must parse successfully.
    let src = "fnc f(a: i32, b: i32): i32 { ret a >> b; } fnc g(p: ptr<ptr<i32>>): i32 { ret 0; }";
    let dir = tempdir().unwrap();
    let ir_path = dir.path().join("out.ll");
    compile_to_ir(src, &ir_path).expect("both forms should parse and lower");
}
