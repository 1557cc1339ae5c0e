use std::path::PathBuf;
use std::rc::Rc;

use inkwell::context::Context;

use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::registry::TypeRegistry;
use crate::token::Span;

use super::Codegen;

fn lower(src: &str) -> (TypeRegistry, crate::ast::Program) {
    let file = Rc::new(PathBuf::from("t.syn"));
    let tokens = Lexer::new(src, file).tokenize().unwrap();
    let mut parser = Parser::new(tokens);
    let program = parser.parse().unwrap();
    (parser.into_registry(), program)
}

fn compile_ok(src: &str) -> String {
    let (registry, program) = lower(src);
    let context = Context::create();
    let mut cg = Codegen::new(&context, "t", &registry);
    let span = Span::synthetic(Rc::new(PathBuf::from("t.syn")));
    cg.compile(&program, &span).expect("lowering should succeed");
    cg.module.print_to_string().to_string()
}

fn compile_err(src: &str) -> super::CodegenError {
    let (registry, program) = lower(src);
    let context = Context::create();
    let mut cg = Codegen::new(&context, "t", &registry);
    let span = Span::synthetic(Rc::new(PathBuf::from("t.syn")));
    cg.compile(&program, &span).expect_err("lowering should fail")
}

#[test]
fn emits_a_declared_function() {
    let ir = compile_ok("fnc main() : i32 { ret 0; }");
    assert!(ir.contains("define i32 @main()"));
}

#[test]
fn runtime_stubs_declared_external() {
    let ir = compile_ok("fnc main() : void { print(\"hi\"); }");
    assert!(ir.contains("declare void @print"));
}

#[test]
fn arithmetic_and_return() {
    let ir = compile_ok("fnc main() : i32 { ret 2 + 3 * 4; }");
    assert!(ir.contains("mul"));
    assert!(ir.contains("add"));
}

#[test]
fn if_elif_else_uses_named_blocks() {
    let src = "fnc main() : void { \
        x : i32 = 1; \
        if x == 1 { ret; } elif x == 2 { ret; } else { ret; } \
    }";
    let ir = compile_ok(src);
    assert!(ir.contains("if:"));
    assert!(ir.contains("elif_cond_0:"));
    assert!(ir.contains("elif:"));
    assert!(ir.contains("else:"));
    assert!(ir.contains("ifmrg:"));
}

#[test]
fn while_loop_uses_named_blocks() {
    let src = "fnc main() : void { \
        i : i32 = 0; \
        while i < 10 { i = i + 1; } \
    }";
    let ir = compile_ok(src);
    assert!(ir.contains("while_cond_check:"));
    assert!(ir.contains("while:"));
    assert!(ir.contains("whmerge:"));
}

#[test]
fn break_outside_loop_is_fatal() {
    let err = compile_err("fnc main() : void { brk; }");
    assert!(err.message.contains("brk"));
}

#[test]
fn array_element_round_trips_through_store_and_load() {
    let src = "fnc main() : i32 { \
        a : i32[3] = [1, 2, 3]; \
        a[1] = 9; \
        ret a[1]; \
    }";
    let ir = compile_ok(src);
    assert!(ir.contains("getelementptr"));
}

#[test]
fn struct_member_access_uses_struct_gep() {
    let src = "struct Point { x : i32; y : i32; } \
        fnc main() : i32 { \
        p : Point; \
        p.x = 5; \
        ret p.x; \
    }";
    let ir = compile_ok(src);
    assert!(ir.contains("%Point = type"));
}

#[test]
fn undeclared_function_call_is_fatal() {
    let err = compile_err("fnc main() : void { nope(); }");
    assert!(err.message.contains("nope"));
}

#[test]
fn void_function_cannot_return_a_value() {
    let err = compile_err("fnc main() : void { ret 1; }");
    assert!(err.message.contains("void"));
}

#[test]
fn missing_return_on_typed_function_is_fatal() {
    let err = compile_err("fnc main() : i32 { x : i32 = 1; }");
    assert!(err.message.contains("does not return"));
}

#[test]
fn pointer_roundtrip_via_addr_and_deref() {
    let src = "fnc main() : i32 { \
        x : i32 = 7; \
        p : ptr<i32> = &x; \
        ret *p; \
    }";
    let ir = compile_ok(src);
    assert!(ir.contains("load"));
}
