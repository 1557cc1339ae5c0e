use super::Parser;
use crate::ast::{AssignTarget, ExprKind, Item, StmtKind};
use crate::lexer::Lexer;
use crate::token::Op;
use std::path::PathBuf;
use std::rc::Rc;

fn parse(src: &str) -> crate::ast::Program {
    let file = Rc::new(PathBuf::from("t.syn"));
    let tokens = Lexer::new(src, file).tokenize().unwrap();
    Parser::new(tokens).parse().unwrap()
}

#[test]
fn parses_empty_function() {
    let program = parse("fnc main() : i32 { ret 0; }");
    assert_eq!(program.functions().count(), 1);
    let f = program.functions().next().unwrap();
    assert_eq!(f.name, "main");
    assert!(f.body.is_some());
}

#[test]
fn parses_forward_declaration() {
    let program = parse("fnc helper(x : i32) : void;");
    let Item::Function(f) = &program.items[0] else { panic!() };
    assert!(f.body.is_none());
}

#[test]
fn parses_variadic_function() {
    let program = parse("fnc sum(first : i32, ...) : i32 { ret first; }");
    let f = program.functions().next().unwrap();
    assert!(f.variadic);
    assert_eq!(f.params.len(), 1);
}

#[test]
fn parses_local_var_decl_with_init() {
    let program = parse("fnc main() : void { x : i32 = 3; }");
    let f = program.functions().next().unwrap();
    let StmtKind::VarDecl(decl) = &f.body.as_ref().unwrap()[0].kind else { panic!() };
    assert_eq!(decl.name, "x");
    assert!(decl.init.is_some());
}

#[test]
fn parses_pointer_decl() {
    let program = parse("fnc main() : void { p : ptr<i32>; }");
    let f = program.functions().next().unwrap();
    let StmtKind::VarDecl(decl) = &f.body.as_ref().unwrap()[0].kind else { panic!() };
    assert!(matches!(decl.ty, crate::registry::TypeRef::Pointer { degree: 1, .. }));
}

#[test]
fn parses_nested_pointer_decl() {
    let program = parse("fnc main() : void { p : ptr<ptr<i32>>; }");
    let f = program.functions().next().unwrap();
    let StmtKind::VarDecl(decl) = &f.body.as_ref().unwrap()[0].kind else { panic!() };
    assert!(matches!(decl.ty, crate::registry::TypeRef::Pointer { degree: 2, .. }));
}

#[test]
fn parses_array_decl_with_literal() {
    let program = parse("fnc main() : void { xs : i32[3] = [1, 2, 3]; }");
    let f = program.functions().next().unwrap();
    let StmtKind::ArrayDecl(decl) = &f.body.as_ref().unwrap()[0].kind else { panic!() };
    assert_eq!(decl.dims, vec![3]);
    assert!(decl.init.is_some());
}

#[test]
fn parses_struct_decl_and_member_use() {
    let program = parse("struct Point { x : i32; y : i32; } fnc main() : void { p : Point; p.x = 1; }");
    assert!(matches!(program.items[0], Item::Struct(_)));
}

#[test]
fn parses_if_elif_else() {
    let program = parse("fnc main() : void { if 1 { ret; } elif 2 { ret; } else { ret; } }");
    let f = program.functions().next().unwrap();
    let StmtKind::If(stmt) = &f.body.as_ref().unwrap()[0].kind else { panic!() };
    assert_eq!(stmt.elifs.len(), 1);
    assert!(stmt.else_block.is_some());
}

#[test]
fn parses_while_break_continue() {
    let program = parse("fnc main() : void { while 1 { brk; cont; } }");
    let f = program.functions().next().unwrap();
    let StmtKind::While(stmt) = &f.body.as_ref().unwrap()[0].kind else { panic!() };
    assert_eq!(stmt.body.len(), 2);
    assert!(matches!(stmt.body[0].kind, StmtKind::Break));
    assert!(matches!(stmt.body[1].kind, StmtKind::Continue));
}

#[test]
fn parses_call_statement() {
    let program = parse("fnc greet() : void; fnc main() : void { greet(); }");
    let f = program.functions().nth(1).unwrap();
    assert!(matches!(f.body.as_ref().unwrap()[0].kind, StmtKind::ExprStmt(_)));
}

#[test]
fn void_call_inside_expression_is_rejected() {
    let file = Rc::new(PathBuf::from("t.syn"));
    let src = "fnc greet() : void; fnc main() : i32 { ret greet() + 1; }";
    let tokens = Lexer::new(src, file).tokenize().unwrap();
    assert!(Parser::new(tokens).parse().is_err());
}

#[test]
fn binary_expression_splits_at_lowest_precedence() {
    let program = parse("fnc main() : i32 { ret 1 + 2 * 3; }");
    let f = program.functions().next().unwrap();
    let StmtKind::Return(Some(expr)) = &f.body.as_ref().unwrap()[0].kind else { panic!() };
    let ExprKind::Binary { op: Op::Plus, rhs, .. } = &expr.kind else { panic!("expected top-level +") };
    assert!(matches!(rhs.kind, ExprKind::Binary { op: Op::Star, .. }));
}

#[test]
fn unary_minus_parses_before_binary_split() {
    let program = parse("fnc main() : i32 { ret -1 + 2; }");
    let f = program.functions().next().unwrap();
    let StmtKind::Return(Some(expr)) = &f.body.as_ref().unwrap()[0].kind else { panic!() };
    let ExprKind::Binary { op: Op::Plus, lhs, .. } = &expr.kind else { panic!("expected top-level +") };
    assert!(matches!(lhs.kind, ExprKind::Unary { op: Op::Minus, .. }));
}

#[test]
fn array_element_assignment_parses_indices() {
    let program = parse("fnc main() : void { xs : i32[3]; xs[1] = 9; }");
    let f = program.functions().next().unwrap();
    let StmtKind::Assign { target, .. } = &f.body.as_ref().unwrap()[1].kind else { panic!() };
    assert!(matches!(target, AssignTarget::ArrayElement { indices, .. } if indices.len() == 1));
}

#[test]
fn pointer_deref_assignment_parses() {
    let program = parse("fnc main() : void { p : ptr<i32>; *p = 5; }");
    let f = program.functions().next().unwrap();
    let StmtKind::Assign { target, .. } = &f.body.as_ref().unwrap()[1].kind else { panic!() };
    assert!(matches!(target, AssignTarget::PointerDeref(_)));
}

#[test]
fn bare_deref_statement_is_rejected() {
    let file = Rc::new(PathBuf::from("t.syn"));
    let tokens = Lexer::new("fnc main() : void { p : ptr<i32>; *p; }", file).tokenize().unwrap();
    assert!(Parser::new(tokens).parse().is_err());
}
