use super::*;
use crate::registry::TypeRegistry;
use std::path::PathBuf;
use std::rc::Rc;

fn span() -> crate::token::Span {
    crate::token::Span::synthetic(Rc::new(PathBuf::from("t.syn")))
}

#[test]
fn program_filters_functions() {
    let reg = TypeRegistry::new();
    let i32_id = reg.resolve_type("i32", span()).unwrap();
    let mut program = Program::new();
    program.items.push(Item::Function(FunctionDecl {
        name: "main".into(),
        params: vec![],
        variadic: false,
        return_type: Some(crate::registry::TypeRef::Scalar(i32_id)),
        body: Some(vec![]),
        span: span(),
    }));
    program.items.push(Item::DocComment("hello".into()));
    assert_eq!(program.functions().count(), 1);
}

#[test]
fn expr_carries_span() {
    let e = Expr::new(ExprKind::Integer(3), span());
    assert!(matches!(e.kind, ExprKind::Integer(3)));
}
