//! Declaration nodes: variables, arrays, pointers, structs, functions.

use crate::registry::{Member, Param, TypeId, TypeRef};
use crate::token::Span;

use super::expr::Expr;
use super::stmt::Stmt;

/// A shared shape for the three local-declaration forms. `ty` is already resolved against the registry by
/// the time the parser builds this node.
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: String,
    pub ty: TypeRef,
    pub init: Option<Expr>,
    pub span: Span,
}

/// An array declaration's initializer: a nested bracket literal whose
/// depth matches the declared rank.
#[derive(Debug, Clone)]
pub enum ArrayInit {
    Row(Vec<ArrayInit>),
    Elem(Expr),
}

#[derive(Debug, Clone)]
pub struct ArrayDecl {
    pub name: String,
    pub elem_ty: TypeId,
    pub dims: Vec<usize>,
    pub init: Option<ArrayInit>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct StructDecl {
    pub name: String,
    pub members: Vec<Member>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub variadic: bool,
    pub return_type: Option<TypeRef>,
    /// `None` for a forward declaration.
    pub body: Option<Vec<Stmt>>,
    pub span: Span,
}
