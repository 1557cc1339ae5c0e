//! Statement nodes for the Syn AST.

use crate::token::Span;

use super::decl::{ArrayDecl, VarDecl};
use super::expr::Expr;

/// The left-hand side of an assignment, already disambiguated by the
/// parser against the registry.
#[derive(Debug, Clone)]
pub enum AssignTarget {
    Scalar(String),
    ArrayWhole(String),
    ArrayElement { base: String, indices: Vec<Expr> },
    PointerDeref(Expr),
    StructMember { path: Vec<String> },
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_block: Vec<Stmt>,
    pub elifs: Vec<(Expr, Vec<Stmt>)>,
    pub else_block: Option<Vec<Stmt>>,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    VarDecl(VarDecl),
    ArrayDecl(ArrayDecl),
    Assign { target: AssignTarget, value: Expr },
    ExprStmt(Expr),
    If(IfStmt),
    While(WhileStmt),
    Return(Option<Expr>),
    Break,
    Continue,
    DocComment(String),
    NoOp,
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}
