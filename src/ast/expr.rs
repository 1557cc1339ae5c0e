//! Expression nodes for the Syn AST.

use crate::token::{Op, Span};

/// The kind of an expression, without source location.
#[derive(Debug, Clone)]
pub enum ExprKind {
    Integer(i64),
    Float(f64),
    StringLiteral(String),
    Bool(bool),
    Null,
    Identifier(String),
    Call {
        callee: String,
        args: Vec<Expr>,
    },
    /// `base[e1][e2]…` — one subtree per dimension, outermost first.
    ArrayElement {
        base: String,
        indices: Vec<Expr>,
    },
    Unary {
        op: Op,
        operand: Box<Expr>,
    },
    Binary {
        op: Op,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

/// An expression with its source location.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}
