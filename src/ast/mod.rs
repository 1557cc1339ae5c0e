//! Abstract syntax tree definitions for Syn.
//!
//! - [`program`] — [`Program`], top-level [`Item`]s
//! - [`decl`] — function/struct/variable/array declarations
//! - [`stmt`] — statements and assignment targets
//! - [`expr`] — expressions
//!
//! Declarations already carry resolved [`crate::registry::TypeRef`]s:
//! the parser consults the registry as it builds each node, so lowering
//! never re-resolves a type name.
//!
//! # See also
//!
//! * [`crate::parser`] — produces the tree
//! * [`crate::codegen`] — lowers it to LLVM IR

mod decl;
mod expr;
mod program;
mod stmt;

#[cfg(test)]
mod tests;

pub use decl::{ArrayDecl, ArrayInit, FunctionDecl, StructDecl, VarDecl};
pub use expr::{Expr, ExprKind};
pub use program::{Item, Program};
pub use stmt::{AssignTarget, IfStmt, Stmt, StmtKind, WhileStmt};
