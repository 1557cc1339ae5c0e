//! Top-level program structure for the Syn AST.

use super::decl::{ArrayDecl, FunctionDecl, StructDecl, VarDecl};

#[derive(Debug, Clone)]
pub enum Item {
    Function(FunctionDecl),
    Struct(StructDecl),
    VarDecl(VarDecl),
    ArrayDecl(ArrayDecl),
    DocComment(String),
}

/// The root AST node: an ordered sequence of top-level items.
#[derive(Debug, Default)]
pub struct Program {
    pub items: Vec<Item>,
}

impl Program {
    pub fn new() -> Self {
        Program { items: Vec::new() }
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::Function(f) => Some(f),
            _ => None,
        })
    }
}
