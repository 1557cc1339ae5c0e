//! Function and struct symbol records kept by the registry.

use super::types::TypeRef;

/// A single function parameter.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
}

/// A function's signature, shared by forward declarations and full
/// definitions. Structurally recorded once per name; a forward
/// declaration and its later definition must agree.
#[derive(Debug, Clone)]
pub struct FunctionSig {
    pub name: String,
    pub params: Vec<Param>,
    /// `...` was the last parameter.
    pub variadic: bool,
    /// `None` means `void`.
    pub return_type: Option<TypeRef>,
    pub has_body: bool,
}

/// An ordered struct member.
#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    pub ty: TypeRef,
}

/// A struct's layout, in declaration order — order is load-bearing for
/// both LLVM's named-aggregate field order and `structGEP` indices.
#[derive(Debug, Clone)]
pub struct StructDef {
    pub name: String,
    pub members: Vec<Member>,
}

impl StructDef {
    pub fn member_index(&self, name: &str) -> Option<(usize, &Member)> {
        self.members
            .iter()
            .enumerate()
            .find(|(_, m)| m.name == name)
    }
}
