//! Data type and type-reference representations shared by the parser and
//! the lowering pass.

use std::fmt;

/// Identifies a [`DataType`] within a [`super::TypeRegistry`] by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub(super) usize);

/// A registered named data type: one of the ten builtins, or a user
/// `struct`/`enum`/`union` name.
#[derive(Debug, Clone)]
pub struct DataType {
    pub id: TypeId,
    pub name: String,
    pub builtin: bool,
}

/// How a declared name's shape modifies its base [`TypeId`].
///
/// Every variable, pointer, array, function parameter and struct member
/// is typed by one of these three shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    /// A plain scalar of the given base type.
    Scalar(TypeId),
    /// `ptr<...ptr<T>...>` nested `degree` times; `degree >= 1`.
    Pointer { base: TypeId, degree: u32 },
    /// A fixed-shape array. `dims` lists sizes outer-to-inner as written
    /// in source (`T[d1;d2;...]`); lowering reverses this to pick an
    /// allocation shape that unwinds outer-to-inner under repeated
    /// indexing.
    Array { elem: TypeId, dims: Vec<usize> },
}

impl TypeRef {
    pub fn base_type(&self) -> TypeId {
        match self {
            TypeRef::Scalar(t) => *t,
            TypeRef::Pointer { base, .. } => *base,
            TypeRef::Array { elem, .. } => *elem,
        }
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
