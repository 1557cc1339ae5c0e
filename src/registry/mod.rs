//! The AST data registry: a mutable catalogue of declared
//! types, functions, variables, pointers, arrays and structs, consulted
//! during parsing (to disambiguate assignment vs. array-index vs.
//! struct-member syntax) and during lowering (to resolve call
//! signatures and struct layouts).
//!
//! Function and struct declarations are module-global and persist for
//! the rest of the file once parsed. Variable/pointer/array declarations
//! live in a single flat per-function scope that the parser clears every
//! time it starts a new function body.

mod error;
mod symbol;
mod types;

pub use error::RegistryError;
pub use symbol::{FunctionSig, Member, Param, StructDef};
pub use types::{DataType, TypeId, TypeRef};

use crate::token::Span;
use std::collections::HashMap;

const BUILTIN_NAMES: &[&str] = &[
    "i8", "i16", "i32", "i64", "f32", "f64", "str", "chr", "bln", "void", "ptr",
];

/// What an identifier resolves to, used by the parser to pick a grammar
/// production and by lowering to pick a code path.
#[derive(Debug, Clone)]
pub enum Resolved {
    Local(TypeRef),
    Function(FunctionSig),
    Type(TypeId),
}

/// The registry threaded through parsing and consulted during lowering.
#[derive(Debug)]
pub struct TypeRegistry {
    types: Vec<DataType>,
    type_ids: HashMap<String, TypeId>,
    functions: HashMap<String, FunctionSig>,
    structs: HashMap<String, StructDef>,
    locals: HashMap<String, TypeRef>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut reg = TypeRegistry {
            types: Vec::new(),
            type_ids: HashMap::new(),
            functions: HashMap::new(),
            structs: HashMap::new(),
            locals: HashMap::new(),
        };
        for name in BUILTIN_NAMES {
            reg.insert_type(name, true);
        }
        reg.register_runtime_stubs();
        reg
    }

    /// Pre-declares the three functions the external runtime stub
    /// provides, so both the parser's
    /// void-in-expression check and lowering's call resolution see them
    /// as ordinary forward-declared functions without the source file
    /// ever writing `fnc print(...);` itself.
    fn register_runtime_stubs(&mut self) {
        let i32_id = self.type_ids["i32"];
        let str_id = self.type_ids["str"];

        self.functions.insert(
            "print".to_string(),
            FunctionSig {
                name: "print".to_string(),
                params: vec![Param { name: "fmt".to_string(), ty: TypeRef::Scalar(str_id) }],
                variadic: true,
                return_type: None,
                has_body: false,
            },
        );
        self.functions.insert(
            "get_num".to_string(),
            FunctionSig {
                name: "get_num".to_string(),
                params: vec![],
                variadic: false,
                return_type: Some(TypeRef::Scalar(i32_id)),
                has_body: false,
            },
        );
        self.functions.insert(
            "alloc_dyn_arr".to_string(),
            FunctionSig {
                name: "alloc_dyn_arr".to_string(),
                params: vec![Param { name: "n".to_string(), ty: TypeRef::Scalar(i32_id) }],
                variadic: false,
                return_type: Some(TypeRef::Pointer { base: i32_id, degree: 1 }),
                has_body: false,
            },
        );
    }

    fn insert_type(&mut self, name: &str, builtin: bool) -> TypeId {
        let id = TypeId(self.types.len());
        self.types.push(DataType {
            id,
            name: name.to_string(),
            builtin,
        });
        self.type_ids.insert(name.to_string(), id);
        id
    }

    /// Resolves a type name to its [`TypeId`]. Fatal if missing.
    pub fn resolve_type(&self, name: &str, span: Span) -> Result<TypeId, RegistryError> {
        self.type_ids
            .get(name)
            .copied()
            .ok_or_else(|| RegistryError::unknown_type(name, span))
    }

    pub fn type_by_id(&self, id: TypeId) -> &DataType {
        &self.types[id.0]
    }

    pub fn is_user_type(&self, name: &str) -> bool {
        self.type_ids
            .get(name)
            .is_some_and(|id| !self.types[id.0].builtin)
    }

    pub fn enumerate_types(&self) -> impl Iterator<Item = &DataType> {
        self.types.iter()
    }

    /// Registers a struct's name as both a struct symbol and a new data
    /// type. Fails if the name is
    /// already a declared type.
    pub fn register_struct(
        &mut self,
        name: &str,
        members: Vec<Member>,
        span: Span,
    ) -> Result<(), RegistryError> {
        if self.type_ids.contains_key(name) {
            return Err(RegistryError::duplicate_type(name, span));
        }
        self.insert_type(name, false);
        self.structs.insert(
            name.to_string(),
            StructDef {
                name: name.to_string(),
                members,
            },
        );
        Ok(())
    }

    /// Pre-registers a struct's name as a type before its members are
    /// parsed, so that `struct Name { ... }`'s own name lexes as a type
    /// annotation starting at the token right after `Name`. Call
    /// [`register_struct`](Self::register_struct) once the member list
    /// is known to attach the layout.
    pub fn predeclare_type(&mut self, name: &str, span: Span) -> Result<(), RegistryError> {
        if self.type_ids.contains_key(name) {
            return Err(RegistryError::duplicate_type(name, span));
        }
        self.insert_type(name, false);
        Ok(())
    }

    pub fn struct_def(&self, name: &str) -> Option<&StructDef> {
        self.structs.get(name)
    }

    /// Registers a function. A prior forward declaration (no body) may be
    /// followed by a full definition with the same name; anything else
    /// duplicate is an error.
    pub fn register_function(&mut self, sig: FunctionSig, span: Span) -> Result<(), RegistryError> {
        if let Some(existing) = self.functions.get(&sig.name)
            && (existing.has_body || sig.has_body == existing.has_body)
        {
            return Err(RegistryError::duplicate_symbol(&sig.name, span));
        }
        self.functions.insert(sig.name.clone(), sig);
        Ok(())
    }

    pub fn function(&self, name: &str) -> Option<&FunctionSig> {
        self.functions.get(name)
    }

    /// Clears local variable/pointer/array bindings. Called by the parser
    /// before parsing each function body.
    pub fn enter_function_scope(&mut self) {
        self.locals.clear();
    }

    pub fn declare_local(
        &mut self,
        name: &str,
        ty: TypeRef,
        span: Span,
    ) -> Result<(), RegistryError> {
        if self.locals.contains_key(name) {
            return Err(RegistryError::duplicate_symbol(name, span));
        }
        self.locals.insert(name.to_string(), ty);
        Ok(())
    }

    pub fn local(&self, name: &str) -> Option<&TypeRef> {
        self.locals.get(name)
    }

    /// Resolves an identifier against locals, then functions, then
    /// types — the same order rvalue identifier lowering uses, reused
    /// here for parse-time disambiguation.
    pub fn resolve(&self, name: &str) -> Option<Resolved> {
        if let Some(ty) = self.locals.get(name) {
            return Some(Resolved::Local(ty.clone()));
        }
        if let Some(f) = self.functions.get(name) {
            return Some(Resolved::Function(f.clone()));
        }
        if let Some(id) = self.type_ids.get(name) {
            return Some(Resolved::Type(*id));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::rc::Rc;

    fn span() -> Span {
        Span::new(0, 0, 1, 1, Rc::new(PathBuf::from("t.syn")))
    }

    #[test]
    fn builtins_preregistered() {
        let reg = TypeRegistry::new();
        for name in BUILTIN_NAMES {
            assert!(reg.resolve_type(name, span()).is_ok());
        }
    }

    #[test]
    fn unknown_type_is_fatal() {
        let reg = TypeRegistry::new();
        assert!(reg.resolve_type("Widget", span()).is_err());
    }

    #[test]
    fn struct_registers_as_type_and_symbol() {
        let mut reg = TypeRegistry::new();
        reg.register_struct("Point", vec![], span()).unwrap();
        assert!(reg.is_user_type("Point"));
        assert!(reg.struct_def("Point").is_some());
    }

    #[test]
    fn duplicate_struct_name_rejected() {
        let mut reg = TypeRegistry::new();
        reg.register_struct("Point", vec![], span()).unwrap();
        assert!(reg.register_struct("Point", vec![], span()).is_err());
    }

    #[test]
    fn locals_cleared_between_functions() {
        let mut reg = TypeRegistry::new();
        let i32_id = reg.resolve_type("i32", span()).unwrap();
        reg.declare_local("x", TypeRef::Scalar(i32_id), span())
            .unwrap();
        assert!(reg.local("x").is_some());
        reg.enter_function_scope();
        assert!(reg.local("x").is_none());
    }

    #[test]
    fn duplicate_local_rejected() {
        let mut reg = TypeRegistry::new();
        let i32_id = reg.resolve_type("i32", span()).unwrap();
        reg.declare_local("x", TypeRef::Scalar(i32_id), span())
            .unwrap();
        assert!(
            reg.declare_local("x", TypeRef::Scalar(i32_id), span())
                .is_err()
        );
    }

    #[test]
    fn forward_declaration_then_definition_allowed() {
        let mut reg = TypeRegistry::new();
        let sig = FunctionSig {
            name: "foo".into(),
            params: vec![],
            variadic: false,
            return_type: None,
            has_body: false,
        };
        reg.register_function(sig, span()).unwrap();
        let sig2 = FunctionSig {
            name: "foo".into(),
            params: vec![],
            variadic: false,
            return_type: None,
            has_body: true,
        };
        reg.register_function(sig2, span()).unwrap();
        assert!(reg.function("foo").unwrap().has_body);
    }
}
