//! Built-in and struct type mapping.

use inkwell::AddressSpace;
use inkwell::types::{BasicType, BasicTypeEnum};

use crate::registry::{TypeId, TypeRef};
use crate::token::Span;

use super::Codegen;
use super::error::CodegenError;

impl<'ctx> Codegen<'ctx, '_> {
    /// Maps a builtin or struct [`TypeId`] to its IR type. Struct types
    /// must already be registered by [`Codegen::declare_struct_types`].
    pub(super) fn llvm_type(&self, id: TypeId, span: &Span) -> Result<BasicTypeEnum<'ctx>, CodegenError> {
        if let Some(st) = self.struct_types.get(&id) {
            return Ok((*st).into());
        }
        let name = self.registry.type_by_id(id).name.clone();
        Ok(match name.as_str() {
            "i8" => self.context.i8_type().into(),
            "i16" => self.context.i16_type().into(),
            "i32" => self.context.i32_type().into(),
            "i64" => self.context.i64_type().into(),
            "f32" => self.context.f32_type().into(),
            "f64" => self.context.f64_type().into(),
            "chr" => self.context.i8_type().into(),
            "bln" => self.context.bool_type().into(),
            "str" => self.context.i8_type().ptr_type(AddressSpace::default()).into(),
            "void" | "ptr" => {
                return Err(CodegenError::new(
                    format!("'{name}' cannot be used as a value type here"),
                    span.clone(),
                ));
            }
            other => {
                return Err(CodegenError::new(format!("unknown base type '{other}'"), span.clone()));
            }
        })
    }

    /// Maps a declaration's [`TypeRef`] (scalar, pointer or array shape)
    /// to its IR type.
    pub(super) fn llvm_type_ref(&self, ty: &TypeRef, span: &Span) -> Result<BasicTypeEnum<'ctx>, CodegenError> {
        match ty {
            TypeRef::Scalar(id) => self.llvm_type(*id, span),
            TypeRef::Pointer { base, degree } => {
                let mut ptr_ty = self.llvm_type(*base, span)?.ptr_type(AddressSpace::default());
                for _ in 1..*degree {
                    ptr_ty = ptr_ty.ptr_type(AddressSpace::default());
                }
                Ok(ptr_ty.into())
            }
            TypeRef::Array { elem, dims } => {
                let elem_ty = self.llvm_type(*elem, span)?;
                // Reverse the declared dimensions so repeated `[i]`
                // indexing unwinds outer to inner.
                let mut array_ty = elem_ty.array_type(*dims.last().unwrap() as u32);
                for &d in dims[..dims.len() - 1].iter().rev() {
                    array_ty = array_ty.array_type(d as u32);
                }
                Ok(array_ty.into())
            }
        }
    }

    /// Creates opaque named struct types for every registered struct so
    /// member types that reference earlier structs resolve, then fills
    /// in each body once all names exist.
    pub(super) fn declare_struct_types(&mut self, span: &Span) -> Result<(), CodegenError> {
        let struct_names: Vec<(TypeId, String)> = self
            .registry
            .enumerate_types()
            .filter(|t| !t.builtin)
            .map(|t| (t.id, t.name.clone()))
            .collect();

        for (id, name) in &struct_names {
            let opaque = self.context.opaque_struct_type(name);
            self.struct_types.insert(*id, opaque);
        }

        for (id, name) in &struct_names {
            let def = self
                .registry
                .struct_def(name)
                .ok_or_else(|| CodegenError::new(format!("struct '{name}' has no recorded layout"), span.clone()))?;
            let mut field_types = Vec::with_capacity(def.members.len());
            for member in &def.members {
                field_types.push(self.llvm_type_ref(&member.ty, span)?);
            }
            self.struct_types[id].set_body(&field_types, false);
        }
        Ok(())
    }
}
