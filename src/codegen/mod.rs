//! AST-to-LLVM-IR lowering.
//!
//! [`Codegen`] owns the LLVM context plumbing and a per-function
//! [`memory::CodegenRegistry`] that is reset every time lowering crosses
//! into a new function body, mirroring the AST data registry's own
//! scope discipline.

mod emit;
mod error;
mod expr;
mod memory;
mod stmt;
mod types;
#[cfg(test)]
mod tests;

pub use error::CodegenError;

use std::collections::HashMap;
use std::path::Path;

use inkwell::AddressSpace;
use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::{Linkage, Module};
use inkwell::types::StructType;
use inkwell::values::FunctionValue;

use crate::ast::Program;
use crate::registry::TypeId;
use crate::registry::TypeRef;
use crate::registry::TypeRegistry;
use crate::token::Span;

use memory::CodegenRegistry;

pub struct Codegen<'ctx, 'r> {
    context: &'ctx Context,
    module: Module<'ctx>,
    builder: Builder<'ctx>,
    registry: &'r TypeRegistry,
    struct_types: HashMap<TypeId, StructType<'ctx>>,
    locals: CodegenRegistry<'ctx>,
    current_function: Option<FunctionValue<'ctx>>,
    /// `None` outside of a function body; `Some(None)` inside a void
    /// function; `Some(Some(ty))` inside a function returning `ty`.
    current_return: Option<Option<TypeRef>>,
}

impl<'ctx, 'r> Codegen<'ctx, 'r> {
    pub fn new(context: &'ctx Context, module_name: &str, registry: &'r TypeRegistry) -> Self {
        let module = context.create_module(module_name);
        let builder = context.create_builder();
        Codegen {
            context,
            module,
            builder,
            registry,
            struct_types: HashMap::new(),
            locals: CodegenRegistry::new(),
            current_function: None,
            current_return: None,
        }
    }

    /// Lowers a whole program: struct layouts, then every function
    /// signature (so forward calls resolve), then every function body.
    pub fn compile(&mut self, program: &Program, file_span: &Span) -> Result<(), CodegenError> {
        self.declare_struct_types(file_span)?;
        self.declare_runtime_stubs(file_span)?;

        for f in program.functions() {
            self.declare_function(f, file_span)?;
        }
        for f in program.functions() {
            if f.body.is_some() {
                self.lower_function(f)?;
            }
        }
        Ok(())
    }

    /// Declares `print`, `get_num` and `alloc_dyn_arr` as external
    /// functions so calls to them lower like any other call.
    fn declare_runtime_stubs(&mut self, span: &Span) -> Result<(), CodegenError> {
        for name in ["print", "get_num", "alloc_dyn_arr"] {
            let sig = self.registry.function(name).expect("runtime stubs are pre-registered").clone();
            self.declare_llvm_function(name, &sig, span)?;
        }
        Ok(())
    }

    fn declare_function(&mut self, f: &crate::ast::FunctionDecl, span: &Span) -> Result<(), CodegenError> {
        if self.module.get_function(&f.name).is_some() {
            return Ok(());
        }
        let sig = self.registry.function(&f.name).expect("function was registered while parsing").clone();
        self.declare_llvm_function(&f.name, &sig, span)?;
        Ok(())
    }

    fn declare_llvm_function(
        &mut self,
        name: &str,
        sig: &crate::registry::FunctionSig,
        span: &Span,
    ) -> Result<FunctionValue<'ctx>, CodegenError> {
        let param_types: Vec<inkwell::types::BasicMetadataTypeEnum<'ctx>> = sig
            .params
            .iter()
            .map(|p| self.llvm_type_ref(&p.ty, span).map(Into::into))
            .collect::<Result<_, _>>()?;

        let fn_type = match &sig.return_type {
            Some(ty) => self.llvm_type_ref(ty, span)?.fn_type(&param_types, sig.variadic),
            None => self.context.void_type().fn_type(&param_types, sig.variadic),
        };

        let linkage = if sig.has_body { None } else { Some(Linkage::External) };
        let function = self.module.add_function(name, fn_type, linkage);
        for (i, param) in sig.params.iter().enumerate() {
            if let Some(value) = function.get_nth_param(i as u32) {
                value.set_name(&param.name);
            }
        }
        Ok(function)
    }

    /// Returns the pointer address space used for all Syn pointers and
    /// opaque `str` values.
    pub(self) fn ptr_space(&self) -> AddressSpace {
        AddressSpace::default()
    }
}
