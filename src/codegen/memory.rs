//! The codegen registry: per-function
//! scope of LLVM values for variables, arrays, pointers and structs,
//! plus the loop-block stack used to lower `brk`/`cont`.

use std::collections::HashMap;

use inkwell::basic_block::BasicBlock;
use inkwell::values::PointerValue;

use crate::registry::TypeRef;

/// A declared local's stack slot and the shape it was declared with.
#[derive(Clone)]
pub(super) struct Slot<'ctx> {
    pub ptr: PointerValue<'ctx>,
    pub ty: TypeRef,
}

/// The pair of basic blocks an enclosing loop offers `brk`/`cont`
///: condition-check block for
/// `cont`, merge block for `brk`.
#[derive(Clone, Copy)]
pub(super) struct LoopBlocks<'ctx> {
    pub cond_check: BasicBlock<'ctx>,
    pub merge: BasicBlock<'ctx>,
}

#[derive(Default)]
pub(super) struct CodegenRegistry<'ctx> {
    locals: HashMap<String, Slot<'ctx>>,
    loop_stack: Vec<LoopBlocks<'ctx>>,
}

impl<'ctx> CodegenRegistry<'ctx> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears variable/pointer/array bindings when lowering crosses into
    /// the next function.
    pub fn enter_function(&mut self) {
        self.locals.clear();
        self.loop_stack.clear();
    }

    pub fn declare(&mut self, name: &str, ptr: PointerValue<'ctx>, ty: TypeRef) {
        self.locals.insert(name.to_string(), Slot { ptr, ty });
    }

    pub fn slot(&self, name: &str) -> Option<&Slot<'ctx>> {
        self.locals.get(name)
    }

    pub fn push_loop(&mut self, blocks: LoopBlocks<'ctx>) {
        self.loop_stack.push(blocks);
    }

    pub fn pop_loop(&mut self) {
        self.loop_stack.pop();
    }

    pub fn current_loop(&self) -> Option<LoopBlocks<'ctx>> {
        self.loop_stack.last().copied()
    }
}
