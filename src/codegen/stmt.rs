//! Function, block and control-flow lowering.

use inkwell::values::IntValue;

use crate::ast::{ArrayInit, AssignTarget, FunctionDecl, IfStmt, Stmt, StmtKind, WhileStmt};
use crate::registry::TypeRef;
use crate::token::Span;

use super::Codegen;
use super::error::CodegenError;
use super::expr::ValKind;
use super::memory::LoopBlocks;

impl<'ctx> Codegen<'ctx, '_> {
    pub(super) fn lower_function(&mut self, f: &FunctionDecl) -> Result<(), CodegenError> {
        let function = self.module.get_function(&f.name).expect("function was declared before lowering");
        self.locals.enter_function();
        self.current_function = Some(function);
        self.current_return = Some(f.return_type.clone());

        let entry = self.context.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);

        for (i, param) in f.params.iter().enumerate() {
            let llvm_ty = self.llvm_type_ref(&param.ty, &f.span)?;
            let alloca = self.builder.build_alloca(llvm_ty, &param.name).map_err(build_err(&f.span))?;
            let incoming = function.get_nth_param(i as u32).expect("param count matches signature");
            self.builder.build_store(alloca, incoming).map_err(build_err(&f.span))?;
            self.locals.declare(&param.name, alloca, param.ty.clone());
        }

        let body = f.body.as_ref().expect("lower_function is only called for defined functions");
        self.lower_stmts(body)?;

        if self.current_block_is_open() {
            match &f.return_type {
                None => {
                    self.builder.build_return(None).map_err(build_err(&f.span))?;
                }
                Some(_) => {
                    return Err(CodegenError::new(
                        format!("function '{}' does not return on all paths", f.name),
                        f.span.clone(),
                    ));
                }
            }
        }

        self.current_function = None;
        self.current_return = None;
        Ok(())
    }

    fn current_block_is_open(&self) -> bool {
        self.builder.get_insert_block().map(|b| b.get_terminator().is_none()).unwrap_or(false)
    }

    /// Lowers a sequence of statements into the current block, stopping
    /// early once a terminator has been emitted (a `ret`/`brk`/`cont`
    /// makes everything after it in the same block unreachable).
    pub(super) fn lower_stmts(&mut self, stmts: &[Stmt]) -> Result<(), CodegenError> {
        for stmt in stmts {
            self.lower_stmt(stmt)?;
            if !self.current_block_is_open() {
                break;
            }
        }
        Ok(())
    }

    fn lower_stmt(&mut self, stmt: &Stmt) -> Result<(), CodegenError> {
        match &stmt.kind {
            StmtKind::NoOp | StmtKind::DocComment(_) => Ok(()),
            StmtKind::VarDecl(decl) => self.lower_var_decl(decl, &stmt.span),
            StmtKind::ArrayDecl(decl) => self.lower_array_decl(decl, &stmt.span),
            StmtKind::ExprStmt(expr) => {
                if let crate::ast::ExprKind::Call { callee, args } = &expr.kind {
                    self.lower_call(callee, args, &expr.span)?;
                } else {
                    self.lower_expr(expr)?;
                }
                Ok(())
            }
            StmtKind::Assign { target, value } => self.lower_assign(target, value, &stmt.span),
            StmtKind::If(if_stmt) => self.lower_if(if_stmt, &stmt.span),
            StmtKind::While(while_stmt) => self.lower_while(while_stmt, &stmt.span),
            StmtKind::Return(expr) => self.lower_return(expr.as_ref(), &stmt.span),
            StmtKind::Break => self.lower_break(&stmt.span),
            StmtKind::Continue => self.lower_continue(&stmt.span),
        }
    }

    fn lower_var_decl(&mut self, decl: &crate::ast::VarDecl, span: &Span) -> Result<(), CodegenError> {
        let llvm_ty = self.llvm_type_ref(&decl.ty, span)?;
        let alloca = self.builder.build_alloca(llvm_ty, &decl.name).map_err(build_err(span))?;
        if let Some(init) = &decl.init {
            let (value, kind) = self.lower_expr(init)?;
            let expected = self.value_kind(&decl.ty, span)?;
            if kind != expected {
                return Err(CodegenError::mismatched_operand_types("=", span.clone()));
            }
            self.builder.build_store(alloca, value).map_err(build_err(span))?;
        }
        self.locals.declare(&decl.name, alloca, decl.ty.clone());
        Ok(())
    }

    fn lower_array_decl(&mut self, decl: &crate::ast::ArrayDecl, span: &Span) -> Result<(), CodegenError> {
        let ty = TypeRef::Array { elem: decl.elem_ty, dims: decl.dims.clone() };
        let llvm_ty = self.llvm_type_ref(&ty, span)?;
        let alloca = self.builder.build_alloca(llvm_ty, &decl.name).map_err(build_err(span))?;
        if let Some(init) = &decl.init {
            let mut path = Vec::new();
            self.store_array_init(alloca, llvm_ty, decl.elem_ty, init, &mut path, span)?;
        }
        self.locals.declare(&decl.name, alloca, ty);
        Ok(())
    }

    fn store_array_init(
        &mut self,
        array_ptr: inkwell::values::PointerValue<'ctx>,
        array_llvm_ty: inkwell::types::BasicTypeEnum<'ctx>,
        elem_ty: crate::registry::TypeId,
        init: &ArrayInit,
        path: &mut Vec<u64>,
        span: &Span,
    ) -> Result<(), CodegenError> {
        match init {
            ArrayInit::Row(children) => {
                for (i, child) in children.iter().enumerate() {
                    path.push(i as u64);
                    self.store_array_init(array_ptr, array_llvm_ty, elem_ty, child, path, span)?;
                    path.pop();
                }
                Ok(())
            }
            ArrayInit::Elem(expr) => {
                let i32_ty = self.context.i32_type();
                let mut indices: Vec<IntValue<'ctx>> = vec![i32_ty.const_int(0, false)];
                indices.extend(path.iter().map(|&i| i32_ty.const_int(i, false)));
                let addr = unsafe {
                    self.builder
                        .build_in_bounds_gep(array_llvm_ty, array_ptr, &indices, "ainit")
                        .map_err(build_err(span))?
                };
                let (value, kind) = self.lower_expr(expr)?;
                let expected = self.value_kind(&TypeRef::Scalar(elem_ty), span)?;
                if kind != expected {
                    return Err(CodegenError::mismatched_operand_types("=", span.clone()));
                }
                self.builder.build_store(addr, value).map_err(build_err(span))?;
                Ok(())
            }
        }
    }

    fn lower_assign(&mut self, target: &AssignTarget, value: &crate::ast::Expr, span: &Span) -> Result<(), CodegenError> {
        match target {
            AssignTarget::Scalar(name) => {
                let (ptr, ty) = self.identifier_address(name, span)?;
                let expected = self.value_kind(&ty, span)?;
                let (v, kind) = self.lower_expr(value)?;
                if kind != expected {
                    return Err(CodegenError::mismatched_operand_types("=", span.clone()));
                }
                self.builder.build_store(ptr, v).map_err(build_err(span))?;
                Ok(())
            }
            AssignTarget::ArrayWhole(name) => {
                let (dst_ptr, dst_ty) = self.identifier_address(name, span)?;
                let crate::ast::ExprKind::Identifier(src_name) = &value.kind else {
                    return Err(CodegenError::new("array-whole assignment requires an array identifier on the right-hand side", span.clone()));
                };
                let (src_ptr, src_ty) = self.identifier_address(src_name, span)?;
                if src_ty != dst_ty {
                    return Err(CodegenError::mismatched_operand_types("=", span.clone()));
                }
                let llvm_ty = self.llvm_type_ref(&dst_ty, span)?;
                let whole = self.builder.build_load(llvm_ty, src_ptr, "whole_array").map_err(build_err(span))?;
                self.builder.build_store(dst_ptr, whole).map_err(build_err(span))?;
                Ok(())
            }
            AssignTarget::ArrayElement { base, indices } => {
                let (addr, elem_ty) = self.array_element_address(base, indices, span)?;
                let expected = self.value_kind(&elem_ty, span)?;
                let (v, kind) = self.lower_expr(value)?;
                if kind != expected {
                    return Err(CodegenError::mismatched_operand_types("=", span.clone()));
                }
                self.builder.build_store(addr, v).map_err(build_err(span))?;
                Ok(())
            }
            AssignTarget::PointerDeref(ptr_expr) => {
                let (ptr_val, ptr_kind) = self.lower_expr(ptr_expr)?;
                if ptr_kind != ValKind::Pointer {
                    return Err(CodegenError::unsupported_operator("*", span.clone()));
                }
                let crate::ast::ExprKind::Identifier(name) = &ptr_expr.kind else {
                    return Err(CodegenError::new("dereference assignment target must be a pointer identifier", span.clone()));
                };
                let (_, ty) = self.identifier_address(name, span)?;
                let pointee_ty = match ty {
                    TypeRef::Pointer { base, degree } if degree > 1 => TypeRef::Pointer { base, degree: degree - 1 },
                    TypeRef::Pointer { base, .. } => TypeRef::Scalar(base),
                    _ => return Err(CodegenError::new(format!("'{name}' is not a pointer"), span.clone())),
                };
                let expected = self.value_kind(&pointee_ty, span)?;
                let (v, kind) = self.lower_expr(value)?;
                if kind != expected {
                    return Err(CodegenError::mismatched_operand_types("=", span.clone()));
                }
                self.builder.build_store(ptr_val.into_pointer_value(), v).map_err(build_err(span))?;
                Ok(())
            }
            AssignTarget::StructMember { path } => {
                let (addr, ty) = self.struct_member_address(path, span)?;
                let expected = self.value_kind(&ty, span)?;
                let (v, kind) = self.lower_expr(value)?;
                if kind != expected {
                    return Err(CodegenError::mismatched_operand_types("=", span.clone()));
                }
                self.builder.build_store(addr, v).map_err(build_err(span))?;
                Ok(())
            }
        }
    }

    /// Lowers `if`/`elif*`/`else?`: each `elif`
    /// condition gets its own block (`elif_cond_k`) so only the arm
    /// whose condition is true ever evaluates the next one.
    fn lower_if(&mut self, stmt: &IfStmt, span: &Span) -> Result<(), CodegenError> {
        let function = self.current_function.expect("if is always lowered inside a function");
        let merge_bb = self.context.append_basic_block(function, "ifmrg");
        let then_bb = self.context.append_basic_block(function, "if");
        let else_bb = if stmt.else_block.is_some() {
            Some(self.context.append_basic_block(function, "else"))
        } else {
            None
        };

        let mut elif_cond_bbs = Vec::with_capacity(stmt.elifs.len());
        let mut elif_body_bbs = Vec::with_capacity(stmt.elifs.len());
        for i in 0..stmt.elifs.len() {
            elif_cond_bbs.push(self.context.append_basic_block(function, &format!("elif_cond_{i}")));
            elif_body_bbs.push(self.context.append_basic_block(function, "elif"));
        }

        // Tracks whether any arm actually falls through into `merge_bb`.
        // When an `if`/`elif`/`else` chain's every arm ends in `ret`, the
        // merge block is unreachable and must not be left without a
        // terminator of its own.
        let mut merge_reachable = else_bb.is_none();

        let cond0 = self.lower_condition(&stmt.condition)?;
        let first_else_target = elif_cond_bbs.first().copied().or(else_bb).unwrap_or(merge_bb);
        self.builder.build_conditional_branch(cond0, then_bb, first_else_target).map_err(build_err(span))?;

        self.builder.position_at_end(then_bb);
        self.lower_stmts(&stmt.then_block)?;
        if self.current_block_is_open() {
            self.builder.build_unconditional_branch(merge_bb).map_err(build_err(span))?;
            merge_reachable = true;
        }

        for (i, (cond_expr, body)) in stmt.elifs.iter().enumerate() {
            self.builder.position_at_end(elif_cond_bbs[i]);
            let cond_val = self.lower_condition(cond_expr)?;
            let next = elif_cond_bbs.get(i + 1).copied().or(else_bb).unwrap_or(merge_bb);
            self.builder.build_conditional_branch(cond_val, elif_body_bbs[i], next).map_err(build_err(span))?;

            self.builder.position_at_end(elif_body_bbs[i]);
            self.lower_stmts(body)?;
            if self.current_block_is_open() {
                self.builder.build_unconditional_branch(merge_bb).map_err(build_err(span))?;
                merge_reachable = true;
            }
        }

        if let Some(else_bb) = else_bb {
            self.builder.position_at_end(else_bb);
            self.lower_stmts(stmt.else_block.as_ref().unwrap())?;
            if self.current_block_is_open() {
                self.builder.build_unconditional_branch(merge_bb).map_err(build_err(span))?;
                merge_reachable = true;
            }
        }

        self.builder.position_at_end(merge_bb);
        if !merge_reachable {
            self.builder.build_unreachable().map_err(build_err(span))?;
        }
        Ok(())
    }

    /// Lowers `while`, pushing the loop's
    /// condition-check/merge pair for nested `brk`/`cont`.
    fn lower_while(&mut self, stmt: &WhileStmt, span: &Span) -> Result<(), CodegenError> {
        let function = self.current_function.expect("while is always lowered inside a function");
        let cond_bb = self.context.append_basic_block(function, "while_cond_check");
        let body_bb = self.context.append_basic_block(function, "while");
        let merge_bb = self.context.append_basic_block(function, "whmerge");

        self.builder.build_unconditional_branch(cond_bb).map_err(build_err(span))?;

        self.builder.position_at_end(cond_bb);
        let cond_val = self.lower_condition(&stmt.condition)?;
        self.builder.build_conditional_branch(cond_val, body_bb, merge_bb).map_err(build_err(span))?;

        self.locals.push_loop(LoopBlocks { cond_check: cond_bb, merge: merge_bb });
        self.builder.position_at_end(body_bb);
        self.lower_stmts(&stmt.body)?;
        if self.current_block_is_open() {
            self.builder.build_unconditional_branch(cond_bb).map_err(build_err(span))?;
        }
        self.locals.pop_loop();

        self.builder.position_at_end(merge_bb);
        Ok(())
    }

    /// Lowers a condition expression to an `i1`: a boolean value passes
    /// through, any other integer is compared against zero (C-style
    /// truthiness, since the grammar allows a bare `i32` as a condition).
    fn lower_condition(&mut self, expr: &crate::ast::Expr) -> Result<inkwell::values::IntValue<'ctx>, CodegenError> {
        let (value, kind) = self.lower_expr(expr)?;
        let ValKind::Int(width) = kind else {
            return Err(CodegenError::unsupported_operator("condition", expr.span.clone()));
        };
        let int_val = value.into_int_value();
        if width == 1 {
            return Ok(int_val);
        }
        let zero = self.context.custom_width_int_type(width).const_int(0, false);
        self.builder
            .build_int_compare(inkwell::IntPredicate::NE, int_val, zero, "truthy")
            .map_err(build_err(&expr.span))
    }

    fn lower_return(&mut self, expr: Option<&crate::ast::Expr>, span: &Span) -> Result<(), CodegenError> {
        let expected = self
            .current_return
            .clone()
            .ok_or_else(|| CodegenError::without_span("'ret' used outside of a function"))?;
        match (expected, expr) {
            (None, Some(e)) => Err(CodegenError::new("a void function cannot return a value", e.span.clone())),
            (None, None) => {
                self.builder.build_return(None).map_err(build_err(span))?;
                Ok(())
            }
            (Some(_), None) => Err(CodegenError::new("missing return value", span.clone())),
            (Some(ty), Some(e)) => {
                let (value, kind) = self.lower_expr(e)?;
                let expected_kind = self.value_kind(&ty, span)?;
                if kind != expected_kind {
                    return Err(CodegenError::mismatched_operand_types("ret", span.clone()));
                }
                self.builder.build_return(Some(&value)).map_err(build_err(span))?;
                Ok(())
            }
        }
    }

    fn lower_break(&mut self, span: &Span) -> Result<(), CodegenError> {
        let loop_blocks = self.locals.current_loop().ok_or_else(|| CodegenError::break_outside_loop(span.clone()))?;
        self.builder.build_unconditional_branch(loop_blocks.merge).map_err(build_err(span))?;
        Ok(())
    }

    fn lower_continue(&mut self, span: &Span) -> Result<(), CodegenError> {
        let loop_blocks = self.locals.current_loop().ok_or_else(|| CodegenError::continue_outside_loop(span.clone()))?;
        self.builder.build_unconditional_branch(loop_blocks.cond_check).map_err(build_err(span))?;
        Ok(())
    }
}

fn build_err<'a, E: std::fmt::Debug>(span: &'a Span) -> impl Fn(E) -> CodegenError + 'a {
    move |e| CodegenError::new(format!("{e:?}"), span.clone())
}
