//! Expression and lvalue lowering.

use inkwell::{FloatPredicate, IntPredicate};
use inkwell::values::{BasicValueEnum, PointerValue};

use crate::ast::{Expr, ExprKind};
use crate::registry::{FunctionSig, TypeRef};
use crate::token::{Op, Span};

use super::Codegen;
use super::error::CodegenError;

/// A lowered value's operator-relevant shape: arithmetic/comparison
/// lowering only needs to know integer width, float width, or pointer,
/// never the full source type name.
#[derive(Clone, Copy, PartialEq, Debug)]
pub(super) enum ValKind {
    Int(u32),
    Float { double: bool },
    Pointer,
}

pub(super) type Lowered<'ctx> = (BasicValueEnum<'ctx>, ValKind);

impl<'ctx> Codegen<'ctx, '_> {
    pub(super) fn value_kind(&self, ty: &TypeRef, span: &Span) -> Result<ValKind, CodegenError> {
        Ok(match ty {
            TypeRef::Pointer { .. } => ValKind::Pointer,
            TypeRef::Array { .. } => {
                return Err(CodegenError::new("an array cannot be used as a scalar value", span.clone()));
            }
            TypeRef::Scalar(id) => match self.registry.type_by_id(*id).name.as_str() {
                "i8" | "chr" => ValKind::Int(8),
                "i16" => ValKind::Int(16),
                "i32" => ValKind::Int(32),
                "i64" => ValKind::Int(64),
                "bln" => ValKind::Int(1),
                "f32" => ValKind::Float { double: false },
                "f64" => ValKind::Float { double: true },
                "str" => ValKind::Pointer,
                _ => {
                    return Err(CodegenError::new("struct values cannot appear in an operator expression", span.clone()));
                }
            },
        })
    }

    pub(super) fn lower_expr(&mut self, expr: &Expr) -> Result<Lowered<'ctx>, CodegenError> {
        match &expr.kind {
            ExprKind::Integer(n) => {
                let ty = self.context.i32_type();
                Ok((ty.const_int(*n as u64, true).into(), ValKind::Int(32)))
            }
            ExprKind::Float(f) => {
                let ty = self.context.f64_type();
                Ok((ty.const_float(*f).into(), ValKind::Float { double: true }))
            }
            ExprKind::Bool(b) => {
                let ty = self.context.bool_type();
                Ok((ty.const_int(*b as u64, false).into(), ValKind::Int(1)))
            }
            ExprKind::Null => {
                let ptr_ty = self.context.i8_type().ptr_type(self.ptr_space());
                Ok((ptr_ty.const_null().into(), ValKind::Pointer))
            }
            ExprKind::StringLiteral(s) => {
                let decoded = decode_escapes(s);
                let global = self
                    .builder
                    .build_global_string_ptr(&decoded, "str")
                    .map_err(|e| CodegenError::new(format!("failed to emit string literal: {e:?}"), expr.span.clone()))?;
                Ok((global.as_pointer_value().into(), ValKind::Pointer))
            }
            ExprKind::Identifier(name) => self.lower_identifier_rvalue(name, &expr.span),
            ExprKind::ArrayElement { base, indices } => {
                let (ptr, elem_ty) = self.array_element_address(base, indices, &expr.span)?;
                let kind = self.value_kind(&elem_ty, &expr.span)?;
                let loaded = self
                    .builder
                    .build_load(ptr, "elem")
                    .map_err(|e| CodegenError::new(format!("failed to load array element: {e:?}"), expr.span.clone()))?;
                Ok((loaded, kind))
            }
            ExprKind::Call { callee, args } => {
                let (value, kind) = self.lower_call(callee, args, &expr.span)?;
                let value = value.ok_or_else(|| CodegenError::void_in_expression(callee, expr.span.clone()))?;
                Ok((value, kind))
            }
            ExprKind::Unary { op, operand } => self.lower_unary(*op, operand, &expr.span),
            ExprKind::Binary { op, lhs, rhs } => self.lower_binary(*op, lhs, rhs, &expr.span),
        }
    }

    fn lower_identifier_rvalue(&mut self, name: &str, span: &Span) -> Result<Lowered<'ctx>, CodegenError> {
        let slot = self
            .locals
            .slot(name)
            .ok_or_else(|| CodegenError::unresolved_identifier(name, span.clone()))?
            .clone();
        let kind = self.value_kind(&slot.ty, span)?;
        let value = self
            .builder
            .build_load(slot.ptr, name)
            .map_err(|e| CodegenError::new(format!("failed to load '{name}': {e:?}"), span.clone()))?;
        Ok((value, kind))
    }

    /// The address of a plain local identifier, used by assignment and
    /// by unary `&`.
    pub(super) fn identifier_address(&self, name: &str, span: &Span) -> Result<(PointerValue<'ctx>, TypeRef), CodegenError> {
        let slot = self.locals.slot(name).ok_or_else(|| CodegenError::unresolved_identifier(name, span.clone()))?;
        Ok((slot.ptr, slot.ty.clone()))
    }

    /// Computes the address of `base[i1][i2]…`, dispatching on whether
    /// `base` is a statically shaped array or a pointer.
    ///
    /// For a statically shaped array we emit a single in-bounds GEP with
    /// one leading zero (to step through the alloca's pointer) followed
    /// by one index per declared dimension — the standard LLVM nested
    /// -array addressing scheme. (The source material describes this as
    /// a zero inserted before *every* dimension index; taken literally
    /// against a flat nested-array alloca that double-indexes past the
    /// element on every dimension after the first, so this lowering
    /// keeps the single-leading-zero form that is actually correct for
    /// the array type layout built in [`Codegen::llvm_type_ref`].)
    pub(super) fn array_element_address(
        &mut self,
        base: &str,
        indices: &[Expr],
        span: &Span,
    ) -> Result<(PointerValue<'ctx>, TypeRef), CodegenError> {
        let slot = self.locals.slot(base).ok_or_else(|| CodegenError::unresolved_identifier(base, span.clone()))?.clone();

        match &slot.ty {
            TypeRef::Array { elem, dims } => {
                if indices.len() != dims.len() {
                    return Err(CodegenError::new(
                        format!("'{base}' has {} dimension(s), found {} index(es)", dims.len(), indices.len()),
                        span.clone(),
                    ));
                }
                let array_llvm_ty = self.llvm_type_ref(&slot.ty, span)?;
                let i32_ty = self.context.i32_type();
                let mut gep_indices = vec![i32_ty.const_int(0, false)];
                for idx_expr in indices {
                    let (v, kind) = self.lower_expr(idx_expr)?;
                    if !matches!(kind, ValKind::Int(_)) {
                        return Err(CodegenError::unsupported_operator("array index", idx_expr.span.clone()));
                    }
                    gep_indices.push(v.into_int_value());
                }
                let addr = unsafe {
                    self.builder
                        .build_in_bounds_gep(array_llvm_ty, slot.ptr, &gep_indices, "aidx")
                        .map_err(|e| CodegenError::new(format!("failed to address array element: {e:?}"), span.clone()))?
                };
                Ok((addr, TypeRef::Scalar(*elem)))
            }
            TypeRef::Pointer { base: elem, degree } => {
                if indices.len() != 1 {
                    return Err(CodegenError::new(
                        "pointer-to-array indexing takes exactly one index",
                        span.clone(),
                    ));
                }
                let pointee_ty = if *degree > 1 {
                    TypeRef::Pointer { base: *elem, degree: degree - 1 }
                } else {
                    TypeRef::Scalar(*elem)
                };
                let elem_llvm_ty = self.llvm_type_ref(&pointee_ty, span)?;
                let ptr_val = self
                    .builder
                    .build_load(self.context.ptr_type(self.ptr_space()), slot.ptr, base)
                    .map_err(|e| CodegenError::new(format!("failed to load '{base}': {e:?}"), span.clone()))?
                    .into_pointer_value();
                let (v, kind) = self.lower_expr(&indices[0])?;
                if !matches!(kind, ValKind::Int(_)) {
                    return Err(CodegenError::unsupported_operator("array index", indices[0].span.clone()));
                }
                let addr = unsafe {
                    self.builder
                        .build_in_bounds_gep(elem_llvm_ty, ptr_val, &[v.into_int_value()], "pidx")
                        .map_err(|e| CodegenError::new(format!("failed to address pointer element: {e:?}"), span.clone()))?
                };
                Ok((addr, pointee_ty))
            }
            _ => Err(CodegenError::new(format!("'{base}' is not indexable"), span.clone())),
        }
    }

    /// Walks a `a.b.c` member chain to a final field address. Pointer-to-struct is
    /// rejected, per the explicitly deferred Open Question.
    pub(super) fn struct_member_address(&self, path: &[String], span: &Span) -> Result<(PointerValue<'ctx>, TypeRef), CodegenError> {
        let (mut ptr, mut ty) = self.identifier_address(&path[0], span)?;
        for field in &path[1..] {
            let struct_id = match &ty {
                TypeRef::Scalar(id) if self.struct_types.contains_key(id) => *id,
                TypeRef::Pointer { .. } => return Err(CodegenError::pointer_to_struct_unsupported(span.clone())),
                _ => return Err(CodegenError::new(format!("'{field}' accessed on a non-struct value"), span.clone())),
            };
            let struct_name = self.registry.type_by_id(struct_id).name.clone();
            let def = self
                .registry
                .struct_def(&struct_name)
                .ok_or_else(|| CodegenError::new(format!("struct '{struct_name}' has no recorded layout"), span.clone()))?;
            let (index, member) = def
                .member_index(field)
                .ok_or_else(|| CodegenError::new(format!("struct '{struct_name}' has no member '{field}'"), span.clone()))?;
            let struct_llvm_ty = self.struct_types[&struct_id];
            ptr = self
                .builder
                .build_struct_gep(struct_llvm_ty, ptr, index as u32, field)
                .map_err(|e| CodegenError::new(format!("failed to address member '{field}': {e:?}"), span.clone()))?;
            ty = member.ty.clone();
        }
        Ok((ptr, ty))
    }

    pub(super) fn lower_call(&mut self, callee: &str, args: &[Expr], span: &Span) -> Result<(Option<BasicValueEnum<'ctx>>, ValKind), CodegenError> {
        let sig: FunctionSig = self
            .registry
            .function(callee)
            .ok_or_else(|| CodegenError::undeclared_function(callee, span.clone()))?
            .clone();

        if args.len() < sig.params.len() || (!sig.variadic && args.len() != sig.params.len()) {
            return Err(CodegenError::argument_count_mismatch(callee, sig.params.len(), args.len(), span.clone()));
        }

        let function = self.module.get_function(callee).ok_or_else(|| CodegenError::undeclared_function(callee, span.clone()))?;

        let mut arg_values: Vec<inkwell::values::BasicMetadataValueEnum<'ctx>> = Vec::with_capacity(args.len());
        for (i, arg) in args.iter().enumerate() {
            let (value, kind) = self.lower_expr(arg)?;
            let promoted = if sig.variadic && i >= sig.params.len() {
                self.promote_variadic(value, kind)
            } else {
                value
            };
            arg_values.push(promoted.into());
        }

        let call_site = self
            .builder
            .build_call(function, &arg_values, "call")
            .map_err(|e| CodegenError::new(format!("failed to emit call to '{callee}': {e:?}"), span.clone()))?;

        match &sig.return_type {
            None => Ok((None, ValKind::Int(32))),
            Some(ty) => {
                let kind = self.value_kind(ty, span)?;
                let value = call_site
                    .try_as_basic_value()
                    .left()
                    .ok_or_else(|| CodegenError::new(format!("call to '{callee}' produced no value"), span.clone()))?;
                Ok((Some(value), kind))
            }
        }
    }

    /// Classic C variadic promotion: sub-32-bit integers widen to
    /// `i32`, `f32` widens to `f64`.
    fn promote_variadic(&self, value: BasicValueEnum<'ctx>, kind: ValKind) -> BasicValueEnum<'ctx> {
        match kind {
            ValKind::Int(w) if w < 32 => self
                .builder
                .build_int_s_extend(value.into_int_value(), self.context.i32_type(), "promo")
                .map(Into::into)
                .unwrap_or(value),
            ValKind::Float { double: false } => self
                .builder
                .build_float_ext(value.into_float_value(), self.context.f64_type(), "promo")
                .map(Into::into)
                .unwrap_or(value),
            _ => value,
        }
    }

    fn lower_unary(&mut self, op: Op, operand: &Expr, span: &Span) -> Result<Lowered<'ctx>, CodegenError> {
        match op {
            Op::Amp => {
                let ExprKind::Identifier(name) = &operand.kind else {
                    return Err(CodegenError::unsupported_operator("&", span.clone()));
                };
                let (ptr, _) = self.identifier_address(name, span)?;
                Ok((ptr.into(), ValKind::Pointer))
            }
            Op::Star => {
                let (ptr_val, ptr_kind) = self.lower_expr(operand)?;
                if ptr_kind != ValKind::Pointer {
                    return Err(CodegenError::unsupported_operator("*", span.clone()));
                }
                let pointee_ty = self.deref_type(operand, span)?;
                let llvm_ty = self.llvm_type_ref(&pointee_ty, span)?;
                let loaded = self
                    .builder
                    .build_load(llvm_ty, ptr_val.into_pointer_value(), "deref")
                    .map_err(|e| CodegenError::new(format!("failed to dereference pointer: {e:?}"), span.clone()))?;
                let kind = self.value_kind(&pointee_ty, span)?;
                Ok((loaded, kind))
            }
            Op::Minus => {
                let (v, kind) = self.lower_expr(operand)?;
                match kind {
                    ValKind::Int(_) => Ok((
                        self.builder.build_int_neg(v.into_int_value(), "neg").map(Into::into).map_err(build_err(span))?,
                        kind,
                    )),
                    ValKind::Float { .. } => Ok((
                        self.builder.build_float_neg(v.into_float_value(), "fneg").map(Into::into).map_err(build_err(span))?,
                        kind,
                    )),
                    ValKind::Pointer => Err(CodegenError::unsupported_operator("-", span.clone())),
                }
            }
            Op::Plus => self.lower_expr(operand),
            Op::Bang | Op::Tilde => {
                let (v, kind) = self.lower_expr(operand)?;
                match kind {
                    ValKind::Int(_) => {
                        Ok((self.builder.build_not(v.into_int_value(), "not").map(Into::into).map_err(build_err(span))?, kind))
                    }
                    _ => Err(CodegenError::unsupported_operator(op.text(), span.clone())),
                }
            }
            Op::PlusPlus | Op::MinusMinus => {
                let ExprKind::Identifier(name) = &operand.kind else {
                    return Err(CodegenError::unsupported_operator(op.text(), span.clone()));
                };
                let (ptr, ty) = self.identifier_address(name, span)?;
                let kind = self.value_kind(&ty, span)?;
                let ValKind::Int(width) = kind else {
                    return Err(CodegenError::unsupported_operator(op.text(), span.clone()));
                };
                let llvm_ty = self.llvm_type_ref(&ty, span)?;
                let current = self
                    .builder
                    .build_load(llvm_ty, ptr, name)
                    .map_err(build_err(span))?
                    .into_int_value();
                let one = self.context.custom_width_int_type(width).const_int(1, false);
                let updated = if op == Op::PlusPlus {
                    self.builder.build_int_add(current, one, "inc")
                } else {
                    self.builder.build_int_sub(current, one, "dec")
                }
                .map_err(build_err(span))?;
                self.builder.build_store(ptr, updated).map_err(build_err(span))?;
                Ok((updated.into(), kind))
            }
            other => Err(CodegenError::unsupported_operator(other.text(), span.clone())),
        }
    }

    /// The pointee `TypeRef` of a pointer-typed expression, used by `*`.
    fn deref_type(&self, expr: &Expr, span: &Span) -> Result<TypeRef, CodegenError> {
        let ExprKind::Identifier(name) = &expr.kind else {
            return Err(CodegenError::new("dereferencing a non-identifier pointer expression is not supported", span.clone()));
        };
        let (_, ty) = self.identifier_address(name, span)?;
        match ty {
            TypeRef::Pointer { base, degree } if degree > 1 => Ok(TypeRef::Pointer { base, degree: degree - 1 }),
            TypeRef::Pointer { base, .. } => Ok(TypeRef::Scalar(base)),
            _ => Err(CodegenError::new(format!("'{name}' is not a pointer"), span.clone())),
        }
    }

    fn lower_binary(&mut self, op: Op, lhs: &Expr, rhs: &Expr, span: &Span) -> Result<Lowered<'ctx>, CodegenError> {
        let (l, lk) = self.lower_expr(lhs)?;
        let (r, rk) = self.lower_expr(rhs)?;
        if lk != rk {
            return Err(CodegenError::mismatched_operand_types(op.text(), span.clone()));
        }

        match lk {
            ValKind::Int(_) => self.lower_int_binary(op, l.into_int_value(), r.into_int_value(), lk, span),
            ValKind::Float { .. } => self.lower_float_binary(op, l.into_float_value(), r.into_float_value(), span),
            ValKind::Pointer => Err(CodegenError::unsupported_operator(op.text(), span.clone())),
        }
    }

    fn lower_int_binary(
        &mut self,
        op: Op,
        l: inkwell::values::IntValue<'ctx>,
        r: inkwell::values::IntValue<'ctx>,
        kind: ValKind,
        span: &Span,
    ) -> Result<Lowered<'ctx>, CodegenError> {
        let b = &self.builder;
        let (value, result_kind): (BasicValueEnum<'ctx>, ValKind) = match op {
            Op::Plus => (b.build_int_add(l, r, "add").map_err(build_err(span))?.into(), kind),
            Op::Minus => (b.build_int_sub(l, r, "sub").map_err(build_err(span))?.into(), kind),
            Op::Star => (b.build_int_mul(l, r, "mul").map_err(build_err(span))?.into(), kind),
            Op::Slash => (b.build_int_signed_div(l, r, "div").map_err(build_err(span))?.into(), kind),
            Op::Percent => (b.build_int_signed_rem(l, r, "rem").map_err(build_err(span))?.into(), kind),
            Op::Amp => (b.build_and(l, r, "and").map_err(build_err(span))?.into(), kind),
            Op::Pipe => (b.build_or(l, r, "or").map_err(build_err(span))?.into(), kind),
            Op::Caret => (b.build_xor(l, r, "xor").map_err(build_err(span))?.into(), kind),
            Op::AndAnd => (b.build_and(l, r, "land").map_err(build_err(span))?.into(), kind),
            Op::OrOr => (b.build_or(l, r, "lor").map_err(build_err(span))?.into(), kind),
            Op::Shl => (b.build_left_shift(l, r, "shl").map_err(build_err(span))?.into(), kind),
            Op::Shr => (b.build_right_shift(l, r, true, "shr").map_err(build_err(span))?.into(), kind),
            Op::EqEq => (b.build_int_compare(IntPredicate::EQ, l, r, "eq").map_err(build_err(span))?.into(), ValKind::Int(1)),
            Op::NotEq => (b.build_int_compare(IntPredicate::NE, l, r, "ne").map_err(build_err(span))?.into(), ValKind::Int(1)),
            Op::Lt => (b.build_int_compare(IntPredicate::SLT, l, r, "lt").map_err(build_err(span))?.into(), ValKind::Int(1)),
            Op::LtEq => (b.build_int_compare(IntPredicate::SLE, l, r, "le").map_err(build_err(span))?.into(), ValKind::Int(1)),
            Op::Gt => (b.build_int_compare(IntPredicate::SGT, l, r, "gt").map_err(build_err(span))?.into(), ValKind::Int(1)),
            Op::GtEq => (b.build_int_compare(IntPredicate::SGE, l, r, "ge").map_err(build_err(span))?.into(), ValKind::Int(1)),
            other => return Err(CodegenError::unsupported_operator(other.text(), span.clone())),
        };
        Ok((value, result_kind))
    }

    fn lower_float_binary(
        &mut self,
        op: Op,
        l: inkwell::values::FloatValue<'ctx>,
        r: inkwell::values::FloatValue<'ctx>,
        span: &Span,
    ) -> Result<Lowered<'ctx>, CodegenError> {
        let double = l.get_type() == self.context.f64_type();
        let b = &self.builder;
        let (value, result_kind): (BasicValueEnum<'ctx>, ValKind) = match op {
            Op::Plus => (b.build_float_add(l, r, "fadd").map_err(build_err(span))?.into(), ValKind::Float { double }),
            Op::Minus => (b.build_float_sub(l, r, "fsub").map_err(build_err(span))?.into(), ValKind::Float { double }),
            Op::Star => (b.build_float_mul(l, r, "fmul").map_err(build_err(span))?.into(), ValKind::Float { double }),
            Op::EqEq => (b.build_float_compare(FloatPredicate::OEQ, l, r, "feq").map_err(build_err(span))?.into(), ValKind::Int(1)),
            Op::NotEq => (b.build_float_compare(FloatPredicate::ONE, l, r, "fne").map_err(build_err(span))?.into(), ValKind::Int(1)),
            Op::Lt => (b.build_float_compare(FloatPredicate::OLT, l, r, "flt").map_err(build_err(span))?.into(), ValKind::Int(1)),
            Op::LtEq => (b.build_float_compare(FloatPredicate::OLE, l, r, "fle").map_err(build_err(span))?.into(), ValKind::Int(1)),
            Op::Gt => (b.build_float_compare(FloatPredicate::OGT, l, r, "fgt").map_err(build_err(span))?.into(), ValKind::Int(1)),
            Op::GtEq => (b.build_float_compare(FloatPredicate::OGE, l, r, "fge").map_err(build_err(span))?.into(), ValKind::Int(1)),
            other => return Err(CodegenError::unsupported_operator(other.text(), span.clone())),
        };
        Ok((value, result_kind))
    }
}

fn build_err<'a, E: std::fmt::Debug>(span: &'a Span) -> impl Fn(E) -> CodegenError + 'a {
    move |e| CodegenError::new(format!("{e:?}"), span.clone())
}

/// Expands `\n \t \r \0 \\ \"` in a string literal's raw text; the lexer keeps literals raw until emission.
fn decode_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
