//! Lowering error types.

use crate::token::Span;

/// An error raised while lowering the AST to LLVM IR. Most come from a
/// specific token's span; a handful (module verification) have none.
#[derive(Debug)]
pub struct CodegenError {
    pub message: String,
    pub span: Option<Span>,
}

impl CodegenError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        CodegenError { message: message.into(), span: Some(span) }
    }

    pub fn without_span(message: impl Into<String>) -> Self {
        CodegenError { message: message.into(), span: None }
    }

    pub fn undeclared_function(name: &str, span: Span) -> Self {
        CodegenError::new(format!("Cannot call undeclared function '{name}'"), span)
    }

    pub fn void_in_expression(name: &str, span: Span) -> Self {
        CodegenError::new(format!("Cannot use void function '{name}' in an expression"), span)
    }

    pub fn break_outside_loop(span: Span) -> Self {
        CodegenError::new("'brk' used outside of loop", span)
    }

    pub fn continue_outside_loop(span: Span) -> Self {
        CodegenError::new("'cont' used outside of loop", span)
    }

    pub fn unresolved_identifier(name: &str, span: Span) -> Self {
        CodegenError::new(format!("unresolved identifier '{name}'"), span)
    }

    pub fn argument_count_mismatch(name: &str, expected: usize, found: usize, span: Span) -> Self {
        CodegenError::new(
            format!("function '{name}' expects {expected} argument(s), found {found}"),
            span,
        )
    }

    pub fn mismatched_operand_types(op: &str, span: Span) -> Self {
        CodegenError::new(format!("mismatched operand types for '{op}'"), span)
    }

    pub fn unsupported_operator(op: &str, span: Span) -> Self {
        CodegenError::new(format!("operator '{op}' is not supported for this operand type"), span)
    }

    pub fn pointer_to_struct_unsupported(span: Span) -> Self {
        CodegenError::new("pointer-to-struct assignment is not implemented", span)
    }
}

impl std::fmt::Display for CodegenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.span {
            Some(span) => write!(f, "{}:{}:{}: {}", span.file.display(), span.line, span.column, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for CodegenError {}
