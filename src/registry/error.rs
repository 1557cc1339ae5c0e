//! Errors raised while consulting or updating the AST data registry.

use crate::token::Span;

/// An error raised by the registry: an unresolved name, or a fatal
/// redeclaration.
#[derive(Debug)]
pub struct RegistryError {
    pub message: String,
    pub span: Span,
}

impl RegistryError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        RegistryError {
            message: message.into(),
            span,
        }
    }

    pub fn unknown_type(name: &str, span: Span) -> Self {
        RegistryError::new(format!("Unknown type '{name}'"), span)
    }

    pub fn unresolved_identifier(name: &str, span: Span) -> Self {
        RegistryError::new(format!("Unresolved identifier '{name}'"), span)
    }

    pub fn duplicate_symbol(name: &str, span: Span) -> Self {
        RegistryError::new(format!("'{name}' is already declared in this scope"), span)
    }

    pub fn duplicate_type(name: &str, span: Span) -> Self {
        RegistryError::new(format!("Type '{name}' is already declared"), span)
    }
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.span.file.display(),
            self.span.line,
            self.span.column,
            self.message
        )
    }
}

impl std::error::Error for RegistryError {}
