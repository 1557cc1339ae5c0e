//! Parse error types.

use crate::registry::RegistryError;
use crate::token::Span;

/// An error that occurred during parsing: an unexpected token, or a
/// registry failure (unknown type, duplicate symbol) surfaced while
/// building a declaration.
#[derive(Debug)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        ParseError {
            message: message.into(),
            span,
        }
    }

    pub fn unexpected(expected: &str, found: &str, span: Span) -> Self {
        ParseError::new(format!("expected {expected}, found {found}"), span)
    }
}

impl From<RegistryError> for ParseError {
    fn from(err: RegistryError) -> Self {
        ParseError::new(err.message, err.span)
    }
}

impl std::fmt::Display for ParseError {
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

impl std::error::Error for ParseError {}
