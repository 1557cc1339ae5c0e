//! Lexical analysis error types.

use crate::token::Span;

/// An error raised while scanning the token stream. Carries enough
/// location to be rendered with [`ariadne`](https://docs.rs/ariadne).
#[derive(Debug)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

impl LexError {
    fn new(message: impl Into<String>, span: Span) -> Self {
        LexError {
            message: message.into(),
            span,
        }
    }

    pub fn unexpected_character(c: char, span: Span) -> Self {
        LexError::new(format!("unexpected character '{c}'"), span)
    }

    pub fn unterminated_string(span: Span) -> Self {
        LexError::new("unterminated string literal", span)
    }

    pub fn invalid_number(text: &str, span: Span) -> Self {
        LexError::new(format!("invalid numeric literal '{text}'"), span)
    }

    pub fn unexpected_eof(span: Span) -> Self {
        LexError::new("unexpected end of file", span)
    }
}

impl std::fmt::Display for LexError {
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

impl std::error::Error for LexError {}
