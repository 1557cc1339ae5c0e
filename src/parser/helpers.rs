//! Token navigation and small shared parsing operations.

use super::Parser;
use super::error::ParseError;
use crate::registry::TypeId;
use crate::token::{BuiltinType, Punct, Span, Token, TokenKind};

impl Parser {
    pub(super) fn current(&self) -> &Token {
        let idx = self.pos.min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    pub(super) fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    pub(super) fn current_span(&self) -> Span {
        self.current().span.clone()
    }

    pub(super) fn peek_kind(&self, ahead: usize) -> &TokenKind {
        let idx = (self.pos + ahead).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    pub(super) fn is_eof(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    pub(super) fn advance(&mut self) {
        if !self.is_eof() {
            self.pos += 1;
        }
    }

    pub(super) fn expect_punct(&mut self, p: Punct) -> Result<Span, ParseError> {
        if let TokenKind::Punct(found) = self.current_kind()
            && *found == p
        {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(ParseError::unexpected(
                &format!("'{p}'"),
                &self.current_kind().to_string(),
                self.current_span(),
            ))
        }
    }

    pub(super) fn expect_op(&mut self, op: crate::token::Op) -> Result<Span, ParseError> {
        if let TokenKind::Op(found) = self.current_kind()
            && *found == op
        {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(ParseError::unexpected(
                &format!("'{op}'"),
                &self.current_kind().to_string(),
                self.current_span(),
            ))
        }
    }

    pub(super) fn eat_punct(&mut self, p: Punct) -> bool {
        if matches!(self.current_kind(), TokenKind::Punct(found) if *found == p) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn eat_op(&mut self, op: crate::token::Op) -> bool {
        if matches!(self.current_kind(), TokenKind::Op(found) if *found == op) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let TokenKind::Identifier(name) = self.current_kind() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(ParseError::unexpected(
                "an identifier",
                &self.current_kind().to_string(),
                self.current_span(),
            ))
        }
    }

    /// Consumes a base type name: a builtin (other than `ptr`) or a
    /// known user type annotation, resolving it through the registry.
    pub(super) fn expect_base_type(&mut self) -> Result<TypeId, ParseError> {
        let span = self.current_span();
        let name = match self.current_kind() {
            TokenKind::BuiltinType(BuiltinType::Ptr) => {
                return Err(ParseError::new(
                    "expected a base type, found 'ptr' — use ptr<T> for pointer declarations",
                    span,
                ));
            }
            TokenKind::BuiltinType(bt) => bt.name().to_string(),
            TokenKind::TypeAnnotation(name) => name.clone(),
            other => {
                return Err(ParseError::unexpected("a type name", &other.to_string(), span));
            }
        };
        self.advance();
        Ok(self.registry.resolve_type(&name, span)?)
    }
}
