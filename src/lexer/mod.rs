//! Lexical analyzer for Syn.
//!
//! The lexer runs to completion in a single pass before parsing starts,
//! producing every token up front. It keeps one small piece of state
//! beyond cursor position: a running set of names introduced by
//! `struct`/`enum`/`union` declarations, consulted so that later uses of
//! those names classify as [`TokenKind::TypeAnnotation`] rather than
//! plain identifiers. This set is local to the lexer and distinct from
//! the parser's [`crate::registry::TypeRegistry`], which additionally
//! tracks function and variable symbols.
//!
//! # Module structure
//!
//! - [`error`] — [`LexError`]
//! - [`cursor`] — position tracking and character navigation
//! - [`skip`] — whitespace and comment handling
//! - [`tokens`] — token recognition and reading
//!
//! # See also
//!
//! * [`crate::token`] — token type definitions
//! * [`crate::parser`] — consumes the token stream

mod cursor;
mod error;
mod skip;
mod tokens;

#[cfg(test)]
mod tests;

pub use error::LexError;

use crate::token::{Span, Token, TokenKind};
use std::collections::HashSet;
use std::path::PathBuf;
use std::rc::Rc;

/// Scans Syn source text into a flat token sequence.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    file: Rc<PathBuf>,
    /// Names registered by a prior `struct`/`enum`/`union` declaration.
    known_types: HashSet<String>,
    /// Set for one identifier after a `struct`/`enum`/`union` keyword:
    /// the next identifier is a type declaration, not a use.
    expect_type_decl: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, file: Rc<PathBuf>) -> Self {
        Lexer {
            input,
            pos: 0,
            line: 1,
            column: 1,
            file,
            known_types: HashSet::new(),
            expect_type_decl: false,
        }
    }

    /// Tokenizes the entire input, returning a sequence terminated by a
    /// single [`TokenKind::Eof`] token.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();

            match self.skip_comment() {
                skip::SkippedComment::None => {}
                skip::SkippedComment::Plain => continue,
                skip::SkippedComment::Doc(tok) => {
                    tokens.push(tok);
                    continue;
                }
            }

            if self.is_eof() {
                let span = Span::new(self.pos, self.pos, self.line, self.column, self.file.clone());
                tokens.push(Token::new(TokenKind::Eof, span));
                break;
            }

            let token = self.next_token()?;
            self.note_type_decl_keyword(&token.kind);
            tokens.push(token);
        }

        self.split_shift_operators(&mut tokens);
        Ok(tokens)
    }

    fn note_type_decl_keyword(&mut self, kind: &TokenKind) {
        if let TokenKind::Keyword(k) = kind {
            self.expect_type_decl = k.introduces_type_decl();
        } else {
            // any non-keyword token (including the type name itself,
            // consumed in `read_identifier`) clears the pending flag.
            self.expect_type_decl = false;
        }
    }

    /// Post-pass: split a `>>` token into two `>` tokens unless a `:`
    /// or a plain `=` appears earlier in the same statement, before the
    /// next `;`, `{`, or `}`. Both checks are needed: a bare `x :
    /// ptr<ptr<T>>;` declaration has a `:` but no `=`, while `x :
    /// ptr<ptr<T>> = …;` has both. Dropping the `=` check in favor of
    /// `:` alone would also wrongly split a genuine right shift on the
    /// right-hand side of a plain reassignment (`z = a >> b;`), since
    /// that statement has no `:` anywhere.
    fn split_shift_operators(&self, tokens: &mut Vec<Token>) {
        use crate::token::{Op, Punct};

        let mut i = 0;
        while i < tokens.len() {
            let is_shr = matches!(tokens[i].kind, TokenKind::Op(Op::Shr));
            if !is_shr {
                i += 1;
                continue;
            }

            let in_type_annotation = tokens[..i].iter().rev().find_map(|t| match t.kind {
                TokenKind::Punct(Punct::Semicolon)
                | TokenKind::Punct(Punct::LBrace)
                | TokenKind::Punct(Punct::RBrace) => Some(false),
                TokenKind::Punct(Punct::Colon) | TokenKind::Op(Op::Eq) => Some(true),
                _ => None,
            });

            if in_type_annotation.unwrap_or(false) {
                i += 1;
                continue;
            }

            let tok = tokens.remove(i);
            let mid = tok.span.start + 1;
            let first = Token::new(
                TokenKind::Op(Op::Gt),
                Span::new(tok.span.start, mid, tok.span.line, tok.span.column, tok.span.file.clone()),
            );
            let second = Token::new(
                TokenKind::Op(Op::Gt),
                Span::new(mid, tok.span.end, tok.span.line, tok.span.column + 1, tok.span.file),
            );
            tokens.insert(i, second);
            tokens.insert(i, first);
            i += 2;
        }
    }
}
