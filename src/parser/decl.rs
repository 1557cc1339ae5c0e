//! Variable, array, pointer, struct and function declaration parsing.

use super::Parser;
use super::error::ParseError;
use crate::ast::{ArrayDecl, ArrayInit, FunctionDecl, Item, StructDecl, VarDecl};
use crate::registry::{Member, Param, TypeRef};
use crate::token::{BuiltinType, Keyword, Op, Punct, Span, TokenKind};

impl Parser {
    /// Parses the type-position after `name :` and counts pointer
    /// nesting depth. A single lexed `Op::Shr` closes two nesting
    /// levels at once, since the lexer preserves it intact inside type
    /// annotations (see `crate::lexer`'s `>>` post-pass).
    pub(super) fn parse_pointer_type(&mut self) -> Result<TypeRef, ParseError> {
        let mut degree = 0u32;
        loop {
            match self.current_kind() {
                TokenKind::BuiltinType(BuiltinType::Ptr) => {
                    self.advance();
                    self.expect_op(Op::Lt)?;
                    degree += 1;
                }
                _ => break,
            }
        }

        let base = self.expect_base_type()?;

        let mut remaining = degree;
        while remaining > 0 {
            match self.current_kind() {
                TokenKind::Op(Op::Gt) => {
                    self.advance();
                    remaining -= 1;
                }
                TokenKind::Op(Op::Shr) if remaining >= 2 => {
                    self.advance();
                    remaining -= 2;
                }
                other => {
                    return Err(ParseError::unexpected("'>' closing a pointer type", &other.to_string(), self.current_span()));
                }
            }
        }

        Ok(TypeRef::Pointer { base, degree })
    }

    /// Parses the type-and-initializer tail of a declaration, after
    /// `name :` has been consumed: `ptr` starts a pointer declaration, a
    /// base type followed by `[` starts an array declaration, otherwise
    /// it is a plain variable declaration.
    pub(super) fn parse_decl_tail(&mut self, name: String, start: Span) -> Result<DeclParse, ParseError> {
        if matches!(self.current_kind(), TokenKind::BuiltinType(BuiltinType::Ptr)) {
            let ty = self.parse_pointer_type()?;
            self.registry.declare_local(&name, ty.clone(), start.clone())?;
            let init = self.parse_optional_init()?;
            return Ok(DeclParse::Var(VarDecl { name, ty, init, span: start }));
        }

        let elem_ty = self.expect_base_type()?;

        if self.eat_punct(Punct::LBracket) {
            let mut dims = Vec::new();
            loop {
                let (n, n_span) = self.expect_integer_literal()?;
                if n <= 0 {
                    return Err(ParseError::new("array dimension must be positive", n_span));
                }
                dims.push(n as usize);
                if self.eat_punct(Punct::Semicolon) {
                    continue;
                }
                break;
            }
            self.expect_punct(Punct::RBracket)?;
            self.registry.declare_local(
                &name,
                TypeRef::Array { elem: elem_ty, dims: dims.clone() },
                start.clone(),
            )?;
            let init = if self.eat_op(Op::Eq) {
                Some(self.parse_array_init(dims.len())?)
            } else {
                None
            };
            return Ok(DeclParse::Array(ArrayDecl { name, elem_ty, dims, init, span: start }));
        }

        let ty = TypeRef::Scalar(elem_ty);
        self.registry.declare_local(&name, ty.clone(), start.clone())?;
        let init = self.parse_optional_init()?;
        Ok(DeclParse::Var(VarDecl { name, ty, init, span: start }))
    }

    fn parse_optional_init(&mut self) -> Result<Option<crate::ast::Expr>, ParseError> {
        if self.eat_op(Op::Eq) {
            Ok(Some(self.parse_expr()?))
        } else {
            Ok(None)
        }
    }

    fn expect_integer_literal(&mut self) -> Result<(i64, Span), ParseError> {
        let span = self.current_span();
        if let TokenKind::Integer(n) = self.current_kind() {
            let n = *n;
            self.advance();
            Ok((n, span))
        } else {
            Err(ParseError::unexpected(
                "an integer literal",
                &self.current_kind().to_string(),
                span,
            ))
        }
    }

    fn parse_array_init(&mut self, rank: usize) -> Result<ArrayInit, ParseError> {
        self.expect_punct(Punct::LBracket)?;
        let mut children = Vec::new();
        loop {
            let child = if rank > 1 {
                self.parse_array_init(rank - 1)?
            } else {
                ArrayInit::Elem(self.parse_expr()?)
            };
            children.push(child);
            if self.eat_punct(Punct::Comma) {
                continue;
            }
            break;
        }
        self.expect_punct(Punct::RBracket)?;
        Ok(ArrayInit::Row(children))
    }

    pub(super) fn parse_top_level_decl(&mut self) -> Result<Item, ParseError> {
        let start = self.current_span();
        let name = self.expect_identifier()?;
        self.expect_punct(Punct::Colon)?;
        match self.parse_decl_tail(name, start)? {
            DeclParse::Var(v) => Ok(Item::VarDecl(v)),
            DeclParse::Array(a) => Ok(Item::ArrayDecl(a)),
        }
    }

    pub(super) fn parse_struct_decl(&mut self) -> Result<StructDecl, ParseError> {
        let start = self.current_span();
        self.expect_keyword(Keyword::Struct)?;
        let name_span = self.current_span();
        let name = self.expect_type_name()?;
        self.registry.predeclare_type(&name, name_span.clone())?;
        self.expect_punct(Punct::LBrace)?;

        let mut members = Vec::new();
        while !matches!(self.current_kind(), TokenKind::Punct(Punct::RBrace)) {
            let member_name = self.expect_identifier()?;
            self.expect_punct(Punct::Colon)?;
            let ty = if matches!(self.current_kind(), TokenKind::BuiltinType(BuiltinType::Ptr)) {
                self.parse_pointer_type()?
            } else {
                TypeRef::Scalar(self.expect_base_type()?)
            };
            self.eat_punct(Punct::Semicolon);
            members.push(Member { name: member_name, ty });
        }
        self.expect_punct(Punct::RBrace)?;
        self.eat_punct(Punct::Semicolon);

        self.registry.register_struct(&name, members.clone(), name_span)?;
        Ok(StructDecl { name, members, span: start })
    }

    pub(super) fn parse_function_decl(&mut self) -> Result<FunctionDecl, ParseError> {
        let start = self.current_span();
        self.expect_keyword(Keyword::Fnc)?;
        let name = self.expect_identifier()?;
        self.expect_punct(Punct::LParen)?;

        let mut params = Vec::new();
        let mut variadic = false;
        if !matches!(self.current_kind(), TokenKind::Punct(Punct::RParen)) {
            loop {
                if self.eat_op(Op::Ellipsis) {
                    variadic = true;
                    break;
                }
                let pname = self.expect_identifier()?;
                self.expect_punct(Punct::Colon)?;
                let ty = if matches!(self.current_kind(), TokenKind::BuiltinType(BuiltinType::Ptr)) {
                    self.parse_pointer_type()?
                } else {
                    TypeRef::Scalar(self.expect_base_type()?)
                };
                params.push(Param { name: pname, ty });
                if self.eat_punct(Punct::Comma) {
                    continue;
                }
                break;
            }
        }
        self.expect_punct(Punct::RParen)?;
        self.expect_punct(Punct::Colon)?;

        let return_type = if matches!(self.current_kind(), TokenKind::BuiltinType(BuiltinType::Void)) {
            self.advance();
            None
        } else if matches!(self.current_kind(), TokenKind::BuiltinType(BuiltinType::Ptr)) {
            Some(self.parse_pointer_type()?)
        } else {
            Some(TypeRef::Scalar(self.expect_base_type()?))
        };

        let sig = crate::registry::FunctionSig {
            name: name.clone(),
            params: params.clone(),
            variadic,
            return_type: return_type.clone(),
            has_body: matches!(self.current_kind(), TokenKind::Punct(Punct::LBrace)),
        };
        self.registry.register_function(sig, start.clone())?;

        let body = if self.eat_punct(Punct::Semicolon) {
            None
        } else {
            self.registry.enter_function_scope();
            for p in &params {
                self.registry.declare_local(&p.name, p.ty.clone(), start.clone())?;
            }
            Some(self.parse_block()?)
        };

        Ok(FunctionDecl { name, params, variadic, return_type, body, span: start })
    }

    pub(super) fn expect_keyword(&mut self, kw: Keyword) -> Result<Span, ParseError> {
        if let TokenKind::Keyword(found) = self.current_kind()
            && *found == kw
        {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(ParseError::unexpected(
                &format!("'{kw}'"),
                &self.current_kind().to_string(),
                self.current_span(),
            ))
        }
    }

    /// Consumes the name introduced by a `struct`/`enum`/`union`
    /// declaration. The lexer already classified it as a type
    /// annotation the moment it followed the
    /// keyword; the parser's registry hasn't registered it yet, which
    /// is why `register_struct` below still needs to run.
    fn expect_type_name(&mut self) -> Result<String, ParseError> {
        let span = self.current_span();
        if let TokenKind::TypeAnnotation(name) = self.current_kind() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(ParseError::unexpected(
                "a type name",
                &self.current_kind().to_string(),
                span,
            ))
        }
    }
}

pub(super) enum DeclParse {
    Var(VarDecl),
    Array(ArrayDecl),
}
