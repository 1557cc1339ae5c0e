//! Statement parsing.

use super::Parser;
use super::error::ParseError;
use crate::ast::{AssignTarget, IfStmt, Stmt, StmtKind, WhileStmt};
use crate::registry::Resolved;
use crate::token::{Keyword, Op, Punct, TokenKind};

impl Parser {
    pub(super) fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect_punct(Punct::LBrace)?;
        let mut stmts = Vec::new();
        loop {
            if matches!(self.current_kind(), TokenKind::Punct(Punct::RBrace)) {
                break;
            }
            stmts.push(self.parse_stmt()?);
            self.eat_punct(Punct::Semicolon);
        }
        self.expect_punct(Punct::RBrace)?;
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let span = self.current_span();
        match self.current_kind() {
            TokenKind::Keyword(Keyword::If) => self.parse_if_stmt(),
            TokenKind::Keyword(Keyword::While) => self.parse_while_stmt(),
            TokenKind::Keyword(Keyword::Ret) => {
                self.advance();
                if matches!(self.current_kind(), TokenKind::Punct(Punct::Semicolon) | TokenKind::Punct(Punct::RBrace)) {
                    return Ok(Stmt::new(StmtKind::Return(None), span));
                }
                let expr = self.parse_expr()?;
                Ok(Stmt::new(StmtKind::Return(Some(expr)), span))
            }
            TokenKind::Keyword(Keyword::Brk) => {
                self.advance();
                Ok(Stmt::new(StmtKind::Break, span))
            }
            TokenKind::Keyword(Keyword::Cont) => {
                self.advance();
                Ok(Stmt::new(StmtKind::Continue, span))
            }
            TokenKind::Punct(Punct::Semicolon) => {
                self.advance();
                Ok(Stmt::new(StmtKind::NoOp, span))
            }
            TokenKind::DocComment(text) => {
                let text = text.clone();
                self.advance();
                Ok(Stmt::new(StmtKind::DocComment(text), span))
            }
            TokenKind::Op(Op::Star) => self.parse_deref_assign_stmt(),
            TokenKind::Identifier(_) => self.parse_identifier_led_stmt(),
            other => Err(ParseError::unexpected("a statement", &other.to_string(), span)),
        }
    }

    fn parse_if_stmt(&mut self) -> Result<Stmt, ParseError> {
        let span = self.current_span();
        self.expect_keyword(Keyword::If)?;
        let condition = self.parse_expr()?;
        let then_block = self.parse_block()?;

        let mut elifs = Vec::new();
        while matches!(self.current_kind(), TokenKind::Keyword(Keyword::Elif)) {
            self.advance();
            let cond = self.parse_expr()?;
            let block = self.parse_block()?;
            elifs.push((cond, block));
        }

        let else_block = if matches!(self.current_kind(), TokenKind::Keyword(Keyword::Else)) {
            self.advance();
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Stmt::new(
            StmtKind::If(IfStmt { condition, then_block, elifs, else_block }),
            span,
        ))
    }

    fn parse_while_stmt(&mut self) -> Result<Stmt, ParseError> {
        let span = self.current_span();
        self.expect_keyword(Keyword::While)?;
        let condition = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(Stmt::new(StmtKind::While(WhileStmt { condition, body }), span))
    }

    fn parse_deref_assign_stmt(&mut self) -> Result<Stmt, ParseError> {
        let span = self.current_span();
        self.expect_op(Op::Star)?;
        let pointee_span = self.current_span();
        let name = self.expect_identifier()?;
        let ptr_expr = crate::ast::Expr::new(crate::ast::ExprKind::Identifier(name), pointee_span);

        if !matches!(self.current_kind(), TokenKind::Op(Op::Eq)) {
            return Err(ParseError::new("bare pointer dereference '*p;' is not a statement", span));
        }
        self.advance();
        let value = self.parse_expr()?;
        Ok(Stmt::new(
            StmtKind::Assign { target: AssignTarget::PointerDeref(ptr_expr), value },
            span,
        ))
    }

    fn parse_identifier_led_stmt(&mut self) -> Result<Stmt, ParseError> {
        let span = self.current_span();
        let name = self.expect_identifier()?;

        match self.current_kind() {
            TokenKind::Punct(Punct::Colon) => {
                self.advance();
                let decl = self.parse_decl_tail(name, span.clone())?;
                let kind = match decl {
                    super::decl::DeclParse::Var(v) => StmtKind::VarDecl(v),
                    super::decl::DeclParse::Array(a) => StmtKind::ArrayDecl(a),
                };
                Ok(Stmt::new(kind, span))
            }
            TokenKind::Punct(Punct::LParen) => {
                let call = self.parse_call_expr(name, span.clone())?;
                Ok(Stmt::new(StmtKind::ExprStmt(call), span))
            }
            TokenKind::Punct(Punct::LBracket) => {
                let indices = self.parse_index_chain()?;
                self.expect_op(Op::Eq)?;
                let value = self.parse_expr()?;
                Ok(Stmt::new(
                    StmtKind::Assign { target: AssignTarget::ArrayElement { base: name, indices }, value },
                    span,
                ))
            }
            TokenKind::Op(Op::Dot) => {
                let mut path = vec![name];
                while self.eat_op(Op::Dot) {
                    path.push(self.expect_identifier()?);
                }
                self.expect_op(Op::Eq)?;
                let value = self.parse_expr()?;
                Ok(Stmt::new(StmtKind::Assign { target: AssignTarget::StructMember { path }, value }, span))
            }
            TokenKind::Op(Op::Eq) => {
                self.advance();
                let value = self.parse_expr()?;
                let target = match self.registry_resolve(&name) {
                    Some(Resolved::Local(crate::registry::TypeRef::Array { .. })) => AssignTarget::ArrayWhole(name),
                    _ => AssignTarget::Scalar(name),
                };
                Ok(Stmt::new(StmtKind::Assign { target, value }, span))
            }
            other => Err(ParseError::unexpected(
                "':', '(', '[', '.', or '=' after identifier",
                &other.to_string(),
                self.current_span(),
            )),
        }
    }

    pub(super) fn parse_index_chain(&mut self) -> Result<Vec<crate::ast::Expr>, ParseError> {
        let mut indices = Vec::new();
        while self.eat_punct(Punct::LBracket) {
            indices.push(self.parse_expr()?);
            self.expect_punct(Punct::RBracket)?;
        }
        Ok(indices)
    }

    pub(super) fn registry_resolve(&self, name: &str) -> Option<Resolved> {
        self.registry.resolve(name)
    }
}
