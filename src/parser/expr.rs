//! The two-phase expression parser.
//!
//! Phase one, [`Parser::collect_flat`], walks tokens into a flat list of
//! operands and operators, recursing only for parenthesised
//! subexpressions, calls, and array-index chains. Phase two,
//! [`Parser::reshape`], repeatedly resolves adjacent unary operators and
//! splits on the lowest-precedence binary operator until every node has
//! at most three children.

use super::Parser;
use super::error::ParseError;
use crate::ast::{Expr, ExprKind};
use crate::token::{Keyword, Op, Punct, Span, TokenKind};

#[derive(Clone)]
enum FlatItem {
    Operand(Expr),
    Operator(Op, Span),
}

impl Parser {
    pub(super) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let span = self.current_span();
        let items = self.collect_flat()?;
        if items.is_empty() {
            return Err(ParseError::new("expected an expression", span));
        }
        Self::reshape(items)
    }

    fn collect_flat(&mut self) -> Result<Vec<FlatItem>, ParseError> {
        let mut items = Vec::new();
        loop {
            match self.current_kind() {
                TokenKind::Punct(Punct::Comma)
                | TokenKind::Punct(Punct::Semicolon)
                | TokenKind::Punct(Punct::RBracket)
                | TokenKind::Punct(Punct::RParen)
                | TokenKind::Punct(Punct::RBrace)
                | TokenKind::Eof => break,

                TokenKind::Punct(Punct::LParen) => {
                    self.advance();
                    let inner = self.parse_expr()?;
                    self.expect_punct(Punct::RParen)?;
                    items.push(FlatItem::Operand(inner));
                }

                TokenKind::Identifier(name) => {
                    let name = name.clone();
                    let span = self.current_span();
                    self.advance();
                    let operand = if matches!(self.current_kind(), TokenKind::Punct(Punct::LParen)) {
                        let call = self.parse_call_expr(name, span)?;
                        if let ExprKind::Call { ref callee, .. } = call.kind
                            && let Some(sig) = self.registry_function(callee)
                            && sig.return_type.is_none()
                        {
                            return Err(ParseError::new(
                                format!("call to '{callee}', which returns void, cannot appear in an expression"),
                                call.span,
                            ));
                        }
                        call
                    } else if matches!(self.current_kind(), TokenKind::Punct(Punct::LBracket)) {
                        let indices = self.parse_index_chain()?;
                        Expr::new(ExprKind::ArrayElement { base: name, indices }, span)
                    } else {
                        Expr::new(ExprKind::Identifier(name), span)
                    };
                    items.push(FlatItem::Operand(operand));
                }

                TokenKind::Integer(n) => {
                    let n = *n;
                    let span = self.current_span();
                    self.advance();
                    items.push(FlatItem::Operand(Expr::new(ExprKind::Integer(n), span)));
                }
                TokenKind::Float(f) => {
                    let f = *f;
                    let span = self.current_span();
                    self.advance();
                    items.push(FlatItem::Operand(Expr::new(ExprKind::Float(f), span)));
                }
                TokenKind::StringLiteral(s) => {
                    let s = s.clone();
                    let span = self.current_span();
                    self.advance();
                    items.push(FlatItem::Operand(Expr::new(ExprKind::StringLiteral(s), span)));
                }
                TokenKind::Keyword(Keyword::True) => {
                    let span = self.current_span();
                    self.advance();
                    items.push(FlatItem::Operand(Expr::new(ExprKind::Bool(true), span)));
                }
                TokenKind::Keyword(Keyword::False) => {
                    let span = self.current_span();
                    self.advance();
                    items.push(FlatItem::Operand(Expr::new(ExprKind::Bool(false), span)));
                }
                TokenKind::Keyword(Keyword::Null) => {
                    let span = self.current_span();
                    self.advance();
                    items.push(FlatItem::Operand(Expr::new(ExprKind::Null, span)));
                }
                TokenKind::Op(op) => {
                    let op = *op;
                    let span = self.current_span();
                    self.advance();
                    items.push(FlatItem::Operator(op, span));
                }

                other => {
                    return Err(ParseError::unexpected(
                        "an expression",
                        &other.to_string(),
                        self.current_span(),
                    ));
                }
            }
        }
        Ok(items)
    }

    pub(super) fn parse_call_expr(&mut self, name: String, start: Span) -> Result<Expr, ParseError> {
        self.expect_punct(Punct::LParen)?;
        let mut args = Vec::new();
        if !matches!(self.current_kind(), TokenKind::Punct(Punct::RParen)) {
            loop {
                args.push(self.parse_expr()?);
                if self.eat_punct(Punct::Comma) {
                    continue;
                }
                break;
            }
        }
        self.expect_punct(Punct::RParen)?;
        Ok(Expr::new(ExprKind::Call { callee: name, args }, start))
    }

    fn registry_function(&self, name: &str) -> Option<crate::registry::FunctionSig> {
        self.registry.function(name).cloned()
    }

    /// Reshapes a flat operand/operator list into a tree of at most
    /// binary/unary nodes.
    fn reshape(items: Vec<FlatItem>) -> Result<Expr, ParseError> {
        match items.len() {
            0 => unreachable!("caller rejects empty expressions"),
            1 => match items.into_iter().next().unwrap() {
                FlatItem::Operand(e) => Ok(e),
                FlatItem::Operator(_, span) => {
                    Err(ParseError::new("expected an operand, found a bare operator", span))
                }
            },
            2 => {
                let mut it = items.into_iter();
                let (first, second) = (it.next().unwrap(), it.next().unwrap());
                match (first, second) {
                    (FlatItem::Operator(op, span), FlatItem::Operand(operand)) if op.is_unary() => {
                        Ok(Expr::new(ExprKind::Unary { op, operand: Box::new(operand) }, span))
                    }
                    (FlatItem::Operator(_, span), _) => {
                        Err(ParseError::new("operator here is not a valid unary operator", span))
                    }
                    (_, FlatItem::Operator(_, span)) => {
                        Err(ParseError::new("expected 'unary-op operand', found 'operand operator'", span))
                    }
                }
            }
            3 => {
                let mut it = items.into_iter();
                let (a, b, c) = (it.next().unwrap(), it.next().unwrap(), it.next().unwrap());
                match (a, b, c) {
                    (FlatItem::Operand(lhs), FlatItem::Operator(op, span), FlatItem::Operand(rhs))
                        if op.binary_precedence().is_some() =>
                    {
                        Ok(Expr::new(ExprKind::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }, span))
                    }
                    (_, FlatItem::Operator(_, span), _) => {
                        Err(ParseError::new("operator here is not a valid binary operator", span))
                    }
                    (FlatItem::Operator(_, span), ..) | (.., FlatItem::Operator(_, span)) => {
                        Err(ParseError::new("expected 'lhs operator rhs'", span))
                    }
                }
            }
            _ => {
                if let Some(collapsed) = Self::try_collapse_unary(&items) {
                    return Self::reshape(collapsed);
                }

                let mut best: Option<(usize, u8)> = None;
                for (i, item) in items.iter().enumerate() {
                    if let FlatItem::Operator(op, _) = item
                        && let Some(prec) = op.binary_precedence()
                        && best.is_none_or(|(_, bp)| prec < bp)
                    {
                        best = Some((i, prec));
                    }
                }
                let Some((idx, _)) = best else {
                    let span = match &items[0] {
                        FlatItem::Operand(e) => e.span.clone(),
                        FlatItem::Operator(_, span) => span.clone(),
                    };
                    return Err(ParseError::new("could not find a binary operator to split this expression", span));
                };

                let mut items = items;
                let right = items.split_off(idx + 1);
                let op_item = items.pop().unwrap();
                let left = items;
                let (op, span) = match op_item {
                    FlatItem::Operator(op, span) => (op, span),
                    FlatItem::Operand(_) => unreachable!("index located by scanning for an Operator"),
                };

                let lhs = Self::reshape(left)?;
                let rhs = Self::reshape(right)?;
                Ok(Expr::new(ExprKind::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }, span))
            }
        }
    }

    /// Collapses the first adjacent-unary occurrence found: an operator
    /// at position 0, or an operator immediately preceded by another
    /// operator, paired with the operand right after it.
    fn try_collapse_unary(items: &[FlatItem]) -> Option<Vec<FlatItem>> {
        for i in 0..items.len() {
            let FlatItem::Operator(op, _) = &items[i] else { continue };
            if !op.is_unary() {
                continue;
            }
            let in_unary_position = i == 0 || matches!(items[i - 1], FlatItem::Operator(..));
            if !in_unary_position {
                continue;
            }
            if let Some(FlatItem::Operand(_)) = items.get(i + 1) {
                let mut next = items.to_vec();
                let operand = match next.remove(i + 1) {
                    FlatItem::Operand(e) => e,
                    FlatItem::Operator(..) => unreachable!(),
                };
                let (op, span) = match next.remove(i) {
                    FlatItem::Operator(op, span) => (op, span),
                    FlatItem::Operand(_) => unreachable!(),
                };
                next.insert(i, FlatItem::Operand(Expr::new(ExprKind::Unary { op, operand: Box::new(operand) }, span)));
                return Some(next);
            }
        }
        None
    }
}
