//! Token reading and recognition.

use super::Lexer;
use super::error::LexError;
use crate::token::{BuiltinType, Keyword, Op, Punct, Span, Token, TokenKind};

impl<'a> Lexer<'a> {
    fn span_from(&self, start_pos: usize, start_line: usize, start_column: usize) -> Span {
        Span::new(start_pos, self.pos, start_line, start_column, self.file.clone())
    }

    pub(super) fn next_token(&mut self) -> Result<Token, LexError> {
        let c = self.current_char().ok_or_else(|| {
            LexError::unexpected_eof(Span::new(self.pos, self.pos, self.line, self.column, self.file.clone()))
        })?;

        let start_pos = self.pos;
        let start_line = self.line;
        let start_column = self.column;

        if let Some(punct) = Self::punct_for(c) {
            self.advance();
            return Ok(Token::new(
                TokenKind::Punct(punct),
                self.span_from(start_pos, start_line, start_column),
            ));
        }

        if c == '"' {
            return self.read_string(start_pos, start_line, start_column);
        }

        if c.is_ascii_digit() {
            return self.read_number(start_pos, start_line, start_column);
        }

        if c.is_ascii_alphabetic() || c == '_' {
            return Ok(self.read_identifier(start_pos, start_line, start_column));
        }

        if let Some(op) = self.match_operator() {
            return Ok(Token::new(
                TokenKind::Op(op),
                self.span_from(start_pos, start_line, start_column),
            ));
        }

        Err(LexError::unexpected_character(
            c,
            self.span_from(start_pos, start_line, start_column),
        ))
    }

    fn punct_for(c: char) -> Option<Punct> {
        Some(match c {
            '(' => Punct::LParen,
            ')' => Punct::RParen,
            '{' => Punct::LBrace,
            '}' => Punct::RBrace,
            '[' => Punct::LBracket,
            ']' => Punct::RBracket,
            ',' => Punct::Comma,
            ';' => Punct::Semicolon,
            ':' => Punct::Colon,
            '`' => Punct::Backtick,
            _ => return None,
        })
    }

    /// Matches the longest operator in [`Op::TABLE`] starting here
    /// and advances past it.
    fn match_operator(&mut self) -> Option<Op> {
        for (text, op) in Op::TABLE {
            if self.starts_with(text) {
                self.advance_by(text.chars().count());
                return Some(*op);
            }
        }
        None
    }

    /// Reads a double-quoted string literal. Escape sequences are left
    /// raw in the stored text; they are expanded later during string
    /// emission.
    fn read_string(
        &mut self,
        start_pos: usize,
        start_line: usize,
        start_column: usize,
    ) -> Result<Token, LexError> {
        self.advance(); // opening quote
        let text_start = self.pos;

        loop {
            match self.current_char() {
                Some('"') => {
                    let value = self.input[text_start..self.pos].to_string();
                    self.advance(); // closing quote
                    return Ok(Token::new(
                        TokenKind::StringLiteral(value),
                        self.span_from(start_pos, start_line, start_column),
                    ));
                }
                Some('\\') => {
                    self.advance();
                    if self.current_char().is_some() {
                        self.advance();
                    }
                }
                Some(_) => self.advance(),
                None => {
                    return Err(LexError::unterminated_string(self.span_from(
                        start_pos,
                        start_line,
                        start_column,
                    )));
                }
            }
        }
    }

    /// Reads digits, with an optional single `.` turning the kind to
    /// float.
    fn read_number(
        &mut self,
        start_pos: usize,
        start_line: usize,
        start_column: usize,
    ) -> Result<Token, LexError> {
        while self.current_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        let is_float = self.current_char() == Some('.')
            && self.peek_char().is_some_and(|c| c.is_ascii_digit());

        if is_float {
            self.advance();
            while self.current_char().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
            let text = &self.input[start_pos..self.pos];
            let span = self.span_from(start_pos, start_line, start_column);
            let value: f64 = text
                .parse()
                .map_err(|_| LexError::invalid_number(text, span.clone()))?;
            return Ok(Token::new(TokenKind::Float(value), span));
        }

        let text = &self.input[start_pos..self.pos];
        let span = self.span_from(start_pos, start_line, start_column);
        let value: i64 = text
            .parse()
            .map_err(|_| LexError::invalid_number(text, span.clone()))?;
        Ok(Token::new(TokenKind::Integer(value), span))
    }

    /// Reads `[A-Za-z_][A-Za-z0-9_-]*` and classifies it: pending type declaration slot, known user type,
    /// keyword, builtin type, or plain identifier.
    fn read_identifier(&mut self, start_pos: usize, start_line: usize, start_column: usize) -> Token {
        while self
            .current_char()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            self.advance();
        }

        let text = self.input[start_pos..self.pos].to_string();
        let span = self.span_from(start_pos, start_line, start_column);

        let kind = if self.expect_type_decl {
            self.known_types.insert(text.clone());
            TokenKind::TypeAnnotation(text)
        } else if self.known_types.contains(&text) {
            TokenKind::TypeAnnotation(text)
        } else if let Some(kw) = Keyword::lookup(&text) {
            TokenKind::Keyword(kw)
        } else if let Some(bt) = BuiltinType::lookup(&text) {
            TokenKind::BuiltinType(bt)
        } else {
            TokenKind::Identifier(text)
        };

        Token::new(kind, span)
    }
}
