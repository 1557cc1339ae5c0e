//! Cursor position management for the lexer.

use super::Lexer;

impl<'a> Lexer<'a> {
    pub(super) fn current_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    pub(super) fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().nth(1)
    }

    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub(super) fn starts_with(&self, text: &str) -> bool {
        self.input[self.pos..].starts_with(text)
    }

    /// Advances one character, updating line/column tracking. A tab
    /// counts as four columns.
    pub(super) fn advance(&mut self) {
        if let Some(c) = self.current_char() {
            self.pos += c.len_utf8();
            match c {
                '\n' => {
                    self.line += 1;
                    self.column = 1;
                }
                '\t' => self.column += 4,
                _ => self.column += 1,
            }
        }
    }

    pub(super) fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }
}
