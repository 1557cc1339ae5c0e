//! Whitespace and comment handling.

use super::Lexer;
use crate::token::{Span, Token, TokenKind};

/// The result of trying to skip a comment at the current position.
pub(super) enum SkippedComment {
    None,
    Plain,
    Doc(Token),
}

impl<'a> Lexer<'a> {
    pub(super) fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(|c| c.is_ascii_whitespace()) {
            self.advance();
        }
    }

    /// Skips a `//` or `/* */` comment, or captures a `///` doc-comment
    /// as a token.
    pub(super) fn skip_comment(&mut self) -> SkippedComment {
        if self.starts_with("///") {
            let start_pos = self.pos;
            let start_line = self.line;
            let start_column = self.column;
            self.advance_by(3);
            let text_start = self.pos;
            while self.current_char().is_some_and(|c| c != '\n') {
                self.advance();
            }
            let payload = self.input[text_start..self.pos].trim().to_string();
            let span = Span::new(start_pos, self.pos, start_line, start_column, self.file.clone());
            return SkippedComment::Doc(Token::new(TokenKind::DocComment(payload), span));
        }

        if self.starts_with("//") {
            while self.current_char().is_some_and(|c| c != '\n') {
                self.advance();
            }
            return SkippedComment::Plain;
        }

        if self.starts_with("/*") {
            self.advance_by(2);
            while !self.is_eof() && !self.starts_with("*/") {
                self.advance();
            }
            if self.starts_with("*/") {
                self.advance_by(2);
            }
            return SkippedComment::Plain;
        }

        SkippedComment::None
    }
}
