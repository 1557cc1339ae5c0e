//! Source location tracking for the Syn compiler.

use std::path::PathBuf;
use std::rc::Rc;

/// A span identifying a range of source text.
///
/// Tracks byte offsets (for slicing the source buffer) alongside the
/// 1-indexed line/column of the starting byte, and the filename the span
/// belongs to, so diagnostics never have to thread a filename separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
    pub file: Rc<PathBuf>,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize, file: Rc<PathBuf>) -> Self {
        Span {
            start,
            end,
            line,
            column,
            file,
        }
    }

    /// A span that does not point anywhere meaningful in the source, used
    /// for synthesized nodes (e.g. the implicit `ret void` a function gets
    /// when it falls off the end of its body).
    pub fn synthetic(file: Rc<PathBuf>) -> Self {
        Span::new(0, 0, 0, 0, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f() -> Rc<PathBuf> {
        Rc::new(PathBuf::from("test.syn"))
    }

    #[test]
    fn new_sets_all_fields() {
        let span = Span::new(3, 7, 2, 5, f());
        assert_eq!(span.start, 3);
        assert_eq!(span.end, 7);
        assert_eq!(span.line, 2);
        assert_eq!(span.column, 5);
    }
}
