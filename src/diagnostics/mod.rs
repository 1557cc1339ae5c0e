//! Ariadne-based diagnostic rendering shared by the `syncc` binary.
//!
//! Every phase's error type exposes a message and an optional [`Span`];
//! this module turns that pair into a labeled source snippet, falling
//! back to a plain line when there is no span to anchor a label to
//! (I/O errors, module verification failures).

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};

use crate::token::Span;

/// Renders `message` against `source`, underlining `span` in red if one
/// is given. `filename` is used both as ariadne's source id and in the
/// spanless fallback line.
pub fn report_error(filename: &str, source: &str, message: &str, span: Option<&Span>) {
    let Some(span) = span else {
        eprintln!("{filename}: {message}");
        return;
    };

    let range = span.start..span.end;
    let result = Report::build(ReportKind::Error, (filename, range.clone()))
        .with_config(Config::default().with_index_type(IndexType::Byte))
        .with_message(message)
        .with_label(Label::new((filename, range)).with_message(message).with_color(Color::Red))
        .finish()
        .eprint((filename, Source::from(source)));

    if let Err(e) = result {
        eprintln!("{}:{}:{}: {message}", filename, span.line, span.column);
        eprintln!("(failed to render source snippet: {e})");
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn spanless_message_falls_back_to_plain_line() {
        report_error("bad.syn", "", "cannot write output", None);
    }

    #[test]
    fn spanned_message_renders_without_panicking() {
        let span = Span::new(2, 5, 1, 3, Rc::new(PathBuf::from("bad.syn")));
        report_error("bad.syn", "x : qty;", "unknown type 'qty'", Some(&span));
    }
}
