use super::Lexer;
use crate::token::{BuiltinType, Op, Punct, TokenKind};
use std::path::PathBuf;
use std::rc::Rc;

fn lex(src: &str) -> Vec<TokenKind> {
    let file = Rc::new(PathBuf::from("test.syn"));
    Lexer::new(src, file)
        .tokenize()
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn scans_identifier_and_eof() {
    let kinds = lex("foo");
    assert_eq!(kinds, vec![TokenKind::Identifier("foo".into()), TokenKind::Eof]);
}

#[test]
fn scans_keywords() {
    let kinds = lex("fnc if elif else while ret brk cont struct");
    assert_eq!(
        kinds[..9],
        [
            TokenKind::Keyword(crate::token::Keyword::Fnc),
            TokenKind::Keyword(crate::token::Keyword::If),
            TokenKind::Keyword(crate::token::Keyword::Elif),
            TokenKind::Keyword(crate::token::Keyword::Else),
            TokenKind::Keyword(crate::token::Keyword::While),
            TokenKind::Keyword(crate::token::Keyword::Ret),
            TokenKind::Keyword(crate::token::Keyword::Brk),
            TokenKind::Keyword(crate::token::Keyword::Cont),
            TokenKind::Keyword(crate::token::Keyword::Struct),
        ]
    );
}

#[test]
fn scans_builtin_types() {
    let kinds = lex("i32 f64 str ptr");
    assert_eq!(
        kinds[..4],
        [
            TokenKind::BuiltinType(BuiltinType::I32),
            TokenKind::BuiltinType(BuiltinType::F64),
            TokenKind::BuiltinType(BuiltinType::Str),
            TokenKind::BuiltinType(BuiltinType::Ptr),
        ]
    );
}

#[test]
fn struct_name_becomes_type_annotation_afterward() {
    let kinds = lex("struct Point { x : i32; } y : Point;");
    assert!(matches!(kinds[1], TokenKind::TypeAnnotation(ref s) if s == "Point"));
    let later = kinds
        .iter()
        .filter(|k| matches!(k, TokenKind::TypeAnnotation(s) if s == "Point"))
        .count();
    assert_eq!(later, 2);
}

#[test]
fn scans_integer_and_float() {
    let kinds = lex("42 3.5");
    assert_eq!(kinds[0], TokenKind::Integer(42));
    assert_eq!(kinds[1], TokenKind::Float(3.5));
}

#[test]
fn integer_not_confused_by_trailing_dot_without_digit() {
    let kinds = lex("42.foo");
    assert_eq!(kinds[0], TokenKind::Integer(42));
    assert_eq!(kinds[1], TokenKind::Op(Op::Dot));
}

#[test]
fn scans_string_literal_raw() {
    let kinds = lex(r#""hello\nworld""#);
    assert_eq!(kinds[0], TokenKind::StringLiteral("hello\\nworld".into()));
}

#[test]
fn unterminated_string_is_error() {
    let file = Rc::new(PathBuf::from("t.syn"));
    let err = Lexer::new("\"oops", file).tokenize().unwrap_err();
    assert!(err.message.contains("unterminated"));
}

#[test]
fn scans_punctuation() {
    let kinds = lex("( ) { } [ ] , ; : `");
    assert_eq!(
        kinds[..10],
        [
            TokenKind::Punct(Punct::LParen),
            TokenKind::Punct(Punct::RParen),
            TokenKind::Punct(Punct::LBrace),
            TokenKind::Punct(Punct::RBrace),
            TokenKind::Punct(Punct::LBracket),
            TokenKind::Punct(Punct::RBracket),
            TokenKind::Punct(Punct::Comma),
            TokenKind::Punct(Punct::Semicolon),
            TokenKind::Punct(Punct::Colon),
            TokenKind::Punct(Punct::Backtick),
        ]
    );
}

#[test]
fn operators_match_longest_first() {
    let kinds = lex("... += == = < <=");
    assert_eq!(
        kinds[..6],
        [
            TokenKind::Op(Op::Ellipsis),
            TokenKind::Op(Op::PlusEq),
            TokenKind::Op(Op::EqEq),
            TokenKind::Op(Op::Eq),
            TokenKind::Op(Op::Lt),
            TokenKind::Op(Op::LtEq),
        ]
    );
}

#[test]
fn doc_comment_captured_plain_comment_discarded() {
    let kinds = lex("/// hello\n// discard me\nfoo");
    assert_eq!(kinds[0], TokenKind::DocComment("hello".into()));
    assert_eq!(kinds[1], TokenKind::Identifier("foo".into()));
}

#[test]
fn block_comment_is_skipped() {
    let kinds = lex("/* a\nb */ foo");
    assert_eq!(kinds[0], TokenKind::Identifier("foo".into()));
}

#[test]
fn shift_right_splits_in_expression_context() {
    let kinds = lex("a >> b");
    assert_eq!(
        kinds[..3],
        [
            TokenKind::Identifier("a".into()),
            TokenKind::Op(Op::Gt),
            TokenKind::Op(Op::Gt),
        ]
    );
}

#[test]
fn shift_right_preserved_in_nested_pointer_annotation() {
    let kinds = lex("x : ptr<ptr<i32>>;");
    let has_shr = kinds.iter().any(|k| matches!(k, TokenKind::Op(Op::Shr)));
    assert!(has_shr);
}

#[test]
fn shift_right_preserved_after_plain_assignment() {
    let kinds = lex("z = a >> b;");
    let has_shr = kinds.iter().any(|k| matches!(k, TokenKind::Op(Op::Shr)));
    assert!(has_shr);
}

#[test]
fn shift_right_splits_in_return_statement() {
    let kinds = lex("ret a >> b;");
    let has_shr = kinds.iter().any(|k| matches!(k, TokenKind::Op(Op::Shr)));
    assert!(!has_shr);
}

#[test]
fn tab_advances_column_by_four() {
    let file = Rc::new(PathBuf::from("t.syn"));
    let tokens = Lexer::new("\tfoo", file).tokenize().unwrap();
    assert_eq!(tokens[0].span.column, 5);
}
