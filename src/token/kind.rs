//! Token kinds for the Syn lexer.
//!
//! Syn classifies every scanned identifier-shaped word into one of four
//! buckets (keyword, builtin type, user type, plain identifier) at lex
//! time rather than leaving that to the parser — see `lexer::tokens`.

use std::fmt;

/// Reserved words. `For` and `In` are scanned but never consumed by the
/// parser: the grammar has no `for` loop, only `while`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Fnc,
    If,
    Elif,
    Else,
    While,
    Ret,
    Brk,
    Cont,
    Struct,
    Enum,
    Union,
    True,
    False,
    Null,
    For,
    In,
}

impl Keyword {
    /// Returns the keyword matching `word`, if any.
    pub fn lookup(word: &str) -> Option<Keyword> {
        use Keyword::*;
        Some(match word {
            "fnc" => Fnc,
            "if" => If,
            "elif" => Elif,
            "else" => Else,
            "while" => While,
            "ret" => Ret,
            "brk" => Brk,
            "cont" => Cont,
            "struct" => Struct,
            "enum" => Enum,
            "union" => Union,
            "true" => True,
            "false" => False,
            "null" => Null,
            "for" => For,
            "in" => In,
            _ => return None,
        })
    }

    /// `true` for the three keywords that introduce a user-type
    /// declaration: the identifier immediately
    /// following is registered as a user type.
    pub fn introduces_type_decl(self) -> bool {
        matches!(self, Keyword::Struct | Keyword::Enum | Keyword::Union)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Keyword::Fnc => "fnc",
            Keyword::If => "if",
            Keyword::Elif => "elif",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::Ret => "ret",
            Keyword::Brk => "brk",
            Keyword::Cont => "cont",
            Keyword::Struct => "struct",
            Keyword::Enum => "enum",
            Keyword::Union => "union",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
            Keyword::For => "for",
            Keyword::In => "in",
        };
        write!(f, "{s}")
    }
}

/// The ten built-in data types registered before any source is read
///. `Ptr` never appears bare; it is always the
/// outermost layer of a `ptr<T>` annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinType {
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Str,
    Chr,
    Bln,
    Void,
    Ptr,
}

impl BuiltinType {
    pub fn lookup(word: &str) -> Option<BuiltinType> {
        use BuiltinType::*;
        Some(match word {
            "i8" => I8,
            "i16" => I16,
            "i32" => I32,
            "i64" => I64,
            "f32" => F32,
            "f64" => F64,
            "str" => Str,
            "chr" => Chr,
            "bln" => Bln,
            "void" => Void,
            "ptr" => Ptr,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            BuiltinType::I8 => "i8",
            BuiltinType::I16 => "i16",
            BuiltinType::I32 => "i32",
            BuiltinType::I64 => "i64",
            BuiltinType::F32 => "f32",
            BuiltinType::F64 => "f64",
            BuiltinType::Str => "str",
            BuiltinType::Chr => "chr",
            BuiltinType::Bln => "bln",
            BuiltinType::Void => "void",
            BuiltinType::Ptr => "ptr",
        }
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Single-character punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,
    Backtick,
}

impl fmt::Display for Punct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Punct::LParen => "(",
            Punct::RParen => ")",
            Punct::LBrace => "{",
            Punct::RBrace => "}",
            Punct::LBracket => "[",
            Punct::RBracket => "]",
            Punct::Comma => ",",
            Punct::Semicolon => ";",
            Punct::Colon => ":",
            Punct::Backtick => "`",
        };
        write!(f, "{s}")
    }
}

/// Operators, matched longest-first by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Ellipsis,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    EqEq,
    NotEq,
    LtEq,
    GtEq,
    AndAnd,
    OrOr,
    Shl,
    Shr,
    PlusPlus,
    MinusMinus,
    Dot,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    Lt,
    Gt,
    Bang,
    Amp,
    Pipe,
    Caret,
    Tilde,
}

impl Op {
    /// The operator table in longest-match-first order, paired with the
    /// source text that spells it. The lexer tries these in order at
    /// every operator-start position.
    pub const TABLE: &'static [(&'static str, Op)] = &[
        ("...", Op::Ellipsis),
        ("+=", Op::PlusEq),
        ("-=", Op::MinusEq),
        ("*=", Op::StarEq),
        ("/=", Op::SlashEq),
        ("%=", Op::PercentEq),
        ("==", Op::EqEq),
        ("!=", Op::NotEq),
        ("<=", Op::LtEq),
        (">=", Op::GtEq),
        ("&&", Op::AndAnd),
        ("||", Op::OrOr),
        ("<<", Op::Shl),
        (">>", Op::Shr),
        ("++", Op::PlusPlus),
        ("--", Op::MinusMinus),
        (".", Op::Dot),
        ("+", Op::Plus),
        ("-", Op::Minus),
        ("*", Op::Star),
        ("/", Op::Slash),
        ("%", Op::Percent),
        ("=", Op::Eq),
        ("<", Op::Lt),
        (">", Op::Gt),
        ("!", Op::Bang),
        ("&", Op::Amp),
        ("|", Op::Pipe),
        ("^", Op::Caret),
        ("~", Op::Tilde),
    ];

    pub fn text(self) -> &'static str {
        Op::TABLE
            .iter()
            .find(|(_, op)| *op == self)
            .map(|(text, _)| *text)
            .expect("every Op variant appears in TABLE")
    }

    /// `true` for the unary operators: `~ ! - + & * -- ++`.
    pub fn is_unary(self) -> bool {
        matches!(
            self,
            Op::Tilde
                | Op::Bang
                | Op::Minus
                | Op::Plus
                | Op::Amp
                | Op::Star
                | Op::MinusMinus
                | Op::PlusPlus
        )
    }

    /// Binary operator precedence: lower number binds *looser* (splits
    /// first), from lowest to highest:
    /// `... , %= /= *= -= += = , || , && , | , ^ , & , != == , >= > <= < ,
    /// >> << , - + , % / *`. `...`, `,` and the assignment compounds are
    /// expression-level tokens only in call-argument contexts and are not
    /// reachable from `binary_precedence`, since the flat-collection phase
    /// never places them inside an operand list; they are listed so the
    /// ladder documents the source's full ordering.
    pub fn binary_precedence(self) -> Option<u8> {
        match self {
            Op::OrOr => Some(1),
            Op::AndAnd => Some(2),
            Op::Pipe => Some(3),
            Op::Caret => Some(4),
            Op::Amp => Some(5),
            Op::NotEq | Op::EqEq => Some(6),
            Op::GtEq | Op::Gt | Op::LtEq | Op::Lt => Some(7),
            Op::Shr | Op::Shl => Some(8),
            Op::Minus | Op::Plus => Some(9),
            Op::Percent | Op::Slash | Op::Star => Some(10),
            _ => None,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

/// The kind of a scanned token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Identifier(String),
    Integer(i64),
    Float(f64),
    StringLiteral(String),
    Keyword(Keyword),
    /// A use of one of the ten registered built-in type names.
    BuiltinType(BuiltinType),
    /// A use of a previously declared `struct`/`enum`/`union` name.
    TypeAnnotation(String),
    Punct(Punct),
    Op(Op),
    DocComment(String),
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier(s) => write!(f, "identifier '{s}'"),
            TokenKind::Integer(n) => write!(f, "integer '{n}'"),
            TokenKind::Float(n) => write!(f, "float '{n}'"),
            TokenKind::StringLiteral(s) => write!(f, "string \"{s}\""),
            TokenKind::Keyword(k) => write!(f, "'{k}' keyword"),
            TokenKind::BuiltinType(t) => write!(f, "type '{t}'"),
            TokenKind::TypeAnnotation(name) => write!(f, "type '{name}'"),
            TokenKind::Punct(p) => write!(f, "'{p}'"),
            TokenKind::Op(o) => write!(f, "'{o}'"),
            TokenKind::DocComment(_) => write!(f, "doc comment"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_matches_all_variants() {
        for word in [
            "fnc", "if", "elif", "else", "while", "ret", "brk", "cont", "struct", "enum",
            "union", "true", "false", "null", "for", "in",
        ] {
            assert!(Keyword::lookup(word).is_some(), "missing {word}");
        }
        assert_eq!(Keyword::lookup("fncy"), None);
    }

    #[test]
    fn struct_enum_union_introduce_type_decl() {
        assert!(Keyword::Struct.introduces_type_decl());
        assert!(Keyword::Enum.introduces_type_decl());
        assert!(Keyword::Union.introduces_type_decl());
        assert!(!Keyword::If.introduces_type_decl());
    }

    #[test]
    fn builtin_type_round_trips_name() {
        for word in ["i8", "i16", "i32", "i64", "f32", "f64", "str", "chr", "bln", "void", "ptr"]
        {
            assert_eq!(BuiltinType::lookup(word).unwrap().name(), word);
        }
    }

    #[test]
    fn op_table_covers_longest_match_first() {
        assert_eq!(Op::TABLE[0], ("...", Op::Ellipsis));
        assert!(Op::TABLE.iter().position(|(t, _)| *t == "=").unwrap()
            > Op::TABLE.iter().position(|(t, _)| *t == "==").unwrap());
    }

    #[test]
    fn unary_operator_set_matches_spec() {
        for op in [
            Op::Tilde,
            Op::Bang,
            Op::Minus,
            Op::Plus,
            Op::Amp,
            Op::Star,
            Op::MinusMinus,
            Op::PlusPlus,
        ] {
            assert!(op.is_unary());
        }
        assert!(!Op::Slash.is_unary());
    }

    #[test]
    fn binary_precedence_orders_or_loosest() {
        assert!(Op::OrOr.binary_precedence() < Op::AndAnd.binary_precedence());
        assert!(Op::AndAnd.binary_precedence() < Op::Star.binary_precedence());
        assert_eq!(Op::Eq.binary_precedence(), None);
    }
}
