pub mod stream;

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

pub use crate::stream::TokenStream;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // keywords
    Boolean,
    Break,
    Class,
    Double,
    Else,
    Extends,
    For,
    If,
    Implements,
    Int,
    Interface,
    NewArray,
    Println,
    Readln,
    Return,
    String,
    Void,
    While,

    // operators and punctuation
    Plus,
    Minus,
    Multiplication,
    Division,
    Mod,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
    And,
    Or,
    Not,
    AssignOp,
    Semicolon,
    Comma,
    Period,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,

    // literals
    IntConstant,
    DoubleConstant,
    StringConstant,
    BooleanConstant,
    Id,

    Eof,
    Error,
}

/// Print name and fixed source text of every kind, in declaration order.
///
/// `TokenKind as usize` indexes this table, so the two must stay in step.
const KIND_TABLE: &[(TokenKind, &str, Option<&str>)] = &[
    (TokenKind::Boolean, "boolean", Some("boolean")),
    (TokenKind::Break, "break", Some("break")),
    (TokenKind::Class, "class", Some("class")),
    (TokenKind::Double, "double", Some("double")),
    (TokenKind::Else, "else", Some("else")),
    (TokenKind::Extends, "extends", Some("extends")),
    (TokenKind::For, "for", Some("for")),
    (TokenKind::If, "if", Some("if")),
    (TokenKind::Implements, "implements", Some("implements")),
    (TokenKind::Int, "int", Some("int")),
    (TokenKind::Interface, "interface", Some("interface")),
    (TokenKind::NewArray, "newarray", Some("newarray")),
    (TokenKind::Println, "println", Some("println")),
    (TokenKind::Readln, "readln", Some("readln")),
    (TokenKind::Return, "return", Some("return")),
    (TokenKind::String, "string", Some("string")),
    (TokenKind::Void, "void", Some("void")),
    (TokenKind::While, "while", Some("while")),
    (TokenKind::Plus, "plus", Some("+")),
    (TokenKind::Minus, "minus", Some("-")),
    (TokenKind::Multiplication, "multiplication", Some("*")),
    (TokenKind::Division, "division", Some("/")),
    (TokenKind::Mod, "mod", Some("%")),
    (TokenKind::Less, "less", Some("<")),
    (TokenKind::LessEqual, "lessequal", Some("<=")),
    (TokenKind::Greater, "greater", Some(">")),
    (TokenKind::GreaterEqual, "greaterequal", Some(">=")),
    (TokenKind::Equal, "equal", Some("==")),
    (TokenKind::NotEqual, "notequal", Some("!=")),
    (TokenKind::And, "and", Some("&&")),
    (TokenKind::Or, "or", Some("||")),
    (TokenKind::Not, "not", Some("!")),
    (TokenKind::AssignOp, "assignop", Some("=")),
    (TokenKind::Semicolon, "semicolon", Some(";")),
    (TokenKind::Comma, "comma", Some(",")),
    (TokenKind::Period, "period", Some(".")),
    (TokenKind::LeftParen, "leftparen", Some("(")),
    (TokenKind::RightParen, "rightparen", Some(")")),
    (TokenKind::LeftBracket, "leftbracket", Some("[")),
    (TokenKind::RightBracket, "rightbracket", Some("]")),
    (TokenKind::LeftBrace, "leftbrace", Some("{")),
    (TokenKind::RightBrace, "rightbrace", Some("}")),
    (TokenKind::IntConstant, "intconstant", None),
    (TokenKind::DoubleConstant, "doubleconstant", None),
    (TokenKind::StringConstant, "stringconstant", None),
    (TokenKind::BooleanConstant, "booleanconstant", None),
    (TokenKind::Id, "id", None),
    (TokenKind::Eof, "eof", None),
    (TokenKind::Error, "error", None),
];

pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("boolean", TokenKind::Boolean),
    ("break", TokenKind::Break),
    ("class", TokenKind::Class),
    ("double", TokenKind::Double),
    ("else", TokenKind::Else),
    ("extends", TokenKind::Extends),
    ("for", TokenKind::For),
    ("if", TokenKind::If),
    ("implements", TokenKind::Implements),
    ("int", TokenKind::Int),
    ("interface", TokenKind::Interface),
    ("newarray", TokenKind::NewArray),
    ("println", TokenKind::Println),
    ("readln", TokenKind::Readln),
    ("return", TokenKind::Return),
    ("string", TokenKind::String),
    ("void", TokenKind::Void),
    ("while", TokenKind::While),
];

pub const BOOLEAN_LITERALS: &[&str] = &["true", "false"];

/// Keywords followed by the boolean literals: every word an identifier may not be.
pub fn reserved_words() -> impl Iterator<Item = &'static str> {
    KEYWORDS
        .iter()
        .map(|&(word, _)| word)
        .chain(BOOLEAN_LITERALS.iter().copied())
}

pub fn is_reserved(s: &str) -> bool {
    TokenKind::reserved(s).is_some()
}

impl TokenKind {
    pub fn all() -> impl Iterator<Item = TokenKind> {
        KIND_TABLE.iter().map(|&(kind, _, _)| kind)
    }

    /// Stable name used in token dumps.
    pub fn name(self) -> &'static str {
        KIND_TABLE[self as usize].1
    }

    /// Source text of kinds that always spell the same way.
    pub fn symbol(self) -> Option<&'static str> {
        KIND_TABLE[self as usize].2
    }

    /// Classifies a letter-initial word: keyword kind, `BooleanConstant`, or `None` for identifiers.
    pub fn reserved(s: &str) -> Option<TokenKind> {
        if BOOLEAN_LITERALS.contains(&s) {
            return Some(TokenKind::BooleanConstant);
        }

        KEYWORDS
            .iter()
            .find(|&&(word, _)| word == s)
            .map(|&(_, kind)| kind)
    }

    pub fn is_keyword(self) -> bool {
        (self as usize) <= (TokenKind::While as usize)
    }

    /// Kinds whose tokens carry the matched text.
    pub fn has_lexeme(self) -> bool {
        matches!(
            self,
            TokenKind::IntConstant
                | TokenKind::DoubleConstant
                | TokenKind::StringConstant
                | TokenKind::BooleanConstant
                | TokenKind::Id
                | TokenKind::Error
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: Option<String>,
    /// 1-based line the lexeme starts on.
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize) -> Token {
        Token {
            kind,
            lexeme: None,
            line,
        }
    }

    pub fn with_lexeme<S: Into<String>>(kind: TokenKind, lexeme: S, line: usize) -> Token {
        Token {
            kind,
            lexeme: Some(lexeme.into()),
            line,
        }
    }

    /// The matched text, or the fixed spelling for keywords and punctuation.
    pub fn text(&self) -> &str {
        match self.lexeme {
            Some(ref s) => s,
            None => self.kind.symbol().unwrap_or(""),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.lexeme {
            Some(ref s) => write!(f, "{}({})", self.kind, s),
            None => write!(f, "{}", self.kind),
        }
    }
}
