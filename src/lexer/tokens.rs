use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("var", TokenKind::Var);
        map.insert("def", TokenKind::Def);
        map.insert("class", TokenKind::Class);
        map.insert("extension", TokenKind::Extension);
        map.insert("super", TokenKind::Super);
        map.insert("coroutine", TokenKind::Coroutine);
        map.insert("return", TokenKind::Return);
        map.insert("yield", TokenKind::Yield);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("break", TokenKind::Break);
        map.insert("continue", TokenKind::Continue);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("auto", TokenKind::Auto);
        map.insert("const", TokenKind::Const);
        map.insert("volatile", TokenKind::Volatile);
        map.insert("decltype", TokenKind::Decltype);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,
    Ampersand,

    Semicolon,
    Colon,
    Comma,
    Arrow,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Reserved
    Var,
    Def,
    Class,
    Extension,
    Super,
    Coroutine,
    Return,
    Yield,
    If,
    Else,
    While,
    Break,
    Continue,
    True,
    False,
    Auto,
    Const,
    Volatile,
    Decltype,
}

impl TokenKind {
    pub fn opens_group(&self) -> bool {
        matches!(
            self,
            TokenKind::OpenParen | TokenKind::OpenBracket | TokenKind::OpenCurly
        )
    }

    pub fn closes_group(&self) -> bool {
        matches!(
            self,
            TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseCurly
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}
