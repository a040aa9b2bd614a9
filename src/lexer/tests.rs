//! Unit tests for the lexer module.
//!
//! Covers keywords and identifiers, numeric literals, operators and
//! punctuation, comments, and error cases.

use super::{lexer::tokenize, tokens::TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source.to_string(), Some("test.bj".to_string()))
        .unwrap()
        .iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("var def class extension super coroutine return yield"),
        vec![
            TokenKind::Var,
            TokenKind::Def,
            TokenKind::Class,
            TokenKind::Extension,
            TokenKind::Super,
            TokenKind::Coroutine,
            TokenKind::Return,
            TokenKind::Yield,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_control_and_type_keywords() {
    assert_eq!(
        kinds("if else while break continue true false auto const volatile decltype"),
        vec![
            TokenKind::If,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::Break,
            TokenKind::Continue,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Auto,
            TokenKind::Const,
            TokenKind::Volatile,
            TokenKind::Decltype,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let source = "foo baz_123 _underscore int32 variable".to_string();
    let tokens = tokenize(source, Some("test.bj".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[1].value, "baz_123");
    assert_eq!(tokens[2].value, "_underscore");
    // Builtin type names are ordinary identifiers.
    assert_eq!(tokens[3].kind, TokenKind::Identifier);
    assert_eq!(tokens[3].value, "int32");
    // A keyword prefix does not make a keyword.
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].value, "variable");
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let source = "42 3.14 0 100.5".to_string();
    let tokens = tokenize(source, Some("test.bj".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].value, "0");
    assert_eq!(tokens[3].value, "100.5");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("+ - * / % == != < > <= >= = && || ! &"),
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::LessEquals,
            TokenKind::GreaterEquals,
            TokenKind::Assignment,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::Ampersand,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) { } [ ] , ; : ->"),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::Colon,
            TokenKind::Arrow,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_reference_type() {
    assert_eq!(
        kinds("x: auto const&"),
        vec![
            TokenKind::Identifier,
            TokenKind::Colon,
            TokenKind::Auto,
            TokenKind::Const,
            TokenKind::Ampersand,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_comments() {
    let source = "var x: int32 = 5; // trailing\nvar y: int32;".to_string();
    let tokens = tokenize(source, Some("test.bj".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Var);
    assert_eq!(tokens[5].kind, TokenKind::Number);
    assert_eq!(tokens[6].kind, TokenKind::Semicolon);
    assert_eq!(tokens[7].kind, TokenKind::Var);
    assert_eq!(tokens[8].value, "y");
}

#[test]
fn test_tokenize_simple_declaration() {
    let source = "def N: int32 = 2 + 3;".to_string();
    let tokens = tokenize(source, Some("test.bj".to_string())).unwrap();

    assert_eq!(tokens.len(), 10);
    assert_eq!(tokens[0].kind, TokenKind::Def);
    assert_eq!(tokens[1].value, "N");
    assert_eq!(tokens[3].value, "int32");
    assert_eq!(tokens[9].kind, TokenKind::EOF);
}

#[test]
fn test_token_positions() {
    let source = "var  abc".to_string();
    let tokens = tokenize(source, Some("test.bj".to_string())).unwrap();

    assert_eq!(tokens[1].span.start.0, 5);
    assert_eq!(tokens[1].span.end.0, 8);
    assert_eq!(tokens[2].span.start.0, 8);
    assert_eq!(tokens[1].span.start.1.as_str(), "test.bj");
}

#[test]
fn test_tokenize_unrecognized_token() {
    let source = "var x: int32 = @;".to_string();
    let result = tokenize(source, Some("test.bj".to_string()));

    let error = result.unwrap_err();
    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 15);
}

#[test]
fn test_tokenize_whitespace_handling() {
    assert_eq!(
        kinds("  var   x   =   42  "),
        vec![
            TokenKind::Var,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Number,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_empty_source() {
    assert_eq!(kinds(""), vec![TokenKind::EOF]);
}
