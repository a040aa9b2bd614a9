//! Type parsing implementation.
//!
//! Types are parsed with their own NUD/LED tables. Prefix handlers cover
//! named and builtin types, placeholders, `decltype` and leading
//! qualifiers; postfix handlers build pointers, references, arrays and
//! sequences and apply trailing qualifiers, binding left to right:
//! `int32 const*&` is a reference to a pointer to a const `int32`.

use std::collections::HashMap;

use crate::{
    ast::{
        ast::DeclKind,
        types::{NamedType, Qualifiers, Type},
    },
    context::context::WithContext,
    errors::errors::{Error, ErrorImpl},
    evaluator::evaluator::{evaluate, Value},
    lexer::tokens::TokenKind,
};

use super::{expr::parse_expr, lookups::BindingPower, parser::Parser};

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser<'_>) -> Result<Type, Error>;

/// Type alias for type left denotation handler functions.
pub type TypeLEDHandler = fn(&mut Parser<'_>, Type, BindingPower) -> Result<Type, Error>;

pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;
pub type TypeLEDLookup = HashMap<TokenKind, TypeLEDHandler>;

pub fn create_token_type_lookups(parser: &mut Parser<'_>) {
    parser.type_nud(TokenKind::Identifier, parse_named_type);
    parser.type_nud(TokenKind::Auto, parse_auto_type);
    parser.type_nud(TokenKind::Decltype, parse_decltype_type);
    parser.type_nud(TokenKind::Const, parse_prefix_qualified_type);
    parser.type_nud(TokenKind::Volatile, parse_prefix_qualified_type);
    parser.type_nud(TokenKind::OpenParen, parse_grouping_type);

    parser.type_led(TokenKind::Star, BindingPower::Call, parse_pointer_type);
    parser.type_led(TokenKind::Ampersand, BindingPower::Call, parse_reference_type);
    parser.type_led(TokenKind::Const, BindingPower::Call, parse_suffix_qualified_type);
    parser.type_led(TokenKind::Volatile, BindingPower::Call, parse_suffix_qualified_type);
    parser.type_led(TokenKind::OpenBracket, BindingPower::Call, parse_array_type);
}

pub fn parse_type(parser: &mut Parser, bp: BindingPower) -> Result<Type, Error> {
    let Some(nud) = parser.type_nud_handler(parser.current_token_kind()) else {
        return Err(parser.unexpected_detailed("expected a type"));
    };
    let mut left = nud(parser)?;

    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = parser.type_binding_power(token_kind);
        if next_bp <= bp {
            break;
        }

        let Some(led) = parser.type_led_handler(token_kind) else {
            return Err(parser.unexpected());
        };
        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

/// The types named by reserved identifiers.
pub fn builtin_type(name: &str) -> Option<Type> {
    let ty = match name {
        "void" => Type::Void,
        "bool" => Type::Boolean,
        "int8" => Type::int(8),
        "int16" => Type::int(16),
        "int32" => Type::int(32),
        "int64" => Type::int(64),
        "uint8" => Type::uint(8),
        "uint16" => Type::uint(16),
        "uint32" => Type::uint(32),
        "uint64" => Type::uint(64),
        "float32" => Type::float(32),
        "float64" => Type::float(64),
        "type" => Type::Meta,
        _ => return None,
    };
    Some(ty)
}

pub fn parse_named_type(parser: &mut Parser) -> Result<Type, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    if let Some(ty) = builtin_type(&token.value) {
        return Ok(ty);
    }

    let cxt = parser.context();
    let Some(overloads) = cxt.lookup(&token.value) else {
        return Err(Error::new(
            ErrorImpl::NameError {
                name: token.value.clone(),
            },
            token.span.start.clone(),
        ));
    };

    // A class is preferred over the extensions sharing its name.
    let class = overloads
        .iter()
        .copied()
        .find(|id| matches!(cxt.decl(*id).kind, DeclKind::Class(_)))
        .or_else(|| {
            overloads
                .iter()
                .copied()
                .find(|id| cxt.decl(*id).is_extension())
        });
    if let Some(decl) = class {
        return Ok(Type::Class(NamedType {
            decl,
            name: token.value,
        }));
    }

    let parameter = overloads
        .iter()
        .copied()
        .find(|id| matches!(cxt.decl(*id).kind, DeclKind::TypeParameter));
    if let Some(decl) = parameter {
        return Ok(Type::Typename(NamedType {
            decl,
            name: token.value,
        }));
    }

    Err(Error::new(
        ErrorImpl::UnknownType {
            type_: token.value.clone(),
        },
        token.span.start,
    ))
}

pub fn parse_auto_type(parser: &mut Parser) -> Result<Type, Error> {
    parser.expect(TokenKind::Auto)?;
    Ok(Type::Auto)
}

/// `decltype(auto)` is a placeholder; `decltype(e)` is the type of `e`,
/// kept symbolic while that type is dependent.
pub fn parse_decltype_type(parser: &mut Parser) -> Result<Type, Error> {
    parser.expect(TokenKind::Decltype)?;
    parser.expect(TokenKind::OpenParen)?;

    if parser.current_token_kind() == TokenKind::Auto
        && parser.peek_kind(1) == TokenKind::CloseParen
    {
        parser.advance();
        parser.advance();
        return Ok(Type::Declauto);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    if expr.ty.is_dependent() {
        Ok(Type::Decltype(Box::new(expr)))
    } else {
        Ok(expr.ty)
    }
}

fn qualifier_of(kind: TokenKind) -> Qualifiers {
    match kind {
        TokenKind::Volatile => Qualifiers::VOLATILE,
        _ => Qualifiers::CONST,
    }
}

pub fn parse_prefix_qualified_type(parser: &mut Parser) -> Result<Type, Error> {
    let qualifier = qualifier_of(parser.advance().kind);
    let inner = parse_type(parser, BindingPower::Primary)?;
    Ok(inner.qualified(qualifier))
}

pub fn parse_grouping_type(parser: &mut Parser) -> Result<Type, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let ty = parse_type(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;
    Ok(ty)
}

pub fn parse_pointer_type(parser: &mut Parser, left: Type, _bp: BindingPower) -> Result<Type, Error> {
    parser.expect(TokenKind::Star)?;
    Ok(left.pointer())
}

pub fn parse_reference_type(
    parser: &mut Parser,
    left: Type,
    _bp: BindingPower,
) -> Result<Type, Error> {
    parser.expect(TokenKind::Ampersand)?;
    Ok(left.reference())
}

pub fn parse_suffix_qualified_type(
    parser: &mut Parser,
    left: Type,
    _bp: BindingPower,
) -> Result<Type, Error> {
    let qualifier = qualifier_of(parser.advance().kind);
    Ok(left.qualified(qualifier))
}

/// `T[]` is a sequence; `T[N]` an array whose extent is a constant
/// expression.
pub fn parse_array_type(parser: &mut Parser, left: Type, _bp: BindingPower) -> Result<Type, Error> {
    parser.expect(TokenKind::OpenBracket)?;

    if parser.current_token_kind() == TokenKind::CloseBracket {
        parser.advance();
        return Ok(Type::Sequence(Box::new(left)));
    }

    let extent = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    match evaluate(parser.context(), &extent)? {
        Value::Integer(n) if n >= 0 => Ok(Type::Array(Box::new(left), n as u64)),
        value => Err(Error::new(
            ErrorImpl::EvaluationError {
                message: format!("array extent must be a non-negative integer, found {}", value),
            },
            extent.span.start.clone(),
        )),
    }
}
