use crate::{
    ast::expressions::{BinaryOp, Expr, UnaryOp},
    context::context::WithContext,
    errors::errors::Error,
    lexer::tokens::TokenKind,
    Span,
};

use super::{actions, lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let Some(nud) = parser.nud_handler(parser.current_token_kind()) else {
        return Err(parser.unexpected());
    };
    let mut left = nud(parser)?;

    // While the next operator binds tighter than `bp`, keep extending lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = parser.binding_power(token_kind);
        if next_bp <= bp {
            break;
        }

        let Some(led) = parser.led_handler(token_kind) else {
            return Err(parser.unexpected());
        };
        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance();
    match token.kind {
        TokenKind::Number if token.value.contains('.') => actions::on_float(&token),
        TokenKind::Number => actions::on_integer(&token),
        TokenKind::True | TokenKind::False => Ok(actions::on_boolean(&token)),
        TokenKind::Identifier => actions::on_reference(parser.context(), &token),
        _ => Err(parser.unexpected()),
    }
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance();
    let operand = parse_expr(parser, BindingPower::Unary)?;

    let op = match operator_token.kind {
        TokenKind::Not => UnaryOp::Not,
        _ => UnaryOp::Negate,
    };
    let span = Span {
        start: operator_token.span.start,
        end: operand.span.end.clone(),
    };

    actions::on_unary(op, operand, span)
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance();
    let Some(op) = BinaryOp::from_token(operator_token.kind) else {
        return Err(parser.unexpected());
    };

    let right = parse_expr(parser, bp)?;

    actions::on_binary(op, left, right)
}

pub fn parse_assignment_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    parser.advance();
    // One step below assignment so that `a = b = c` groups to the right
    let value = parse_expr(parser, BindingPower::Comma)?;

    actions::on_assign(left, value)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut arguments = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        if !arguments.is_empty() {
            parser.expect(TokenKind::Comma)?;
        }
        arguments.push(parse_expr(parser, BindingPower::Default)?);
    }

    let end = parser.expect(TokenKind::CloseParen)?.span.end;
    let span = Span {
        start: left.span.start.clone(),
        end,
    };

    actions::on_call(left, arguments, span)
}
