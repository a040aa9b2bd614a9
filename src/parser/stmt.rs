//! Statement parsing.
//!
//! Statements and declarations are parsed eagerly, but every type and
//! expression inside them is captured as an unparsed [`Fragment`] to be
//! resolved once all declarations are visible. Declarations are entered
//! into the active scope as they are read, and the scopes they open are
//! saved so the elaborator can re-enter them.

use crate::{
    ast::{
        ast::{
            ClassDecl, Decl, DeclId, DeclKind, Fragment, FunctionBody, FunctionDecl, ObjectDecl,
            ScopeId,
        },
        expressions::Expr,
        statements::{CompoundStmt, Stmt},
        types::Type,
    },
    context::{context::WithContext, scope::ScopeKey},
    errors::errors::Error,
    lexer::tokens::{Token, TokenKind},
    Position, Span,
};

use super::parser::Parser;

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(handler) = parser.stmt_handler(parser.current_token_kind()) {
        return handler(parser);
    }

    let fragment = capture(parser, &[TokenKind::Semicolon])?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Expression(Expr::unparsed(fragment)))
}

/// Collects the tokens up to the first of `terminators` that is not nested
/// inside brackets. The terminator itself is not consumed.
pub fn capture(parser: &mut Parser, terminators: &[TokenKind]) -> Result<Fragment, Error> {
    let position = parser.get_position();
    let mut tokens = vec![];
    let mut depth = 0usize;

    loop {
        let kind = parser.current_token_kind();
        if kind == TokenKind::EOF {
            return Err(parser.unexpected());
        }
        if depth == 0 && terminators.contains(&kind) {
            break;
        }

        if kind.opens_group() {
            depth += 1;
        } else if kind.closes_group() {
            if depth == 0 {
                return Err(parser.unexpected());
            }
            depth -= 1;
        }
        tokens.push(parser.advance());
    }

    if tokens.is_empty() {
        return Err(parser.unexpected());
    }

    Ok(Fragment { tokens, position })
}

fn expect_name(parser: &mut Parser, construct: &str) -> Result<Token, Error> {
    let error = parser.unexpected_detailed(&format!("expected identifier during {}", construct));
    parser.expect_error(TokenKind::Identifier, Some(error))
}

/// Declares `name` in the active scope.
fn declare(parser: &mut Parser, name: String, kind: DeclKind, span: Span) -> DeclId {
    let cxt = parser.context();
    let scope = cxt.current_scope();
    cxt.declare(Decl {
        name,
        kind,
        scope,
        span,
    })
}

/// Makes a child of the active scope and saves it under `key`.
fn open_scope(parser: &mut Parser, key: ScopeKey) -> ScopeId {
    let cxt = parser.context();
    let parent = cxt.current_scope();
    let scope = cxt.make_scope(parent);
    cxt.save_scope(key, scope);
    scope
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;
    let name = expect_name(parser, "variable declaration")?.value;

    parser.expect(TokenKind::Colon)?;
    let ty = Type::Unparsed(capture(parser, &[TokenKind::Assignment, TokenKind::Semicolon])?);

    let init = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        Some(Expr::unparsed(capture(parser, &[TokenKind::Semicolon])?))
    } else {
        None
    };

    let end = parser.expect(TokenKind::Semicolon)?.span.end;
    let span = Span { start, end };

    let id = declare(parser, name, DeclKind::Variable(ObjectDecl { ty, init }), span.clone());
    Ok(Stmt::Declaration(id, span))
}

/// `def` introduces either a constant or a function.
pub fn parse_def_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;
    let name = expect_name(parser, "definition")?.value;

    match parser.current_token_kind() {
        TokenKind::Colon => {
            parser.advance();
            let ty =
                Type::Unparsed(capture(parser, &[TokenKind::Assignment, TokenKind::Semicolon])?);
            parser.expect(TokenKind::Assignment)?;
            let init = Expr::unparsed(capture(parser, &[TokenKind::Semicolon])?);
            let end = parser.expect(TokenKind::Semicolon)?.span.end;
            let span = Span { start, end };

            let object = ObjectDecl {
                ty,
                init: Some(init),
            };
            let id = declare(parser, name, DeclKind::Constant(object), span.clone());
            Ok(Stmt::Declaration(id, span))
        }
        TokenKind::OpenParen => parse_function(parser, start, name, false),
        _ => Err(parser.unexpected_detailed("expected `:` or `(` after the defined name")),
    }
}

pub fn parse_coroutine_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;
    let name = expect_name(parser, "coroutine declaration")?.value;
    parse_function(parser, start, name, true)
}

fn parse_function(
    parser: &mut Parser,
    start: Position,
    name: String,
    coroutine: bool,
) -> Result<Stmt, Error> {
    // The function is visible from its own body.
    let placeholder = FunctionDecl {
        parameters: vec![],
        return_type: Type::Auto,
        ty: Type::Auto,
        body: FunctionBody::Empty,
        template_parameters: vec![],
    };
    let kind = if coroutine {
        DeclKind::Coroutine(placeholder)
    } else {
        DeclKind::Function(placeholder)
    };
    let span = Span {
        start: start.clone(),
        end: start.clone(),
    };
    let id = declare(parser, name, kind, span);

    let scope = open_scope(parser, ScopeKey::Decl(id));
    let function = parser.in_scope(scope, |parser| parse_function_decl(parser, id))?;

    let span = Span {
        start,
        end: parser.last_end(),
    };
    let decl = parser.context().decl_mut(id);
    decl.span = span.clone();
    if let Some(slot) = decl.function_mut() {
        *slot = function;
    }

    Ok(Stmt::Declaration(id, span))
}

fn parse_function_decl(parser: &mut Parser, id: DeclId) -> Result<FunctionDecl, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        if !parameters.is_empty() {
            parser.expect(TokenKind::Comma)?;
        }

        let token = expect_name(parser, "parameter declaration")?;
        parser.expect(TokenKind::Colon)?;
        let ty = Type::Unparsed(capture(parser, &[TokenKind::Comma, TokenKind::CloseParen])?);
        let span = Span {
            start: token.span.start,
            end: parser.last_end(),
        };
        parameters.push(declare(parser, token.value, DeclKind::Parameter(ty), span));
    }
    parser.expect(TokenKind::CloseParen)?;

    let explicit_return = if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        Some(Type::Unparsed(capture(
            parser,
            &[TokenKind::OpenCurly, TokenKind::Assignment, TokenKind::Semicolon],
        )?))
    } else {
        None
    };

    let body = match parser.current_token_kind() {
        TokenKind::OpenCurly => FunctionBody::Statement(parse_block_stmt(parser)?),
        TokenKind::Assignment => {
            parser.advance();
            open_scope(parser, ScopeKey::Body(id));
            let fragment = capture(parser, &[TokenKind::Semicolon])?;
            parser.expect(TokenKind::Semicolon)?;
            FunctionBody::Expression(Expr::unparsed(fragment))
        }
        TokenKind::Semicolon => {
            parser.advance();
            FunctionBody::Empty
        }
        _ => return Err(parser.unexpected_detailed("expected a function body")),
    };

    // Without an explicit return type, only expression bodies are deduced.
    let return_type = explicit_return.unwrap_or(match body {
        FunctionBody::Expression(_) => Type::Auto,
        _ => Type::Void,
    });

    Ok(FunctionDecl {
        parameters,
        return_type,
        ty: Type::Auto,
        body,
        template_parameters: vec![],
    })
}

/// Parses `class` and `extension` declarations.
pub fn parse_class_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let keyword = parser.advance();
    let extension = keyword.kind == TokenKind::Extension;
    let name = expect_name(parser, "class declaration")?.value;

    let kind = if !extension && parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Type::Unparsed(capture(parser, &[TokenKind::OpenCurly])?)
    } else {
        Type::Meta
    };

    let class = ClassDecl { kind, body: vec![] };
    let span = Span {
        start: keyword.span.start.clone(),
        end: keyword.span.end,
    };
    let id = if extension {
        declare(parser, name, DeclKind::Extension(class), span)
    } else {
        declare(parser, name, DeclKind::Class(class), span)
    };

    let scope = open_scope(parser, ScopeKey::Decl(id));
    let body = parser.in_scope(scope, parse_block_body)?;

    let span = Span {
        start: keyword.span.start,
        end: parser.last_end(),
    };
    let decl = parser.context().decl_mut(id);
    decl.span = span.clone();
    if let Some(class) = decl.class_mut() {
        class.body = body;
    }

    Ok(Stmt::Declaration(id, span))
}

pub fn parse_super_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;
    let name = expect_name(parser, "super declaration")?.value;

    parser.expect(TokenKind::Colon)?;
    let ty = Type::Unparsed(capture(parser, &[TokenKind::Semicolon])?);
    let end = parser.expect(TokenKind::Semicolon)?.span.end;
    let span = Span { start, end };

    let id = declare(parser, name, DeclKind::Super(ty), span.clone());
    Ok(Stmt::Declaration(id, span))
}

/// Parses `{ statements }` in the active scope.
fn parse_block_body(parser: &mut Parser) -> Result<Vec<Stmt>, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut body = vec![];
    while parser.has_tokens() && parser.current_token_kind() != TokenKind::CloseCurly {
        body.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;
    Ok(body)
}

/// A block opens its own scope, saved under a fresh block id.
pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    let id = parser.context().next_block_id();

    let scope = open_scope(parser, ScopeKey::Block(id));
    let body = parser.in_scope(scope, parse_block_body)?;

    Ok(Stmt::Compound(CompoundStmt {
        body,
        id,
        span: Span {
            start,
            end: parser.last_end(),
        },
    }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(Expr::unparsed(capture(parser, &[TokenKind::Semicolon])?))
    } else {
        None
    };

    let end = parser.expect(TokenKind::Semicolon)?.span.end;
    Ok(Stmt::Return {
        value,
        span: Span { start, end },
    })
}

pub fn parse_yield_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;
    let value = Expr::unparsed(capture(parser, &[TokenKind::Semicolon])?);
    let end = parser.expect(TokenKind::Semicolon)?.span.end;

    Ok(Stmt::Yield {
        value,
        span: Span { start, end },
    })
}

fn parse_condition(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = Expr::unparsed(capture(parser, &[TokenKind::CloseParen])?);
    parser.expect(TokenKind::CloseParen)?;
    Ok(condition)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    let condition = parse_condition(parser)?;
    let then_branch = parse_stmt(parser)?;

    let else_branch = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(Box::new(parse_stmt(parser)?))
    } else {
        None
    };

    Ok(Stmt::If {
        condition,
        then_branch: Box::new(then_branch),
        else_branch,
        span: Span {
            start,
            end: parser.last_end(),
        },
    })
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    let condition = parse_condition(parser)?;
    let body = parse_stmt(parser)?;

    Ok(Stmt::While {
        condition,
        body: Box::new(body),
        span: Span {
            start,
            end: parser.last_end(),
        },
    })
}

/// `break;` and `continue;`
pub fn parse_jump_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let keyword = parser.advance();
    let end = parser.expect(TokenKind::Semicolon)?.span.end;
    let span = Span {
        start: keyword.span.start,
        end,
    };

    Ok(match keyword.kind {
        TokenKind::Break => Stmt::Break(span),
        _ => Stmt::Continue(span),
    })
}
