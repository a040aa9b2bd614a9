//! Parser implementation.
//!
//! The parser is a Pratt parser with NUD/LED handler tables for expressions
//! and types, and a statement table. It runs in two roles:
//!
//! - [`parse`] reads a whole translation unit. Types and expressions are not
//!   parsed here; their tokens are captured as [`Fragment`]s and declarations
//!   are entered into scopes as they are read.
//! - [`parse_type_fragment`] and [`parse_expression_fragment`] re-parse one
//!   captured fragment under the scope active at the call site, binding
//!   names and typing expressions as they are built.

use std::{collections::HashMap, rc::Rc};

use tracing::debug;

use crate::{
    ast::{
        ast::{Fragment, TranslationUnit},
        expressions::Expr,
        types::Type,
    },
    context::context::{Context, WithContext},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span,
};

use super::{
    expr::parse_expr,
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_stmt,
    types::{
        create_token_type_lookups, parse_type, TypeLEDHandler, TypeLEDLookup, TypeNUDHandler,
        TypeNUDLookup,
    },
};

/// The parser state: the token stream, the handler tables and the context
/// that names are declared into and looked up in.
pub struct Parser<'a> {
    /// The tokens to parse, always terminated by EOF
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The name of the source file being parsed
    file: Rc<String>,
    stmt_lookup: StmtLookup,
    nud_lookup: NUDLookup,
    led_lookup: LEDLookup,
    binding_power_lookup: BPLookup,
    type_nud_lookup: TypeNUDLookup,
    type_led_lookup: TypeLEDLookup,
    type_binding_power_lookup: BPLookup,
    cxt: &'a mut Context,
}

impl<'a> Parser<'a> {
    /// Creates a parser over `tokens` with every handler table registered.
    pub fn new(mut tokens: Vec<Token>, cxt: &'a mut Context) -> Self {
        let file = tokens
            .first()
            .map(|token| Rc::clone(&token.span.start.1))
            .unwrap_or_else(|| Rc::new(String::from("shell")));

        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(|| Position(0, Rc::clone(&file)));
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: Span {
                    start: end.clone(),
                    end,
                },
            });
        }

        let mut parser = Parser {
            tokens,
            pos: 0,
            file,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
            type_led_lookup: HashMap::new(),
            type_binding_power_lookup: HashMap::new(),
            cxt,
        };
        create_token_lookups(&mut parser);
        create_token_type_lookups(&mut parser);
        parser
    }

    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// The kind of the token `offset` places ahead, or EOF.
    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|token| token.kind)
            .unwrap_or(TokenKind::EOF)
    }

    /// Advances to the next token and returns the previous one. EOF is never
    /// consumed.
    pub fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Expects a token of the specified kind, with an optional custom error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            Err(error.unwrap_or_else(|| self.unexpected()))
        } else {
            Ok(self.advance())
        }
    }

    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// An `UnexpectedToken` error for the current token.
    pub fn unexpected(&self) -> Error {
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: self.current_token().value.clone(),
            },
            self.get_position(),
        )
    }

    pub fn unexpected_detailed(&self, message: &str) -> Error {
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: self.current_token().value.clone(),
                message: message.to_string(),
            },
            self.get_position(),
        )
    }

    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn stmt_handler(&self, kind: TokenKind) -> Option<StmtHandler> {
        self.stmt_lookup.get(&kind).copied()
    }

    pub fn nud_handler(&self, kind: TokenKind) -> Option<NUDHandler> {
        self.nud_lookup.get(&kind).copied()
    }

    pub fn led_handler(&self, kind: TokenKind) -> Option<LEDHandler> {
        self.led_lookup.get(&kind).copied()
    }

    pub fn binding_power(&self, kind: TokenKind) -> BindingPower {
        self.binding_power_lookup
            .get(&kind)
            .copied()
            .unwrap_or(BindingPower::Default)
    }

    pub fn type_nud_handler(&self, kind: TokenKind) -> Option<TypeNUDHandler> {
        self.type_nud_lookup.get(&kind).copied()
    }

    pub fn type_led_handler(&self, kind: TokenKind) -> Option<TypeLEDHandler> {
        self.type_led_lookup.get(&kind).copied()
    }

    pub fn type_binding_power(&self, kind: TokenKind) -> BindingPower {
        self.type_binding_power_lookup
            .get(&kind)
            .copied()
            .unwrap_or(BindingPower::Default)
    }

    /// Registers a left denotation (infix or postfix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    pub fn type_led(
        &mut self,
        kind: TokenKind,
        binding_power: BindingPower,
        led_fn: TypeLEDHandler,
    ) {
        self.type_binding_power_lookup.insert(kind, binding_power);
        self.type_led_lookup.insert(kind, led_fn);
    }

    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    /// The position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// The end of the most recently consumed token.
    pub fn last_end(&self) -> Position {
        match self.pos.checked_sub(1).and_then(|pos| self.tokens.get(pos)) {
            Some(token) => token.span.end.clone(),
            None => Position(0, Rc::clone(&self.file)),
        }
    }
}

impl WithContext for Parser<'_> {
    fn context(&mut self) -> &mut Context {
        self.cxt
    }
}

/// Parses a translation unit, deferring every type and expression.
pub fn parse(tokens: Vec<Token>, cxt: &mut Context) -> Result<TranslationUnit, Error> {
    let scope = cxt.global_scope();
    let mut parser = Parser::new(tokens, cxt);

    let body = parser.in_scope(scope, |parser| {
        let mut body = vec![];
        while parser.has_tokens() {
            body.push(parse_stmt(parser)?);
        }
        Ok::<_, Error>(body)
    })?;

    debug!(statements = body.len(), file = %parser.file, "parsed translation unit");
    Ok(TranslationUnit { body, scope })
}

/// Parses exactly the tokens of `fragment` as a type.
pub fn parse_type_fragment(cxt: &mut Context, fragment: &Fragment) -> Result<Type, Error> {
    let mut parser = Parser::new(fragment.tokens.clone(), cxt);
    let ty = parse_type(&mut parser, BindingPower::Default)?;
    parser.expect(TokenKind::EOF)?;
    Ok(ty)
}

/// Parses exactly the tokens of `fragment` as an expression.
pub fn parse_expression_fragment(cxt: &mut Context, fragment: &Fragment) -> Result<Expr, Error> {
    let mut parser = Parser::new(fragment.tokens.clone(), cxt);
    let expr = parse_expr(&mut parser, BindingPower::Default)?;
    parser.expect(TokenKind::EOF)?;
    Ok(expr)
}
