use std::rc::Rc;

use tracing::trace;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &str);

#[derive(Clone)]
pub struct RegexPattern {
    regex: regex::Regex,
    handler: RegexHandler,
}

/// Builds a pattern anchored at the lexer's current position.
fn pattern(regex: &str, handler: RegexHandler) -> Result<RegexPattern, Error> {
    let regex = regex::Regex::new(&format!("^(?:{})", regex)).map_err(|error| {
        Error::new(
            ErrorImpl::ImplementationError {
                message: format!("invalid token pattern {:?}: {}", regex, error),
            },
            Position::null(),
        )
    })?;

    Ok(RegexPattern { regex, handler })
}

#[derive(Clone)]
pub struct Lexer {
    patterns: Vec<RegexPattern>,
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Result<Lexer, Error> {
        let file_name = Rc::new(file.unwrap_or_else(|| String::from("shell")));

        Ok(Lexer {
            pos: 0,
            tokens: vec![],
            patterns: vec![
                pattern("[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler)?,
                pattern("[0-9]+(\\.[0-9]+)?", number_handler)?,
                pattern("\\s+", skip_handler)?,
                pattern("//.*", skip_handler)?,
                pattern("\\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "["))?,
                pattern("\\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]"))?,
                pattern("\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{"))?,
                pattern("\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}"))?,
                pattern("\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "("))?,
                pattern("\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")"))?,
                pattern("==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "=="))?,
                pattern("!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!="))?,
                pattern("!", MK_DEFAULT_HANDLER!(TokenKind::Not, "!"))?,
                pattern("=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "="))?,
                pattern("<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<="))?,
                pattern("<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<"))?,
                pattern(">=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">="))?,
                pattern(">", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">"))?,
                pattern("\\|\\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||"))?,
                pattern("&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&"))?,
                pattern("&", MK_DEFAULT_HANDLER!(TokenKind::Ampersand, "&"))?,
                pattern(";", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";"))?,
                pattern(":", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":"))?,
                pattern(",", MK_DEFAULT_HANDLER!(TokenKind::Comma, ","))?,
                pattern("->", MK_DEFAULT_HANDLER!(TokenKind::Arrow, "->"))?,
                pattern("\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+"))?,
                pattern("-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-"))?,
                pattern("/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/"))?,
                pattern("\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*"))?,
                pattern("%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%"))?,
            ],
            source,
            file: file_name,
        })
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// The span of the next `len` bytes of input.
    pub fn span_of(&self, len: usize) -> Span {
        Span {
            start: Position(self.pos as u32, Rc::clone(&self.file)),
            end: Position((self.pos + len) as u32, Rc::clone(&self.file)),
        }
    }

    pub fn at(&self) -> char {
        self.remainder().chars().next().unwrap_or('\0')
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }
}

fn number_handler(lexer: &mut Lexer, matched: &str) {
    let span = lexer.span_of(matched.len());
    lexer.push(MK_TOKEN!(TokenKind::Number, matched.to_string(), span));
    lexer.advance_n(matched.len());
}

fn skip_handler(lexer: &mut Lexer, matched: &str) {
    lexer.advance_n(matched.len());
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) {
    let span = lexer.span_of(matched.len());
    let kind = RESERVED_LOOKUP
        .get(matched)
        .copied()
        .unwrap_or(TokenKind::Identifier);

    lexer.push(MK_TOKEN!(kind, matched.to_string(), span));
    lexer.advance_n(matched.len());
}

pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file)?;

    while !lex.at_eof() {
        let matched = lex.patterns.iter().find_map(|pattern| {
            pattern
                .regex
                .find(lex.remainder())
                .filter(|found| !found.as_str().is_empty())
                .map(|found| (pattern.handler, found.as_str().to_string()))
        });

        match matched {
            Some((handler, text)) => handler(&mut lex, &text),
            None => {
                return Err(Error::new(
                    ErrorImpl::UnrecognisedToken {
                        token: lex.at().to_string(),
                    },
                    Position(lex.pos as u32, Rc::clone(&lex.file)),
                ))
            }
        }
    }

    let span = lex.span_of(0);
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));
    trace!(count = lex.tokens.len(), file = %lex.file, "tokenized");
    Ok(lex.tokens)
}
