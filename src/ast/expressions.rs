use std::fmt::Display;

use crate::{lexer::tokens::TokenKind, Span};

use super::{
    ast::{DeclId, Fragment},
    types::Type,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    Equals,
    NotEquals,
    And,
    Or,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<BinaryOp> {
        let op = match kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Dash => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Rem,
            TokenKind::Less => BinaryOp::Less,
            TokenKind::LessEquals => BinaryOp::LessEquals,
            TokenKind::Greater => BinaryOp::Greater,
            TokenKind::GreaterEquals => BinaryOp::GreaterEquals,
            TokenKind::Equals => BinaryOp::Equals,
            TokenKind::NotEquals => BinaryOp::NotEquals,
            TokenKind::And => BinaryOp::And,
            TokenKind::Or => BinaryOp::Or,
            _ => return None,
        };
        Some(op)
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem
        )
    }

    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            BinaryOp::Less
                | BinaryOp::LessEquals
                | BinaryOp::Greater
                | BinaryOp::GreaterEquals
                | BinaryOp::Equals
                | BinaryOp::NotEquals
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Less => "<",
            BinaryOp::LessEquals => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEquals => ">=",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        };
        write!(f, "{}", symbol)
    }
}

/// Standard conversions, materialized as wrapper nodes whose type is the
/// conversion's target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Reads the value of an expression of reference type.
    Value,
    Boolean,
    Integer,
    Float,
    Qualification,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Unparsed(Fragment),
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Reference { decl: DeclId, name: String },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary { op: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    Call { callee: Box<Expr>, arguments: Vec<Expr> },
    Assign { assignee: Box<Expr>, value: Box<Expr> },
    Conversion(Conversion, Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Type,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, ty: Type, span: Span) -> Expr {
        Expr { kind, ty, span }
    }

    pub fn unparsed(fragment: Fragment) -> Expr {
        let span = fragment.span();
        Expr {
            kind: ExprKind::Unparsed(fragment),
            ty: Type::Auto,
            span,
        }
    }

    /// Wraps `self` in a conversion to `target`.
    pub fn convert(self, conversion: Conversion, target: Type) -> Expr {
        let span = self.span.clone();
        Expr {
            kind: ExprKind::Conversion(conversion, Box::new(self)),
            ty: target,
            span,
        }
    }

    pub fn is_unparsed(&self) -> bool {
        matches!(self.kind, ExprKind::Unparsed(_))
    }

    /// The conversion applied at the root of this expression, if any.
    pub fn conversion(&self) -> Option<Conversion> {
        match self.kind {
            ExprKind::Conversion(conversion, _) => Some(conversion),
            _ => None,
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ExprKind::Unparsed(fragment) => write!(f, "<unparsed {}>", fragment.text()),
            ExprKind::Boolean(value) => write!(f, "{}", value),
            ExprKind::Integer(value) => write!(f, "{}", value),
            ExprKind::Float(value) => write!(f, "{:?}", value),
            ExprKind::Reference { name, .. } => write!(f, "{}", name),
            ExprKind::Unary { op, operand } => match op {
                UnaryOp::Negate => write!(f, "-{}", operand),
                UnaryOp::Not => write!(f, "!{}", operand),
            },
            ExprKind::Binary { op, left, right } => write!(f, "({} {} {})", left, op, right),
            ExprKind::Call { callee, arguments } => {
                let arguments = arguments
                    .iter()
                    .map(|argument| argument.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{}({})", callee, arguments)
            }
            ExprKind::Assign { assignee, value } => write!(f, "{} = {}", assignee, value),
            // Conversions are implicit in the source.
            ExprKind::Conversion(_, source) => write!(f, "{}", source),
        }
    }
}
