use crate::Span;

use super::{ast::DeclId, expressions::Expr};

#[derive(Debug, Clone, PartialEq)]
pub struct CompoundStmt {
    pub body: Vec<Stmt>,
    /// Keys the block's saved scope.
    pub id: u32,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Compound(CompoundStmt),
    Return {
        value: Option<Expr>,
        span: Span,
    },
    Yield {
        value: Expr,
        span: Span,
    },
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        span: Span,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
        span: Span,
    },
    Break(Span),
    Continue(Span),
    Declaration(DeclId, Span),
    Expression(Expr),
}

impl Stmt {
    pub fn span(&self) -> &Span {
        match self {
            Stmt::Compound(compound) => &compound.span,
            Stmt::Return { span, .. }
            | Stmt::Yield { span, .. }
            | Stmt::If { span, .. }
            | Stmt::While { span, .. }
            | Stmt::Break(span)
            | Stmt::Continue(span)
            | Stmt::Declaration(_, span) => span,
            Stmt::Expression(expr) => &expr.span,
        }
    }

    pub fn declaration(&self) -> Option<DeclId> {
        match self {
            Stmt::Declaration(id, _) => Some(*id),
            _ => None,
        }
    }
}
