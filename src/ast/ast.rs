use crate::{errors::errors::Construct, lexer::tokens::Token, Position, Span};

use super::{expressions::Expr, statements::Stmt, types::Type};

/// Index of a declaration in the context's declaration arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub usize);

/// Index of a scope in the context's scope arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub usize);

/// A span of tokens whose parse has been deferred, plus the position of its
/// first token. Re-parse errors are reported at that position.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub tokens: Vec<Token>,
    pub position: Position,
}

impl Fragment {
    pub fn span(&self) -> Span {
        let end = self
            .tokens
            .last()
            .map(|token| token.span.end.clone())
            .unwrap_or_else(|| self.position.clone());

        Span {
            start: self.position.clone(),
            end,
        }
    }

    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|token| token.value.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDecl {
    pub ty: Type,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FunctionBody {
    #[default]
    Empty,
    Statement(Stmt),
    Expression(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub parameters: Vec<DeclId>,
    pub return_type: Type,
    /// The rebuilt `(parameters) -> return` type; `auto` until pass 1 runs.
    pub ty: Type,
    pub body: FunctionBody,
    /// Type parameters synthesized from `auto` parameter types.
    pub template_parameters: Vec<DeclId>,
}

impl FunctionDecl {
    pub fn is_generic(&self) -> bool {
        !self.template_parameters.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// The class's metatype.
    pub kind: Type,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    Variable(ObjectDecl),
    Constant(ObjectDecl),
    Parameter(Type),
    Super(Type),
    Function(FunctionDecl),
    Coroutine(FunctionDecl),
    Class(ClassDecl),
    Extension(ClassDecl),
    TypeParameter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub name: String,
    pub kind: DeclKind,
    /// The scope the declaration was declared in.
    pub scope: ScopeId,
    pub span: Span,
}

impl Decl {
    pub fn construct(&self) -> Construct {
        match self.kind {
            DeclKind::Variable(_) => Construct::Variable,
            DeclKind::Constant(_) => Construct::Constant,
            DeclKind::Parameter(_) => Construct::Parameter,
            DeclKind::Super(_) => Construct::Super,
            DeclKind::Function(_) => Construct::Function,
            DeclKind::Coroutine(_) => Construct::Coroutine,
            DeclKind::Class(_) => Construct::Class,
            DeclKind::Extension(_) => Construct::Extension,
            DeclKind::TypeParameter => Construct::TypeParameter,
        }
    }

    pub fn is_extension(&self) -> bool {
        matches!(self.kind, DeclKind::Extension(_))
    }

    /// The declared type of an object, parameter or super declaration.
    pub fn declared_type(&self) -> Option<&Type> {
        match &self.kind {
            DeclKind::Variable(object) | DeclKind::Constant(object) => Some(&object.ty),
            DeclKind::Parameter(ty) | DeclKind::Super(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn declared_type_mut(&mut self) -> Option<&mut Type> {
        match &mut self.kind {
            DeclKind::Variable(object) | DeclKind::Constant(object) => Some(&mut object.ty),
            DeclKind::Parameter(ty) | DeclKind::Super(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn initializer_mut(&mut self) -> Option<&mut Expr> {
        match &mut self.kind {
            DeclKind::Variable(object) | DeclKind::Constant(object) => object.init.as_mut(),
            _ => None,
        }
    }

    pub fn function(&self) -> Option<&FunctionDecl> {
        match &self.kind {
            DeclKind::Function(function) | DeclKind::Coroutine(function) => Some(function),
            _ => None,
        }
    }

    pub fn function_mut(&mut self) -> Option<&mut FunctionDecl> {
        match &mut self.kind {
            DeclKind::Function(function) | DeclKind::Coroutine(function) => Some(function),
            _ => None,
        }
    }

    pub fn return_type_mut(&mut self) -> Option<&mut Type> {
        self.function_mut().map(|function| &mut function.return_type)
    }

    pub fn class(&self) -> Option<&ClassDecl> {
        match &self.kind {
            DeclKind::Class(class) | DeclKind::Extension(class) => Some(class),
            _ => None,
        }
    }

    pub fn class_mut(&mut self) -> Option<&mut ClassDecl> {
        match &mut self.kind {
            DeclKind::Class(class) | DeclKind::Extension(class) => Some(class),
            _ => None,
        }
    }

    pub fn class_kind_mut(&mut self) -> Option<&mut Type> {
        self.class_mut().map(|class| &mut class.kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationUnit {
    pub body: Vec<Stmt>,
    pub scope: ScopeId,
}
