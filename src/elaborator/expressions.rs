//! The expression elaborator (pass 2).
//!
//! Runs once every declaration has been elaborated. Resolves initializers,
//! function bodies, conditions and statement expressions, deduces `auto`
//! object and return types, and binds the values of constants.

use tracing::{debug, warn};

use crate::{
    ast::{
        ast::{Decl, DeclId, DeclKind, FunctionBody, TranslationUnit},
        expressions::Expr,
        statements::{CompoundStmt, Stmt},
        types::Type,
    },
    context::{
        context::{Context, WithContext},
        scope::ScopeKey,
    },
    conversion::convert::convert_to_value,
    errors::errors::{Construct, Error, ErrorImpl},
    evaluator::evaluator::evaluate,
    parser::actions::{convert_initializer, convert_to_condition},
    Span,
};

use super::{
    declarations::{function_type, unhandled},
    resolve::{resolve_decl_type, resolve_expression},
};

/// Replaces `expr` with `f` applied to it. On failure `expr` is left as it
/// was.
fn rewrite(expr: &mut Expr, f: impl FnOnce(Expr) -> Result<Expr, Error>) -> Result<(), Error> {
    *expr = f(expr.clone())?;
    Ok(())
}

/// How a deduced type is taken from an expression: `auto` reads a value,
/// `decltype(auto)` keeps the expression's type as is. Any other
/// `placeholder` hands `expr` back untouched.
fn deduce(placeholder: &Type, expr: Expr) -> Result<(Type, Expr), Expr> {
    match placeholder {
        Type::Auto => {
            let expr = convert_to_value(expr);
            Ok((expr.ty.clone(), expr))
        }
        Type::Declauto => Ok((expr.ty.clone(), expr)),
        _ => Err(expr),
    }
}

/// Converts `expr` to initialize an object of type `target`, reading it as
/// a value unless a reference is being bound.
fn initialize(expr: Expr, target: &Type) -> Result<Expr, Error> {
    let expr = if expr.ty.is_reference() || target.is_reference() {
        expr
    } else {
        convert_to_value(expr)
    };
    convert_initializer(expr, target)
}

/// Resolves the initializer of variable or constant `id` and checks it
/// against the declared type, deducing that type from it when it is a
/// placeholder. The value of a constant is stored in the context.
///
/// The declared type is resolved first if it still needs to be, since a
/// constant may be needed before its declaration has been elaborated.
pub fn define_object(cxt: &mut Context, id: DeclId) -> Result<(), Error> {
    let decl = cxt.decl(id);
    let scope = decl.scope;
    let constant = matches!(decl.kind, DeclKind::Constant(_));
    let Some(mut init) = cxt.decl_mut(id).initializer_mut().cloned() else {
        return Ok(());
    };

    cxt.in_scope(scope, |cxt| {
        resolve_decl_type(cxt, id, Decl::declared_type_mut)?;
        resolve_expression(cxt, &mut init)
    })?;

    let Some(declared) = cxt.decl(id).declared_type().cloned() else {
        return Err(unhandled(cxt.decl(id)));
    };
    let init = match deduce(&declared, init) {
        Ok((deduced, init)) => {
            if let Some(ty) = cxt.decl_mut(id).declared_type_mut() {
                *ty = deduced;
            }
            init
        }
        Err(init) => initialize(init, &declared)?,
    };

    if constant {
        let value = evaluate(cxt, &init)?;
        debug!(name = %cxt.decl(id).name, %value, "bound constant");
        cxt.store(id, value);
    }

    if let Some(slot) = cxt.decl_mut(id).initializer_mut() {
        *slot = init;
    }
    Ok(())
}

/// Makes sure constant `id` has a stored value, defining it on first use.
pub fn bind_constant(cxt: &mut Context, id: DeclId) -> Result<(), Error> {
    if cxt.constant(id).is_some() {
        return Ok(());
    }

    if !cxt.begin_binding(id) {
        let decl = cxt.decl(id);
        return Err(Error::new(
            ErrorImpl::EvaluationError {
                message: format!("the value of `{}` depends on itself", decl.name),
            },
            decl.span.start.clone(),
        ));
    }

    let result = define_object(cxt, id);
    cxt.end_binding(id);
    result
}

pub struct ExpressionElaborator<'a> {
    cxt: &'a mut Context,
    errors: Vec<Error>,
}

impl WithContext for ExpressionElaborator<'_> {
    fn context(&mut self) -> &mut Context {
        self.cxt
    }
}

impl<'a> ExpressionElaborator<'a> {
    pub fn new(cxt: &'a mut Context) -> Self {
        ExpressionElaborator { cxt, errors: vec![] }
    }

    pub fn run(mut self, unit: &mut TranslationUnit) -> Vec<Error> {
        self.in_scope(unit.scope, |this| {
            for stmt in unit.body.iter_mut() {
                if let Err(error) = this.statement(stmt, None) {
                    this.record(error.in_construct(Construct::Statement));
                }
            }
        });
        self.errors
    }

    fn record(&mut self, error: Error) {
        warn!(error = %error.get_impl(), "definition failed, continuing");
        self.errors.push(error);
    }

    /// Elaborates `stmt`, where `function` is the function whose body
    /// encloses it, if any.
    fn statement(&mut self, stmt: &mut Stmt, function: Option<DeclId>) -> Result<(), Error> {
        match stmt {
            Stmt::Compound(block) => self.compound_statement(block, function),
            Stmt::Return { value, span } => self.return_statement(value, span, function),
            Stmt::Yield { value, .. } => self.yield_statement(value, function),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.condition(condition)?;
                self.statement(then_branch, function)?;
                match else_branch {
                    Some(else_branch) => self.statement(else_branch, function),
                    None => Ok(()),
                }
            }
            Stmt::While {
                condition, body, ..
            } => {
                self.condition(condition)?;
                self.statement(body, function)
            }
            Stmt::Break(_) | Stmt::Continue(_) => Ok(()),
            Stmt::Declaration(id, _) => {
                self.declaration_statement(*id);
                Ok(())
            }
            Stmt::Expression(expr) => resolve_expression(self.cxt, expr),
        }
    }

    /// Blocks re-enter the scope their declarations were bound in. Each
    /// statement fails on its own.
    fn compound_statement(
        &mut self,
        block: &mut CompoundStmt,
        function: Option<DeclId>,
    ) -> Result<(), Error> {
        let scope = self.cxt.saved_scope(ScopeKey::Block(block.id))?;
        self.in_scope(scope, |this| {
            for stmt in block.body.iter_mut() {
                if let Err(error) = this.statement(stmt, function) {
                    this.record(error.in_construct(Construct::Statement));
                }
            }
        });
        Ok(())
    }

    fn condition(&mut self, condition: &mut Expr) -> Result<(), Error> {
        resolve_expression(self.cxt, condition)?;
        rewrite(condition, convert_to_condition)
    }

    fn return_statement(
        &mut self,
        value: &mut Option<Expr>,
        span: &Span,
        function: Option<DeclId>,
    ) -> Result<(), Error> {
        let Some(expr) = value else {
            return match function {
                Some(id) => self.returned_nothing(id, span),
                None => Ok(()),
            };
        };
        resolve_expression(self.cxt, expr)?;

        let Some(id) = function else {
            return Ok(());
        };
        rewrite(expr, |expr| self.returned(id, expr))
    }

    /// Checks a returned expression against the return type of `id`,
    /// deducing the return type when it is a placeholder.
    fn returned(&mut self, id: DeclId, expr: Expr) -> Result<Expr, Error> {
        let return_type = match self.cxt.decl(id).function() {
            Some(function) => function.return_type.clone(),
            None => return Err(unhandled(self.cxt.decl(id))),
        };

        match deduce(&return_type, expr) {
            Ok((deduced, expr)) => {
                self.deduce_return_type(id, deduced)?;
                Ok(expr)
            }
            Err(expr) => initialize(expr, &return_type),
        }
    }

    /// A `return` without a value deduces `void`, and otherwise needs a
    /// function returning `void`.
    fn returned_nothing(&mut self, id: DeclId, span: &Span) -> Result<(), Error> {
        let return_type = match self.cxt.decl(id).function() {
            Some(function) => function.return_type.clone(),
            None => return Err(unhandled(self.cxt.decl(id))),
        };

        match return_type {
            Type::Auto | Type::Declauto => self.deduce_return_type(id, Type::Void),
            Type::Void => Ok(()),
            ty if ty.is_dependent() => Ok(()),
            ty => Err(Error::new(
                ErrorImpl::ConversionError {
                    from: Type::Void.to_string(),
                    to: ty.to_string(),
                },
                span.start.clone(),
            )),
        }
    }

    /// Replaces a placeholder return type of `id` with `deduced` and
    /// rebuilds the function type.
    fn deduce_return_type(&mut self, id: DeclId, deduced: Type) -> Result<(), Error> {
        let Some(function) = self.cxt.decl_mut(id).function_mut() else {
            return Err(unhandled(self.cxt.decl(id)));
        };
        if !matches!(function.return_type, Type::Auto | Type::Declauto) {
            return Ok(());
        }

        function.return_type = deduced;
        let ty = match self.cxt.decl(id).function() {
            Some(function) => function_type(self.cxt, function),
            None => return Err(unhandled(self.cxt.decl(id))),
        };
        debug!(name = %self.cxt.decl(id).name, %ty, "deduced return type");

        if let Some(function) = self.cxt.decl_mut(id).function_mut() {
            function.ty = ty;
        }
        Ok(())
    }

    /// `yield` produces a value of the return type without deducing it.
    fn yield_statement(&mut self, value: &mut Expr, function: Option<DeclId>) -> Result<(), Error> {
        resolve_expression(self.cxt, value)?;

        let Some(id) = function else {
            return Ok(());
        };
        let return_type = match self.cxt.decl(id).function() {
            Some(function) => function.return_type.clone(),
            None => return Err(unhandled(self.cxt.decl(id))),
        };
        rewrite(value, |value| {
            convert_initializer(convert_to_value(value), &return_type)
        })
    }

    fn declaration_statement(&mut self, id: DeclId) {
        if let Err(error) = self.declaration(id) {
            let construct = self.cxt.decl(id).construct();
            self.record(error.in_construct(construct));
        }
    }

    fn declaration(&mut self, id: DeclId) -> Result<(), Error> {
        let decl = self.cxt.decl(id);
        debug!(name = %decl.name, construct = %decl.construct(), "elaborating definition");

        match decl.kind {
            DeclKind::Variable(_) | DeclKind::Constant(_) => self.object_definition(id),
            DeclKind::Function(_) | DeclKind::Coroutine(_) => self.function_definition(id),
            DeclKind::Class(_) => self.class_definition(id),
            DeclKind::Super(_) | DeclKind::Extension(_) => Ok(()),
            // Elaborated with the function that owns them.
            DeclKind::Parameter(_) | DeclKind::TypeParameter => Err(unhandled(self.cxt.decl(id))),
        }
    }

    /// Checks the initializer of a variable or constant against its type,
    /// and binds the value of a constant unless it was needed earlier.
    fn object_definition(&mut self, id: DeclId) -> Result<(), Error> {
        let decl = self.cxt.decl(id);
        match decl.declared_type() {
            // Already reported by the declaration elaborator.
            Some(ty) if ty.is_unparsed() => return Ok(()),
            Some(_) => {}
            None => return Err(unhandled(decl)),
        }

        match decl.kind {
            DeclKind::Constant(_) => bind_constant(self.cxt, id),
            _ => define_object(self.cxt, id),
        }
    }

    fn function_definition(&mut self, id: DeclId) -> Result<(), Error> {
        match self.cxt.decl(id).function() {
            // Pass 1 failed for this function and has reported it.
            Some(function) if matches!(function.ty, Type::Auto) => return Ok(()),
            Some(_) => {}
            None => return Err(unhandled(self.cxt.decl(id))),
        }

        let scope = self.cxt.saved_scope(ScopeKey::Decl(id))?;
        let mut body = match self.cxt.decl_mut(id).function_mut() {
            Some(function) => std::mem::take(&mut function.body),
            None => FunctionBody::Empty,
        };

        let result = self.in_scope(scope, |this| match &mut body {
            FunctionBody::Statement(stmt) => this.statement(stmt, Some(id)),
            FunctionBody::Expression(expr) => {
                let body_scope = this.cxt.saved_scope(ScopeKey::Body(id))?;
                this.in_scope(body_scope, |this| this.expression_body(id, expr))
            }
            FunctionBody::Empty => Ok(()),
        });

        if let Some(function) = self.cxt.decl_mut(id).function_mut() {
            function.body = body;
        }
        result
    }

    /// An expression body is returned as if by `return`.
    fn expression_body(&mut self, id: DeclId, expr: &mut Expr) -> Result<(), Error> {
        resolve_expression(self.cxt, expr)?;
        rewrite(expr, |expr| self.returned(id, expr))
    }

    fn class_definition(&mut self, id: DeclId) -> Result<(), Error> {
        let scope = self.cxt.saved_scope(ScopeKey::Decl(id))?;
        let mut body = match self.cxt.decl_mut(id).class_mut() {
            Some(class) => std::mem::take(&mut class.body),
            None => return Err(unhandled(self.cxt.decl(id))),
        };

        // Members fail one by one, like declarations at namespace scope.
        self.in_scope(scope, |this| {
            for stmt in body.iter_mut() {
                if let Err(error) = this.statement(stmt, None) {
                    this.record(error.in_construct(Construct::Statement));
                }
            }
        });

        if let Some(class) = self.cxt.decl_mut(id).class_mut() {
            class.body = body;
        }
        Ok(())
    }
}

