//! The declaration elaborator (pass 1).
//!
//! Resolves every declared type: object types, parameter and return types,
//! class kinds and super types. `auto` in a parameter type makes the
//! function generic over a synthesized type parameter. Class extensions
//! are merged while their class is elaborated.

use tracing::{debug, warn};

use crate::{
    ast::{
        ast::{Decl, DeclId, DeclKind, FunctionBody, FunctionDecl, ScopeId, TranslationUnit},
        statements::{CompoundStmt, Stmt},
        types::{NamedType, Type},
    },
    context::{
        context::{Context, WithContext},
        scope::ScopeKey,
    },
    errors::errors::{Error, ErrorImpl},
    Position, Span,
};

use super::{partials::with_extensions_merged, resolve::resolve_decl_type};

pub(super) fn unhandled(decl: &Decl) -> Error {
    Error::new(
        ErrorImpl::ImplementationError {
            message: format!("unexpected {} `{}`", decl.construct(), decl.name),
        },
        decl.span.start.clone(),
    )
}

/// The function type `(parameters) -> return` of `function`.
pub fn function_type(cxt: &Context, function: &FunctionDecl) -> Type {
    let parameters = function
        .parameters
        .iter()
        .map(|id| cxt.decl(*id).declared_type().cloned().unwrap_or(Type::Auto))
        .collect();
    Type::function(parameters, function.return_type.clone())
}

pub struct DeclarationElaborator<'a> {
    cxt: &'a mut Context,
    errors: Vec<Error>,
}

impl WithContext for DeclarationElaborator<'_> {
    fn context(&mut self) -> &mut Context {
        self.cxt
    }
}

impl<'a> DeclarationElaborator<'a> {
    pub fn new(cxt: &'a mut Context) -> Self {
        DeclarationElaborator { cxt, errors: vec![] }
    }

    /// Elaborates every declaration of `unit`, returning the errors of the
    /// declarations that failed.
    pub fn run(mut self, unit: &mut TranslationUnit) -> Vec<Error> {
        self.in_scope(unit.scope, |this| this.statement_seq(&mut unit.body));
        self.errors
    }

    fn record(&mut self, error: Error) {
        warn!(error = %error.get_impl(), "declaration failed, continuing");
        self.errors.push(error);
    }

    /// Elaborates a statement sequence, then drops the extensions declared
    /// in it: their members now belong to the class they extend.
    fn statement_seq(&mut self, body: &mut Vec<Stmt>) {
        for stmt in body.iter_mut() {
            self.statement(stmt);
        }

        let cxt = &*self.cxt;
        body.retain(|stmt| {
            !stmt
                .declaration()
                .is_some_and(|id| cxt.decl(id).is_extension())
        });
    }

    fn statement(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Compound(block) => self.compound_statement(block),
            Stmt::Declaration(id, _) => self.declaration_statement(*id),
            Stmt::If {
                then_branch,
                else_branch,
                ..
            } => {
                self.statement(then_branch);
                if let Some(else_branch) = else_branch {
                    self.statement(else_branch);
                }
            }
            Stmt::While { body, .. } => self.statement(body),
            Stmt::Return { .. }
            | Stmt::Yield { .. }
            | Stmt::Break(_)
            | Stmt::Continue(_)
            | Stmt::Expression(_) => {}
        }
    }

    fn compound_statement(&mut self, block: &mut CompoundStmt) {
        match self.cxt.saved_scope(ScopeKey::Block(block.id)) {
            Ok(scope) => self.in_scope(scope, |this| this.statement_seq(&mut block.body)),
            Err(error) => self.record(error),
        }
    }

    /// Each declaration statement fails on its own.
    fn declaration_statement(&mut self, id: DeclId) {
        if let Err(error) = self.declaration(id) {
            let construct = self.cxt.decl(id).construct();
            self.record(error.in_construct(construct));
        }
    }

    fn declaration(&mut self, id: DeclId) -> Result<(), Error> {
        let decl = self.cxt.decl(id);
        debug!(name = %decl.name, construct = %decl.construct(), "elaborating declaration");

        match decl.kind {
            DeclKind::Variable(_) | DeclKind::Constant(_) | DeclKind::Super(_) => {
                self.object_declaration(id)
            }
            DeclKind::Function(_) | DeclKind::Coroutine(_) => self.function_declaration(id),
            DeclKind::Class(_) => self.class_declaration(id),
            // Merged into its class, or left alone when it extends nothing.
            DeclKind::Extension(_) => Ok(()),
            // Elaborated with the function that owns them.
            DeclKind::Parameter(_) | DeclKind::TypeParameter => Err(unhandled(self.cxt.decl(id))),
        }
    }

    /// Resolves the declared type of a variable, constant or super
    /// declaration in the scope it was declared in.
    fn object_declaration(&mut self, id: DeclId) -> Result<(), Error> {
        let scope = self.cxt.decl(id).scope;
        self.in_scope(scope, |this| {
            resolve_decl_type(this.cxt, id, Decl::declared_type_mut)
        })
    }

    fn function_declaration(&mut self, id: DeclId) -> Result<(), Error> {
        let scope = self.cxt.saved_scope(ScopeKey::Decl(id))?;
        let Some(function) = self.cxt.decl(id).function() else {
            return Err(unhandled(self.cxt.decl(id)));
        };
        let parameters = function.parameters.clone();

        let mut implicit = vec![];
        self.in_scope(scope, |this| {
            for &parameter in &parameters {
                this.parameter(parameter, scope, &mut implicit)?;
            }
            resolve_decl_type(this.cxt, id, Decl::return_type_mut)
        })?;

        // Synthesized type parameters become visible only once the whole
        // signature has resolved.
        for &parameter in &implicit {
            let name = self.cxt.decl(parameter).name.clone();
            self.cxt.scope_mut(scope).declare(&name, parameter);
        }

        let ty = match self.cxt.decl(id).function() {
            Some(function) => function_type(self.cxt, function),
            None => return Err(unhandled(self.cxt.decl(id))),
        };
        if !implicit.is_empty() {
            debug!(
                name = %self.cxt.decl(id).name,
                parameters = implicit.len(),
                "function is generic"
            );
        }
        if let Some(function) = self.cxt.decl_mut(id).function_mut() {
            function.ty = ty;
            function.template_parameters.extend(implicit);
        }

        // The body is walked in a fresh scope that nothing can name.
        let mut body = match self.cxt.decl_mut(id).function_mut() {
            Some(function) => std::mem::take(&mut function.body),
            None => FunctionBody::Empty,
        };
        if let FunctionBody::Statement(stmt) = &mut body {
            self.in_scope(scope, |this| this.in_new_scope(|this| this.statement(stmt)));
        }
        if let Some(function) = self.cxt.decl_mut(id).function_mut() {
            function.body = body;
        }

        Ok(())
    }

    fn parameter(
        &mut self,
        id: DeclId,
        scope: ScopeId,
        implicit: &mut Vec<DeclId>,
    ) -> Result<(), Error> {
        resolve_decl_type(self.cxt, id, Decl::declared_type_mut)
            .map_err(|error| error.in_construct(self.cxt.decl(id).construct()))?;

        let ty = match self.cxt.decl_mut(id).declared_type_mut() {
            Some(ty) => std::mem::replace(ty, Type::Auto),
            None => return Err(unhandled(self.cxt.decl(id))),
        };
        let position = self.cxt.decl(id).span.start.clone();
        let ty = self.promote_placeholders(ty, scope, &position, implicit);

        if let Some(slot) = self.cxt.decl_mut(id).declared_type_mut() {
            *slot = ty;
        }
        Ok(())
    }

    /// Replaces each `auto` in a parameter type, including under references
    /// and qualifiers, with a fresh type parameter owned by `scope`. The
    /// caller binds its name.
    fn promote_placeholders(
        &mut self,
        ty: Type,
        scope: ScopeId,
        position: &Position,
        implicit: &mut Vec<DeclId>,
    ) -> Type {
        match ty {
            Type::Auto => {
                let name = format!("T{}", implicit.len());
                let decl = self.cxt.add_decl(Decl {
                    name: name.clone(),
                    kind: DeclKind::TypeParameter,
                    scope,
                    span: Span {
                        start: position.clone(),
                        end: position.clone(),
                    },
                });
                implicit.push(decl);
                Type::Typename(NamedType { decl, name })
            }
            Type::Reference(inner) => self
                .promote_placeholders(*inner, scope, position, implicit)
                .reference(),
            Type::Qualified(inner, qualifiers) => self
                .promote_placeholders(*inner, scope, position, implicit)
                .qualified(qualifiers),
            other => other,
        }
    }

    fn class_declaration(&mut self, id: DeclId) -> Result<(), Error> {
        let enclosing = self.cxt.decl(id).scope;
        self.in_scope(enclosing, |this| {
            resolve_decl_type(this.cxt, id, Decl::class_kind_mut)
        })?;

        let members = self.cxt.saved_scope(ScopeKey::Decl(id))?;
        with_extensions_merged(self, enclosing, id, |this| {
            let mut body = match this.cxt.decl_mut(id).class_mut() {
                Some(class) => std::mem::take(&mut class.body),
                None => vec![],
            };
            this.in_scope(members, |this| this.statement_seq(&mut body));
            if let Some(class) = this.cxt.decl_mut(id).class_mut() {
                class.body = body;
            }
        })
    }
}
