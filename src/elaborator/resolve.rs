//! Resolution of deferred fragments.
//!
//! Each resolver re-parses an `Unparsed` node under the scope active at the
//! call site and overwrites it with the result. Nodes that are already
//! resolved are left untouched, so resolving twice is a no-op.

use tracing::trace;

use crate::{
    ast::{
        ast::{Decl, DeclId, Fragment},
        expressions::{Expr, ExprKind},
        types::Type,
    },
    context::context::Context,
    errors::errors::{Error, ErrorImpl},
    parser::parser::{parse_expression_fragment, parse_type_fragment},
    Position,
};

/// Reports a grammar failure inside a fragment as a `SyntaxError` at the
/// point the fragment was captured. Binding and typing errors keep their
/// own positions.
fn in_fragment(error: Error, what: &str, fragment: &Fragment) -> Error {
    if !error.is_syntactic() {
        return error;
    }

    Error::new(
        ErrorImpl::SyntaxError {
            fragment: what.to_string(),
            message: error.get_impl().to_string(),
        },
        fragment.position.clone(),
    )
}

pub fn resolve_type(cxt: &mut Context, ty: &mut Type) -> Result<(), Error> {
    let Type::Unparsed(fragment) = ty else {
        return Ok(());
    };

    trace!(fragment = %fragment.text(), "re-parsing type");
    let resolved =
        parse_type_fragment(cxt, fragment).map_err(|error| in_fragment(error, "type", fragment))?;
    *ty = resolved;
    Ok(())
}

pub fn resolve_expression(cxt: &mut Context, expr: &mut Expr) -> Result<(), Error> {
    let ExprKind::Unparsed(fragment) = &expr.kind else {
        return Ok(());
    };

    trace!(fragment = %fragment.text(), "re-parsing expression");
    let resolved = parse_expression_fragment(cxt, fragment)
        .map_err(|error| in_fragment(error, "expression", fragment))?;
    *expr = resolved;
    Ok(())
}

/// A field of a declaration that holds a type.
pub type TypeSlot = fn(&mut Decl) -> Option<&mut Type>;

/// Resolves the type held in `slot` of declaration `id` in place.
pub fn resolve_decl_type(cxt: &mut Context, id: DeclId, slot: TypeSlot) -> Result<(), Error> {
    let Some(current) = slot(cxt.decl_mut(id)) else {
        return Err(Error::new(
            ErrorImpl::ImplementationError {
                message: format!("declaration {} has no such type", id.0),
            },
            Position::null(),
        ));
    };
    if !current.is_unparsed() {
        return Ok(());
    }

    let mut ty = current.clone();
    resolve_type(cxt, &mut ty)?;

    if let Some(current) = slot(cxt.decl_mut(id)) {
        *current = ty;
    }
    Ok(())
}
