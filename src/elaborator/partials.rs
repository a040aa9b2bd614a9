//! Class extension merging.
//!
//! A class may be declared once and extended by any number of `extension`
//! blocks with the same name in the same scope. While the class is being
//! elaborated, the extensions' members are merged into it; afterwards the
//! extensions are erased from the enclosing overload set, leaving only the
//! class.

use tracing::debug;

use crate::{
    ast::ast::{DeclId, ScopeId},
    context::{
        context::{Context, WithContext},
        scope::ScopeKey,
    },
    errors::errors::Error,
};

/// Runs `f` with the extensions of `class` merged into it.
///
/// Merging applies only when the class's name names more than one
/// declaration in `enclosing`. The extensions are removed from that
/// overload set on every path out, whether merging or `f` fails or not.
pub fn with_extensions_merged<E: WithContext, T>(
    elab: &mut E,
    enclosing: ScopeId,
    class: DeclId,
    f: impl FnOnce(&mut E) -> T,
) -> Result<T, Error> {
    let cxt = elab.context();
    let name = cxt.decl(class).name.clone();
    let applies = cxt
        .scope(enclosing)
        .lookup(&name)
        .is_some_and(|overloads| overloads.len() > 1);

    if !applies {
        return Ok(f(elab));
    }

    let result = merge_extensions(cxt, enclosing, class).map(|_| f(elab));

    elab.context()
        .retain_overloads(enclosing, &name, |decl| decl.is_extension());
    result
}

/// Imports the names of every extension of `class` into the class's member
/// scope, then appends the extensions' statements to the class body, in
/// the overload set's order.
fn merge_extensions(cxt: &mut Context, enclosing: ScopeId, class: DeclId) -> Result<(), Error> {
    let name = cxt.decl(class).name.clone();
    let overloads = cxt
        .scope(enclosing)
        .lookup(&name)
        .cloned()
        .unwrap_or_default();
    let members = cxt.saved_scope(ScopeKey::Decl(class))?;

    for id in overloads {
        if !cxt.decl(id).is_extension() {
            continue;
        }

        let extension_scope = cxt.saved_scope(ScopeKey::Decl(id))?;
        let names = cxt.scope(extension_scope).names.clone();
        for (member, declarations) in &names {
            cxt.scope_mut(members).merge(member, declarations);
        }
        // Bodies declared in the extension see the class's members.
        cxt.set_parent(extension_scope, members);

        let statements = cxt
            .decl_mut(id)
            .class_mut()
            .map(|extension| std::mem::take(&mut extension.body))
            .unwrap_or_default();
        debug!(class = %name, extension = id.0, statements = statements.len(), "merging extension");

        if let Some(primary) = cxt.decl_mut(class).class_mut() {
            primary.body.extend(statements);
        }
    }

    Ok(())
}
