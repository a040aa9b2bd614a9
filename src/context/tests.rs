use crate::{
    ast::{
        ast::{Decl, DeclKind, ObjectDecl},
        types::Type,
    },
    context::{
        context::{Context, WithContext},
        scope::ScopeKey,
    },
    errors::errors::{Error, ErrorImpl},
    Position, Span,
};

fn variable(cxt: &Context, name: &str) -> Decl {
    Decl {
        name: name.to_string(),
        kind: DeclKind::Variable(ObjectDecl {
            ty: Type::int(32),
            init: None,
        }),
        scope: cxt.current_scope(),
        span: Span::null(),
    }
}

#[test]
fn test_lookup_walks_enclosing_scopes() {
    let mut cxt = Context::new();
    let outer = cxt.declare(variable(&cxt, "x"));

    let inner_scope = cxt.make_scope(cxt.global_scope());
    cxt.in_scope(inner_scope, |cxt| {
        assert_eq!(cxt.lookup("x"), Some(&vec![outer]));
        assert_eq!(cxt.lookup("y"), None);
    });
}

#[test]
fn test_lookup_is_lexical() {
    let mut cxt = Context::new();
    let a = cxt.make_scope(cxt.global_scope());
    let b = cxt.make_scope(cxt.global_scope());

    let hidden = cxt.in_scope(a, |cxt| {
        let decl = variable(cxt, "hidden");
        cxt.declare(decl)
    });

    // `b` is entered on top of `a`, but `a` does not enclose it.
    cxt.in_scope(a, |cxt| {
        cxt.in_scope(b, |cxt| assert_eq!(cxt.lookup("hidden"), None));
        assert_eq!(cxt.lookup("hidden"), Some(&vec![hidden]));
    });
}

#[test]
fn test_inner_declaration_shadows_outer() {
    let mut cxt = Context::new();
    cxt.declare(variable(&cxt, "x"));

    let inner = cxt.in_new_scope(|cxt| {
        let decl = variable(cxt, "x");
        let id = cxt.declare(decl);
        assert_eq!(cxt.lookup("x"), Some(&vec![id]));
        id
    });

    assert_ne!(cxt.lookup("x"), Some(&vec![inner]));
}

#[test]
fn test_overload_set_keeps_declaration_order() {
    let mut cxt = Context::new();
    let first = cxt.declare(variable(&cxt, "f"));
    let second = cxt.declare(variable(&cxt, "f"));

    assert_eq!(cxt.lookup("f"), Some(&vec![first, second]));

    cxt.retain_overloads(cxt.global_scope(), "f", |decl| decl.name == "f");
    assert_eq!(cxt.lookup("f"), Some(&vec![]));
}

#[test]
fn test_scope_left_on_error_path() {
    let mut cxt = Context::new();
    let depth = cxt.depth();
    let scope = cxt.make_scope(cxt.global_scope());

    let result: Result<(), Error> = cxt.in_scope(scope, |cxt| {
        assert_eq!(cxt.current_scope(), scope);
        Err(Error::new(
            ErrorImpl::NameError {
                name: "missing".to_string(),
            },
            Position::null(),
        ))
    });

    assert!(result.is_err());
    assert_eq!(cxt.depth(), depth);
    assert_eq!(cxt.current_scope(), cxt.global_scope());
}

#[test]
fn test_saved_scopes() {
    let mut cxt = Context::new();
    let scope = cxt.make_scope(cxt.global_scope());
    cxt.save_scope(ScopeKey::Block(4), scope);

    assert_eq!(cxt.saved_scope(ScopeKey::Block(4)).unwrap(), scope);

    let error = cxt.saved_scope(ScopeKey::Block(5)).unwrap_err();
    assert_eq!(error.get_error_name(), "ImplementationError");
}

#[test]
fn test_block_ids_are_unique() {
    let mut cxt = Context::new();
    let first = cxt.next_block_id();
    let second = cxt.next_block_id();
    assert_ne!(first, second);
}
