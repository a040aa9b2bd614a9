//! Integration tests for end-to-end elaboration.
//!
//! These tests drive the complete pipeline, from source text through
//! tokenization, deferred parsing and both elaboration passes, and check the
//! elaborated declarations left in the context.

use elaborator::{
    ast::{
        ast::{DeclId, DeclKind, FunctionBody, TranslationUnit},
        expressions::{Conversion, Expr, ExprKind},
        statements::Stmt,
        types::{NamedType, Type},
    },
    context::{context::Context, scope::ScopeKey},
    conversion::convert::{convert_to_common, convert_to_type},
    elaborator::{
        elaborate,
        resolve::{resolve_expression, resolve_type},
    },
    errors::errors::{Construct, Error, ErrorImpl},
    evaluator::evaluator::Value,
    lexer::lexer::tokenize,
    parser::parser::parse,
    Span,
};
use pretty_assertions::assert_eq;

fn run(source: &str) -> (Context, TranslationUnit, Vec<Error>) {
    let mut cxt = Context::new();
    let tokens = tokenize(source.to_string(), Some("test.lang".to_string())).unwrap();
    let mut unit = parse(tokens, &mut cxt).unwrap();
    let errors = elaborate(&mut cxt, &mut unit);
    (cxt, unit, errors)
}

fn global(cxt: &Context, name: &str) -> DeclId {
    cxt.lookup_from(cxt.global_scope(), name).unwrap()[0]
}

fn literal(kind: ExprKind, ty: Type) -> Expr {
    Expr::new(kind, ty, Span::null())
}

#[test]
fn test_resolved_nodes_are_returned_unchanged() {
    let (mut cxt, _, errors) = run("var x: int64 = 1 + 2;");
    assert!(errors.is_empty());

    let x = global(&cxt, "x");
    let DeclKind::Variable(object) = cxt.decl(x).kind.clone() else {
        panic!("expected a variable");
    };

    let mut ty = object.ty.clone();
    resolve_type(&mut cxt, &mut ty).unwrap();
    assert_eq!(ty, object.ty);

    let mut init = object.init.clone().unwrap();
    resolve_expression(&mut cxt, &mut init).unwrap();
    assert_eq!(Some(init), object.init);
}

#[test]
fn test_integer_widening_and_narrowing() {
    let narrow = literal(ExprKind::Integer(7), Type::int(16));
    let wide = literal(ExprKind::Integer(7), Type::int(64));

    let widened = convert_to_type(narrow, &Type::int(64)).unwrap();
    assert_eq!(widened.ty, Type::int(64));
    assert_eq!(widened.conversion(), Some(Conversion::Integer));

    // Narrowing is not performed, so the conversion fails.
    let error = convert_to_type(wide, &Type::int(16)).unwrap_err();
    assert!(matches!(error.get_impl(), ErrorImpl::ConversionError { .. }));
}

#[test]
fn test_boolean_to_boolean_adds_no_conversion() {
    let expr = literal(ExprKind::Boolean(true), Type::Boolean);
    let converted = convert_to_type(expr.clone(), &Type::Boolean).unwrap();

    assert_eq!(converted, expr);
}

#[test]
fn test_common_type_is_symmetric() {
    let types = [
        Type::int(8),
        Type::int(32),
        Type::int(64),
        Type::uint(8),
        Type::uint(32),
        Type::uint(64),
        Type::float(32),
        Type::float(64),
    ];
    let operand = |ty: &Type| {
        let kind = if ty.is_float() {
            ExprKind::Float(1.0)
        } else {
            ExprKind::Integer(1)
        };
        literal(kind, ty.clone())
    };

    for a in &types {
        for b in &types {
            let (left, right) = convert_to_common(operand(a), operand(b)).unwrap();
            let (right_first, left_second) = convert_to_common(operand(b), operand(a)).unwrap();

            assert_eq!(left.ty, right.ty, "{} and {}", a, b);
            assert_eq!(right_first.ty, left_second.ty, "{} and {}", b, a);
            assert_eq!(left.ty, right_first.ty, "{} and {}", a, b);
        }
    }
}

#[test]
fn test_extension_is_merged_into_primary_class() {
    let (cxt, unit, errors) = run(
        "class C { var a: int32; var b: int32; } extension C { var b: bool; var c: float64; }",
    );
    assert!(errors.is_empty());

    let class = global(&cxt, "C");
    assert_eq!(cxt.lookup_from(cxt.global_scope(), "C"), Some(&vec![class]));
    assert_eq!(unit.body.len(), 1);

    let names = cxt
        .decl(class)
        .class()
        .unwrap()
        .body
        .iter()
        .filter_map(Stmt::declaration)
        .map(|id| cxt.decl(id).name.clone())
        .collect::<Vec<_>>();
    assert_eq!(names, ["a", "b", "b", "c"]);

    let members = cxt.saved_scope(ScopeKey::Decl(class)).unwrap();
    let scope = cxt.scope(members);
    assert_eq!(scope.lookup("b").unwrap().len(), 2);
    assert!(scope.lookup("a").is_some());
    assert!(scope.lookup("c").is_some());
}

#[test]
fn test_lone_extension_never_merges() {
    let (cxt, unit, errors) = run("extension E { var e: int32; }");

    assert!(errors.is_empty());
    assert!(unit.body.is_empty());

    let overloads = cxt.lookup_from(cxt.global_scope(), "E").unwrap();
    assert_eq!(overloads.len(), 1);
    assert!(cxt.decl(overloads[0]).is_extension());
}

#[test]
fn test_auto_variable_has_no_type_parameter() {
    let (cxt, _, errors) = run("var x: auto = 1;");
    assert!(errors.is_empty());

    let x = global(&cxt, "x");
    assert_eq!(cxt.decl(x).declared_type(), Some(&Type::int(32)));
    assert!(cxt
        .scope(cxt.global_scope())
        .names
        .values()
        .flatten()
        .all(|id| cxt.decl(*id).kind != DeclKind::TypeParameter));
}

#[test]
fn test_generic_function() {
    let (cxt, _, errors) = run("def f(x: auto) -> auto { return x; }");
    assert!(errors.is_empty());

    let function = cxt.decl(global(&cxt, "f")).function().unwrap();
    assert_eq!(function.template_parameters.len(), 1);

    let t = function.template_parameters[0];
    let typename = Type::Typename(NamedType {
        decl: t,
        name: cxt.decl(t).name.clone(),
    });
    assert_eq!(cxt.decl(function.parameters[0]).declared_type(), Some(&typename));

    let FunctionBody::Statement(Stmt::Compound(block)) = &function.body else {
        panic!("expected a block body");
    };
    let Some(Stmt::Return {
        value: Some(value), ..
    }) = block.body.first()
    else {
        panic!("expected a return statement");
    };
    assert_eq!(value.ty, typename);
}

#[test]
fn test_constant_is_bound_to_its_value() {
    let (cxt, _, errors) = run("def N: int32 = 2 + 3;");
    assert!(errors.is_empty());

    assert_eq!(cxt.constant(global(&cxt, "N")), Some(&Value::Integer(5)));
}

#[test]
fn test_unrelated_declarations_survive_errors() {
    let (cxt, _, errors) = run(
        "var a: nothing; \
         def f(n: int32) -> bool = n < 10; \
         var b: int32 = f; \
         var c: auto = f(3);",
    );

    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0].get_impl(), ErrorImpl::NameError { .. }));
    assert_eq!(errors[0].get_construct(), Construct::Variable);
    assert!(matches!(errors[1].get_impl(), ErrorImpl::ConversionError { .. }));

    assert_eq!(cxt.decl(global(&cxt, "c")).declared_type(), Some(&Type::Boolean));
    assert_eq!(
        cxt.decl(global(&cxt, "f")).function().unwrap().ty.to_string(),
        "(int32) -> bool"
    );
}

#[test]
fn test_local_declarations_are_elaborated() {
    let (cxt, _, errors) = run(
        "def f() -> int32 { var total: auto = 0; if (total < 3) { var step: int64 = 1; } return total; }",
    );
    assert!(errors.is_empty());

    let function = cxt.decl(global(&cxt, "f")).function().unwrap();
    let FunctionBody::Statement(Stmt::Compound(block)) = &function.body else {
        panic!("expected a block body");
    };
    let total = block.body[0].declaration().unwrap();
    assert_eq!(cxt.decl(total).declared_type(), Some(&Type::int(32)));

    let Stmt::If { then_branch, .. } = &block.body[1] else {
        panic!("expected an if statement");
    };
    let Stmt::Compound(then_block) = then_branch.as_ref() else {
        panic!("expected a block");
    };
    let step = then_block.body[0].declaration().unwrap();
    assert_eq!(cxt.decl(step).declared_type(), Some(&Type::int(64)));
}

#[test]
fn test_deferred_syntax_error_position() {
    let (cxt, _, errors) = run("var ok: int32 = 1;\nvar bad: int32 + = 2;");

    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0].get_impl(),
        ErrorImpl::SyntaxError { fragment, .. } if fragment == "type"
    ));
    assert_eq!(errors[0].get_construct(), Construct::Variable);
    // The start of `int32 +` on the second line.
    assert_eq!(errors[0].get_position().0, 28);

    assert_eq!(cxt.decl(global(&cxt, "ok")).declared_type(), Some(&Type::int(32)));
}

#[test]
fn test_unbalanced_source_fails_to_parse() {
    let mut cxt = Context::new();
    let tokens = tokenize("var x: int32 ) = 1;".to_string(), None).unwrap();

    let error = parse(tokens, &mut cxt).unwrap_err();
    assert!(matches!(error.get_impl(), ErrorImpl::UnexpectedToken { .. }));
    assert_eq!(cxt.depth(), 1);
}

#[test]
fn test_constants_size_arrays_in_any_order() {
    let (cxt, _, errors) = run(
        "var grid: int32[ROWS][COLUMNS]; \
         def ROWS: int32 = COLUMNS - 1; \
         def COLUMNS: int32 = 3;",
    );
    assert!(errors.is_empty());

    assert_eq!(
        cxt.decl(global(&cxt, "grid")).declared_type().unwrap().to_string(),
        "int32[2][3]"
    );
    assert_eq!(cxt.constant(global(&cxt, "ROWS")), Some(&Value::Integer(2)));
    assert_eq!(cxt.constant(global(&cxt, "COLUMNS")), Some(&Value::Integer(3)));
}
