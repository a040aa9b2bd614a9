//! Unit tests for the parser module.
//!
//! - Deferred parsing of declarations and statements
//! - Scopes opened and saved by declarations
//! - Re-parsing type and expression fragments

use crate::{
    ast::{
        ast::{
            Decl, DeclId, DeclKind, Fragment, FunctionBody, FunctionDecl, ObjectDecl,
            TranslationUnit,
        },
        expressions::{Conversion, ExprKind},
        statements::Stmt,
        types::{NamedType, Qualifiers, Type},
    },
    context::{context::Context, scope::ScopeKey},
    errors::errors::Error,
    lexer::lexer::tokenize,
    Span,
};

use super::parser::{parse, parse_expression_fragment, parse_type_fragment};

fn parse_source(cxt: &mut Context, source: &str) -> Result<TranslationUnit, Error> {
    let tokens = tokenize(source.to_string(), Some("test.lang".to_string()))?;
    parse(tokens, cxt)
}

/// The tokens of `source` as a fragment, without the trailing EOF.
fn fragment(source: &str) -> Fragment {
    let mut tokens = tokenize(source.to_string(), Some("test.lang".to_string())).unwrap();
    tokens.pop();
    let position = tokens[0].span.start.clone();
    Fragment { tokens, position }
}

fn declare(cxt: &mut Context, name: &str, kind: DeclKind) -> DeclId {
    let scope = cxt.current_scope();
    cxt.declare(Decl {
        name: name.to_string(),
        kind,
        scope,
        span: Span::null(),
    })
}

fn variable(ty: Type) -> DeclKind {
    DeclKind::Variable(ObjectDecl { ty, init: None })
}

fn function(parameters: Vec<Type>, ret: Type) -> DeclKind {
    DeclKind::Function(FunctionDecl {
        parameters: vec![],
        return_type: ret.clone(),
        ty: Type::function(parameters, ret),
        body: FunctionBody::Empty,
        template_parameters: vec![],
    })
}

fn global(cxt: &Context, name: &str) -> DeclId {
    cxt.lookup_from(cxt.global_scope(), name).unwrap()[0]
}

#[test]
fn test_parse_variable_declaration_defers_type_and_initializer() {
    let mut cxt = Context::new();
    let unit = parse_source(&mut cxt, "var x: int32 = 1 + 2;").unwrap();

    assert_eq!(unit.body.len(), 1);
    let id = unit.body[0].declaration().unwrap();
    assert_eq!(id, global(&cxt, "x"));

    let DeclKind::Variable(object) = &cxt.decl(id).kind else {
        panic!("expected a variable");
    };
    assert!(object.ty.is_unparsed());
    assert!(object.init.as_ref().unwrap().is_unparsed());
}

#[test]
fn test_parse_variable_declaration_without_initializer() {
    let mut cxt = Context::new();
    parse_source(&mut cxt, "var x: bool;").unwrap();

    let DeclKind::Variable(object) = &cxt.decl(global(&cxt, "x")).kind else {
        panic!("expected a variable");
    };
    assert!(object.init.is_none());
}

#[test]
fn test_capture_is_balanced() {
    let mut cxt = Context::new();
    parse_source(&mut cxt, "def N: int32 = (1 + (2));").unwrap();

    let DeclKind::Constant(object) = &cxt.decl(global(&cxt, "N")).kind else {
        panic!("expected a constant");
    };
    let Some(ExprKind::Unparsed(fragment)) = object.init.as_ref().map(|init| &init.kind) else {
        panic!("expected an unparsed initializer");
    };
    assert_eq!(fragment.text(), "( 1 + ( 2 ) )");
}

#[test]
fn test_unbalanced_closer_is_unexpected() {
    let mut cxt = Context::new();
    let error = parse_source(&mut cxt, "var x: int32 = 1);").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_missing_semicolon_is_unexpected() {
    let mut cxt = Context::new();
    let error = parse_source(&mut cxt, "var x: int32 = 1").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_function_parameters_live_in_saved_scope() {
    let mut cxt = Context::new();
    parse_source(&mut cxt, "def f(a: int32, b: bool) -> int32 { return a; }").unwrap();

    let id = global(&cxt, "f");
    let function = cxt.decl(id).function().unwrap();
    assert_eq!(function.parameters.len(), 2);
    assert!(function.return_type.is_unparsed());
    assert!(matches!(function.body, FunctionBody::Statement(Stmt::Compound(_))));

    let scope = cxt.saved_scope(ScopeKey::Decl(id)).unwrap();
    assert_eq!(cxt.lookup_from(scope, "a"), Some(&vec![function.parameters[0]]));
    assert_eq!(cxt.lookup_from(cxt.global_scope(), "a"), None);
}

#[test]
fn test_function_default_return_types() {
    let mut cxt = Context::new();
    parse_source(&mut cxt, "def f() { } def g(x: int32) = x;").unwrap();

    let f = cxt.decl(global(&cxt, "f")).function().unwrap();
    assert_eq!(f.return_type, Type::Void);

    let g_id = global(&cxt, "g");
    let g = cxt.decl(g_id).function().unwrap();
    assert_eq!(g.return_type, Type::Auto);
    assert!(matches!(g.body, FunctionBody::Expression(_)));
    assert!(cxt.saved_scope(ScopeKey::Body(g_id)).is_ok());
}

#[test]
fn test_class_members_live_in_saved_scope() {
    let mut cxt = Context::new();
    parse_source(&mut cxt, "class C { var x: int32; } extension C { var y: int32; }").unwrap();

    let overloads = cxt.lookup_from(cxt.global_scope(), "C").unwrap().clone();
    assert_eq!(overloads.len(), 2);
    assert!(!cxt.decl(overloads[0]).is_extension());
    assert!(cxt.decl(overloads[1]).is_extension());

    let class = cxt.decl(overloads[0]).class().unwrap();
    assert_eq!(class.kind, Type::Meta);
    assert_eq!(class.body.len(), 1);

    let scope = cxt.saved_scope(ScopeKey::Decl(overloads[0])).unwrap();
    assert!(cxt.lookup_from(scope, "x").is_some());
    assert!(cxt.lookup_from(scope, "y").is_none());
}

#[test]
fn test_control_flow_statements() {
    let mut cxt = Context::new();
    let unit = parse_source(
        &mut cxt,
        "def f() { while (true) { if (false) break; else continue; } return; }",
    )
    .unwrap();

    let DeclKind::Function(function) = &cxt.decl(unit.body[0].declaration().unwrap()).kind else {
        panic!("expected a function");
    };
    let FunctionBody::Statement(Stmt::Compound(block)) = &function.body else {
        panic!("expected a block body");
    };
    assert!(matches!(block.body[0], Stmt::While { .. }));
    assert!(matches!(block.body[1], Stmt::Return { value: None, .. }));
}

#[test]
fn test_parse_compound_type() {
    let mut cxt = Context::new();
    let ty = parse_type_fragment(&mut cxt, &fragment("int32 const*&")).unwrap();

    assert_eq!(
        ty,
        Type::int(32)
            .qualified(Qualifiers::CONST)
            .pointer()
            .reference()
    );
    assert_eq!(ty.to_string(), "int32 const*&");
}

#[test]
fn test_parse_array_and_sequence_types() {
    let mut cxt = Context::new();

    let array = parse_type_fragment(&mut cxt, &fragment("bool[2 + 2]")).unwrap();
    assert_eq!(array, Type::Array(Box::new(Type::Boolean), 4));

    let sequence = parse_type_fragment(&mut cxt, &fragment("int8[]")).unwrap();
    assert_eq!(sequence, Type::Sequence(Box::new(Type::int(8))));

    let error = parse_type_fragment(&mut cxt, &fragment("bool[0 - 1]")).unwrap_err();
    assert_eq!(error.get_error_name(), "EvaluationError");
}

#[test]
fn test_parse_named_types() {
    let mut cxt = Context::new();
    parse_source(&mut cxt, "class C { } var x: int32;").unwrap();
    let class = global(&cxt, "C");

    let ty = parse_type_fragment(&mut cxt, &fragment("C")).unwrap();
    assert_eq!(
        ty,
        Type::Class(NamedType {
            decl: class,
            name: "C".to_string()
        })
    );

    let error = parse_type_fragment(&mut cxt, &fragment("x")).unwrap_err();
    assert_eq!(error.get_error_name(), "UnknownType");

    let error = parse_type_fragment(&mut cxt, &fragment("nope")).unwrap_err();
    assert_eq!(error.get_error_name(), "NameError");
}

#[test]
fn test_parse_placeholder_types() {
    let mut cxt = Context::new();

    assert_eq!(parse_type_fragment(&mut cxt, &fragment("auto")).unwrap(), Type::Auto);
    assert_eq!(
        parse_type_fragment(&mut cxt, &fragment("decltype(auto)")).unwrap(),
        Type::Declauto
    );
    assert_eq!(
        parse_type_fragment(&mut cxt, &fragment("decltype(1 + 2)")).unwrap(),
        Type::int(32)
    );
}

#[test]
fn test_trailing_tokens_are_rejected() {
    let mut cxt = Context::new();
    let error = parse_type_fragment(&mut cxt, &fragment("int32 int32")).unwrap_err();
    assert!(error.is_syntactic());
}

#[test]
fn test_expression_precedence() {
    let mut cxt = Context::new();
    let expr = parse_expression_fragment(&mut cxt, &fragment("1 + 2 * 3 < 4 && true")).unwrap();

    assert_eq!(expr.to_string(), "(((1 + (2 * 3)) < 4) && true)");
    assert_eq!(expr.ty, Type::Boolean);
}

#[test]
fn test_integer_literal_types() {
    let mut cxt = Context::new();

    let small = parse_expression_fragment(&mut cxt, &fragment("7")).unwrap();
    assert_eq!(small.ty, Type::int(32));

    let large = parse_expression_fragment(&mut cxt, &fragment("3000000000")).unwrap();
    assert_eq!(large.ty, Type::int(64));

    let error =
        parse_expression_fragment(&mut cxt, &fragment("99999999999999999999")).unwrap_err();
    assert_eq!(error.get_error_name(), "NumberParseError");
}

#[test]
fn test_binary_operands_convert_to_common_type() {
    let mut cxt = Context::new();
    declare(&mut cxt, "x", variable(Type::int(64)));

    let expr = parse_expression_fragment(&mut cxt, &fragment("x + 1")).unwrap();
    assert_eq!(expr.ty, Type::int(64));

    let ExprKind::Binary { right, .. } = &expr.kind else {
        panic!("expected a binary expression");
    };
    assert_eq!(right.conversion(), Some(Conversion::Integer));
}

#[test]
fn test_logical_not_converts_to_bool() {
    let mut cxt = Context::new();
    let expr = parse_expression_fragment(&mut cxt, &fragment("!1")).unwrap();

    assert_eq!(expr.ty, Type::Boolean);
    let ExprKind::Unary { operand, .. } = &expr.kind else {
        panic!("expected a unary expression");
    };
    assert_eq!(operand.conversion(), Some(Conversion::Boolean));

    let error = parse_expression_fragment(&mut cxt, &fragment("-true")).unwrap_err();
    assert_eq!(error.get_error_name(), "TypeMatchError");
}

#[test]
fn test_call_checks_arguments() {
    let mut cxt = Context::new();
    declare(&mut cxt, "f", function(vec![Type::int(64)], Type::Boolean));

    let call = parse_expression_fragment(&mut cxt, &fragment("f(1)")).unwrap();
    assert_eq!(call.ty, Type::Boolean);
    let ExprKind::Call { arguments, .. } = &call.kind else {
        panic!("expected a call");
    };
    assert_eq!(arguments[0].ty, Type::int(64));

    let error = parse_expression_fragment(&mut cxt, &fragment("f(1, 2)")).unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedArguments");

    let error = parse_expression_fragment(&mut cxt, &fragment("f()")).unwrap_err();
    assert_eq!(error.get_error_name(), "MissingArguments");
}

#[test]
fn test_calling_a_non_function() {
    let mut cxt = Context::new();
    declare(&mut cxt, "x", variable(Type::int(32)));

    let error = parse_expression_fragment(&mut cxt, &fragment("x(1)")).unwrap_err();
    assert_eq!(error.get_error_name(), "TypeMatchError");
}

#[test]
fn test_names_that_are_not_values() {
    let mut cxt = Context::new();
    parse_source(&mut cxt, "class C { }").unwrap();

    let error = parse_expression_fragment(&mut cxt, &fragment("C + 1")).unwrap_err();
    assert_eq!(error.get_error_name(), "InvalidReference");

    let error = parse_expression_fragment(&mut cxt, &fragment("missing")).unwrap_err();
    assert_eq!(error.get_error_name(), "NameError");
}

#[test]
fn test_dependent_operands_are_not_converted() {
    let mut cxt = Context::new();
    declare(&mut cxt, "p", DeclKind::Parameter(Type::Auto));

    let expr = parse_expression_fragment(&mut cxt, &fragment("p + 1")).unwrap();
    assert_eq!(expr.ty, Type::Auto);

    let ExprKind::Binary { right, .. } = &expr.kind else {
        panic!("expected a binary expression");
    };
    assert_eq!(right.conversion(), None);
}

#[test]
fn test_assignment_converts_value() {
    let mut cxt = Context::new();
    declare(&mut cxt, "x", variable(Type::float(64)));

    let expr = parse_expression_fragment(&mut cxt, &fragment("x = 1")).unwrap();
    assert_eq!(expr.ty, Type::float(64));

    let ExprKind::Assign { value, .. } = &expr.kind else {
        panic!("expected an assignment");
    };
    assert_eq!(value.ty, Type::float(64));
    assert_eq!(value.conversion(), Some(Conversion::Float));
}
