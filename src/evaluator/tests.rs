use crate::{
    ast::{
        ast::{Decl, DeclKind, ObjectDecl},
        expressions::{BinaryOp, Conversion, Expr, ExprKind, UnaryOp},
        types::Type,
    },
    context::context::Context,
    evaluator::evaluator::{evaluate, Value},
    Span,
};

fn int(value: i64) -> Expr {
    Expr::new(ExprKind::Integer(value), Type::int(32), Span::null())
}

fn binary(op: BinaryOp, left: Expr, right: Expr, ty: Type) -> Expr {
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        ty,
        Span::null(),
    )
}

#[test]
fn test_arithmetic() {
    let mut cxt = Context::new();
    let expr = binary(
        BinaryOp::Mul,
        binary(BinaryOp::Add, int(2), int(3), Type::int(32)),
        int(4),
        Type::int(32),
    );

    assert_eq!(evaluate(&mut cxt, &expr).unwrap(), Value::Integer(20));
}

#[test]
fn test_relational_and_logical() {
    let mut cxt = Context::new();
    let less = binary(BinaryOp::Less, int(1), int(2), Type::Boolean);
    let expr = binary(
        BinaryOp::And,
        less,
        Expr::new(ExprKind::Boolean(false), Type::Boolean, Span::null()),
        Type::Boolean,
    );

    assert_eq!(evaluate(&mut cxt, &expr).unwrap(), Value::Boolean(false));
}

#[test]
fn test_division_by_zero() {
    let mut cxt = Context::new();
    let expr = binary(BinaryOp::Div, int(1), int(0), Type::int(32));

    let error = evaluate(&mut cxt, &expr).unwrap_err();
    assert_eq!(error.get_error_name(), "EvaluationError");
}

#[test]
fn test_integer_results_wrap_to_their_type() {
    let mut cxt = Context::new();
    let expr = binary(BinaryOp::Add, int(100), int(100), Type::int(8));
    assert_eq!(evaluate(&mut cxt, &expr).unwrap(), Value::Integer(-56));

    let negated = Expr::new(
        ExprKind::Unary {
            op: UnaryOp::Negate,
            operand: Box::new(int(1)),
        },
        Type::uint(8),
        Span::null(),
    );
    assert_eq!(evaluate(&mut cxt, &negated).unwrap(), Value::Integer(255));
}

#[test]
fn test_conversions() {
    let mut cxt = Context::new();

    let to_bool = int(3).convert(Conversion::Boolean, Type::Boolean);
    assert_eq!(evaluate(&mut cxt, &to_bool).unwrap(), Value::Boolean(true));

    let to_float = int(3).convert(Conversion::Float, Type::float(64));
    assert_eq!(evaluate(&mut cxt, &to_float).unwrap(), Value::Float(3.0));

    let from_bool = Expr::new(ExprKind::Boolean(true), Type::Boolean, Span::null())
        .convert(Conversion::Integer, Type::int(32));
    assert_eq!(evaluate(&mut cxt, &from_bool).unwrap(), Value::Integer(1));
}

#[test]
fn test_constant_references() {
    let mut cxt = Context::new();
    let decl = Decl {
        name: "N".to_string(),
        kind: DeclKind::Constant(ObjectDecl {
            ty: Type::int(32),
            init: None,
        }),
        scope: cxt.global_scope(),
        span: Span::null(),
    };
    let id = cxt.declare(decl);
    let reference = Expr::new(
        ExprKind::Reference {
            decl: id,
            name: "N".to_string(),
        },
        Type::int(32),
        Span::null(),
    );

    assert_eq!(
        evaluate(&mut cxt, &reference).unwrap_err().get_error_name(),
        "EvaluationError"
    );

    cxt.store(id, Value::Integer(5));
    let expr = binary(BinaryOp::Mul, reference, int(2), Type::int(32));
    assert_eq!(evaluate(&mut cxt, &expr).unwrap(), Value::Integer(10));
}
