use std::fmt::Display;

use crate::{
    ast::{
        ast::DeclKind,
        expressions::{BinaryOp, Conversion, Expr, ExprKind, UnaryOp},
        types::Type,
    },
    context::context::Context,
    elaborator::expressions::bind_constant,
    errors::errors::{Error, ErrorImpl},
};

/// A compile-time constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Float(f64),
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Integer(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{:?}", value),
        }
    }
}

fn error(expr: &Expr, message: impl Into<String>) -> Error {
    Error::new(
        ErrorImpl::EvaluationError {
            message: message.into(),
        },
        expr.span.start.clone(),
    )
}

/// Truncates `value` to the width and signedness of an integer type.
fn wrap_integer(value: i64, ty: &Type) -> i64 {
    match ty.unqualified() {
        Type::Integer { precision, signed } if *precision < 64 => {
            let bits = *precision;
            let masked = (value as u64) & ((1u64 << bits) - 1);
            if *signed && masked & (1u64 << (bits - 1)) != 0 {
                (masked | !((1u64 << bits) - 1)) as i64
            } else {
                masked as i64
            }
        }
        _ => value,
    }
}

/// Evaluates a fully elaborated expression to a constant.
///
/// A constant whose value is not known yet is defined on the spot, so
/// constants can be used before their own definitions are elaborated.
pub fn evaluate(cxt: &mut Context, expr: &Expr) -> Result<Value, Error> {
    match &expr.kind {
        ExprKind::Unparsed(_) => Err(Error::new(
            ErrorImpl::ImplementationError {
                message: "evaluating an unparsed expression".to_string(),
            },
            expr.span.start.clone(),
        )),
        ExprKind::Boolean(value) => Ok(Value::Boolean(*value)),
        ExprKind::Integer(value) => Ok(Value::Integer(*value)),
        ExprKind::Float(value) => Ok(Value::Float(*value)),
        ExprKind::Reference { decl, name } => {
            if matches!(cxt.decl(*decl).kind, DeclKind::Constant(_)) {
                bind_constant(cxt, *decl)?;
            }
            cxt.constant(*decl)
                .copied()
                .ok_or_else(|| error(expr, format!("`{}` is not a constant", name)))
        }
        ExprKind::Unary { op, operand } => evaluate_unary(cxt, expr, *op, operand),
        ExprKind::Binary { op, left, right } => evaluate_binary(cxt, expr, *op, left, right),
        ExprKind::Call { .. } => Err(error(expr, "calls are not constant expressions")),
        ExprKind::Assign { .. } => Err(error(expr, "assignments are not constant expressions")),
        ExprKind::Conversion(conversion, source) => {
            let value = evaluate(cxt, source)?;
            match (conversion, value) {
                (Conversion::Value | Conversion::Qualification, value) => Ok(value),
                (Conversion::Boolean, Value::Integer(n)) => Ok(Value::Boolean(n != 0)),
                (Conversion::Integer, Value::Boolean(b)) => Ok(Value::Integer(b as i64)),
                (Conversion::Integer, Value::Integer(n)) => {
                    Ok(Value::Integer(wrap_integer(n, &expr.ty)))
                }
                (Conversion::Float, Value::Integer(n)) => Ok(Value::Float(n as f64)),
                (Conversion::Float, Value::Float(x)) => Ok(Value::Float(x)),
                (conversion, value) => Err(error(
                    expr,
                    format!("cannot apply {:?} conversion to {}", conversion, value),
                )),
            }
        }
    }
}

fn evaluate_unary(cxt: &mut Context, expr: &Expr, op: UnaryOp, operand: &Expr) -> Result<Value, Error> {
    match (op, evaluate(cxt, operand)?) {
        (UnaryOp::Negate, Value::Integer(n)) => n
            .checked_neg()
            .map(|n| Value::Integer(wrap_integer(n, &expr.ty)))
            .ok_or_else(|| error(expr, "integer overflow")),
        (UnaryOp::Negate, Value::Float(x)) => Ok(Value::Float(-x)),
        (UnaryOp::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (op, value) => Err(error(expr, format!("cannot apply {:?} to {}", op, value))),
    }
}

fn evaluate_binary(
    cxt: &mut Context,
    expr: &Expr,
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
) -> Result<Value, Error> {
    if op.is_logical() {
        let Value::Boolean(lhs) = evaluate(cxt, left)? else {
            return Err(error(left, "expected a boolean operand"));
        };

        // Short circuit.
        match (op, lhs) {
            (BinaryOp::And, false) => return Ok(Value::Boolean(false)),
            (BinaryOp::Or, true) => return Ok(Value::Boolean(true)),
            _ => {}
        }

        return match evaluate(cxt, right)? {
            Value::Boolean(rhs) => Ok(Value::Boolean(rhs)),
            _ => Err(error(right, "expected a boolean operand")),
        };
    }

    match (evaluate(cxt, left)?, evaluate(cxt, right)?) {
        (Value::Integer(a), Value::Integer(b)) => {
            if op.is_relational() {
                return Ok(Value::Boolean(compare(op, &a, &b)));
            }

            let result = match op {
                BinaryOp::Add => a.checked_add(b),
                BinaryOp::Sub => a.checked_sub(b),
                BinaryOp::Mul => a.checked_mul(b),
                BinaryOp::Div | BinaryOp::Rem if b == 0 => {
                    return Err(error(expr, "division by zero"))
                }
                BinaryOp::Div => a.checked_div(b),
                BinaryOp::Rem => a.checked_rem(b),
                _ => None,
            };

            result
                .map(|n| Value::Integer(wrap_integer(n, &expr.ty)))
                .ok_or_else(|| error(expr, "integer overflow"))
        }
        (Value::Float(a), Value::Float(b)) => {
            if op.is_relational() {
                return Ok(Value::Boolean(compare(op, &a, &b)));
            }

            match op {
                BinaryOp::Add => Ok(Value::Float(a + b)),
                BinaryOp::Sub => Ok(Value::Float(a - b)),
                BinaryOp::Mul => Ok(Value::Float(a * b)),
                BinaryOp::Div => Ok(Value::Float(a / b)),
                BinaryOp::Rem => Ok(Value::Float(a % b)),
                _ => Err(error(expr, format!("cannot apply {} to floats", op))),
            }
        }
        (Value::Boolean(a), Value::Boolean(b)) => match op {
            BinaryOp::Equals => Ok(Value::Boolean(a == b)),
            BinaryOp::NotEquals => Ok(Value::Boolean(a != b)),
            _ => Err(error(expr, format!("cannot apply {} to booleans", op))),
        },
        (a, b) => Err(error(
            expr,
            format!("mismatched operands {} and {}", a, b),
        )),
    }
}

fn compare<T: PartialOrd>(op: BinaryOp, a: &T, b: &T) -> bool {
    match op {
        BinaryOp::Less => a < b,
        BinaryOp::LessEquals => a <= b,
        BinaryOp::Greater => a > b,
        BinaryOp::GreaterEquals => a >= b,
        BinaryOp::Equals => a == b,
        BinaryOp::NotEquals => a != b,
        _ => false,
    }
}
