//! Semantic actions run while a deferred expression is re-parsed.
//!
//! Each action builds one expression node: names are bound to their
//! declarations, operands are converted, and the node is given its type.
//! Operands whose type still depends on a type parameter or on `auto` are
//! left unconverted.

use crate::{
    ast::{
        ast::DeclKind,
        expressions::{BinaryOp, Expr, ExprKind, UnaryOp},
        types::Type,
    },
    context::context::Context,
    conversion::{
        convert::{convert_to_common, convert_to_type, convert_to_value},
        equivalence::is_equivalent,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Span,
};

pub fn on_integer(token: &Token) -> Result<Expr, Error> {
    let value = token.value.parse::<i64>().map_err(|_| {
        Error::new(
            ErrorImpl::NumberParseError {
                token: token.value.clone(),
            },
            token.span.start.clone(),
        )
    })?;

    let ty = if i32::try_from(value).is_ok() {
        Type::int(32)
    } else {
        Type::int(64)
    };

    Ok(Expr::new(ExprKind::Integer(value), ty, token.span.clone()))
}

pub fn on_float(token: &Token) -> Result<Expr, Error> {
    let value = token.value.parse::<f64>().map_err(|_| {
        Error::new(
            ErrorImpl::NumberParseError {
                token: token.value.clone(),
            },
            token.span.start.clone(),
        )
    })?;

    Ok(Expr::new(ExprKind::Float(value), Type::float(64), token.span.clone()))
}

pub fn on_boolean(token: &Token) -> Expr {
    let value = token.kind == TokenKind::True;
    Expr::new(ExprKind::Boolean(value), Type::Boolean, token.span.clone())
}

/// The type an object reference is given: its declared type, or `auto`
/// while that type is still unresolved.
fn object_type(ty: &Type) -> Type {
    if ty.is_unparsed() {
        Type::Auto
    } else {
        ty.clone()
    }
}

/// Binds an identifier to the declaration it names.
///
/// Extensions never shadow the class they extend, so the first
/// non-extension declaration in the overload set is preferred.
pub fn on_reference(cxt: &Context, token: &Token) -> Result<Expr, Error> {
    let name = &token.value;
    let name_error = || {
        Error::new(
            ErrorImpl::NameError { name: name.clone() },
            token.span.start.clone(),
        )
    };

    let overloads = cxt.lookup(name).ok_or_else(name_error)?;
    let id = overloads
        .iter()
        .copied()
        .find(|id| !cxt.decl(*id).is_extension())
        .or_else(|| overloads.first().copied())
        .ok_or_else(name_error)?;

    let decl = cxt.decl(id);
    let ty = match &decl.kind {
        DeclKind::Variable(object) | DeclKind::Constant(object) => object_type(&object.ty),
        DeclKind::Parameter(ty) => object_type(ty),
        DeclKind::Function(function) | DeclKind::Coroutine(function) => function.ty.clone(),
        DeclKind::Super(_) | DeclKind::Class(_) | DeclKind::Extension(_) | DeclKind::TypeParameter => {
            return Err(Error::new(
                ErrorImpl::InvalidReference {
                    name: name.clone(),
                    construct: decl.construct().to_string(),
                },
                token.span.start.clone(),
            ))
        }
    };

    Ok(Expr::new(
        ExprKind::Reference {
            decl: id,
            name: name.clone(),
        },
        ty,
        token.span.clone(),
    ))
}

fn type_mismatch(expected: &str, received: &Expr) -> Error {
    Error::new(
        ErrorImpl::TypeMatchError {
            expected: expected.to_string(),
            received: received.ty.to_string(),
        },
        received.span.start.clone(),
    )
}

/// Reads `expr` as a value and converts it to bool.
pub fn convert_to_condition(expr: Expr) -> Result<Expr, Error> {
    let expr = convert_to_value(expr);
    if expr.ty.is_dependent() {
        Ok(expr)
    } else {
        convert_to_type(expr, &Type::Boolean)
    }
}

/// Converts `expr` to initialize an object of type `target`.
///
/// A reference binds directly to an expression of the referenced type;
/// anything else goes through the standard conversions.
pub fn convert_initializer(expr: Expr, target: &Type) -> Result<Expr, Error> {
    if expr.ty.is_dependent() || target.is_dependent() {
        return Ok(expr);
    }

    if let Type::Reference(referenced) = target {
        return if is_equivalent(&expr.ty.value_type(), &referenced.value_type()) {
            Ok(expr)
        } else {
            Err(Error::new(
                ErrorImpl::ConversionError {
                    from: expr.ty.to_string(),
                    to: target.to_string(),
                },
                expr.span.start.clone(),
            ))
        };
    }

    convert_to_type(expr, target)
}

pub fn on_unary(op: UnaryOp, operand: Expr, span: Span) -> Result<Expr, Error> {
    let (operand, ty) = match op {
        UnaryOp::Negate => {
            let operand = convert_to_value(operand);
            if !operand.ty.is_dependent() && !operand.ty.is_arithmetic() {
                return Err(type_mismatch("an arithmetic type", &operand));
            }
            let ty = operand.ty.clone();
            (operand, ty)
        }
        UnaryOp::Not => (convert_to_condition(operand)?, Type::Boolean),
    };

    Ok(Expr::new(
        ExprKind::Unary {
            op,
            operand: Box::new(operand),
        },
        ty,
        span,
    ))
}

pub fn on_binary(op: BinaryOp, left: Expr, right: Expr) -> Result<Expr, Error> {
    let span = left.span.join(&right.span);

    let (left, right, ty) = if op.is_logical() {
        let left = convert_to_condition(left)?;
        let right = convert_to_condition(right)?;
        (left, right, Type::Boolean)
    } else {
        let left = convert_to_value(left);
        let right = convert_to_value(right);

        if left.ty.is_dependent() || right.ty.is_dependent() {
            let ty = if op.is_relational() {
                Type::Boolean
            } else if left.ty.is_dependent() {
                left.ty.clone()
            } else {
                right.ty.clone()
            };
            (left, right, ty)
        } else {
            if op.is_arithmetic() {
                if !left.ty.is_arithmetic() {
                    return Err(type_mismatch("an arithmetic type", &left));
                }
                if !right.ty.is_arithmetic() {
                    return Err(type_mismatch("an arithmetic type", &right));
                }
            }

            let (left, right) = convert_to_common(left, right)?;
            let ty = if op.is_relational() {
                Type::Boolean
            } else {
                left.ty.clone()
            };
            (left, right, ty)
        }
    };

    Ok(Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        ty,
        span,
    ))
}

pub fn on_call(callee: Expr, arguments: Vec<Expr>, span: Span) -> Result<Expr, Error> {
    let callee_ty = callee.ty.non_reference().unqualified().clone();

    let (arguments, ty) = match callee_ty {
        Type::Function(function) => {
            let expected = function.parameters.len();
            let received = arguments.len();
            if received > expected {
                return Err(Error::new(
                    ErrorImpl::UnexpectedArguments { expected, received },
                    span.start.clone(),
                ));
            }
            if received < expected {
                return Err(Error::new(
                    ErrorImpl::MissingArguments { expected, received },
                    span.start.clone(),
                ));
            }

            let arguments = arguments
                .into_iter()
                .zip(&function.parameters)
                .map(|(argument, parameter)| convert_initializer(argument, parameter))
                .collect::<Result<Vec<_>, _>>()?;
            (arguments, *function.ret)
        }
        ty if ty.is_dependent() => {
            let arguments = arguments.into_iter().map(convert_to_value).collect();
            (arguments, Type::Auto)
        }
        _ => return Err(type_mismatch("a function", &callee)),
    };

    Ok(Expr::new(
        ExprKind::Call {
            callee: Box::new(callee),
            arguments,
        },
        ty,
        span,
    ))
}

pub fn on_assign(assignee: Expr, value: Expr) -> Result<Expr, Error> {
    let span = assignee.span.join(&value.span);
    let value = convert_initializer(convert_to_value(value), &assignee.ty.value_type())?;
    let ty = assignee.ty.clone();

    Ok(Expr::new(
        ExprKind::Assign {
            assignee: Box::new(assignee),
            value: Box::new(value),
        },
        ty,
        span,
    ))
}
