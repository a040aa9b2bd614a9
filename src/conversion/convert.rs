use tracing::trace;

use crate::{
    ast::{
        expressions::{Conversion, Expr},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
};

use super::equivalence::{
    can_convert_signature, is_equivalent, is_similar, qualification_signature,
};

// Categorical conversions

/// An expression of type `T&` can be read as a value of type `T`.
pub fn convert_object_to_value(expr: Expr) -> Expr {
    match &expr.ty {
        Type::Reference(inner) => {
            let target = (**inner).clone();
            expr.convert(Conversion::Value, target)
        }
        _ => expr,
    }
}

/// Performs at most one categorical conversion. None applies when the
/// target is itself a reference.
pub fn convert_category(expr: Expr, target: &Type) -> Expr {
    if target.is_reference() {
        expr
    } else {
        convert_object_to_value(expr)
    }
}

// Value conversions

/// A value of integer type can be converted to bool.
pub fn convert_to_bool(expr: Expr, target: &Type) -> Expr {
    if expr.ty.is_integer() {
        expr.convert(Conversion::Boolean, target.clone())
    } else {
        expr
    }
}

/// A value of integer type can be converted to a wider integer type, or to
/// the other signedness at the same precision. A value of type bool converts
/// to 0 or 1.
///
/// Narrowing is not performed: the expression is returned unchanged.
pub fn convert_to_wider_integer(expr: Expr, target: &Type) -> Expr {
    let Type::Integer {
        precision: to,
        signed: to_signed,
    } = target.unqualified()
    else {
        return expr;
    };

    match expr.ty.unqualified() {
        Type::Integer { precision, signed }
            if precision < to || (precision == to && signed != to_signed) =>
        {
            expr.convert(Conversion::Integer, target.clone())
        }
        Type::Boolean => expr.convert(Conversion::Integer, target.clone()),
        _ => expr,
    }
}

/// A value of float type can be converted to a wider float type.
pub fn convert_to_wider_float(expr: Expr, target: &Type) -> Expr {
    let Type::Float { precision: to } = target.unqualified() else {
        return expr;
    };

    match expr.ty.unqualified() {
        Type::Float { precision } if precision < to => {
            expr.convert(Conversion::Float, target.clone())
        }
        _ => expr,
    }
}

/// A value of integer type can be converted to a float type.
pub fn convert_integer_to_float(expr: Expr, target: &Type) -> Expr {
    if expr.ty.is_integer() && target.is_float() {
        expr.convert(Conversion::Float, target.clone())
    } else {
        expr
    }
}

pub fn convert_to_float(expr: Expr, target: &Type) -> Expr {
    if expr.ty.is_float() {
        convert_to_wider_float(expr, target)
    } else if expr.ty.is_integer() {
        convert_integer_to_float(expr, target)
    } else {
        expr
    }
}

/// Performs at most one value conversion, chosen by the unqualified shape of
/// the target. Expressions of reference type are left alone.
pub fn convert_value(expr: Expr, target: &Type) -> Expr {
    if expr.ty.is_reference() {
        return expr;
    }

    let unqualified = target.unqualified();
    match unqualified {
        Type::Boolean => convert_to_bool(expr, unqualified),
        Type::Integer { .. } => convert_to_wider_integer(expr, unqualified),
        Type::Float { .. } => convert_to_float(expr, unqualified),
        _ => expr,
    }
}

// Qualification conversions

/// Converts to a similar type that only adds qualifiers below the top level.
/// Top-level qualifiers may change freely since they qualify a copy.
pub fn convert_qualifier(expr: Expr, target: &Type) -> Expr {
    if !is_similar(&expr.ty, target) {
        return expr;
    }

    let from = qualification_signature(&expr.ty);
    let to = qualification_signature(target);
    if can_convert_signature(&from, &to) {
        expr.convert(Conversion::Qualification, target.clone())
    } else {
        expr
    }
}

// Standard conversions

/// Converts `expr` to `target` with at most one categorical, one value and
/// one qualification conversion, stopping as soon as the types are
/// equivalent.
pub fn convert_to_type(expr: Expr, target: &Type) -> Result<Expr, Error> {
    let from = expr.ty.clone();

    let c1 = convert_category(expr, target);
    if is_equivalent(&c1.ty, target) {
        trace!(%from, to = %target, "categorical conversion");
        return Ok(c1);
    }

    let c2 = convert_value(c1, target);
    if is_equivalent(&c2.ty, target) {
        trace!(%from, to = %target, "value conversion");
        return Ok(c2);
    }

    let c3 = convert_qualifier(c2, target);
    if is_equivalent(&c3.ty, target) {
        trace!(%from, to = %target, "qualification conversion");
        return Ok(c3);
    }

    Err(Error::new(
        ErrorImpl::ConversionError {
            from: from.to_string(),
            to: target.to_string(),
        },
        c3.span.start.clone(),
    ))
}

/// Reads an operand as a value: dereferences it and drops its top-level
/// qualifiers.
pub fn convert_to_value(expr: Expr) -> Expr {
    let expr = convert_object_to_value(expr);
    match &expr.ty {
        Type::Qualified(inner, _) => {
            let target = (**inner).clone();
            expr.convert(Conversion::Qualification, target)
        }
        _ => expr,
    }
}

// Arithmetic conversions

fn incompatible(e1: &Expr, e2: &Expr) -> Error {
    Error::new(
        ErrorImpl::IncompatibleTypesError {
            left: e1.ty.to_string(),
            right: e2.ty.to_string(),
        },
        e1.span.start.clone(),
    )
}

/// Converts two operands to a common arithmetic type. The operands are
/// returned in their original order.
///
/// If either operand is floating point, both become the most precise float
/// type. Integers of the same signedness widen to the more precise type.
/// Otherwise the unsigned type wins if it is at least as precise as the
/// signed one, and failing that both become the unsigned type with the
/// signed operand's precision.
pub fn convert_to_common(e1: Expr, e2: Expr) -> Result<(Expr, Expr), Error> {
    if is_equivalent(&e1.ty, &e2.ty) {
        return Ok((e1, e2));
    }

    let t1 = e1.ty.unqualified().clone();
    let t2 = e2.ty.unqualified().clone();

    match (&t1, &t2) {
        (Type::Float { precision: p1 }, Type::Float { precision: p2 }) => {
            if p1 < p2 {
                Ok((convert_to_wider_float(e1, &t2), e2))
            } else if p2 < p1 {
                Ok((e1, convert_to_wider_float(e2, &t1)))
            } else {
                Ok((e1, e2))
            }
        }
        (Type::Integer { .. }, Type::Float { .. }) => Ok((convert_integer_to_float(e1, &t2), e2)),
        (Type::Float { .. }, Type::Integer { .. }) => Ok((e1, convert_integer_to_float(e2, &t1))),
        (
            Type::Integer {
                precision: p1,
                signed: s1,
            },
            Type::Integer {
                precision: p2,
                signed: s2,
            },
        ) => {
            if s1 == s2 {
                return if p1 < p2 {
                    Ok((convert_to_wider_integer(e1, &t2), e2))
                } else if p2 < p1 {
                    Ok((e1, convert_to_wider_integer(e2, &t1)))
                } else {
                    Ok((e1, e2))
                };
            }

            if !s1 && p1 >= p2 {
                return Ok((e1, convert_to_wider_integer(e2, &t1)));
            }
            if !s2 && p2 >= p1 {
                return Ok((convert_to_wider_integer(e1, &t2), e2));
            }

            let precision = if *s1 { *p1 } else { *p2 };
            let common = Type::uint(precision);
            trace!(%t1, %t2, %common, "unsigned common type");
            Ok((
                convert_to_wider_integer(e1, &common),
                convert_to_wider_integer(e2, &common),
            ))
        }
        _ => Err(incompatible(&e1, &e2)),
    }
}
