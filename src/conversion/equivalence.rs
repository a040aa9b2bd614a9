use crate::ast::types::{Qualifiers, Type};

/// Structural type equality.
pub fn is_equivalent(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Void, Type::Void)
        | (Type::Boolean, Type::Boolean)
        | (Type::Auto, Type::Auto)
        | (Type::Declauto, Type::Declauto)
        | (Type::Meta, Type::Meta) => true,
        (
            Type::Integer {
                precision: p1,
                signed: s1,
            },
            Type::Integer {
                precision: p2,
                signed: s2,
            },
        ) => p1 == p2 && s1 == s2,
        (Type::Float { precision: p1 }, Type::Float { precision: p2 }) => p1 == p2,
        (Type::Decltype(e1), Type::Decltype(e2)) => e1 == e2,
        (Type::Function(f1), Type::Function(f2)) => {
            f1.parameters.len() == f2.parameters.len()
                && f1
                    .parameters
                    .iter()
                    .zip(&f2.parameters)
                    .all(|(p1, p2)| is_equivalent(p1, p2))
                && is_equivalent(&f1.ret, &f2.ret)
        }
        (Type::Reference(t1), Type::Reference(t2))
        | (Type::Pointer(t1), Type::Pointer(t2))
        | (Type::Sequence(t1), Type::Sequence(t2)) => is_equivalent(t1, t2),
        (Type::Qualified(t1, q1), Type::Qualified(t2, q2)) => q1 == q2 && is_equivalent(t1, t2),
        (Type::Array(t1, n1), Type::Array(t2, n2)) => n1 == n2 && is_equivalent(t1, t2),
        (Type::Class(c1), Type::Class(c2))
        | (Type::Union(c1), Type::Union(c2))
        | (Type::Enum(c1), Type::Enum(c2))
        | (Type::Typename(c1), Type::Typename(c2)) => c1.decl == c2.decl,
        _ => false,
    }
}

/// Two types are similar if they have the same shape once qualifiers are
/// ignored at every layer.
pub fn is_similar(a: &Type, b: &Type) -> bool {
    match (a.unqualified(), b.unqualified()) {
        (Type::Pointer(t1), Type::Pointer(t2)) | (Type::Sequence(t1), Type::Sequence(t2)) => {
            is_similar(t1, t2)
        }
        (Type::Array(t1, n1), Type::Array(t2, n2)) => n1 == n2 && is_similar(t1, t2),
        (ua, ub) => is_equivalent(ua, ub),
    }
}

/// The qualifiers of each layer of `ty`, outermost first.
///
/// `int32 const* volatile*` has the signature `[0, volatile, const]`.
pub fn qualification_signature(ty: &Type) -> Vec<Qualifiers> {
    let mut signature = vec![];
    let mut current = ty;

    loop {
        signature.push(current.qualifiers());
        match current.unqualified() {
            Type::Pointer(inner) | Type::Array(inner, _) | Type::Sequence(inner) => {
                current = inner;
            }
            _ => return signature,
        }
    }
}

/// Whether a value with qualification signature `from` can be converted to
/// one with signature `to` by adding qualifiers.
///
/// The top-level layer is ignored: it qualifies the value itself, which is
/// copied. Below it, no qualifier may be dropped, and when layer `j` gains a
/// qualifier every layer between the top and `j` must be const in `to`.
pub fn can_convert_signature(from: &[Qualifiers], to: &[Qualifiers]) -> bool {
    if from.len() != to.len() {
        return false;
    }

    let mut deepest_difference = 0;
    for i in 1..from.len() {
        if from[i].has_const() && !to[i].has_const() {
            return false;
        }
        if from[i].has_volatile() && !to[i].has_volatile() {
            return false;
        }
        if from[i] != to[i] {
            deepest_difference = i;
        }
    }

    (1..deepest_difference).all(|k| to[k].has_const())
}
