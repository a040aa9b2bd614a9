use std::fmt::Display;

use bitflags::bitflags;

use super::{
    ast::{DeclId, Fragment},
    expressions::Expr,
};

bitflags! {
    /// cv-qualifiers applied to one layer of a type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Qualifiers: u8 {
        const CONST = 0b01;
        const VOLATILE = 0b10;
    }
}

impl Qualifiers {
    pub fn has_const(&self) -> bool {
        self.contains(Qualifiers::CONST)
    }

    pub fn has_volatile(&self) -> bool {
        self.contains(Qualifiers::VOLATILE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub parameters: Vec<Type>,
    pub ret: Box<Type>,
}

/// A type named by a declaration: classes, unions, enums and type parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedType {
    pub decl: DeclId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Void,
    Boolean,
    Integer { precision: u32, signed: bool },
    Float { precision: u32 },
    Auto,
    Decltype(Box<Expr>),
    Declauto,
    Function(FunctionType),
    Reference(Box<Type>),
    Qualified(Box<Type>, Qualifiers),
    Pointer(Box<Type>),
    Array(Box<Type>, u64),
    Sequence(Box<Type>),
    Class(NamedType),
    Union(NamedType),
    Enum(NamedType),
    Typename(NamedType),
    /// The type of types, `type`.
    Meta,
    Unparsed(Fragment),
}

impl Type {
    pub fn int(precision: u32) -> Type {
        Type::Integer {
            precision,
            signed: true,
        }
    }

    pub fn uint(precision: u32) -> Type {
        Type::Integer {
            precision,
            signed: false,
        }
    }

    pub fn float(precision: u32) -> Type {
        Type::Float { precision }
    }

    pub fn function(parameters: Vec<Type>, ret: Type) -> Type {
        Type::Function(FunctionType {
            parameters,
            ret: Box::new(ret),
        })
    }

    pub fn reference(self) -> Type {
        match self {
            Type::Reference(_) => self,
            other => Type::Reference(Box::new(other)),
        }
    }

    pub fn pointer(self) -> Type {
        Type::Pointer(Box::new(self))
    }

    /// Adds `qualifiers` to this type. Qualifiers on an already qualified
    /// type merge into one layer, and references cannot be qualified.
    pub fn qualified(self, qualifiers: Qualifiers) -> Type {
        if qualifiers.is_empty() {
            return self;
        }

        match self {
            Type::Qualified(inner, existing) => Type::Qualified(inner, existing | qualifiers),
            Type::Reference(_) => self,
            other => Type::Qualified(Box::new(other), qualifiers),
        }
    }

    pub fn unqualified(&self) -> &Type {
        match self {
            Type::Qualified(inner, _) => inner,
            other => other,
        }
    }

    pub fn qualifiers(&self) -> Qualifiers {
        match self {
            Type::Qualified(_, qualifiers) => *qualifiers,
            _ => Qualifiers::empty(),
        }
    }

    pub fn non_reference(&self) -> &Type {
        match self {
            Type::Reference(inner) => inner,
            other => other,
        }
    }

    /// The type of a value read from an expression of this type.
    pub fn value_type(&self) -> Type {
        self.non_reference().unqualified().clone()
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Type::Reference(_))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self.unqualified(), Type::Boolean)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self.unqualified(), Type::Integer { .. })
    }

    pub fn is_float(&self) -> bool {
        matches!(self.unqualified(), Type::Float { .. })
    }

    pub fn is_arithmetic(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    pub fn is_unparsed(&self) -> bool {
        matches!(self, Type::Unparsed(_))
    }

    /// Whether the type mentions a placeholder or a type parameter, so that
    /// its meaning is only known once instantiated.
    pub fn is_dependent(&self) -> bool {
        match self {
            Type::Auto | Type::Declauto | Type::Typename(_) => true,
            Type::Decltype(expr) => expr.ty.is_dependent(),
            Type::Function(function) => {
                function.ret.is_dependent()
                    || function.parameters.iter().any(Type::is_dependent)
            }
            Type::Reference(inner)
            | Type::Qualified(inner, _)
            | Type::Pointer(inner)
            | Type::Array(inner, _)
            | Type::Sequence(inner) => inner.is_dependent(),
            Type::Void
            | Type::Boolean
            | Type::Integer { .. }
            | Type::Float { .. }
            | Type::Class(_)
            | Type::Union(_)
            | Type::Enum(_)
            | Type::Meta
            | Type::Unparsed(_) => false,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Boolean => write!(f, "bool"),
            Type::Integer { precision, signed } => {
                if !signed {
                    write!(f, "u")?;
                }
                write!(f, "int{}", precision)
            }
            Type::Float { precision } => write!(f, "float{}", precision),
            Type::Auto => write!(f, "auto"),
            Type::Decltype(expr) => write!(f, "decltype({})", expr),
            Type::Declauto => write!(f, "decltype(auto)"),
            Type::Function(function) => {
                let parameters = function
                    .parameters
                    .iter()
                    .map(|parameter| parameter.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "({}) -> {}", parameters, function.ret)
            }
            Type::Reference(inner) => write!(f, "{}&", inner),
            Type::Qualified(inner, qualifiers) => {
                write!(f, "{}", inner)?;
                if qualifiers.has_const() {
                    write!(f, " const")?;
                }
                if qualifiers.has_volatile() {
                    write!(f, " volatile")?;
                }
                Ok(())
            }
            Type::Pointer(inner) => write!(f, "{}*", inner),
            Type::Array(inner, extent) => write!(f, "{}[{}]", inner, extent),
            Type::Sequence(inner) => write!(f, "{}[]", inner),
            Type::Class(named) | Type::Union(named) | Type::Enum(named) | Type::Typename(named) => {
                write!(f, "{}", named.name)
            }
            Type::Meta => write!(f, "type"),
            Type::Unparsed(fragment) => write!(f, "<unparsed {}>", fragment.text()),
        }
    }
}
