use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// The kind of construct an error was raised against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    Unit,
    Variable,
    Constant,
    Parameter,
    Function,
    Coroutine,
    Class,
    Extension,
    Super,
    TypeParameter,
    Type,
    Expression,
    Statement,
}

impl Display for Construct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Construct::Unit => "translation unit",
            Construct::Variable => "variable declaration",
            Construct::Constant => "constant declaration",
            Construct::Parameter => "parameter declaration",
            Construct::Function => "function declaration",
            Construct::Coroutine => "coroutine declaration",
            Construct::Class => "class declaration",
            Construct::Extension => "extension declaration",
            Construct::Super => "super declaration",
            Construct::TypeParameter => "type parameter",
            Construct::Type => "type",
            Construct::Expression => "expression",
            Construct::Statement => "statement",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
    construct: Construct,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
            construct: Construct::Unit,
        }
    }

    /// Tags the error with the construct being elaborated.
    ///
    /// Only the innermost tag is kept, so a failure inside a class member is
    /// reported against the member, not the class.
    pub fn in_construct(mut self, construct: Construct) -> Self {
        if self.construct == Construct::Unit {
            self.construct = construct;
        }
        self
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_construct(&self) -> Construct {
        self.construct
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// Errors raised by the token-level grammar rather than by name binding
    /// or typing.
    pub fn is_syntactic(&self) -> bool {
        matches!(
            self.internal_error,
            ErrorImpl::UnrecognisedToken { .. }
                | ErrorImpl::UnexpectedToken { .. }
                | ErrorImpl::UnexpectedTokenDetailed { .. }
                | ErrorImpl::NumberParseError { .. }
        )
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::NameError { .. } => "NameError",
            ErrorImpl::SyntaxError { .. } => "SyntaxError",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::InvalidReference { .. } => "InvalidReference",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::ConversionError { .. } => "ConversionError",
            ErrorImpl::IncompatibleTypesError { .. } => "IncompatibleTypesError",
            ErrorImpl::EvaluationError { .. } => "EvaluationError",
            ErrorImpl::ImplementationError { .. } => "ImplementationError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::NameError { name } => {
                ErrorTip::Suggestion(format!("Name `{}` is not declared in this scope", name))
            }
            ErrorImpl::SyntaxError { fragment, message } => {
                ErrorTip::Suggestion(format!("Could not parse deferred {}: {}", fragment, message))
            }
            ErrorImpl::UnknownType { type_ } => {
                ErrorTip::Suggestion(format!("Unknown type `{}` found", type_))
            }
            ErrorImpl::InvalidReference { name, construct } => ErrorTip::Suggestion(format!(
                "`{}` names a {}, which cannot be used as a value",
                name, construct
            )),
            ErrorImpl::TypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::UnexpectedArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::MissingArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::ConversionError { from, to } => ErrorTip::Suggestion(format!(
                "No standard conversion from `{}` to `{}`",
                from, to
            )),
            ErrorImpl::IncompatibleTypesError { left, right } => ErrorTip::Suggestion(format!(
                "`{}` and `{}` have no common arithmetic type",
                left, right
            )),
            ErrorImpl::EvaluationError { message } => {
                ErrorTip::Suggestion(format!("Not a constant expression: {}", message))
            }
            ErrorImpl::ImplementationError { message } => ErrorTip::Suggestion(format!(
                "Internal compiler error, please report it: {}",
                message
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} in {} at {}:{}",
            self.internal_error, self.construct, self.position.1, self.position.0
        )
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("name {name:?} is not declared")]
    NameError { name: String },
    #[error("syntax error in deferred {fragment}: {message}")]
    SyntaxError { fragment: String, message: String },
    #[error("unknown type {type_} found")]
    UnknownType { type_: String },
    #[error("{name:?} names a {construct}, not a value")]
    InvalidReference { name: String, construct: String },
    #[error("types do not match: expected {expected:?}, received {received:?}")]
    TypeMatchError { expected: String, received: String },
    #[error("unexpected arguments: expected {expected:?}, received {received:?}")]
    UnexpectedArguments { expected: usize, received: usize },
    #[error("missing arguments: expected {expected:?}, received {received:?}")]
    MissingArguments { expected: usize, received: usize },
    #[error("cannot convert {from} to {to}")]
    ConversionError { from: String, to: String },
    #[error("incompatible types {left} and {right}")]
    IncompatibleTypesError { left: String, right: String },
    #[error("evaluation failed: {message}")]
    EvaluationError { message: String },
    #[error("implementation error: {message}")]
    ImplementationError { message: String },
}
