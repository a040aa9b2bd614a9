//! Abstract Syntax Tree definitions.
//!
//! Every category is a closed enum, so each dispatch site is an exhaustive
//! `match`:
//!
//! - `ast`: declarations, ids, deferred token fragments, the translation unit
//! - `types`: types and cv-qualifiers
//! - `expressions`: typed expressions and conversion nodes
//! - `statements`: statements
//!
//! Declarations live in the context's arena and are referred to by
//! [`ast::DeclId`]; scopes likewise by [`ast::ScopeId`].

pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
