//! Parser module.
//!
//! Transforms a stream of tokens into declarations and statements. It uses
//! a Pratt parser for expressions and types, with NUD (null denotation) and
//! LED (left denotation) functions and binding powers for precedence.
//!
//! - `parser`: the parser state and its entry points
//! - `stmt`: statements and declarations, with types and expressions
//!   captured as deferred fragments
//! - `expr`, `types`: expression and type grammars used to re-parse those
//!   fragments
//! - `actions`: name binding and typing of expressions as they are built

pub mod actions;
pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
