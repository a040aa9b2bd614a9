//! Symbol tables and compilation state.
//!
//! Scopes live in an arena and link to their lexical parent by index.
//! Scope-introducing constructs record their scope when first parsed so
//! elaboration can re-enter it later.

pub mod context;
pub mod scope;

#[cfg(test)]
mod tests;
