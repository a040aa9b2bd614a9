//! Constant expression evaluation.
//!
//! Evaluates constant initializers and array extents over fully elaborated
//! expressions, reading earlier constants from the context's store.

pub mod evaluator;

#[cfg(test)]
mod tests;
