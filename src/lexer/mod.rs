//! Lexical analysis.
//!
//! Converts source text into a stream of tokens for parsing:
//!
//! - Tokenization of source code using anchored regex patterns
//! - Recognition of keywords, identifiers, numbers, and operators
//! - Token position tracking for error reporting
//! - Comments and whitespace handling

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
