//! Error types and error handling for the elaborator.
//!
//! This module defines the error types used throughout elaboration. It
//! includes:
//!
//! - Error structures with source position and construct information
//! - Specific error variants for lexing, parsing, binding, conversion and
//!   evaluation
//! - Error formatting and display functionality
//! - Helpful error messages and suggestions

pub mod errors;
