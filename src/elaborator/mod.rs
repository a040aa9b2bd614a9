//! Elaborator module.
//!
//! Turns the deferred fragments left by the parser into resolved types and
//! typed expressions, in two passes over a translation unit:
//!
//! - `declarations`: pass 1, every declared type, so that declarations may
//!   refer to each other in any order
//! - `expressions`: pass 2, initializers and function bodies
//! - `partials`: merging class extensions into their class
//! - `resolve`: re-parsing a single fragment under the current scope
//!
//! Errors are collected per declaration; a failed declaration does not stop
//! its neighbours from being elaborated.

use tracing::debug;

use crate::{
    ast::ast::TranslationUnit, context::context::Context, errors::errors::Error,
};

pub mod declarations;
pub mod expressions;
pub mod partials;
pub mod resolve;


use declarations::DeclarationElaborator;
use expressions::ExpressionElaborator;

/// Elaborates `unit` in place and returns every error found, in source
/// order within each pass.
pub fn elaborate(cxt: &mut Context, unit: &mut TranslationUnit) -> Vec<Error> {
    debug!(statements = unit.body.len(), "elaborating declarations");
    let mut errors = DeclarationElaborator::new(cxt).run(unit);

    debug!(errors = errors.len(), "elaborating definitions");
    errors.extend(ExpressionElaborator::new(cxt).run(unit));

    debug!(errors = errors.len(), "elaboration finished");
    errors
}
