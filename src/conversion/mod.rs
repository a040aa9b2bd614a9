//! Standard conversions.
//!
//! - `equivalence`: type equivalence, similarity and qualification signatures
//! - `convert`: the categorical, value and qualification conversion ladder,
//!   and the usual arithmetic conversions to a common type

pub mod convert;
pub mod equivalence;
