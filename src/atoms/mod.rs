//! Atom functions for building expressions.
//!
//! - **Linear atoms**: operator overloading, `quicksum`, `dot`
//! - **Quadratic atoms**: `quad_form`

pub mod affine;
pub mod quadratic;

pub use affine::{dot, quicksum};
pub use quadratic::quad_form;
