//! Constraint types.

pub mod constraint;

pub use constraint::{Comparison, ConstraintExt, Sense};
