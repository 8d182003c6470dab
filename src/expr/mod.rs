//! Expression types and creation utilities.
//!
//! This module provides the core types for building models:
//! - `Binary` - a labelled 0/1 decision variable
//! - `QuadExpr` - a quadratic expression over binaries
//! - Variable creation via `binary()` and `binaries()`

pub mod expression;
pub mod variable;

// Re-export main types
pub use expression::QuadExpr;
pub use variable::{binaries, binary, prefixed_binaries, Binary};
