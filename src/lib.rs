//! # cqmrust
//!
//! Constrained quadratic models (CQMs) over binary variables.
//!
//! cqmrust provides a small modeling layer: binary variables, quadratic
//! expressions built with ordinary operators, labelled comparison
//! constraints, and a model type that can be handed to any sampler
//! implementing [`solver::CqmSampler`].
//!
//! ## Quick Start
//!
//! ```
//! use cqmrust::prelude::*;
//!
//! let stocks = binaries(["s_A", "s_B", "s_C"]);
//! let returns = [0.02, 0.05, 0.03];
//! let price = [10.0, 40.0, 25.0];
//!
//! let mut cqm = ConstrainedQuadraticModel::new();
//! cqm.add_constraint(quicksum(&stocks).equals(2.0), Some("choose k stocks"))?;
//! cqm.set_objective(-dot(&returns, &stocks)?);
//! cqm.add_constraint(dot(&price, &stocks)?.leq(50.0), Some("budget_limitation"))?;
//!
//! let sampleset = ExactCqmSolver::new().sample_cqm(&cqm, &Settings::default())?;
//! let best = sampleset.feasible().first()?.clone();
//! assert!((best.energy + 0.07).abs() < 1e-12);
//! # Ok::<(), cqmrust::CqmError>(())
//! ```
//!
//! ## Model conventions
//!
//! - The objective is always **minimized**; maximize `f` by minimizing `-f`
//! - Constraint constants are moved to the right-hand side
//! - Variables are registered in order of first appearance
//! - Constraint labels are unique within a model
//!
//! ## Architecture
//!
//! - **Expressions** (`expr`, `atoms`): sparse linear and quadratic biases
//! - **Constraints** (`constraints`): `==`, `<=`, `>=` against a constant
//! - **Model** (`model`): objective + labelled constraints
//! - **Samplers** (`solver`): the `CqmSampler` trait and an exhaustive
//!   reference sampler
//! - **Results** (`sampleset`): energy-ordered records with feasibility
//! - **Stock selection** (`portfolio`, `stats`): the driver's formulation and
//!   the statistics it needs

pub mod atoms;
pub mod constraints;
pub mod error;
pub mod expr;
pub mod model;
pub mod portfolio;
pub mod sampleset;
pub mod solver;
pub mod stats;

/// Prelude module for convenient imports.
///
/// ```
/// use cqmrust::prelude::*;
/// ```
pub mod prelude {
    // Expression types
    pub use crate::expr::{binaries, binary, prefixed_binaries, Binary, QuadExpr};

    // Atoms
    pub use crate::atoms::{dot, quad_form, quicksum};

    // Constraints
    pub use crate::constraints::{Comparison, ConstraintExt, Sense};

    // Model
    pub use crate::model::{ConstrainedQuadraticModel, LabelledConstraint, DEFAULT_ATOL};

    // Samplers and results
    pub use crate::sampleset::{Sample, SampleRecord, SampleSet};
    pub use crate::solver::{CqmSampler, ExactCqmSolver, Settings};

    // Errors
    pub use crate::error::{CqmError, Result};
}

// Re-export main types at crate root
pub use error::{CqmError, Result};
pub use model::ConstrainedQuadraticModel;
pub use sampleset::SampleSet;
