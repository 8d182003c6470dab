//! Exhaustive reference sampler.
//!
//! Evaluates every one of the `2^n` assignments. Only meant for small models:
//! checking a formulation offline or in tests without a remote service.

use log::{debug, info};

use super::{CqmSampler, Settings};
use crate::error::{CqmError, Result};
use crate::model::ConstrainedQuadraticModel;
use crate::sampleset::SampleSet;

/// Hard ceiling on `Settings::max_variables`.
const MAX_EXACT_VARIABLES: usize = 30;

/// Sampler returning every assignment of the model's variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactCqmSolver;

impl ExactCqmSolver {
    /// Create an exact solver.
    pub fn new() -> Self {
        ExactCqmSolver
    }
}

impl CqmSampler for ExactCqmSolver {
    fn name(&self) -> &str {
        "exact"
    }

    fn sample_cqm(&self, cqm: &ConstrainedQuadraticModel, settings: &Settings) -> Result<SampleSet> {
        let n = cqm.num_variables();
        let max = settings.max_variables.min(MAX_EXACT_VARIABLES);
        if n > max {
            return Err(CqmError::TooManyVariables { got: n, max });
        }
        if settings.time_limit.is_some() {
            debug!("exact solver ignores time_limit");
        }

        let count = 1usize << n;
        info!(
            "enumerating {} assignments of {} variables, {} constraints",
            count,
            n,
            cqm.num_constraints()
        );

        // Bit i of the counter is the value of variable i.
        let states = (0..count).map(|bits| {
            (0..n)
                .map(|i| (bits >> i) & 1 == 1)
                .collect::<Vec<bool>>()
        });
        let mut sampleset = SampleSet::from_samples_cqm(cqm, states)?
            .with_info("solver", self.name())
            .with_info("num_variables", n);
        if let Some(label) = &settings.label {
            sampleset = sampleset.with_info("problem_label", label.as_str());
        }
        Ok(sampleset)
    }
}
