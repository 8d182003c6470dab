//! Sampler interface for cqmrust.
//!
//! This module provides:
//! - The `CqmSampler` trait, implemented by anything that can turn a model
//!   into a sample set (a remote hybrid service, a local reference solver)
//! - `ExactCqmSolver`, a reference sampler that evaluates every assignment

pub mod exact;

pub use exact::ExactCqmSolver;

use crate::error::Result;
use crate::model::ConstrainedQuadraticModel;
use crate::sampleset::SampleSet;

/// Sampler settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Time limit in seconds, for samplers that honour one.
    pub time_limit: Option<f64>,
    /// Problem label attached to the submission.
    pub label: Option<String>,
    /// Largest model the exact solver accepts.
    pub max_variables: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            time_limit: None,
            label: None,
            max_variables: 20,
        }
    }
}

/// Something that samples constrained quadratic models.
pub trait CqmSampler {
    /// Short name used in logs and sample set info.
    fn name(&self) -> &str;

    /// Sample the model and return the results.
    fn sample_cqm(&self, cqm: &ConstrainedQuadraticModel, settings: &Settings) -> Result<SampleSet>;
}
