//! Error types for cqmrust.

use thiserror::Error;

/// Error type for cqmrust operations.
#[derive(Debug, Error)]
pub enum CqmError {
    /// Parallel inputs have different lengths.
    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    /// A constraint with this label is already in the model.
    #[error("Constraint label already exists: {0}")]
    DuplicateLabel(String),

    /// No constraint with this label.
    #[error("Unknown constraint: {0}")]
    UnknownConstraint(String),

    /// Invalid model specification.
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// Model is too large for exhaustive sampling.
    #[error("Model has {got} variables, exact sampling supports at most {max}")]
    TooManyVariables { got: usize, max: usize },

    /// Sample set has no records.
    #[error("Sample set is empty")]
    EmptySampleSet,

    /// Failure reported by a sampler backend.
    #[error("Solver error: {0}")]
    SolverError(String),

    /// Malformed market data.
    #[error("Data error: {0}")]
    Data(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type for cqmrust operations.
pub type Result<T> = std::result::Result<T, CqmError>;
