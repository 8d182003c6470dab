//! Sample sets returned by samplers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CqmError, Result};
use crate::model::{ConstrainedQuadraticModel, DEFAULT_ATOL};

/// An assignment of values to variable labels.
pub type Sample = BTreeMap<String, bool>;

/// One row of a sample set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Values aligned with the sample set's variables.
    pub sample: Vec<bool>,
    /// Objective value.
    pub energy: f64,
    /// How many times the sampler returned this assignment.
    pub num_occurrences: usize,
    /// Whether every constraint is satisfied.
    pub is_feasible: bool,
    /// Per-constraint satisfaction, aligned with the constraint labels.
    pub is_satisfied: Vec<bool>,
}

/// A collection of samples with energies and feasibility, ordered by energy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    variables: Vec<String>,
    constraint_labels: Vec<String>,
    records: Vec<SampleRecord>,
    #[serde(default)]
    info: BTreeMap<String, Value>,
}

impl SampleSet {
    /// Build a sample set for `cqm` from raw assignments aligned with
    /// `cqm.variables()`.
    ///
    /// Records are sorted by energy, ties keeping input order.
    pub fn from_samples_cqm<I>(cqm: &ConstrainedQuadraticModel, samples: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<bool>>,
    {
        let mut records = Vec::new();
        for sample in samples {
            let (energy, is_satisfied) = cqm.evaluate_state(&sample, DEFAULT_ATOL)?;
            records.push(SampleRecord {
                sample,
                energy,
                num_occurrences: 1,
                is_feasible: is_satisfied.iter().all(|&s| s),
                is_satisfied,
            });
        }
        records.sort_by(|a, b| a.energy.total_cmp(&b.energy));

        Ok(SampleSet {
            variables: cqm.variables().to_vec(),
            constraint_labels: cqm.constraints().iter().map(|c| c.label.clone()).collect(),
            records,
            info: BTreeMap::new(),
        })
    }

    /// Attach an info entry.
    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.info.insert(key.into(), value.into());
        self
    }

    /// Sampler-provided metadata.
    pub fn info(&self) -> &BTreeMap<String, Value> {
        &self.info
    }

    /// Variable labels, aligned with each record's `sample`.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Constraint labels, aligned with each record's `is_satisfied`.
    pub fn constraint_labels(&self) -> &[String] {
        &self.constraint_labels
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records in energy order.
    pub fn iter(&self) -> impl Iterator<Item = &SampleRecord> {
        self.records.iter()
    }

    /// The lowest-energy record.
    pub fn first(&self) -> Result<&SampleRecord> {
        self.records.first().ok_or(CqmError::EmptySampleSet)
    }

    /// Keep only records matching a predicate.
    pub fn filter<P>(&self, mut pred: P) -> SampleSet
    where
        P: FnMut(&SampleRecord) -> bool,
    {
        SampleSet {
            variables: self.variables.clone(),
            constraint_labels: self.constraint_labels.clone(),
            records: self.records.iter().filter(|r| pred(r)).cloned().collect(),
            info: self.info.clone(),
        }
    }

    /// Keep only feasible records.
    pub fn feasible(&self) -> SampleSet {
        self.filter(|r| r.is_feasible)
    }

    /// Label-keyed view of a record.
    pub fn sample_of(&self, record: &SampleRecord) -> Sample {
        self.variables
            .iter()
            .cloned()
            .zip(record.sample.iter().copied())
            .collect()
    }

    /// Labels set to `true` in a record, in variable order.
    pub fn selected<'a>(&'a self, record: &'a SampleRecord) -> impl Iterator<Item = &'a str> {
        self.variables
            .iter()
            .zip(&record.sample)
            .filter(|&(_, &v)| v)
            .map(|(label, _)| label.as_str())
    }

    /// Merge identical assignments, summing their occurrences.
    pub fn aggregate(&self) -> SampleSet {
        let mut records: Vec<SampleRecord> = Vec::with_capacity(self.records.len());
        for r in &self.records {
            match records.iter_mut().find(|seen| seen.sample == r.sample) {
                Some(seen) => seen.num_occurrences += r.num_occurrences,
                None => records.push(r.clone()),
            }
        }
        SampleSet {
            records,
            ..self.clone()
        }
    }
}
