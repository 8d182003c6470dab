//! Constrained quadratic model definition.
//!
//! A `ConstrainedQuadraticModel` holds:
//! - An objective to minimize (a quadratic expression)
//! - A set of labelled comparison constraints
//!
//! ```
//! use cqmrust::prelude::*;
//!
//! let x = binary("x");
//! let y = binary("y");
//!
//! let mut cqm = ConstrainedQuadraticModel::new();
//! cqm.set_objective(-1.0 * &x - 2.0 * &y);
//! cqm.add_constraint((&x + &y).leq(1.0), Some("at most one")).unwrap();
//! assert_eq!(cqm.num_variables(), 2);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use log::debug;
use serde::Serialize;

use crate::constraints::constraint::write_expr;
use crate::constraints::Comparison;
use crate::error::{CqmError, Result};
use crate::expr::QuadExpr;

/// Default absolute tolerance for feasibility checks.
pub const DEFAULT_ATOL: f64 = 1e-6;

/// A constraint together with its label.
#[derive(Debug, Clone, Serialize)]
pub struct LabelledConstraint {
    /// Unique label within the model.
    pub label: String,
    /// The comparison.
    pub comparison: Comparison,
}

/// A constrained quadratic model over binary variables.
///
/// The objective is always minimized; to maximize `f`, minimize `-f`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConstrainedQuadraticModel {
    /// Variable labels in the order they were added.
    variables: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    /// Objective to minimize.
    objective: QuadExpr,
    /// Constraints in insertion order.
    constraints: Vec<LabelledConstraint>,
}

impl ConstrainedQuadraticModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable to the model. Adding an existing label is a no-op.
    ///
    /// Returns the variable's position.
    pub fn add_variable(&mut self, label: &str) -> usize {
        if let Some(&i) = self.index.get(label) {
            return i;
        }
        let i = self.variables.len();
        self.variables.push(label.to_string());
        self.index.insert(label.to_string(), i);
        i
    }

    fn add_variables_from(&mut self, expr: &QuadExpr) {
        for label in expr.variables() {
            self.add_variable(label);
        }
    }

    /// Set (replace) the objective.
    pub fn set_objective(&mut self, objective: impl Into<QuadExpr>) {
        let objective = objective.into();
        self.add_variables_from(&objective);
        debug!(
            "objective set: {} variables, {} interactions",
            objective.num_variables(),
            objective.num_interactions()
        );
        self.objective = objective;
    }

    /// Add a constraint.
    ///
    /// If `label` is `None` a fresh label of the form `c{n}` is generated.
    /// Returns the label used.
    ///
    /// # Errors
    ///
    /// Returns `CqmError::DuplicateLabel` if a constraint with the same label
    /// already exists.
    pub fn add_constraint(&mut self, comparison: Comparison, label: Option<&str>) -> Result<String> {
        let label = match label {
            Some(l) => {
                if self.constraint(l).is_some() {
                    return Err(CqmError::DuplicateLabel(l.to_string()));
                }
                l.to_string()
            }
            None => self.fresh_label(),
        };

        self.add_variables_from(&comparison.lhs);
        debug!("constraint '{}': {}", label, comparison);
        self.constraints.push(LabelledConstraint {
            label: label.clone(),
            comparison,
        });
        Ok(label)
    }

    fn fresh_label(&self) -> String {
        let mut n = self.constraints.len();
        loop {
            let label = format!("c{}", n);
            if self.constraint(&label).is_none() {
                return label;
            }
            n += 1;
        }
    }

    /// Variable labels in model order.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Number of variables.
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Position of a variable in model order.
    pub fn variable_index(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// The objective.
    pub fn objective(&self) -> &QuadExpr {
        &self.objective
    }

    /// All constraints in insertion order.
    pub fn constraints(&self) -> &[LabelledConstraint] {
        &self.constraints
    }

    /// Number of constraints.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Look up a constraint by label.
    pub fn constraint(&self, label: &str) -> Option<&Comparison> {
        self.constraints
            .iter()
            .find(|c| c.label == label)
            .map(|c| &c.comparison)
    }

    /// Remove a constraint by label.
    pub fn remove_constraint(&mut self, label: &str) -> Result<Comparison> {
        let pos = self
            .constraints
            .iter()
            .position(|c| c.label == label)
            .ok_or_else(|| CqmError::UnknownConstraint(label.to_string()))?;
        Ok(self.constraints.remove(pos).comparison)
    }

    /// Check if the objective and every constraint are linear.
    pub fn is_linear(&self) -> bool {
        self.objective.is_linear() && self.constraints.iter().all(|c| c.comparison.lhs.is_linear())
    }

    /// Objective value (energy) of a sample.
    pub fn objective_value(&self, sample: &BTreeMap<String, bool>) -> Result<f64> {
        self.objective.evaluate(sample)
    }

    /// Violation of each constraint on a sample, in constraint order.
    pub fn violations(&self, sample: &BTreeMap<String, bool>) -> Result<Vec<(String, f64)>> {
        self.constraints
            .iter()
            .map(|c| Ok((c.label.clone(), c.comparison.violation(sample)?)))
            .collect()
    }

    /// Check if every constraint is satisfied within `atol`.
    pub fn check_feasible(&self, sample: &BTreeMap<String, bool>, atol: f64) -> Result<bool> {
        Ok(self.violations(sample)?.iter().all(|(_, v)| *v <= atol))
    }

    /// Evaluate a state aligned with `variables()`.
    ///
    /// Returns the energy and, per constraint, whether it is satisfied
    /// within `atol`.
    pub fn evaluate_state(&self, state: &[bool], atol: f64) -> Result<(f64, Vec<bool>)> {
        if state.len() != self.variables.len() {
            return Err(CqmError::ShapeMismatch {
                expected: format!("{} values", self.variables.len()),
                got: format!("{}", state.len()),
            });
        }
        let lookup = |label: &str| self.index.get(label).map(|&i| state[i]);

        let energy = self.objective.evaluate_with(lookup)?;
        let satisfied = self
            .constraints
            .iter()
            .map(|c| {
                let lhs = c.comparison.lhs.evaluate_with(lookup)?;
                Ok(c.comparison.violation_of(lhs) <= atol)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok((energy, satisfied))
    }
}

impl fmt::Display for ConstrainedQuadraticModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Minimize\n  ")?;
        write_expr(f, &self.objective)?;
        f.write_str("\n\nSubject to\n")?;
        for c in &self.constraints {
            writeln!(f, "  {}: {}", c.label, c.comparison)?;
        }
        write!(f, "\nBinary\n  {}", self.variables.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ConstraintExt;
    use crate::expr::{binaries, binary};

    fn sample(pairs: &[(&str, bool)]) -> BTreeMap<String, bool> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_variables_registered_in_order() {
        let vars = binaries(["b", "a", "c"]);
        let mut cqm = ConstrainedQuadraticModel::new();
        cqm.add_constraint((&vars[0] + &vars[1]).leq(1.0), None).unwrap();
        cqm.set_objective(&vars[2] + &vars[0]);
        assert_eq!(cqm.variables(), &["b", "a", "c"]);
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let x = binary("x");
        let mut cqm = ConstrainedQuadraticModel::new();
        cqm.add_constraint(x.leq(1.0), Some("cap")).unwrap();
        let err = cqm.add_constraint(x.geq(0.0), Some("cap")).unwrap_err();
        assert!(matches!(err, CqmError::DuplicateLabel(l) if l == "cap"));
        assert_eq!(cqm.num_constraints(), 1);
    }

    #[test]
    fn test_generated_labels_do_not_collide() {
        let x = binary("x");
        let mut cqm = ConstrainedQuadraticModel::new();
        cqm.add_constraint(x.leq(1.0), Some("c1")).unwrap();
        let a = cqm.add_constraint(x.leq(1.0), None).unwrap();
        let b = cqm.add_constraint(x.leq(1.0), None).unwrap();
        assert_eq!(a, "c2");
        assert_eq!(b, "c3");
    }

    #[test]
    fn test_set_objective_replaces() {
        let x = binary("x");
        let y = binary("y");
        let mut cqm = ConstrainedQuadraticModel::new();
        cqm.set_objective(&x * 2.0);
        cqm.set_objective(&y * 3.0);
        assert_eq!(cqm.objective().linear("x"), 0.0);
        assert_eq!(cqm.objective().linear("y"), 3.0);
        // Variables stay registered.
        assert_eq!(cqm.num_variables(), 2);
    }

    #[test]
    fn test_feasibility() {
        let x = binary("x");
        let y = binary("y");
        let mut cqm = ConstrainedQuadraticModel::new();
        cqm.set_objective(-1.0 * &x - 1.0 * &y);
        cqm.add_constraint((&x + &y).equals(1.0), Some("one")).unwrap();

        let both = sample(&[("x", true), ("y", true)]);
        let one = sample(&[("x", true), ("y", false)]);
        assert!(!cqm.check_feasible(&both, DEFAULT_ATOL).unwrap());
        assert!(cqm.check_feasible(&one, DEFAULT_ATOL).unwrap());
        assert_eq!(cqm.objective_value(&both).unwrap(), -2.0);
        assert_eq!(cqm.violations(&both).unwrap(), vec![("one".to_string(), 1.0)]);
    }

    #[test]
    fn test_evaluate_state() {
        let x = binary("x");
        let y = binary("y");
        let mut cqm = ConstrainedQuadraticModel::new();
        cqm.set_objective(&x * 2.0 + &y);
        cqm.add_constraint(x.leq(0.0), None).unwrap();

        let (energy, sat) = cqm.evaluate_state(&[true, true], DEFAULT_ATOL).unwrap();
        assert_eq!(energy, 3.0);
        assert_eq!(sat, vec![false]);
        assert!(cqm.evaluate_state(&[true], DEFAULT_ATOL).is_err());
    }

    #[test]
    fn test_remove_constraint() {
        let x = binary("x");
        let mut cqm = ConstrainedQuadraticModel::new();
        cqm.add_constraint(x.leq(0.0), Some("a")).unwrap();
        assert!(cqm.remove_constraint("a").is_ok());
        assert!(matches!(
            cqm.remove_constraint("a"),
            Err(CqmError::UnknownConstraint(_))
        ));
    }

    #[test]
    fn test_is_linear() {
        let x = binary("x");
        let y = binary("y");
        let mut cqm = ConstrainedQuadraticModel::new();
        cqm.set_objective(&x + &y);
        assert!(cqm.is_linear());
        cqm.set_objective(&x * &y);
        assert!(!cqm.is_linear());
    }

    #[test]
    fn test_display() {
        let x = binary("x");
        let mut cqm = ConstrainedQuadraticModel::new();
        cqm.set_objective(-2.0 * &x);
        cqm.add_constraint(x.leq(1.0), Some("cap")).unwrap();
        let text = cqm.to_string();
        assert!(text.contains("-2*x"));
        assert!(text.contains("cap: x <= 1"));
    }
}
