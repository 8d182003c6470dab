//! Quadratic expressions over binary variables.
//!
//! An expression is stored in standard form:
//!
//! ```text
//! offset + sum_i a_i x_i + sum_{i<j} b_ij x_i x_j
//! ```
//!
//! Variables keep the order in which they first appeared, which is the order
//! a model registers them in.

use std::collections::{BTreeMap, HashMap};

use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::variable::Binary;
use crate::error::{CqmError, Result};

/// A quadratic expression over binary variables.
#[derive(Debug, Clone, Default)]
pub struct QuadExpr {
    /// Variable labels in order of first appearance.
    variables: Vec<String>,
    /// label -> position in `variables`.
    index: HashMap<String, usize>,
    /// Linear biases, parallel to `variables`.
    linear: Vec<f64>,
    /// Quadratic biases keyed by (u, v) positions with u < v.
    quadratic: BTreeMap<(usize, usize), f64>,
    offset: f64,
}

impl QuadExpr {
    /// The zero expression.
    pub fn zero() -> Self {
        Self::default()
    }

    /// A constant expression.
    pub fn constant(value: f64) -> Self {
        QuadExpr {
            offset: value,
            ..Default::default()
        }
    }

    /// Register a variable without changing its bias. Returns its position.
    pub fn add_variable(&mut self, label: &str) -> usize {
        if let Some(&i) = self.index.get(label) {
            return i;
        }
        let i = self.variables.len();
        self.variables.push(label.to_string());
        self.index.insert(label.to_string(), i);
        self.linear.push(0.0);
        i
    }

    /// Add `bias * label` to the expression.
    pub fn add_linear(&mut self, label: &str, bias: f64) {
        let i = self.add_variable(label);
        self.linear[i] += bias;
    }

    /// Add `bias * u * v` to the expression.
    ///
    /// Since `x * x == x` for binaries, a self-interaction is folded into the
    /// linear bias.
    pub fn add_quadratic(&mut self, u: &str, v: &str, bias: f64) {
        let i = self.add_variable(u);
        let j = self.add_variable(v);
        if i == j {
            self.linear[i] += bias;
            return;
        }
        let key = if i < j { (i, j) } else { (j, i) };
        *self.quadratic.entry(key).or_insert(0.0) += bias;
    }

    /// Add a constant to the expression.
    pub fn add_offset(&mut self, value: f64) {
        self.offset += value;
    }

    /// Set the constant term.
    pub fn set_offset(&mut self, value: f64) {
        self.offset = value;
    }

    /// The constant term.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Linear bias of a variable (0 if absent).
    pub fn linear(&self, label: &str) -> f64 {
        self.index.get(label).map_or(0.0, |&i| self.linear[i])
    }

    /// Quadratic bias between two variables (0 if absent).
    pub fn quadratic(&self, u: &str, v: &str) -> f64 {
        match (self.index.get(u), self.index.get(v)) {
            (Some(&i), Some(&j)) if i != j => {
                let key = if i < j { (i, j) } else { (j, i) };
                self.quadratic.get(&key).copied().unwrap_or(0.0)
            }
            _ => 0.0,
        }
    }

    /// Iterate over `(label, bias)` pairs in variable order.
    pub fn linear_terms(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.variables
            .iter()
            .zip(self.linear.iter())
            .map(|(label, &bias)| (label.as_str(), bias))
    }

    /// Iterate over `(u, v, bias)` interactions.
    pub fn quadratic_terms(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        self.quadratic.iter().map(|(&(i, j), &bias)| {
            (self.variables[i].as_str(), self.variables[j].as_str(), bias)
        })
    }

    /// Variable labels in order of first appearance.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Number of variables.
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Number of quadratic interactions.
    pub fn num_interactions(&self) -> usize {
        self.quadratic.len()
    }

    /// Check if the expression has no nonzero quadratic terms.
    pub fn is_linear(&self) -> bool {
        self.quadratic.values().all(|&b| b == 0.0)
    }

    /// Polynomial degree: 0 for constants, 1 for linear, 2 for quadratic.
    pub fn degree(&self) -> usize {
        if !self.is_linear() {
            2
        } else if self.linear.iter().any(|&b| b != 0.0) {
            1
        } else {
            0
        }
    }

    /// Multiply every term by a scalar.
    pub fn scale(&mut self, scalar: f64) {
        for b in &mut self.linear {
            *b *= scalar;
        }
        for b in self.quadratic.values_mut() {
            *b *= scalar;
        }
        self.offset *= scalar;
    }

    /// Add another expression into this one.
    pub fn add_expr(&mut self, other: &QuadExpr) {
        for (label, bias) in other.linear_terms() {
            self.add_linear(label, bias);
        }
        for (u, v, bias) in other.quadratic_terms() {
            self.add_quadratic(u, v, bias);
        }
        self.offset += other.offset;
    }

    /// Multiply two expressions.
    ///
    /// Fails if the product would have degree greater than two.
    pub fn try_mul(&self, other: &QuadExpr) -> Result<QuadExpr> {
        if self.degree() + other.degree() > 2 {
            return Err(CqmError::InvalidModel(format!(
                "product of degree {} and degree {} expressions is not quadratic",
                self.degree(),
                other.degree()
            )));
        }

        let mut out = QuadExpr::constant(self.offset * other.offset);
        for (u, a) in self.linear_terms() {
            for (v, b) in other.linear_terms() {
                out.add_quadratic(u, v, a * b);
            }
            out.add_linear(u, a * other.offset);
        }
        for (v, b) in other.linear_terms() {
            out.add_linear(v, b * self.offset);
        }
        // At most one side has quadratic terms here, and then the other side is
        // a constant.
        for (u, v, q) in self.quadratic_terms() {
            out.add_quadratic(u, v, q * other.offset);
        }
        for (u, v, q) in other.quadratic_terms() {
            out.add_quadratic(u, v, q * self.offset);
        }
        Ok(out)
    }

    /// Evaluate with a lookup function giving each variable's value.
    pub fn evaluate_with<F>(&self, value: F) -> Result<f64>
    where
        F: Fn(&str) -> Option<bool>,
    {
        let mut state = Vec::with_capacity(self.variables.len());
        for label in &self.variables {
            let v = value(label.as_str()).ok_or_else(|| {
                CqmError::InvalidModel(format!("sample has no value for variable {}", label))
            })?;
            state.push(v);
        }

        let mut total = self.offset;
        for (i, &bias) in self.linear.iter().enumerate() {
            if state[i] {
                total += bias;
            }
        }
        for (&(i, j), &bias) in &self.quadratic {
            if state[i] && state[j] {
                total += bias;
            }
        }
        Ok(total)
    }

    /// Evaluate on a sample mapping labels to values.
    pub fn evaluate(&self, sample: &BTreeMap<String, bool>) -> Result<f64> {
        self.evaluate_with(|label| sample.get(label).copied())
    }
}

impl PartialEq for QuadExpr {
    /// Two expressions are equal if they have the same terms, regardless of
    /// variable order.
    fn eq(&self, other: &Self) -> bool {
        let lin = |e: &QuadExpr| -> BTreeMap<String, f64> {
            e.linear_terms().map(|(l, b)| (l.to_string(), b)).collect()
        };
        let quad = |e: &QuadExpr| -> BTreeMap<(String, String), f64> {
            e.quadratic_terms()
                .map(|(u, v, b)| {
                    let (u, v) = if u <= v { (u, v) } else { (v, u) };
                    ((u.to_string(), v.to_string()), b)
                })
                .collect()
        };
        self.offset == other.offset && lin(self) == lin(other) && quad(self) == quad(other)
    }
}

impl From<f64> for QuadExpr {
    fn from(value: f64) -> Self {
        QuadExpr::constant(value)
    }
}

impl From<&Binary> for QuadExpr {
    fn from(var: &Binary) -> Self {
        let mut e = QuadExpr::zero();
        e.add_linear(var.label(), 1.0);
        e
    }
}

impl From<Binary> for QuadExpr {
    fn from(var: Binary) -> Self {
        QuadExpr::from(&var)
    }
}

impl From<&QuadExpr> for QuadExpr {
    fn from(expr: &QuadExpr) -> Self {
        expr.clone()
    }
}

impl Serialize for QuadExpr {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let linear: Vec<(&str, f64)> = self.linear_terms().collect();
        let quadratic: Vec<(&str, &str, f64)> = self.quadratic_terms().collect();
        let mut s = serializer.serialize_struct("QuadExpr", 3)?;
        s.serialize_field("linear", &linear)?;
        s.serialize_field("quadratic", &quadratic)?;
        s.serialize_field("offset", &self.offset)?;
        s.end()
    }
}
