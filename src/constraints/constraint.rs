//! Comparison constraints.
//!
//! A comparison is stored as `lhs <sense> rhs` where `rhs` is a number and
//! `lhs` carries no constant term:
//! - Eq: lhs == rhs
//! - Le: lhs <= rhs
//! - Ge: lhs >= rhs

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::expr::{Binary, QuadExpr};

/// Direction of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    /// lhs == rhs
    Eq,
    /// lhs <= rhs
    Le,
    /// lhs >= rhs
    Ge,
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sense::Eq => "==",
            Sense::Le => "<=",
            Sense::Ge => ">=",
        })
    }
}

/// A comparison between an expression and a constant.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    /// Left-hand side with zero offset.
    pub lhs: QuadExpr,
    /// Comparison direction.
    pub sense: Sense,
    /// Right-hand side constant.
    pub rhs: f64,
}

impl Comparison {
    /// Build `lhs <sense> rhs`, moving all constants to the right.
    pub fn new(lhs: impl Into<QuadExpr>, sense: Sense, rhs: impl Into<QuadExpr>) -> Self {
        let rhs: QuadExpr = rhs.into();
        let mut lhs: QuadExpr = lhs.into();
        lhs.add_expr(&-rhs);
        let constant = lhs.offset();
        lhs.set_offset(0.0);
        // 0.0 - c keeps a zero rhs positive
        Comparison {
            lhs,
            sense,
            rhs: 0.0 - constant,
        }
    }

    /// Create an equality constraint: lhs == rhs.
    pub fn eq(lhs: impl Into<QuadExpr>, rhs: impl Into<QuadExpr>) -> Self {
        Self::new(lhs, Sense::Eq, rhs)
    }

    /// Create an inequality constraint: lhs <= rhs.
    pub fn le(lhs: impl Into<QuadExpr>, rhs: impl Into<QuadExpr>) -> Self {
        Self::new(lhs, Sense::Le, rhs)
    }

    /// Create an inequality constraint: lhs >= rhs.
    pub fn ge(lhs: impl Into<QuadExpr>, rhs: impl Into<QuadExpr>) -> Self {
        Self::new(lhs, Sense::Ge, rhs)
    }

    /// Amount by which a left-hand side value violates the constraint.
    ///
    /// Zero when satisfied.
    pub fn violation_of(&self, lhs_value: f64) -> f64 {
        match self.sense {
            Sense::Eq => (lhs_value - self.rhs).abs(),
            Sense::Le => (lhs_value - self.rhs).max(0.0),
            Sense::Ge => (self.rhs - lhs_value).max(0.0),
        }
    }

    /// Violation on a sample.
    pub fn violation(&self, sample: &BTreeMap<String, bool>) -> Result<f64> {
        Ok(self.violation_of(self.lhs.evaluate(sample)?))
    }

    /// Variable labels in the left-hand side.
    pub fn variables(&self) -> &[String] {
        self.lhs.variables()
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, &self.lhs)?;
        write!(f, " {} {}", self.sense, self.rhs)
    }
}

/// Write an expression as `2*x - y + 3*x*y + 1`.
pub(crate) fn write_expr(f: &mut fmt::Formatter<'_>, expr: &QuadExpr) -> fmt::Result {
    let mut first = true;
    let mut term = |f: &mut fmt::Formatter<'_>, bias: f64, name: String| -> fmt::Result {
        let sign = if bias < 0.0 { "-" } else { "+" };
        if first {
            if bias < 0.0 {
                f.write_str("-")?;
            }
            first = false;
        } else {
            write!(f, " {} ", sign)?;
        }
        if name.is_empty() {
            write!(f, "{}", bias.abs())
        } else if bias.abs() == 1.0 {
            f.write_str(&name)
        } else {
            write!(f, "{}*{}", bias.abs(), name)
        }
    };

    for (label, bias) in expr.linear_terms() {
        if bias != 0.0 {
            term(f, bias, label.to_string())?;
        }
    }
    for (u, v, bias) in expr.quadratic_terms() {
        if bias != 0.0 {
            term(f, bias, format!("{}*{}", u, v))?;
        }
    }
    if expr.offset() != 0.0 {
        term(f, expr.offset(), String::new())?;
    }
    if first {
        f.write_str("0")?;
    }
    Ok(())
}

/// Extension trait for creating constraints from expressions.
pub trait ConstraintExt {
    /// Create equality constraint: self == rhs.
    fn equals(&self, rhs: impl Into<QuadExpr>) -> Comparison;

    /// Create inequality constraint: self <= rhs.
    fn leq(&self, rhs: impl Into<QuadExpr>) -> Comparison;

    /// Create inequality constraint: self >= rhs.
    fn geq(&self, rhs: impl Into<QuadExpr>) -> Comparison;
}

impl ConstraintExt for QuadExpr {
    fn equals(&self, rhs: impl Into<QuadExpr>) -> Comparison {
        Comparison::eq(self, rhs)
    }

    fn leq(&self, rhs: impl Into<QuadExpr>) -> Comparison {
        Comparison::le(self, rhs)
    }

    fn geq(&self, rhs: impl Into<QuadExpr>) -> Comparison {
        Comparison::ge(self, rhs)
    }
}

impl ConstraintExt for Binary {
    fn equals(&self, rhs: impl Into<QuadExpr>) -> Comparison {
        Comparison::eq(self, rhs)
    }

    fn leq(&self, rhs: impl Into<QuadExpr>) -> Comparison {
        Comparison::le(self, rhs)
    }

    fn geq(&self, rhs: impl Into<QuadExpr>) -> Comparison {
        Comparison::ge(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::binary;

    fn sample(pairs: &[(&str, bool)]) -> BTreeMap<String, bool> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_constants_move_to_rhs() {
        let x = binary("x");
        // x + 3 <= 5  ->  x <= 2
        let c = (&x + 3.0).leq(5.0);
        assert_eq!(c.sense, Sense::Le);
        assert_eq!(c.rhs, 2.0);
        assert_eq!(c.lhs.offset(), 0.0);
        assert_eq!(c.lhs.linear("x"), 1.0);
    }

    #[test]
    fn test_variables_on_rhs_move_left() {
        let x = binary("x");
        let y = binary("y");
        // x == y  ->  x - y == 0
        let c = x.equals(&y);
        assert_eq!(c.lhs.linear("x"), 1.0);
        assert_eq!(c.lhs.linear("y"), -1.0);
        assert_eq!(c.rhs, 0.0);
    }

    #[test]
    fn test_violation() {
        let x = binary("x");
        let y = binary("y");
        let s = sample(&[("x", true), ("y", true)]);

        assert_eq!((&x + &y).equals(1.0).violation(&s).unwrap(), 1.0);
        assert_eq!((&x + &y).leq(1.0).violation(&s).unwrap(), 1.0);
        assert_eq!((&x + &y).geq(1.0).violation(&s).unwrap(), 0.0);
        assert_eq!((&x + &y).geq(3.0).violation(&s).unwrap(), 1.0);
    }

    #[test]
    fn test_display() {
        let x = binary("x");
        let y = binary("y");
        let c = (2.0 * &x - &y).leq(4.0);
        assert_eq!(c.to_string(), "2*x - y <= 4");
    }
}
