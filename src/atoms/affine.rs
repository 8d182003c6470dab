//! Linear atoms and operator overloading.
//!
//! Operators work on `Binary`, `QuadExpr` and `f64` operands in any owned or
//! borrowed combination, so models read like the math:
//!
//! ```
//! use cqmrust::prelude::*;
//!
//! let x = binary("x");
//! let y = binary("y");
//! let e = 3.0 * &x - &y + 1.0;
//! assert_eq!(e.linear("x"), 3.0);
//! assert_eq!(e.linear("y"), -1.0);
//! assert_eq!(e.offset(), 1.0);
//! ```

use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::error::{CqmError, Result};
use crate::expr::{Binary, QuadExpr};

// ============================================================================
// Operator overloading
// ============================================================================

impl Neg for QuadExpr {
    type Output = QuadExpr;

    fn neg(mut self) -> QuadExpr {
        self.scale(-1.0);
        self
    }
}

impl Neg for &QuadExpr {
    type Output = QuadExpr;

    fn neg(self) -> QuadExpr {
        -self.clone()
    }
}

impl Neg for Binary {
    type Output = QuadExpr;

    fn neg(self) -> QuadExpr {
        -QuadExpr::from(self)
    }
}

impl Neg for &Binary {
    type Output = QuadExpr;

    fn neg(self) -> QuadExpr {
        -QuadExpr::from(self)
    }
}

impl<T: Into<QuadExpr>> AddAssign<T> for QuadExpr {
    fn add_assign(&mut self, rhs: T) {
        self.add_expr(&rhs.into());
    }
}

impl<T: Into<QuadExpr>> SubAssign<T> for QuadExpr {
    fn sub_assign(&mut self, rhs: T) {
        let rhs: QuadExpr = rhs.into();
        self.add_expr(&-rhs);
    }
}

impl<T: Into<QuadExpr>> Add<T> for QuadExpr {
    type Output = QuadExpr;

    fn add(mut self, rhs: T) -> QuadExpr {
        self += rhs;
        self
    }
}

impl<T: Into<QuadExpr>> Add<T> for &QuadExpr {
    type Output = QuadExpr;

    fn add(self, rhs: T) -> QuadExpr {
        self.clone() + rhs
    }
}

impl<T: Into<QuadExpr>> Add<T> for Binary {
    type Output = QuadExpr;

    fn add(self, rhs: T) -> QuadExpr {
        QuadExpr::from(self) + rhs
    }
}

impl<T: Into<QuadExpr>> Add<T> for &Binary {
    type Output = QuadExpr;

    fn add(self, rhs: T) -> QuadExpr {
        QuadExpr::from(self) + rhs
    }
}

impl<T: Into<QuadExpr>> Sub<T> for QuadExpr {
    type Output = QuadExpr;

    fn sub(mut self, rhs: T) -> QuadExpr {
        self -= rhs;
        self
    }
}

impl<T: Into<QuadExpr>> Sub<T> for &QuadExpr {
    type Output = QuadExpr;

    fn sub(self, rhs: T) -> QuadExpr {
        self.clone() - rhs
    }
}

impl<T: Into<QuadExpr>> Sub<T> for Binary {
    type Output = QuadExpr;

    fn sub(self, rhs: T) -> QuadExpr {
        QuadExpr::from(self) - rhs
    }
}

impl<T: Into<QuadExpr>> Sub<T> for &Binary {
    type Output = QuadExpr;

    fn sub(self, rhs: T) -> QuadExpr {
        QuadExpr::from(self) - rhs
    }
}

// Scalar multiplication
impl Mul<f64> for QuadExpr {
    type Output = QuadExpr;

    fn mul(mut self, rhs: f64) -> QuadExpr {
        self.scale(rhs);
        self
    }
}

impl Mul<f64> for &QuadExpr {
    type Output = QuadExpr;

    fn mul(self, rhs: f64) -> QuadExpr {
        self.clone() * rhs
    }
}

impl Mul<f64> for Binary {
    type Output = QuadExpr;

    fn mul(self, rhs: f64) -> QuadExpr {
        QuadExpr::from(self) * rhs
    }
}

impl Mul<f64> for &Binary {
    type Output = QuadExpr;

    fn mul(self, rhs: f64) -> QuadExpr {
        QuadExpr::from(self) * rhs
    }
}

// Binary products are always quadratic.
impl Mul<&Binary> for &Binary {
    type Output = QuadExpr;

    fn mul(self, rhs: &Binary) -> QuadExpr {
        let mut e = QuadExpr::zero();
        e.add_quadratic(self.label(), rhs.label(), 1.0);
        e
    }
}

impl Mul<Binary> for Binary {
    type Output = QuadExpr;

    fn mul(self, rhs: Binary) -> QuadExpr {
        &self * &rhs
    }
}

macro_rules! impl_scalar_lhs {
    ($($t:ty),*) => {
        $(
            impl Add<$t> for f64 {
                type Output = QuadExpr;

                fn add(self, rhs: $t) -> QuadExpr {
                    QuadExpr::from(rhs) + self
                }
            }

            impl Sub<$t> for f64 {
                type Output = QuadExpr;

                fn sub(self, rhs: $t) -> QuadExpr {
                    -QuadExpr::from(rhs) + self
                }
            }

            impl Mul<$t> for f64 {
                type Output = QuadExpr;

                fn mul(self, rhs: $t) -> QuadExpr {
                    QuadExpr::from(rhs) * self
                }
            }
        )*
    };
}

impl_scalar_lhs!(QuadExpr, &QuadExpr, Binary, &Binary);

impl Sum<QuadExpr> for QuadExpr {
    fn sum<I: Iterator<Item = QuadExpr>>(iter: I) -> QuadExpr {
        quicksum(iter)
    }
}

impl<'a> Sum<&'a QuadExpr> for QuadExpr {
    fn sum<I: Iterator<Item = &'a QuadExpr>>(iter: I) -> QuadExpr {
        quicksum(iter)
    }
}

impl Sum<Binary> for QuadExpr {
    fn sum<I: Iterator<Item = Binary>>(iter: I) -> QuadExpr {
        quicksum(iter)
    }
}

impl<'a> Sum<&'a Binary> for QuadExpr {
    fn sum<I: Iterator<Item = &'a Binary>>(iter: I) -> QuadExpr {
        quicksum(iter)
    }
}

// ============================================================================
// Linear atom functions
// ============================================================================

/// Sum of terms, accumulated in place.
pub fn quicksum<I, T>(terms: I) -> QuadExpr
where
    I: IntoIterator<Item = T>,
    T: Into<QuadExpr>,
{
    let mut total = QuadExpr::zero();
    for term in terms {
        total += term;
    }
    total
}

/// Weighted sum `sum_i coeffs[i] * vars[i]`.
pub fn dot(coeffs: &[f64], vars: &[Binary]) -> Result<QuadExpr> {
    if coeffs.len() != vars.len() {
        return Err(CqmError::ShapeMismatch {
            expected: format!("{} coefficients", vars.len()),
            got: format!("{}", coeffs.len()),
        });
    }
    let mut total = QuadExpr::zero();
    for (var, &c) in vars.iter().zip(coeffs) {
        total.add_linear(var.label(), c);
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{binaries, binary};

    #[test]
    fn test_add_and_sub() {
        let x = binary("x");
        let y = binary("y");
        let e = &x + &y - 2.0;
        assert_eq!(e.linear("x"), 1.0);
        assert_eq!(e.linear("y"), 1.0);
        assert_eq!(e.offset(), -2.0);

        let e = 5.0 - &x;
        assert_eq!(e.linear("x"), -1.0);
        assert_eq!(e.offset(), 5.0);
    }

    #[test]
    fn test_scalar_mul_both_sides() {
        let x = binary("x");
        assert_eq!((&x * 2.0).linear("x"), 2.0);
        assert_eq!((2.0 * &x).linear("x"), 2.0);
        assert_eq!((-(&x * 3.0)).linear("x"), -3.0);
    }

    #[test]
    fn test_binary_product() {
        let x = binary("x");
        let y = binary("y");
        let e = &x * &y;
        assert_eq!(e.quadratic("x", "y"), 1.0);
        assert_eq!(e.degree(), 2);

        let sq = &x * &x;
        assert_eq!(sq.linear("x"), 1.0);
        assert!(sq.is_linear());
    }

    #[test]
    fn test_sum_of_binaries() {
        let vars = binaries(["a", "b", "c"]);
        let s: QuadExpr = vars.iter().sum();
        for v in &vars {
            assert_eq!(s.linear(v.label()), 1.0);
        }
        assert_eq!(s.num_variables(), 3);
    }

    #[test]
    fn test_quicksum_mixed_terms() {
        let vars = binaries(["a", "b"]);
        let s = quicksum(vars.iter().enumerate().map(|(i, v)| v * (i as f64 + 1.0)));
        assert_eq!(s.linear("a"), 1.0);
        assert_eq!(s.linear("b"), 2.0);
    }

    #[test]
    fn test_dot() {
        let vars = binaries(["a", "b"]);
        let e = dot(&[3.0, -1.0], &vars).unwrap();
        assert_eq!(e.linear("a"), 3.0);
        assert_eq!(e.linear("b"), -1.0);
    }

    #[test]
    fn test_dot_length_mismatch() {
        let vars = binaries(["a", "b"]);
        assert!(matches!(
            dot(&[1.0], &vars),
            Err(CqmError::ShapeMismatch { .. })
        ));
    }
}
