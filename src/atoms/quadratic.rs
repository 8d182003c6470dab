//! Quadratic atoms.

use nalgebra::DMatrix;

use crate::error::{CqmError, Result};
use crate::expr::{Binary, QuadExpr};

/// Quadratic form `x' Q x` over binary variables.
///
/// Diagonal entries become linear biases (`x_i^2 = x_i`), and each pair of
/// off-diagonal entries `Q_ij + Q_ji` becomes one interaction.
pub fn quad_form(vars: &[Binary], q: &DMatrix<f64>) -> Result<QuadExpr> {
    let n = vars.len();
    if q.nrows() != n || q.ncols() != n {
        return Err(CqmError::ShapeMismatch {
            expected: format!("{}x{}", n, n),
            got: format!("{}x{}", q.nrows(), q.ncols()),
        });
    }

    let mut e = QuadExpr::zero();
    for (i, vi) in vars.iter().enumerate() {
        e.add_linear(vi.label(), q[(i, i)]);
        for (j, vj) in vars.iter().enumerate().skip(i + 1) {
            let bias = q[(i, j)] + q[(j, i)];
            if bias != 0.0 {
                e.add_quadratic(vi.label(), vj.label(), bias);
            }
        }
    }
    Ok(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::binaries;

    #[test]
    fn test_quad_form() {
        let vars = binaries(["a", "b"]);
        #[rustfmt::skip]
        let q = DMatrix::from_row_slice(2, 2, &[
            1.0, 0.5,
            0.5, 2.0,
        ]);
        let e = quad_form(&vars, &q).unwrap();
        assert_eq!(e.linear("a"), 1.0);
        assert_eq!(e.linear("b"), 2.0);
        assert_eq!(e.quadratic("a", "b"), 1.0);
    }

    #[test]
    fn test_quad_form_matches_matrix_product() {
        let vars = binaries(["a", "b", "c"]);
        #[rustfmt::skip]
        let q = DMatrix::from_row_slice(3, 3, &[
            0.04, 0.01, -0.02,
            0.01, 0.03,  0.00,
            -0.02, 0.00, 0.02,
        ]);
        let e = quad_form(&vars, &q).unwrap();

        let sample = [("a", true), ("b", false), ("c", true)]
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect();
        let x = nalgebra::DVector::from_vec(vec![1.0, 0.0, 1.0]);
        let expected = (x.transpose() * &q * &x)[(0, 0)];
        assert!((e.evaluate(&sample).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_quad_form_shape_mismatch() {
        let vars = binaries(["a", "b"]);
        let q = DMatrix::zeros(3, 3);
        assert!(quad_form(&vars, &q).is_err());
    }
}
