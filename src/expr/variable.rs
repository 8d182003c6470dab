//! Binary decision variables.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::expression::QuadExpr;

/// A binary (0/1) decision variable, identified by its label.
///
/// Two `Binary` values with the same label refer to the same variable, the
/// same way `Binary('x')` does in a model: there is no hidden identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Binary {
    label: String,
}

impl Binary {
    /// Create a binary variable with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Binary {
            label: label.into(),
        }
    }

    /// Get the variable label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Convert into a linear expression `1 * self`.
    pub fn to_expr(&self) -> QuadExpr {
        QuadExpr::from(self)
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Create a binary variable.
///
/// # Examples
///
/// ```
/// use cqmrust::expr::binary;
///
/// let x = binary("x");
/// assert_eq!(x.label(), "x");
/// ```
pub fn binary(label: impl Into<String>) -> Binary {
    Binary::new(label)
}

/// Create one binary variable per label, preserving order.
pub fn binaries<I, S>(labels: I) -> Vec<Binary>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    labels.into_iter().map(Binary::new).collect()
}

/// Create one binary variable per key, labelled `{prefix}{key}`.
pub fn prefixed_binaries<I, S>(prefix: &str, keys: I) -> Vec<Binary>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keys.into_iter()
        .map(|key| Binary::new(format!("{}{}", prefix, key.as_ref())))
        .collect()
}
