//! Stock selection as a constrained quadratic model.
//!
//! Choose exactly `k` stocks from a list, spending at most a budget, so as to
//! maximize expected return:
//!
//! ```text
//! minimize    -sum_i returns_i * s_i
//! subject to  sum_i s_i == k                  ("choose k stocks")
//!             sum_i price_i * s_i <= budget   ("budget_limitation")
//!             s_i in {0, 1}
//! ```

use std::fmt;

use log::{info, warn};
use nalgebra::DMatrix;
use serde::Serialize;

use crate::atoms::{dot, quad_form, quicksum};
use crate::constraints::ConstraintExt;
use crate::error::{CqmError, Result};
use crate::expr::{prefixed_binaries, Binary};
use crate::model::ConstrainedQuadraticModel;
use crate::sampleset::SampleSet;
use crate::solver::{CqmSampler, Settings};
use crate::stats::StockInfo;

/// Prefix of the decision variable for each stock.
pub const VARIABLE_PREFIX: &str = "s_";

/// Label of the cardinality constraint.
pub const CHOOSE_K_LABEL: &str = "choose k stocks";

/// Label of the budget constraint.
pub const BUDGET_LABEL: &str = "budget_limitation";

/// The ten tickers the driver uses by default.
pub const DEFAULT_STOCKCODES: [&str; 10] =
    ["T", "SFL", "PFE", "XOM", "MO", "VZ", "IBM", "TSLA", "GILD", "GE"];

/// One binary variable per stock, labelled `s_{code}`, in input order.
pub fn define_variables<S: AsRef<str>>(stockcodes: &[S]) -> Vec<Binary> {
    prefixed_binaries(VARIABLE_PREFIX, stockcodes)
}

fn check_len(what: &str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(CqmError::ShapeMismatch {
            expected: format!("{} {} values", expected, what),
            got: format!("{}", got),
        });
    }
    Ok(())
}

/// Build the stock-selection model.
///
/// `price[i]` and `returns[i]` belong to `stocks[i]`.
pub fn define_cqm(
    stocks: &[Binary],
    num_stocks_to_buy: usize,
    price: &[f64],
    returns: &[f64],
    budget: f64,
) -> Result<ConstrainedQuadraticModel> {
    check_len("price", price.len(), stocks.len())?;
    check_len("returns", returns.len(), stocks.len())?;
    for (i, s) in stocks.iter().enumerate() {
        if stocks[..i].contains(s) {
            return Err(CqmError::InvalidModel(format!(
                "stock variable {} appears more than once",
                s
            )));
        }
    }

    let mut cqm = ConstrainedQuadraticModel::new();

    cqm.add_constraint(
        quicksum(stocks).equals(num_stocks_to_buy as f64),
        Some(CHOOSE_K_LABEL),
    )?;

    let neg_returns: Vec<f64> = returns.iter().map(|r| -r).collect();
    cqm.set_objective(dot(&neg_returns, stocks)?);

    cqm.add_constraint(dot(price, stocks)?.leq(budget), Some(BUDGET_LABEL))?;

    info!(
        "built model: {} stocks, choose {}, budget {}",
        stocks.len(),
        num_stocks_to_buy,
        budget
    );
    Ok(cqm)
}

/// Build the stock-selection model with a risk penalty.
///
/// The objective becomes `-returns' s + risk_weight * s' C s`, where `C` is
/// the return covariance. A zero weight gives the same model as
/// [`define_cqm`].
pub fn define_risk_cqm(
    stocks: &[Binary],
    num_stocks_to_buy: usize,
    info: &StockInfo,
    budget: f64,
    risk_weight: f64,
) -> Result<ConstrainedQuadraticModel> {
    let mut cqm = define_cqm(stocks, num_stocks_to_buy, &info.price, &info.returns, budget)?;
    if risk_weight != 0.0 {
        let risk = quad_form(stocks, &info.covariance)?;
        let objective = cqm.objective() + risk * risk_weight;
        cqm.set_objective(objective);
    }
    Ok(cqm)
}

/// Submit the model to a sampler.
pub fn sample_cqm<S: CqmSampler + ?Sized>(
    sampler: &S,
    cqm: &ConstrainedQuadraticModel,
    settings: &Settings,
) -> Result<SampleSet> {
    info!("sampling with {}", sampler.name());
    let sampleset = sampler.sample_cqm(cqm, settings)?;
    info!(
        "{} samples, {} feasible",
        sampleset.len(),
        sampleset.iter().filter(|r| r.is_feasible).count()
    );
    Ok(sampleset)
}

/// The chosen stocks and their totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    /// Chosen stock codes, in input order.
    pub stocks: Vec<String>,
    /// Sum of prices of the chosen stocks.
    pub total_cost: f64,
    /// Sum of expected returns of the chosen stocks.
    pub expected_return: f64,
    /// Energy of the chosen sample.
    pub energy: Option<f64>,
    /// False when the sampler returned no feasible sample.
    pub feasible: bool,
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.feasible {
            return f.write_str("No feasible solution found.");
        }
        writeln!(f, "Stocks to buy: {}", self.stocks.join(", "))?;
        writeln!(f, "Total cost: {:.2}", self.total_cost)?;
        write!(f, "Expected monthly return: {:.4}", self.expected_return)
    }
}

/// Pick the lowest-energy feasible sample and translate it back to stocks.
///
/// `info` must be indexed like `stockcodes`.
pub fn process_sampleset<S: AsRef<str>>(
    sampleset: &SampleSet,
    stockcodes: &[S],
    info: &StockInfo,
) -> Result<Selection> {
    check_len("price", info.price.len(), stockcodes.len())?;
    check_len("returns", info.returns.len(), stockcodes.len())?;

    let feasible = sampleset.feasible();
    let best = match feasible.first() {
        Ok(best) => best,
        Err(_) => {
            warn!("no feasible sample among {}", sampleset.len());
            return Ok(Selection {
                stocks: Vec::new(),
                total_cost: 0.0,
                expected_return: 0.0,
                energy: None,
                feasible: false,
            });
        }
    };

    let chosen: Vec<&str> = feasible.selected(best).collect();
    let mut selection = Selection {
        stocks: Vec::new(),
        total_cost: 0.0,
        expected_return: 0.0,
        energy: Some(best.energy),
        feasible: true,
    };
    for (i, code) in stockcodes.iter().enumerate() {
        let label = format!("{}{}", VARIABLE_PREFIX, code.as_ref());
        if chosen.contains(&label.as_str()) {
            selection.stocks.push(code.as_ref().to_string());
            selection.total_cost += info.price[i];
            selection.expected_return += info.returns[i];
        }
    }
    Ok(selection)
}

/// Covariance restricted to the chosen stocks: `s' C s`.
pub fn selection_variance<S: AsRef<str>>(
    selection: &Selection,
    stockcodes: &[S],
    covariance: &DMatrix<f64>,
) -> f64 {
    let idx: Vec<usize> = selection
        .stocks
        .iter()
        .filter_map(|s| stockcodes.iter().position(|c| c.as_ref() == s.as_str()))
        .collect();
    idx.iter()
        .flat_map(|&i| idx.iter().map(move |&j| (i, j)))
        .map(|(i, j)| covariance[(i, j)])
        .sum()
}
