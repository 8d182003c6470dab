//! Stock statistics: current price, average return and covariance.
//!
//! Statistics are computed from a table of monthly closing prices, one
//! column per ticker:
//!
//! ```text
//! date,T,SFL,PFE
//! 2021-01,28.7,8.1,36.8
//! 2021-02,28.6,8.4,33.5
//! ```

use std::io::Read;
use std::path::Path;

use log::debug;
use nalgebra::DMatrix;

use crate::error::{CqmError, Result};

/// Per-stock statistics, indexed like the stock list they were computed for.
#[derive(Debug, Clone, PartialEq)]
pub struct StockInfo {
    /// Latest price.
    pub price: Vec<f64>,
    /// Mean monthly return.
    pub returns: Vec<f64>,
    /// Sample covariance of monthly returns.
    pub covariance: DMatrix<f64>,
}

impl StockInfo {
    /// Return variance of each stock (the covariance diagonal).
    pub fn variances(&self) -> Vec<f64> {
        self.covariance.diagonal().iter().copied().collect()
    }

    /// Number of stocks.
    pub fn len(&self) -> usize {
        self.price.len()
    }

    /// Check if there are no stocks.
    pub fn is_empty(&self) -> bool {
        self.price.is_empty()
    }
}

/// Source of stock statistics.
pub trait StockInfoProvider {
    /// Statistics for `stockcodes`, in the same order.
    fn stock_info(&self, stockcodes: &[&str]) -> Result<StockInfo>;
}

/// Monthly closing prices for a set of tickers.
#[derive(Debug, Clone)]
pub struct PriceHistory {
    tickers: Vec<String>,
    /// One row per month, one column per ticker.
    prices: DMatrix<f64>,
}

impl PriceHistory {
    /// Create from tickers and row-major price rows.
    ///
    /// Tickers must be unique and every price finite and positive.
    pub fn new(tickers: Vec<String>, rows: &[Vec<f64>]) -> Result<Self> {
        for (j, ticker) in tickers.iter().enumerate() {
            if tickers[..j].contains(ticker) {
                return Err(CqmError::Data(format!("duplicate ticker column {}", ticker)));
            }
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != tickers.len() {
                return Err(CqmError::ShapeMismatch {
                    expected: format!("{} prices in row {}", tickers.len(), i),
                    got: format!("{}", row.len()),
                });
            }
            for (ticker, &p) in tickers.iter().zip(row) {
                if !p.is_finite() {
                    return Err(CqmError::Data(format!(
                        "row {}: non-finite price {} for {}",
                        i, p, ticker
                    )));
                }
                if p <= 0.0 {
                    return Err(CqmError::Data(format!(
                        "row {}: non-positive price {} for {}",
                        i, p, ticker
                    )));
                }
            }
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        Ok(PriceHistory {
            prices: DMatrix::from_row_slice(rows.len(), tickers.len(), &flat),
            tickers,
        })
    }

    /// Load a price table from a CSV file.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading prices from {}", path.display());
        Self::from_reader(std::fs::File::open(path)?)
    }

    /// Load a price table from any CSV source.
    ///
    /// The first column is a row label (usually the date) and is ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let tickers: Vec<String> = reader
            .headers()?
            .iter()
            .skip(1)
            .map(|h| h.trim().to_string())
            .collect();
        if tickers.is_empty() {
            return Err(CqmError::Data("price table has no ticker columns".into()));
        }

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            let row = record
                .iter()
                .skip(1)
                .enumerate()
                .map(|(col, cell)| {
                    match cell.trim().parse::<f64>() {
                        Ok(p) if p.is_finite() => Ok(p),
                        _ => Err(CqmError::Data(format!(
                            "row {}, column {}: cannot parse price '{}'",
                            line + 1,
                            tickers.get(col).map_or("?", |t| t.as_str()),
                            cell
                        ))),
                    }
                })
                .collect::<Result<Vec<f64>>>()?;
            rows.push(row);
        }
        Self::new(tickers, &rows)
    }

    /// Tickers in column order.
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Number of months.
    pub fn num_periods(&self) -> usize {
        self.prices.nrows()
    }

    /// Month-over-month simple returns, one row per consecutive pair of months.
    pub fn monthly_returns(&self) -> Result<DMatrix<f64>> {
        let (m, k) = self.prices.shape();
        if m < 2 {
            return Err(CqmError::Data(format!(
                "need at least two months of prices, got {}",
                m
            )));
        }
        let mut returns = DMatrix::zeros(m - 1, k);
        for j in 0..k {
            for t in 1..m {
                returns[(t - 1, j)] = self.prices[(t, j)] / self.prices[(t - 1, j)] - 1.0;
            }
        }
        Ok(returns)
    }
}

impl StockInfoProvider for PriceHistory {
    fn stock_info(&self, stockcodes: &[&str]) -> Result<StockInfo> {
        let columns = stockcodes
            .iter()
            .map(|code| {
                self.tickers
                    .iter()
                    .position(|t| t == code)
                    .ok_or_else(|| CqmError::Data(format!("no prices for ticker {}", code)))
            })
            .collect::<Result<Vec<usize>>>()?;

        let all_returns = self.monthly_returns()?;
        let n = all_returns.nrows();
        if n < 2 {
            return Err(CqmError::Data(format!(
                "need at least three months of prices for a covariance, got {}",
                n + 1
            )));
        }

        let last = self.prices.nrows() - 1;
        let price = columns.iter().map(|&j| self.prices[(last, j)]).collect();
        let returns = all_returns.select_columns(columns.iter());
        let mean: Vec<f64> = returns.column_iter().map(|c| c.mean()).collect();

        let mut centered = returns.clone();
        for (j, mut col) in centered.column_iter_mut().enumerate() {
            col.add_scalar_mut(-mean[j]);
        }
        let covariance = centered.transpose() * &centered / (n - 1) as f64;

        Ok(StockInfo {
            price,
            returns: mean,
            covariance,
        })
    }
}
