//! End-to-end stock selection tests.

use std::io::Write;
use std::path::PathBuf;

use cqmrust::portfolio::*;
use cqmrust::prelude::*;
use cqmrust::stats::{PriceHistory, StockInfoProvider};
use tempfile::NamedTempFile;

const TOL: f64 = 1e-9;

fn sample_prices() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/monthly_prices.csv")
}

/// Best pair by direct search over all pairs.
fn best_pair(price: &[f64], returns: &[f64], budget: f64) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize, f64)> = None;
    for i in 0..price.len() {
        for j in (i + 1)..price.len() {
            if price[i] + price[j] > budget {
                continue;
            }
            let r = returns[i] + returns[j];
            if best.map_or(true, |(_, _, b)| r > b) {
                best = Some((i, j, r));
            }
        }
    }
    best.map(|(i, j, _)| (i, j))
}

#[test]
fn test_default_universe_matches_direct_search() {
    let history = PriceHistory::from_csv(sample_prices()).expect("load prices");
    let info = history.stock_info(&DEFAULT_STOCKCODES).expect("stats");
    assert_eq!(info.len(), 10);

    let stocks = define_variables(&DEFAULT_STOCKCODES);
    assert_eq!(stocks.len(), DEFAULT_STOCKCODES.len());

    let cqm = define_cqm(&stocks, 2, &info.price, &info.returns, 80.0).expect("model");
    let sampleset =
        sample_cqm(&ExactCqmSolver::new(), &cqm, &Settings::default()).expect("sample");
    assert_eq!(sampleset.len(), 1 << 10);

    let selection = process_sampleset(&sampleset, &DEFAULT_STOCKCODES, &info).expect("process");
    assert!(selection.feasible);
    assert_eq!(selection.stocks.len(), 2);
    assert!(selection.total_cost <= 80.0);

    let (i, j) = best_pair(&info.price, &info.returns, 80.0).expect("some pair fits");
    assert_eq!(
        selection.stocks,
        vec![DEFAULT_STOCKCODES[i], DEFAULT_STOCKCODES[j]]
    );
    assert!((selection.energy.unwrap() + info.returns[i] + info.returns[j]).abs() < TOL);
}

#[test]
fn test_every_feasible_record_respects_constraints() {
    let history = PriceHistory::from_csv(sample_prices()).unwrap();
    let codes = ["T", "SFL", "PFE", "XOM", "MO"];
    let info = history.stock_info(&codes).unwrap();
    let stocks = define_variables(&codes);
    let cqm = define_cqm(&stocks, 3, &info.price, &info.returns, 100.0).unwrap();

    let sampleset = ExactCqmSolver::new()
        .sample_cqm(&cqm, &Settings::default())
        .unwrap();
    let feasible = sampleset.feasible();
    assert!(!feasible.is_empty());

    for record in feasible.iter() {
        let sample = feasible.sample_of(record);
        let count = sample.values().filter(|&&v| v).count();
        assert_eq!(count, 3);
        let cost: f64 = codes
            .iter()
            .enumerate()
            .filter(|(_, c)| sample[&format!("s_{}", c)])
            .map(|(i, _)| info.price[i])
            .sum();
        assert!(cost <= 100.0 + DEFAULT_ATOL);
        assert!(cqm.check_feasible(&sample, DEFAULT_ATOL).unwrap());
    }
}

#[test]
fn test_from_temporary_csv() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,AAA,BBB,CCC").unwrap();
    writeln!(file, "2021-01,10,20,40").unwrap();
    writeln!(file, "2021-02,11,21,50").unwrap();
    writeln!(file, "2021-03,12,22,70").unwrap();
    file.flush().unwrap();

    let codes = ["AAA", "BBB", "CCC"];
    let info = PriceHistory::from_csv(file.path())
        .unwrap()
        .stock_info(&codes)
        .unwrap();
    assert_eq!(info.price, vec![12.0, 22.0, 70.0]);

    let stocks = define_variables(&codes);
    let cqm = define_cqm(&stocks, 1, &info.price, &info.returns, 30.0).unwrap();
    let sampleset = sample_cqm(&ExactCqmSolver::new(), &cqm, &Settings::default()).unwrap();
    let selection = process_sampleset(&sampleset, &codes, &info).unwrap();

    // CCC has the best return but is over budget; AAA grows faster than BBB.
    assert_eq!(selection.stocks, vec!["AAA"]);
    assert_eq!(selection.total_cost, 12.0);
}

#[test]
fn test_model_labels_and_senses() {
    let codes = ["A", "B", "C"];
    let stocks = define_variables(&codes);
    let cqm = define_cqm(&stocks, 2, &[1.0, 2.0, 3.0], &[0.1, 0.2, 0.3], 4.0).unwrap();

    let labels: Vec<&str> = cqm.constraints().iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec![CHOOSE_K_LABEL, BUDGET_LABEL]);
    assert_eq!(cqm.constraint(CHOOSE_K_LABEL).unwrap().sense, Sense::Eq);
    assert_eq!(cqm.constraint(BUDGET_LABEL).unwrap().sense, Sense::Le);
    assert_eq!(cqm.variables(), &["s_A", "s_B", "s_C"]);
}

#[test]
fn test_selection_json() {
    let codes = ["A", "B"];
    let stocks = define_variables(&codes);
    let info = cqmrust::stats::StockInfo {
        price: vec![5.0, 6.0],
        returns: vec![0.1, 0.2],
        covariance: nalgebra::DMatrix::zeros(2, 2),
    };
    let cqm = define_cqm(&stocks, 1, &info.price, &info.returns, 10.0).unwrap();
    let sampleset = sample_cqm(&ExactCqmSolver::new(), &cqm, &Settings::default()).unwrap();
    let selection = process_sampleset(&sampleset, &codes, &info).unwrap();

    let json = serde_json::to_value(&selection).unwrap();
    assert_eq!(json["stocks"][0], "B");
    assert_eq!(json["feasible"], true);
}
