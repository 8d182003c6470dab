//! Stock selection driver.
//!
//! Loads monthly prices, builds the selection model, samples it and prints
//! the chosen stocks.

use std::path::PathBuf;

use clap::Parser;
use log::info;

use cqmrust::portfolio::{
    define_risk_cqm, define_variables, process_sampleset, sample_cqm, selection_variance,
    DEFAULT_STOCKCODES,
};
use cqmrust::solver::{ExactCqmSolver, Settings};
use cqmrust::stats::{PriceHistory, StockInfoProvider};
use cqmrust::Result;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV of monthly closing prices (first column is the date)
    #[arg(long, default_value = "data/monthly_prices.csv")]
    prices: PathBuf,

    /// Stocks under consideration
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = DEFAULT_STOCKCODES.iter().map(|s| s.to_string()).collect::<Vec<_>>()
    )]
    stocks: Vec<String>,

    /// Number of stocks to select
    #[arg(long, default_value_t = 2)]
    num_stocks: usize,

    /// Budget for the purchase
    #[arg(long, default_value_t = 80.0)]
    budget: f64,

    /// Weight of the covariance penalty (0 keeps the objective linear)
    #[arg(long, default_value_t = 0.0)]
    risk_weight: f64,

    /// Time limit in seconds passed to the sampler
    #[arg(long)]
    time_limit: Option<f64>,

    /// Print the model before sampling
    #[arg(long)]
    show_model: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let stockcodes: Vec<&str> = args.stocks.iter().map(|s| s.as_str()).collect();
    let history = PriceHistory::from_csv(&args.prices)?;
    let stats = history.stock_info(&stockcodes)?;
    info!(
        "loaded {} months of prices for {} stocks",
        history.num_periods(),
        stockcodes.len()
    );

    let stocks = define_variables(&stockcodes);
    let cqm = define_risk_cqm(
        &stocks,
        args.num_stocks,
        &stats,
        args.budget,
        args.risk_weight,
    )?;
    if args.show_model {
        println!("{}\n", cqm);
    }

    let settings = Settings {
        time_limit: args.time_limit,
        label: Some("stock selection".to_string()),
        ..Default::default()
    };
    let sampleset = sample_cqm(&ExactCqmSolver::new(), &cqm, &settings)?;
    let selection = process_sampleset(&sampleset, &stockcodes, &stats)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
    } else {
        println!("{}", selection);
        if selection.feasible {
            let variance = selection_variance(&selection, &stockcodes, &stats.covariance);
            println!("Return variance: {:.6}", variance);
        }
    }
    Ok(())
}
