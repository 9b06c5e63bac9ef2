//! Backtest entry points: a single series, or many independent series in parallel.

use super::error::RegimeTraderError;
use super::metrics::Metrics;
use super::position::Trade;
use super::regime::RegimeLabels;
use super::scanner::scan;
use super::series::AlignedSeries;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

/// Ledger plus metrics. Metric fields are always populated, even for an empty ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub ledger: Vec<Trade>,
    pub metrics: Metrics,
}

pub fn run_backtest(series: &AlignedSeries, labels: &RegimeLabels) -> BacktestResult {
    let ledger = scan(series, labels);
    let metrics = Metrics::compute(&ledger, labels);
    debug!(
        steps = series.len(),
        trades = ledger.len(),
        total_return = metrics.total_return,
        "backtest complete"
    );
    BacktestResult { ledger, metrics }
}

/// Convenience wrapper over separate price/regime columns.
pub fn run_backtest_columns(
    dates: Vec<chrono::NaiveDate>,
    prices: Vec<f64>,
    regimes: Vec<i64>,
    labels: &RegimeLabels,
) -> Result<BacktestResult, RegimeTraderError> {
    let series = AlignedSeries::new(dates, prices, regimes)?;
    Ok(run_backtest(&series, labels))
}

/// One unit of batch work: a full (series, labels) tuple.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub name: String,
    pub series: AlignedSeries,
    pub labels: RegimeLabels,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub name: String,
    pub result: BacktestResult,
}

/// Evaluate independent jobs in parallel. Outcomes are returned in job order.
pub fn run_batch(jobs: &[BatchJob]) -> Vec<BatchOutcome> {
    info!("Running batch of {} series", jobs.len());
    jobs.par_iter()
        .map(|job| BatchOutcome {
            name: job.name.clone(),
            result: run_backtest(&job.series, &job.labels),
        })
        .collect()
}
