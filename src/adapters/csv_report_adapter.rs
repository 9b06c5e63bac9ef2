//! CSV report adapter implementing ReportPort.
//!
//! Writes the trade ledger to `output_path` and the metrics to a sibling
//! `<stem>.metrics.csv` with one `metric,value` row per field.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::RegimeTraderError;
use crate::domain::metrics::Metrics;
use crate::domain::position::Trade;
use crate::domain::regime::RegimeNames;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Serialize)]
struct LedgerRow<'a> {
    entry_date: NaiveDate,
    exit_date: NaiveDate,
    direction: &'static str,
    entry_price: f64,
    exit_price: f64,
    pnl: f64,
    regime: i64,
    regime_name: &'a str,
}

impl<'a> LedgerRow<'a> {
    fn new(trade: &Trade, regime_name: &'a str) -> Self {
        Self {
            entry_date: trade.entry_date,
            exit_date: trade.exit_date,
            direction: trade.direction.as_str(),
            entry_price: trade.entry_price,
            exit_price: trade.exit_price,
            pnl: trade.pnl,
            regime: trade.regime,
            regime_name,
        }
    }
}

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn metrics_path(output_path: &Path) -> PathBuf {
        let stem = output_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string());
        output_path.with_file_name(format!("{stem}.metrics.csv"))
    }

    fn write_ledger(
        ledger: &[Trade],
        names: &RegimeNames,
        path: &Path,
    ) -> Result<(), RegimeTraderError> {
        let mut wtr = csv::Writer::from_path(path).map_err(report_err)?;
        // serde skips the header when there are no rows
        if ledger.is_empty() {
            wtr.write_record([
                "entry_date",
                "exit_date",
                "direction",
                "entry_price",
                "exit_price",
                "pnl",
                "regime",
                "regime_name",
            ])
            .map_err(report_err)?;
        }
        for trade in ledger {
            let name = names.name(trade.regime);
            wtr.serialize(LedgerRow::new(trade, &name))
                .map_err(report_err)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_metrics(metrics: &Metrics, path: &Path) -> Result<(), RegimeTraderError> {
        let mut wtr = csv::Writer::from_path(path).map_err(report_err)?;
        wtr.write_record(["metric", "value"]).map_err(report_err)?;
        let rows = [
            ("total_return", metrics.total_return.to_string()),
            ("average_trade_return", metrics.average_trade_return.to_string()),
            ("win_rate", metrics.win_rate.to_string()),
            ("sharpe_ratio", metrics.sharpe_ratio.to_string()),
            ("max_drawdown", metrics.max_drawdown.to_string()),
            ("accuracy", metrics.accuracy.to_string()),
            ("trade_count", metrics.trade_count.to_string()),
        ];
        for (key, value) in &rows {
            wtr.write_record([*key, value.as_str()]).map_err(report_err)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn report_err(e: csv::Error) -> RegimeTraderError {
    RegimeTraderError::Report {
        reason: e.to_string(),
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        names: &RegimeNames,
        output_path: &str,
    ) -> Result<(), RegimeTraderError> {
        let path = Path::new(output_path);
        Self::write_ledger(&result.ledger, names, path)?;

        let metrics_path = Self::metrics_path(path);
        Self::write_metrics(&result.metrics, &metrics_path)?;

        info!(
            "Wrote {} trades to {} and metrics to {}",
            result.ledger.len(),
            path.display(),
            metrics_path.display()
        );
        Ok(())
    }
}
