//! Report generation port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::RegimeTraderError;
use crate::domain::regime::RegimeNames;

/// Port for persisting backtest results.
pub trait ReportPort {
    fn write(
        &self,
        result: &BacktestResult,
        names: &RegimeNames,
        output_path: &str,
    ) -> Result<(), RegimeTraderError>;
}
