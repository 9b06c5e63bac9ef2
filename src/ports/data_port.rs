//! Series data access port trait.

use crate::domain::error::RegimeTraderError;
use crate::domain::series::AlignedSeries;

/// Loads an aligned (date, price, regime) series from a named source.
pub trait SeriesPort {
    fn load_series(&self, source: &str) -> Result<AlignedSeries, RegimeTraderError>;
}
