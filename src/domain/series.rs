//! Aligned price/regime series: the engine's input contract.
//!
//! Ordering and gaps are the producer's responsibility; only lengths are checked here.

use super::error::RegimeTraderError;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub regime: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    points: Vec<SeriesPoint>,
}

impl AlignedSeries {
    pub fn new(
        dates: Vec<NaiveDate>,
        prices: Vec<f64>,
        regimes: Vec<i64>,
    ) -> Result<Self, RegimeTraderError> {
        if dates.is_empty() || dates.len() != prices.len() || prices.len() != regimes.len() {
            return Err(RegimeTraderError::InvalidInputLength {
                dates: dates.len(),
                prices: prices.len(),
                regimes: regimes.len(),
            });
        }

        let points = dates
            .into_iter()
            .zip(prices)
            .zip(regimes)
            .map(|((date, price), regime)| SeriesPoint {
                date,
                price,
                regime,
            })
            .collect();

        Ok(Self { points })
    }

    pub fn from_points(points: Vec<SeriesPoint>) -> Result<Self, RegimeTraderError> {
        if points.is_empty() {
            return Err(RegimeTraderError::InvalidInputLength {
                dates: 0,
                prices: 0,
                regimes: 0,
            });
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed series; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn regimes(&self) -> Vec<i64> {
        self.points.iter().map(|p| p.regime).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}
