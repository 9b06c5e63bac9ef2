//! Regime transition scanner.
//!
//! Walks the aligned series once, from index 1, holding a direction while the
//! regime that opened it persists:
//!
//! - Flat: a bull label opens a long, a bear label opens a short, anything else waits.
//! - Open: any label other than the entry regime closes the position at that step's
//!   price. No re-entry is evaluated on the closing step.
//! - A position still open at the last step is dropped without producing a trade.

use super::error::RegimeTraderError;
use super::position::{OpenPosition, PositionState, Trade};
use super::regime::{RegimeKind, RegimeLabels};
use super::series::{AlignedSeries, SeriesPoint};
use chrono::NaiveDate;
use tracing::{debug, trace};

pub fn scan(series: &AlignedSeries, labels: &RegimeLabels) -> Vec<Trade> {
    let points = series.points();
    let mut ledger = Vec::new();
    let mut state = PositionState::Flat;

    for (i, point) in points.iter().enumerate().skip(1) {
        state = step(state, i, point, labels, &mut ledger);
    }

    if let Some((direction, pos)) = state.open() {
        debug!(
            %direction,
            entry_index = pos.entry_index,
            entry_price = pos.entry_price,
            "discarding position still open at end of series"
        );
    }

    ledger
}

/// Slice-level entry point for callers holding separate columns.
pub fn scan_slices(
    dates: &[NaiveDate],
    prices: &[f64],
    regimes: &[i64],
    labels: &RegimeLabels,
) -> Result<Vec<Trade>, RegimeTraderError> {
    let series = AlignedSeries::new(dates.to_vec(), prices.to_vec(), regimes.to_vec())?;
    Ok(scan(&series, labels))
}

fn step(
    state: PositionState,
    index: usize,
    point: &SeriesPoint,
    labels: &RegimeLabels,
    ledger: &mut Vec<Trade>,
) -> PositionState {
    let open = OpenPosition {
        entry_price: point.price,
        entry_date: point.date,
        entry_index: index,
        entry_regime: point.regime,
    };

    match state {
        PositionState::Flat => match labels.classify(point.regime) {
            RegimeKind::Bull => {
                trace!(index, price = point.price, "open long");
                PositionState::Long(open)
            }
            RegimeKind::Bear => {
                trace!(index, price = point.price, "open short");
                PositionState::Short(open)
            }
            RegimeKind::Neutral => PositionState::Flat,
        },
        PositionState::Long(pos) | PositionState::Short(pos)
            if point.regime != pos.entry_regime =>
        {
            if let Some(trade) = state.close(point.price, point.date, index) {
                trace!(index, pnl = trade.pnl, "close {}", trade.direction);
                ledger.push(trade);
            }
            PositionState::Flat
        }
        held => held,
    }
}
