//! Position state held during a scan, and the closed trades it produces.

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Fractional return of one unit held from `entry_price` to `exit_price`.
    pub fn pnl(self, entry_price: f64, exit_price: f64) -> f64 {
        match self {
            Direction::Long => (exit_price - entry_price) / entry_price,
            Direction::Short => (entry_price - exit_price) / entry_price,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenPosition {
    pub entry_price: f64,
    pub entry_date: NaiveDate,
    pub entry_index: usize,
    pub entry_regime: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    Long(OpenPosition),
    Short(OpenPosition),
}

impl PositionState {
    pub fn open(&self) -> Option<(Direction, &OpenPosition)> {
        match self {
            PositionState::Flat => None,
            PositionState::Long(pos) => Some((Direction::Long, pos)),
            PositionState::Short(pos) => Some((Direction::Short, pos)),
        }
    }

    /// Build the trade that closing this position at `exit_price` would realize.
    pub fn close(&self, exit_price: f64, exit_date: NaiveDate, exit_index: usize) -> Option<Trade> {
        let (direction, pos) = self.open()?;
        Some(Trade {
            entry_date: pos.entry_date,
            exit_date,
            entry_index: pos.entry_index,
            exit_index,
            direction,
            entry_price: pos.entry_price,
            exit_price,
            pnl: direction.pnl(pos.entry_price, exit_price),
            regime: pos.entry_regime,
        })
    }
}

/// One completed entry/exit cycle. `pnl` is a fractional return, not currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_index: usize,
    pub exit_index: usize,
    pub direction: Direction,
    pub entry_price: f64,
    pub exit_price: f64,
    pub pnl: f64,
    pub regime: i64,
}
