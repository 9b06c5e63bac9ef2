//! Regime label configuration, display names and contiguous regime segments.

use super::series::AlignedSeries;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// How a label value is interpreted by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegimeKind {
    Bull,
    Bear,
    Neutral,
}

/// Which label values open a long, open a short, or open nothing.
///
/// `side` is carried for documentation and reporting. The scanner never reads it:
/// every label that is neither `bull` nor `bear` behaves as neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegimeLabels {
    pub bull: i64,
    pub bear: i64,
    pub side: i64,
}

impl Default for RegimeLabels {
    fn default() -> Self {
        Self {
            bull: 0,
            bear: 2,
            side: 1,
        }
    }
}

impl RegimeLabels {
    pub fn classify(&self, label: i64) -> RegimeKind {
        if label == self.bull {
            RegimeKind::Bull
        } else if label == self.bear {
            RegimeKind::Bear
        } else {
            RegimeKind::Neutral
        }
    }
}

/// Human-readable names for regime labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegimeNames {
    names: BTreeMap<i64, String>,
}

impl RegimeNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, label: i64, name: impl Into<String>) -> Self {
        self.names.insert(label, name.into());
        self
    }

    pub fn insert(&mut self, label: i64, name: impl Into<String>) {
        self.names.insert(label, name.into());
    }

    /// Configured name, or `Regime {label}` when none is set.
    pub fn name(&self, label: i64) -> String {
        self.names
            .get(&label)
            .cloned()
            .unwrap_or_else(|| format!("Regime {label}"))
    }
}

/// A maximal run of consecutive steps sharing one regime label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimeSegment {
    pub regime: i64,
    pub start_index: usize,
    pub end_index: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl RegimeSegment {
    pub fn len(&self) -> usize {
        self.end_index - self.start_index + 1
    }
}

/// Split the series into contiguous runs of the same label.
pub fn regime_segments(series: &AlignedSeries) -> Vec<RegimeSegment> {
    let mut segments: Vec<RegimeSegment> = Vec::new();

    for (i, point) in series.points().iter().enumerate() {
        match segments.last_mut() {
            Some(seg) if seg.regime == point.regime => {
                seg.end_index = i;
                seg.end_date = point.date;
            }
            _ => segments.push(RegimeSegment {
                regime: point.regime,
                start_index: i,
                end_index: i,
                start_date: point.date,
                end_date: point.date,
            }),
        }
    }

    segments
}
