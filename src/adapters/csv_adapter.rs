//! CSV file series adapter.
//!
//! Expects a header row followed by `date,price,regime` records. Rows are
//! returned in file order; ordering is the producer's responsibility.

use crate::domain::error::RegimeTraderError;
use crate::domain::series::{AlignedSeries, SeriesPoint};
use crate::ports::data_port::SeriesPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

pub struct CsvSeriesAdapter {
    base_path: PathBuf,
    date_format: String,
}

impl CsvSeriesAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    fn csv_path(&self, source: &str) -> PathBuf {
        self.base_path.join(source)
    }

    /// Parse series records from CSV text. `source` only labels errors.
    pub fn parse(&self, source: &str, content: &str) -> Result<AlignedSeries, RegimeTraderError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut points = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let line = row + 2;
            let record = result
                .map_err(|e| RegimeTraderError::data(source, format!("CSV parse error: {e}")))?;

            let field = |idx: usize, name: &'static str| {
                record.get(idx).ok_or_else(|| {
                    RegimeTraderError::data(source, format!("line {line}: missing {name} column"))
                })
            };

            let date = NaiveDate::parse_from_str(field(0, "date")?, &self.date_format).map_err(
                |e| RegimeTraderError::data(source, format!("line {line}: invalid date: {e}")),
            )?;

            let price: f64 = field(1, "price")?.parse().map_err(|e| {
                RegimeTraderError::data(source, format!("line {line}: invalid price: {e}"))
            })?;
            if !price.is_finite() || price <= 0.0 {
                return Err(RegimeTraderError::data(
                    source,
                    format!("line {line}: price must be positive and finite, got {price}"),
                ));
            }

            let regime: i64 = field(2, "regime")?.parse().map_err(|e| {
                RegimeTraderError::data(source, format!("line {line}: invalid regime: {e}"))
            })?;

            points.push(SeriesPoint {
                date,
                price,
                regime,
            });
        }

        if points.is_empty() {
            return Err(RegimeTraderError::data(source, "no rows"));
        }

        debug!(source, rows = points.len(), "parsed series");
        AlignedSeries::from_points(points)
    }
}

impl SeriesPort for CsvSeriesAdapter {
    fn load_series(&self, source: &str) -> Result<AlignedSeries, RegimeTraderError> {
        let path = self.csv_path(source);
        let content = fs::read_to_string(&path).map_err(|e| {
            RegimeTraderError::data(source, format!("failed to read {}: {}", path.display(), e))
        })?;
        self.parse(source, &content)
    }
}
