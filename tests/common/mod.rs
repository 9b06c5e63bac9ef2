#![allow(dead_code)]

use chrono::NaiveDate;
use regimetrader::domain::error::RegimeTraderError;
use regimetrader::domain::regime::RegimeLabels;
use regimetrader::domain::series::AlignedSeries;
use regimetrader::ports::data_port::SeriesPort;
use std::collections::HashMap;

pub struct MockSeriesPort {
    pub data: HashMap<String, AlignedSeries>,
    pub errors: HashMap<String, String>,
}

impl MockSeriesPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, source: &str, series: AlignedSeries) -> Self {
        self.data.insert(source.to_string(), series);
        self
    }

    pub fn with_error(mut self, source: &str, reason: &str) -> Self {
        self.errors.insert(source.to_string(), reason.to_string());
        self
    }
}

impl SeriesPort for MockSeriesPort {
    fn load_series(&self, source: &str) -> Result<AlignedSeries, RegimeTraderError> {
        if let Some(reason) = self.errors.get(source) {
            return Err(RegimeTraderError::Data {
                source_name: source.to_string(),
                reason: reason.clone(),
            });
        }
        self.data
            .get(source)
            .cloned()
            .ok_or_else(|| RegimeTraderError::Data {
                source_name: source.to_string(),
                reason: "not found".into(),
            })
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn daily_dates(count: usize) -> Vec<NaiveDate> {
    let start = date(2024, 1, 1);
    (0..count)
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect()
}

pub fn make_series(prices: &[f64], regimes: &[i64]) -> AlignedSeries {
    AlignedSeries::new(daily_dates(prices.len()), prices.to_vec(), regimes.to_vec()).unwrap()
}

pub fn labels() -> RegimeLabels {
    RegimeLabels {
        bull: 0,
        bear: 2,
        side: 1,
    }
}

pub fn series_csv(prices: &[f64], regimes: &[i64]) -> String {
    let mut out = String::from("date,price,regime\n");
    for ((d, p), r) in daily_dates(prices.len()).iter().zip(prices).zip(regimes) {
        out.push_str(&format!("{},{},{}\n", d.format("%Y-%m-%d"), p, r));
    }
    out
}
