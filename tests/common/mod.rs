#![allow(dead_code)]

use chrono::NaiveDate;
use portfolio_figures::domain::asset::Asset;
use portfolio_figures::domain::error::{PortfolioError, Result};
pub use portfolio_figures::domain::price::PriceRecord;
use portfolio_figures::ports::price_source::PriceSource;
use std::cell::Cell;
use std::sync::Mutex;

pub struct MockPriceSource {
    pub records: Vec<PriceRecord>,
    pub error: Option<String>,
    pub last_start: Mutex<Option<NaiveDate>>,
}

impl MockPriceSource {
    pub fn new(records: Vec<PriceRecord>) -> Self {
        Self {
            records,
            error: None,
            last_start: Mutex::new(None),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            records: Vec::new(),
            error: Some(reason.to_string()),
            last_start: Mutex::new(None),
        }
    }

    pub fn requested_start(&self) -> Option<NaiveDate> {
        *self.last_start.lock().unwrap()
    }
}

impl PriceSource for MockPriceSource {
    fn fetch_prices(&self, start: NaiveDate) -> Result<Vec<PriceRecord>> {
        *self.last_start.lock().unwrap() = Some(start);
        if let Some(reason) = &self.error {
            return Err(PortfolioError::Database {
                reason: reason.clone(),
            });
        }
        Ok(self
            .records
            .iter()
            .filter(|r| r.timestamp >= start)
            .cloned()
            .collect())
    }

    fn data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>> {
        let min = self.records.iter().map(|r| r.timestamp).min();
        let max = self.records.iter().map(|r| r.timestamp).max();
        Ok(min.zip(max).map(|(a, b)| (a, b, self.records.len())))
    }
}

/// Counts fetches, for checking a source is not consulted.
pub struct CountingSource {
    pub calls: Cell<usize>,
}

impl PriceSource for CountingSource {
    fn fetch_prices(&self, _start: NaiveDate) -> Result<Vec<PriceRecord>> {
        self.calls.set(self.calls.get() + 1);
        Ok(Vec::new())
    }

    fn data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>> {
        Ok(None)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily records starting at `start`, one entry per slice index.
pub fn daily_records(start: NaiveDate, btc: &[f64], eth: &[f64], gold: &[f64]) -> Vec<PriceRecord> {
    assert!(btc.len() == eth.len() && eth.len() == gold.len());
    let mut records = Vec::with_capacity(btc.len() * 3);
    for i in 0..btc.len() {
        let ts = start + chrono::Duration::days(i as i64);
        records.push(PriceRecord::new(Asset::Btc, ts, btc[i]));
        records.push(PriceRecord::new(Asset::Eth, ts, eth[i]));
        records.push(PriceRecord::new(Asset::Gold, ts, gold[i]));
    }
    records
}

/// Deterministic wiggly price path for `days` days.
pub fn synthetic_path(days: usize, base: f64, drift: f64, amplitude: f64, phase: f64) -> Vec<f64> {
    (0..days)
        .map(|i| {
            let t = i as f64;
            base * (1.0 + drift * t) * (1.0 + amplitude * (t * 0.7 + phase).sin())
        })
        .collect()
}

pub fn wide_csv(start: NaiveDate, btc: &[f64], eth: &[f64], gold: &[f64]) -> String {
    let mut out = String::from("timestamp,btc,eth,gold\n");
    for i in 0..btc.len() {
        let ts = start + chrono::Duration::days(i as i64);
        out.push_str(&format!("{},{},{},{}\n", ts.format("%Y-%m-%d"), btc[i], eth[i], gold[i]));
    }
    out
}
