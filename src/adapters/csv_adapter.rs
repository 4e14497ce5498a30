//! CSV file price source.
//!
//! Two layouts are understood, chosen by header:
//! - wide: `timestamp,btc,eth,gold` (one row per day, column order free)
//! - long: `timestamp,symbol,price` (one row per observation)
//!
//! An empty cell in a wide file produces no record, leaving the gap for
//! series preparation to report.

use crate::domain::asset::Asset;
use crate::domain::error::{PortfolioError, Result};
use crate::domain::price::PriceRecord;
use crate::ports::price_source::PriceSource;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    path: PathBuf,
}

enum Layout {
    Wide {
        timestamp: usize,
        columns: Vec<(usize, Asset)>,
    },
    Long {
        timestamp: usize,
        symbol: usize,
        price: usize,
    },
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Reads every record in the file.
    pub fn read_all(&self) -> Result<Vec<PriceRecord>> {
        let content = fs::read_to_string(&self.path).map_err(|e| PortfolioError::Database {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;
        parse_prices(&content)
    }
}

/// Parses CSV text in either supported layout.
pub fn parse_prices(content: &str) -> Result<Vec<PriceRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = rdr.headers().map_err(|e| PortfolioError::Database {
        reason: format!("CSV header error: {}", e),
    })?;
    let layout = detect_layout(headers)?;

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.map_err(|e| PortfolioError::Database {
            reason: format!("CSV parse error: {}", e),
        })?;

        match &layout {
            Layout::Wide { timestamp, columns } => {
                let ts = parse_date(row.get(*timestamp))?;
                for &(idx, asset) in columns {
                    let cell = row.get(idx).unwrap_or("");
                    if cell.is_empty() {
                        continue;
                    }
                    records.push(PriceRecord::new(asset, ts, parse_price(cell, asset)?));
                }
            }
            Layout::Long {
                timestamp,
                symbol,
                price,
            } => {
                let ts = parse_date(row.get(*timestamp))?;
                let asset: Asset = row
                    .get(*symbol)
                    .ok_or_else(|| PortfolioError::Database {
                        reason: "missing symbol column".into(),
                    })?
                    .parse()?;
                let cell = row.get(*price).ok_or_else(|| PortfolioError::Database {
                    reason: "missing price column".into(),
                })?;
                records.push(PriceRecord::new(asset, ts, parse_price(cell, asset)?));
            }
        }
    }

    Ok(records)
}

fn detect_layout(headers: &csv::StringRecord) -> Result<Layout> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let timestamp = find("timestamp")
        .or_else(|| find("date"))
        .ok_or_else(|| PortfolioError::Database {
            reason: "missing timestamp column".into(),
        })?;

    if let (Some(symbol), Some(price)) = (find("symbol"), find("price")) {
        return Ok(Layout::Long {
            timestamp,
            symbol,
            price,
        });
    }

    let columns: Vec<(usize, Asset)> = Asset::ALL
        .iter()
        .filter_map(|&asset| find(asset.symbol()).map(|idx| (idx, asset)))
        .collect();
    if columns.is_empty() {
        return Err(PortfolioError::Database {
            reason: "no btc, eth or gold columns".into(),
        });
    }

    Ok(Layout::Wide { timestamp, columns })
}

fn parse_date(value: Option<&str>) -> Result<NaiveDate> {
    let value = value.ok_or_else(|| PortfolioError::Database {
        reason: "missing timestamp value".into(),
    })?;
    // Store exports may carry a time part; only the calendar date matters.
    let date_part = value.split(['T', ' ']).next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| PortfolioError::Database {
        reason: format!("invalid date {:?}: {}", value, e),
    })
}

fn parse_price(value: &str, asset: Asset) -> Result<f64> {
    value.parse().map_err(|e| PortfolioError::Database {
        reason: format!("invalid {} price {:?}: {}", asset, value, e),
    })
}

impl PriceSource for CsvAdapter {
    fn fetch_prices(&self, start: NaiveDate) -> Result<Vec<PriceRecord>> {
        let mut records = self.read_all()?;
        records.retain(|r| r.timestamp >= start);
        tracing::debug!(path = %self.path.display(), %start, records = records.len(), "read CSV prices");
        Ok(records)
    }

    fn data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>> {
        let records = self.read_all()?;
        let min = records.iter().map(|r| r.timestamp).min();
        let max = records.iter().map(|r| r.timestamp).max();
        Ok(min.zip(max).map(|(min, max)| (min, max, records.len())))
    }
}
