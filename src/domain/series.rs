//! Series preparation: pivots raw price records into a date-indexed table.

use super::asset::{ASSET_COUNT, Asset, AssetVector};
use super::error::{PortfolioError, Result};
use super::price::PriceRecord;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// One row per date, one column per asset, dates strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    dates: Vec<NaiveDate>,
    rows: Vec<AssetVector>,
}

impl PriceSeries {
    /// Groups records by timestamp and pivots them into asset columns.
    ///
    /// Every date must carry exactly one valid price for each asset.
    pub fn from_records(records: &[PriceRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(PortfolioError::EmptySeries);
        }

        let mut table: BTreeMap<NaiveDate, [Option<f64>; ASSET_COUNT]> = BTreeMap::new();
        for record in records {
            if !record.is_valid() {
                return Err(PortfolioError::InvalidPrice {
                    timestamp: record.timestamp,
                    asset: record.asset,
                    price: record.price,
                });
            }
            let cell = &mut table.entry(record.timestamp).or_default()[record.asset.index()];
            if cell.is_some() {
                return Err(PortfolioError::DuplicatePrice {
                    timestamp: record.timestamp,
                    asset: record.asset,
                });
            }
            *cell = Some(record.price);
        }

        let mut dates = Vec::with_capacity(table.len());
        let mut rows = Vec::with_capacity(table.len());
        for (timestamp, cells) in table {
            let mut row = [0.0; ASSET_COUNT];
            for asset in Asset::ALL {
                row[asset.index()] = cells[asset.index()]
                    .ok_or(PortfolioError::IncompleteUniverse { timestamp, asset })?;
            }
            dates.push(timestamp);
            rows.push(row);
        }

        Ok(Self { dates, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rows(&self) -> &[AssetVector] {
        &self.rows
    }

    pub fn column(&self, asset: Asset) -> Vec<f64> {
        self.rows.iter().map(|row| row[asset.index()]).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}
