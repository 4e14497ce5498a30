//! Raw price observations as delivered by a price source.

use super::asset::Asset;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub asset: Asset,
    pub timestamp: NaiveDate,
    pub price: f64,
}

impl PriceRecord {
    pub fn new(asset: Asset, timestamp: NaiveDate, price: f64) -> Self {
        Self {
            asset,
            timestamp,
            price,
        }
    }

    /// Prices must be finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}
