//! Price history port.

use crate::domain::error::Result;
use crate::domain::price::PriceRecord;
use chrono::NaiveDate;

pub trait PriceSource {
    /// All records with a timestamp on or after `start`, in any order.
    fn fetch_prices(&self, start: NaiveDate) -> Result<Vec<PriceRecord>>;

    /// First date, last date and record count, or `None` when the source is empty.
    fn data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>>;
}
