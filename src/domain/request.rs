//! Validated analysis request and the loosely-typed payload it is built from.

use super::error::{PortfolioError, Result};
use super::portfolio::AllocationWeights;
use chrono::{Months, NaiveDate};
use serde::Deserialize;

/// Trusted pipeline input, constructed once at the boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisRequest {
    pub weights: AllocationWeights,
    pub past_years: u32,
}

impl AnalysisRequest {
    pub fn new(weights: AllocationWeights, past_years: u32) -> Result<Self> {
        if past_years == 0 {
            return Err(PortfolioError::InvalidHorizon { years: 0.0 });
        }
        for (field, value) in [
            ("btc_allocation", weights.btc),
            ("eth_allocation", weights.eth),
            ("gold_allocation", weights.gold),
        ] {
            if !value.is_finite() {
                return Err(PortfolioError::InvalidField {
                    field: field.into(),
                    reason: format!("{value} is not a finite number"),
                });
            }
        }
        Ok(Self {
            weights,
            past_years,
        })
    }

    /// First date of the lookback window ending at `as_of`.
    pub fn lookback_start(&self, as_of: NaiveDate) -> Result<NaiveDate> {
        lookback_start(as_of, self.past_years)
    }
}

/// Same calendar day `past_years` years before `as_of`; Feb 29 falls back to Feb 28.
pub fn lookback_start(as_of: NaiveDate, past_years: u32) -> Result<NaiveDate> {
    past_years
        .checked_mul(12)
        .and_then(|months| as_of.checked_sub_months(Months::new(months)))
        .ok_or_else(|| PortfolioError::InvalidField {
            field: "past_years".into(),
            reason: format!("{past_years} years before {as_of} is out of range"),
        })
}

/// A numeric field that may arrive as a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Number(f64),
    Text(String),
}

impl NumericField {
    fn as_f64(&self, field: &str) -> Result<f64> {
        match self {
            NumericField::Number(n) => Ok(*n),
            NumericField::Text(s) => s.trim().parse().map_err(|_| PortfolioError::InvalidField {
                field: field.into(),
                reason: format!("{s:?} is not a number"),
            }),
        }
    }

    fn as_years(&self, field: &str) -> Result<u32> {
        let value = self.as_f64(field)?;
        if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
            return Err(PortfolioError::InvalidField {
                field: field.into(),
                reason: format!("{value} is not a whole number of years"),
            });
        }
        // Fractional years truncate toward zero.
        Ok(value.trunc() as u32)
    }
}

/// Request payload as received over the wire.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAnalysisRequest {
    pub btc_allocation: Option<NumericField>,
    pub eth_allocation: Option<NumericField>,
    pub gold_allocation: Option<NumericField>,
    pub past_years: Option<NumericField>,
}

impl RawAnalysisRequest {
    pub fn validate(&self) -> Result<AnalysisRequest> {
        let btc = required(&self.btc_allocation, "btc_allocation")?.as_f64("btc_allocation")?;
        let eth = required(&self.eth_allocation, "eth_allocation")?.as_f64("eth_allocation")?;
        let gold = required(&self.gold_allocation, "gold_allocation")?.as_f64("gold_allocation")?;
        let past_years = required(&self.past_years, "past_years")?.as_years("past_years")?;
        AnalysisRequest::new(AllocationWeights::new(btc, eth, gold), past_years)
    }
}

fn required<'a>(value: &'a Option<NumericField>, field: &str) -> Result<&'a NumericField> {
    value.as_ref().ok_or_else(|| PortfolioError::MissingField {
        field: field.into(),
    })
}
