//! Allocation weights and the aggregated portfolio return series.

use super::asset::{ASSET_COUNT, Asset, AssetVector};
use super::returns::ReturnSeries;
use chrono::NaiveDate;

const FULL_INVESTMENT_TOLERANCE: f64 = 1e-9;

/// Portfolio weights in [`Asset::ALL`] order.
///
/// Weights are used exactly as given. A set that does not sum to 1 describes a
/// leveraged or partly-invested hypothetical portfolio and is not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocationWeights {
    pub btc: f64,
    pub eth: f64,
    pub gold: f64,
}

impl AllocationWeights {
    pub fn new(btc: f64, eth: f64, gold: f64) -> Self {
        Self { btc, eth, gold }
    }

    pub fn weight(&self, asset: Asset) -> f64 {
        match asset {
            Asset::Btc => self.btc,
            Asset::Eth => self.eth,
            Asset::Gold => self.gold,
        }
    }

    pub fn as_vector(&self) -> AssetVector {
        let mut v = [0.0; ASSET_COUNT];
        for asset in Asset::ALL {
            v[asset.index()] = self.weight(asset);
        }
        v
    }

    pub fn sum(&self) -> f64 {
        self.btc + self.eth + self.gold
    }

    pub fn is_fully_invested(&self) -> bool {
        (self.sum() - 1.0).abs() < FULL_INVESTMENT_TOLERANCE
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSeries {
    pub dates: Vec<NaiveDate>,
    /// Weighted sum of asset returns per period.
    pub returns: Vec<f64>,
    /// Running product of (1 + return), starting from the first defined return.
    pub growth: Vec<f64>,
}

impl PortfolioSeries {
    pub fn aggregate(returns: &ReturnSeries, weights: &AllocationWeights) -> Self {
        if !weights.is_fully_invested() {
            tracing::warn!(
                sum = weights.sum(),
                "allocation weights do not sum to 1; using them as given"
            );
        }

        let w = weights.as_vector();
        let portfolio_returns: Vec<f64> = returns
            .rows()
            .iter()
            .map(|row| row.iter().zip(w.iter()).map(|(r, w)| r * w).sum::<f64>())
            .collect();

        let growth = portfolio_returns
            .iter()
            .scan(1.0_f64, |acc, r| {
                *acc *= 1.0 + r;
                Some(*acc)
            })
            .collect();

        Self {
            dates: returns.dates().to_vec(),
            returns: portfolio_returns,
            growth,
        }
    }

    pub fn len(&self) -> usize {
        self.returns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    pub fn final_growth(&self) -> Option<f64> {
        self.growth.last().copied()
    }
}
