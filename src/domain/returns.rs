//! Daily returns and the annualized covariance matrix.

use super::asset::{ASSET_COUNT, Asset, AssetVector};
use super::error::{PortfolioError, Result};
use super::series::PriceSeries;
use chrono::NaiveDate;

/// Crypto and gold trade every calendar day.
pub const PERIODS_PER_YEAR: f64 = 365.0;

/// Sample covariance needs at least two observations.
pub const MIN_RETURN_OBSERVATIONS: usize = 2;

/// Period-over-period simple returns. The undefined first period is not
/// stored, so `len()` is one less than the source series.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    dates: Vec<NaiveDate>,
    rows: Vec<AssetVector>,
}

impl ReturnSeries {
    pub fn from_prices(prices: &PriceSeries) -> Self {
        let rows = prices
            .rows()
            .windows(2)
            .map(|w| {
                let mut row = [0.0; ASSET_COUNT];
                for i in 0..ASSET_COUNT {
                    row[i] = w[1][i] / w[0][i] - 1.0;
                }
                row
            })
            .collect();
        let dates = prices.dates().iter().skip(1).copied().collect();
        Self { dates, rows }
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

    pub fn mean(&self) -> AssetVector {
        let mut mean = [0.0; ASSET_COUNT];
        if self.rows.is_empty() {
            return mean;
        }
        for row in &self.rows {
            for i in 0..ASSET_COUNT {
                mean[i] += row[i];
            }
        }
        let n = self.rows.len() as f64;
        mean.map(|m| m / n)
    }
}

/// Symmetric 3x3 covariance over [`Asset::ALL`], annualized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CovarianceMatrix([[f64; ASSET_COUNT]; ASSET_COUNT]);

impl CovarianceMatrix {
    /// Sample covariance (n - 1 denominator) scaled by [`PERIODS_PER_YEAR`].
    pub fn estimate(returns: &ReturnSeries) -> Result<Self> {
        let n = returns.len();
        if n < MIN_RETURN_OBSERVATIONS {
            return Err(PortfolioError::InsufficientHistory {
                observations: n,
                minimum: MIN_RETURN_OBSERVATIONS,
            });
        }

        let mean = returns.mean();
        let mut cov = [[0.0; ASSET_COUNT]; ASSET_COUNT];
        for row in returns.rows() {
            for i in 0..ASSET_COUNT {
                for j in i..ASSET_COUNT {
                    cov[i][j] += (row[i] - mean[i]) * (row[j] - mean[j]);
                }
            }
        }

        let scale = PERIODS_PER_YEAR / (n - 1) as f64;
        for i in 0..ASSET_COUNT {
            for j in i..ASSET_COUNT {
                cov[i][j] *= scale;
                cov[j][i] = cov[i][j];
            }
        }

        Ok(Self(cov))
    }

    pub fn from_array(values: [[f64; ASSET_COUNT]; ASSET_COUNT]) -> Self {
        Self(values)
    }

    pub fn get(&self, a: Asset, b: Asset) -> f64 {
        self.0[a.index()][b.index()]
    }

    pub fn as_array(&self) -> &[[f64; ASSET_COUNT]; ASSET_COUNT] {
        &self.0
    }

    /// wᵀ Σ w
    pub fn quadratic_form(&self, weights: &AssetVector) -> f64 {
        let mut total = 0.0;
        for i in 0..ASSET_COUNT {
            for j in 0..ASSET_COUNT {
                total += weights[i] * self.0[i][j] * weights[j];
            }
        }
        total
    }
}

/// Runs the estimator over a prepared price series.
pub fn estimate(prices: &PriceSeries) -> Result<(ReturnSeries, CovarianceMatrix)> {
    let returns = ReturnSeries::from_prices(prices);
    let covariance = CovarianceMatrix::estimate(&returns)?;
    Ok((returns, covariance))
}
