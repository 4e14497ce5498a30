//! Performance metrics: return, risk and drawdown figures for a portfolio.

use super::error::{PortfolioError, Result};
use super::portfolio::{AllocationWeights, PortfolioSeries};
use super::returns::CovarianceMatrix;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Trailing window for the drawdown peak.
pub const DRAWDOWN_WINDOW: usize = 365;

/// Annualized variance at or below this magnitude is rounding noise and
/// counts as zero.
const VARIANCE_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub total_return: f64,
    pub annualized_return: f64,
    /// Annualized portfolio standard deviation.
    #[serde(rename = "risk")]
    pub volatility: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
}

impl PerformanceSummary {
    /// `years` is the lookback horizon used to annualize the total return.
    ///
    /// Fails on the first non-positive growth value and on any non-finite
    /// figure.
    pub fn compute(
        portfolio: &PortfolioSeries,
        covariance: &CovarianceMatrix,
        weights: &AllocationWeights,
        years: f64,
    ) -> Result<Self> {
        if let Some((&timestamp, &growth)) = portfolio
            .dates
            .iter()
            .zip(&portfolio.growth)
            .find(|(_, g)| **g <= 0.0)
        {
            return Err(PortfolioError::NonPositiveGrowth { timestamp, growth });
        }

        let total_return = total_return(&portfolio.growth)?;
        let annualized_return = annualized_return(total_return, years)?;
        let volatility = volatility(covariance, weights)?;
        let sharpe_ratio = sharpe_ratio(annualized_return, volatility)?;
        let max_drawdown = max_drawdown(&portfolio.growth, DRAWDOWN_WINDOW)?;

        let summary = Self {
            total_return,
            annualized_return,
            volatility,
            max_drawdown,
            sharpe_ratio,
        };
        summary.ensure_finite()?;
        Ok(summary)
    }

    fn ensure_finite(&self) -> Result<()> {
        let figures = [
            ("total_return", self.total_return),
            ("annualized_return", self.annualized_return),
            ("risk", self.volatility),
            ("max_drawdown", self.max_drawdown),
            ("sharpe_ratio", self.sharpe_ratio),
        ];
        match figures.iter().find(|(_, v)| !v.is_finite()) {
            Some(&(figure, _)) => Err(PortfolioError::NonFiniteFigure { figure }),
            None => Ok(()),
        }
    }
}

pub fn total_return(growth: &[f64]) -> Result<f64> {
    growth
        .last()
        .map(|g| g - 1.0)
        .ok_or(PortfolioError::EmptySeries)
}

/// (1 + total)^(1 / years) - 1
pub fn annualized_return(total_return: f64, years: f64) -> Result<f64> {
    if !years.is_finite() || years <= 0.0 {
        return Err(PortfolioError::InvalidHorizon { years });
    }
    Ok((1.0 + total_return).powf(1.0 / years) - 1.0)
}

/// sqrt(wᵀ Σ w) using the annualized covariance.
pub fn volatility(covariance: &CovarianceMatrix, weights: &AllocationWeights) -> Result<f64> {
    let variance = covariance.quadratic_form(&weights.as_vector());
    if variance.abs() <= VARIANCE_TOLERANCE {
        Ok(0.0)
    } else if variance > 0.0 {
        Ok(variance.sqrt())
    } else {
        Err(PortfolioError::IndefiniteCovariance { variance })
    }
}

/// Return over volatility with a zero risk-free rate. Zero volatility is an
/// error rather than an infinite ratio.
pub fn sharpe_ratio(annualized_return: f64, volatility: f64) -> Result<f64> {
    if volatility == 0.0 {
        return Err(PortfolioError::ZeroVolatility);
    }
    Ok(annualized_return / volatility)
}

/// Trailing maximum over at most `window` points, using whatever history
/// exists for the first `window - 1` points.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut candidates: VecDeque<usize> = VecDeque::new();
    let mut out = Vec::with_capacity(values.len());

    for (i, &v) in values.iter().enumerate() {
        while candidates.back().is_some_and(|&j| values[j] <= v) {
            candidates.pop_back();
        }
        candidates.push_back(i);
        while candidates.front().is_some_and(|&j| j + window <= i) {
            candidates.pop_front();
        }
        if let Some(&j) = candidates.front() {
            out.push(values[j]);
        }
    }

    out
}

/// growth / trailing peak - 1, never positive while growth stays positive.
pub fn drawdown_series(growth: &[f64], window: usize) -> Vec<f64> {
    growth
        .iter()
        .zip(rolling_max(growth, window))
        .map(|(g, peak)| g / peak - 1.0)
        .collect()
}

/// Most negative value of the drawdown series.
pub fn max_drawdown(growth: &[f64], window: usize) -> Result<f64> {
    drawdown_series(growth, window)
        .into_iter()
        .reduce(f64::min)
        .ok_or(PortfolioError::EmptySeries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn total_return_from_growth() {
        assert_relative_eq!(total_return(&[1.1, 1.21]).unwrap(), 0.21, epsilon = 1e-12);
        assert_relative_eq!(total_return(&[0.9]).unwrap(), -0.1, epsilon = 1e-12);
    }

    #[test]
    fn total_return_of_empty_growth_fails() {
        assert!(matches!(total_return(&[]), Err(PortfolioError::EmptySeries)));
    }

    #[test]
    fn annualized_return_over_one_year_is_total() {
        assert_relative_eq!(annualized_return(0.21, 1.0).unwrap(), 0.21, epsilon = 1e-12);
    }

    #[test]
    fn annualized_return_over_two_years() {
        assert_relative_eq!(annualized_return(0.21, 2.0).unwrap(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn annualized_return_rejects_non_positive_horizon() {
        assert!(matches!(
            annualized_return(0.21, 0.0),
            Err(PortfolioError::InvalidHorizon { .. })
        ));
        assert!(matches!(
            annualized_return(0.21, -1.0),
            Err(PortfolioError::InvalidHorizon { .. })
        ));
        assert!(matches!(
            annualized_return(0.21, f64::NAN),
            Err(PortfolioError::InvalidHorizon { .. })
        ));
    }

    #[test]
    fn volatility_is_root_of_quadratic_form() {
        let cov = CovarianceMatrix::from_array([[0.04, 0.0, 0.0], [0.0, 0.09, 0.0], [0.0, 0.0, 0.01]]);
        let vol = volatility(&cov, &AllocationWeights::new(1.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(vol, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn volatility_clamps_tiny_negative_variance() {
        let cov = CovarianceMatrix::from_array([[-1e-15, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]]);
        assert_eq!(volatility(&cov, &AllocationWeights::new(1.0, 0.0, 0.0)).unwrap(), 0.0);
    }

    #[test]
    fn volatility_treats_rounding_noise_as_zero() {
        let cov = CovarianceMatrix::from_array([[6e-30, 0.0, 0.0], [0.0, 0.04, 0.0], [0.0, 0.0, 0.01]]);
        assert_eq!(volatility(&cov, &AllocationWeights::new(1.0, 0.0, 0.0)).unwrap(), 0.0);
    }

    #[test]
    fn volatility_rejects_indefinite_matrix() {
        let cov = CovarianceMatrix::from_array([[1.0, 2.0, 0.0], [2.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let err = volatility(&cov, &AllocationWeights::new(1.0, -1.0, 0.0)).unwrap_err();
        assert!(matches!(err, PortfolioError::IndefiniteCovariance { .. }));
    }

    #[test]
    fn sharpe_ratio_divides_by_volatility() {
        assert_relative_eq!(sharpe_ratio(0.3, 0.6).unwrap(), 0.5);
    }

    #[test]
    fn sharpe_ratio_with_zero_volatility_fails() {
        assert!(matches!(sharpe_ratio(0.21, 0.0), Err(PortfolioError::ZeroVolatility)));
    }

    #[test]
    fn rolling_max_uses_partial_windows() {
        let values = [1.0, 3.0, 2.0, 1.0, 0.5];
        assert_eq!(rolling_max(&values, 2), vec![1.0, 3.0, 3.0, 2.0, 1.0]);
        assert_eq!(rolling_max(&values, 10), vec![1.0, 3.0, 3.0, 3.0, 3.0]);
    }

    #[test]
    fn rolling_max_of_window_one_is_identity() {
        let values = [2.0, 1.0, 4.0];
        assert_eq!(rolling_max(&values, 1), values.to_vec());
    }

    #[test]
    fn max_drawdown_peak_to_trough() {
        let growth = [1.0, 1.1, 0.9, 0.95, 0.8, 1.0];
        let dd = max_drawdown(&growth, DRAWDOWN_WINDOW).unwrap();
        assert_relative_eq!(dd, 0.8 / 1.1 - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn max_drawdown_forgets_peaks_outside_window() {
        // Peak of 2.0 drops out of a 3-point window before the trough.
        let growth = [2.0, 1.0, 1.0, 1.0, 0.9];
        let dd = max_drawdown(&growth, 3).unwrap();
        assert_relative_eq!(dd, -0.5, epsilon = 1e-12);

        let late = drawdown_series(&growth, 3);
        assert_relative_eq!(late[4], -0.1, epsilon = 1e-12);
    }

    #[test]
    fn drawdown_is_zero_at_new_highs() {
        let growth = [1.0, 1.2, 1.1, 1.3];
        let dd = drawdown_series(&growth, DRAWDOWN_WINDOW);
        assert_eq!(dd[0], 0.0);
        assert_eq!(dd[1], 0.0);
        assert!(dd[2] < 0.0);
        assert_eq!(dd[3], 0.0);
    }

    #[test]
    fn monotonic_growth_has_no_drawdown() {
        assert_eq!(max_drawdown(&[1.1, 1.21], DRAWDOWN_WINDOW).unwrap(), 0.0);
    }

    fn portfolio(growth: &[f64]) -> PortfolioSeries {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let mut prev = 1.0;
        let mut returns = Vec::new();
        for g in growth {
            returns.push(g / prev - 1.0);
            prev = *g;
        }
        PortfolioSeries {
            dates: (0..growth.len())
                .map(|i| start + chrono::Duration::days(i as i64))
                .collect(),
            returns,
            growth: growth.to_vec(),
        }
    }

    fn diagonal_covariance() -> CovarianceMatrix {
        CovarianceMatrix::from_array([[0.04, 0.0, 0.0], [0.0, 0.09, 0.0], [0.0, 0.0, 0.01]])
    }

    #[test]
    fn summary_rejects_wiped_out_portfolio() {
        let weights = AllocationWeights::new(3.0, 0.0, 0.0);
        let err = PerformanceSummary::compute(
            &portfolio(&[1.2, -0.5, -0.65]),
            &diagonal_covariance(),
            &weights,
            2.0,
        )
        .unwrap_err();

        match err {
            PortfolioError::NonPositiveGrowth { timestamp, growth } => {
                assert_eq!(timestamp, chrono::NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
                assert_eq!(growth, -0.5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn summary_rejects_growth_of_exactly_zero() {
        let err = PerformanceSummary::compute(
            &portfolio(&[0.0, 0.0]),
            &diagonal_covariance(),
            &AllocationWeights::new(2.0, 0.0, 0.0),
            1.0,
        )
        .unwrap_err();
        assert!(matches!(err, PortfolioError::NonPositiveGrowth { growth, .. } if growth == 0.0));
    }

    #[test]
    fn summary_rejects_overflowing_annualization() {
        let err = PerformanceSummary::compute(
            &portfolio(&[3.0, 10.0]),
            &diagonal_covariance(),
            &AllocationWeights::new(1.0, 0.0, 0.0),
            1e-3,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PortfolioError::NonFiniteFigure {
                figure: "annualized_return"
            }
        ));
    }

    #[test]
    fn summary_serializes_with_risk_key() {
        let summary = PerformanceSummary {
            total_return: 0.5,
            annualized_return: 0.25,
            volatility: 0.5,
            max_drawdown: -0.1,
            sharpe_ratio: 0.5,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["risk"], 0.5);
        assert_eq!(json["max_drawdown"], -0.1);
        assert!(json.get("volatility").is_none());
    }
}
