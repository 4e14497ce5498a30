//! Runs the four analytics stages in order.

use super::error::Result;
use super::metrics::PerformanceSummary;
use super::portfolio::{AllocationWeights, PortfolioSeries};
use super::price::PriceRecord;
use super::request::AnalysisRequest;
use super::returns;
use super::series::PriceSeries;
use crate::ports::price_source::PriceSource;
use chrono::NaiveDate;

/// Fetches the lookback window ending at `as_of` and computes its summary.
pub fn analyze(
    source: &dyn PriceSource,
    request: &AnalysisRequest,
    as_of: NaiveDate,
) -> Result<PerformanceSummary> {
    let start = request.lookback_start(as_of)?;
    tracing::debug!(%start, %as_of, past_years = request.past_years, "fetching price history");

    let records = source.fetch_prices(start)?;
    tracing::debug!(records = records.len(), "price history fetched");

    run_pipeline(&records, &request.weights, f64::from(request.past_years))
}

/// Pure pipeline over already-materialized records.
pub fn run_pipeline(
    records: &[PriceRecord],
    weights: &AllocationWeights,
    years: f64,
) -> Result<PerformanceSummary> {
    let prices = PriceSeries::from_records(records)?;
    tracing::debug!(
        rows = prices.len(),
        first = ?prices.first_date(),
        last = ?prices.last_date(),
        "price series prepared"
    );

    let (returns, covariance) = returns::estimate(&prices)?;
    tracing::debug!(observations = returns.len(), "returns and covariance estimated");

    let portfolio = PortfolioSeries::aggregate(&returns, weights);
    let summary = PerformanceSummary::compute(&portfolio, &covariance, weights, years)?;

    tracing::info!(
        total_return = summary.total_return,
        annualized_return = summary.annualized_return,
        risk = summary.volatility,
        sharpe_ratio = summary.sharpe_ratio,
        max_drawdown = summary.max_drawdown,
        "portfolio figures computed"
    );
    Ok(summary)
}
