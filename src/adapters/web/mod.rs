//! HTTP adapter.
//!
//! Exposes the analytics pipeline as a JSON endpoint taking the allocation
//! payload and returning the performance summary.

mod error;
mod handlers;

pub use error::{status_from_error, WebError};
pub use handlers::*;

use axum::{
    Router,
    routing::{get, post},
};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::ports::price_source::PriceSource;

pub struct AppState {
    pub price_source: Arc<dyn PriceSource + Send + Sync>,
    /// Fixed end of the lookback window; today's local date when `None`.
    pub as_of: Option<NaiveDate>,
}

impl AppState {
    pub fn new(price_source: Arc<dyn PriceSource + Send + Sync>) -> Self {
        Self {
            price_source,
            as_of: None,
        }
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/portfolio-figures", post(handlers::portfolio_figures))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}
