//! HTTP request handlers for the web adapter.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::domain::metrics::PerformanceSummary;
use crate::domain::pipeline;
use crate::domain::request::RawAnalysisRequest;

use super::{AppState, WebError};

pub async fn health() -> &'static str {
    "ok"
}

/// Computes the figures for a JSON allocation payload.
///
/// A body that is not JSON is treated like one with no fields.
pub async fn portfolio_figures(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PerformanceSummary>, WebError> {
    let raw: RawAnalysisRequest = serde_json::from_slice(&body).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "request body is not a valid payload");
        RawAnalysisRequest::default()
    });
    let request = raw.validate().map_err(|e| {
        tracing::warn!(error = %e, "rejected request");
        WebError::from(e)
    })?;

    let summary =
        pipeline::analyze(state.price_source.as_ref(), &request, state.as_of()).map_err(|e| {
            tracing::warn!(error = %e, "analysis failed");
            WebError::from(e)
        })?;

    Ok(Json(summary))
}

pub async fn not_found() -> Response {
    WebError::not_found("not found").into_response()
}
