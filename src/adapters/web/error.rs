//! HTTP error responses for the web adapter.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::domain::error::PortfolioError;

/// Body returned for any payload that fails validation: an absent or
/// unparsable allocation field, a missing or malformed `past_years`, or a
/// body that is not JSON at all. All of these answer 400 with this literal.
pub const REQUEST_ERROR_BODY: &str = "Error";

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<PortfolioError> for WebError {
    fn from(err: PortfolioError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if self.status == StatusCode::BAD_REQUEST {
            return (self.status, Json(REQUEST_ERROR_BODY)).into_response();
        }
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

pub fn status_from_error(err: &PortfolioError) -> StatusCode {
    match err {
        PortfolioError::MissingField { .. } | PortfolioError::InvalidField { .. } => {
            StatusCode::BAD_REQUEST
        }
        PortfolioError::Database { .. }
        | PortfolioError::DatabaseQuery { .. }
        | PortfolioError::ConfigParse { .. }
        | PortfolioError::ConfigMissing { .. }
        | PortfolioError::ConfigInvalid { .. }
        | PortfolioError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}
