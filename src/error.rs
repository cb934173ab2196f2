use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::llm::CompletionError;

/// Failures of the explain endpoint, each mapped to one status code.
#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("Method not allowed")]
    InvalidMethod,

    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    UpstreamFailure(#[from] CompletionError),

    /// Recovered inside the service into a degraded response, so it never
    /// reaches a client; the status only matters for logging.
    #[error("{0}")]
    UpstreamMalformedResponse(String),
}

impl ExplainError {
    pub fn status(&self) -> StatusCode {
        match self {
            ExplainError::InvalidMethod => StatusCode::METHOD_NOT_ALLOWED,
            ExplainError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ExplainError::UpstreamFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ExplainError::UpstreamMalformedResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// JSON error payload shared by every non-200 response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ExplainError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
