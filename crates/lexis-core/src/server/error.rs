//! JSON error responses for the HTTP API.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// An error rendered as `{"error": ...}` with a matching status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    MethodNotAllowed,
    /// The request was rejected before any remote call.
    BadRequest(&'static str),
    /// A remote call failed. `details` is included in the body when present.
    Internal {
        error: &'static str,
        details: Option<String>,
    },
}

impl ApiError {
    pub fn internal(error: &'static str) -> Self {
        Self::Internal {
            error,
            details: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::MethodNotAllowed => json!({ "error": "Method not allowed" }),
            Self::BadRequest(error) => json!({ "error": error }),
            Self::Internal {
                error,
                details: Some(details),
            } => json!({ "error": error, "details": details }),
            Self::Internal {
                error,
                details: None,
            } => json!({ "error": error }),
        };
        (status, Json(body)).into_response()
    }
}
