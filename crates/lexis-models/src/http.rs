//! Shared HTTP helpers for the OpenAI-compatible clients.

use lexis_abstraction::ModelError;
use reqwest::{Response, StatusCode};
use tracing::error;

/// Default API root for OpenAI.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Maps a non-success HTTP status to the matching `ModelError` variant.
pub(crate) fn map_http_error(status: StatusCode, error_text: &str, operation: &str) -> ModelError {
    match status.as_u16() {
        400 => ModelError::RequestError(format!(
            "Invalid request for {}: {}",
            operation, error_text
        )),
        401 | 403 => ModelError::UnsupportedModelProvider(format!(
            "Authentication failed for {}: {}",
            operation, error_text
        )),
        402 | 429 => ModelError::QuotaExceeded {
            provider: "openai".to_string(),
            message: Some(format!("{} rejected: {}", operation, error_text)),
        },
        404 => ModelError::ModelResponseError(format!(
            "Not found for {}: {}",
            operation, error_text
        )),
        500..=599 => ModelError::RequestError(format!(
            "Server error for {} ({}): {}",
            operation, status, error_text
        )),
        _ => ModelError::RequestError(format!(
            "Unexpected error for {} ({}): {}",
            operation, status, error_text
        )),
    }
}

/// Returns the response if it succeeded, otherwise reads the body and maps the error.
pub(crate) async fn check_status(
    response: Response,
    operation: &str,
) -> Result<Response, ModelError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    error!(
        status = %status,
        error = %error_text,
        operation = operation,
        "OpenAI API returned error status"
    );
    Err(map_http_error(status, &error_text, operation))
}

/// Maps a transport failure (connect, timeout, TLS) into a `ModelError`.
pub(crate) fn network_error(err: &reqwest::Error, operation: &str) -> ModelError {
    error!(
        error = %err,
        operation = operation,
        "Failed to send request to OpenAI API"
    );
    ModelError::RequestError(format!("Network error during {}: {}", operation, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_http_error() {
        assert!(matches!(
            map_http_error(StatusCode::BAD_REQUEST, "bad", "chat completion"),
            ModelError::RequestError(_)
        ));
        assert!(matches!(
            map_http_error(StatusCode::UNAUTHORIZED, "no key", "chat completion"),
            ModelError::UnsupportedModelProvider(_)
        ));
        assert!(matches!(
            map_http_error(StatusCode::TOO_MANY_REQUESTS, "rate limit", "upload"),
            ModelError::QuotaExceeded { .. }
        ));
        assert!(matches!(
            map_http_error(StatusCode::PAYMENT_REQUIRED, "insufficient_quota", "upload"),
            ModelError::QuotaExceeded { .. }
        ));
        assert!(matches!(
            map_http_error(StatusCode::NOT_FOUND, "model does not exist", "chat completion"),
            ModelError::ModelResponseError(_)
        ));
        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream", "list jobs");
        assert!(err.to_string().contains("Server error for list jobs"));
    }
}
