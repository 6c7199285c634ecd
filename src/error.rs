//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and JSON error envelope.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Authentication Errors**: Missing, malformed, unknown, or inactive API keys
/// - **Rate Limiting**: Caller exhausted its sliding window
/// - **Validation Errors**: Invalid prompt
/// - **Upstream Errors**: The completion endpoint failed or timed out
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// API key is missing, malformed, unknown, or inactive.
    ///
    /// Returns HTTP 401 Unauthorized. A single variant covers every
    /// authentication failure so the response never reveals whether the
    /// header was malformed or the key simply unknown.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Caller exceeded its request budget for the current window.
    ///
    /// Returns HTTP 429 Too Many Requests. Carries the configured limits so
    /// the response body can tell the caller what budget applies.
    #[error("Rate limit exceeded")]
    RateLimited { limit: usize, window_secs: u64 },

    /// Prompt failed validation.
    ///
    /// Returns HTTP 400 Bad Request with the user-visible reason string.
    #[error("{0}")]
    Validation(String),

    /// The completion endpoint call failed (transport error, timeout, or
    /// non-success status).
    ///
    /// Returns HTTP 500 with the collaborator's error text for operator
    /// diagnosis. The process keeps serving.
    #[error("azure_call_failed: {0}")]
    Upstream(String),
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Status Code Mapping
///
/// - `Validation` → 400 `{"error": <reason>}`
/// - `InvalidApiKey` → 401 `{"error": "Invalid API key"}`
/// - `RateLimited` → 429 `{"error": "Rate limit exceeded", "details": ...}`
/// - `Upstream` → 500 `{"error": "azure_call_failed", "detail": ...}`
/// - `Database` → 500 `{"error": "internal_error"}` (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(reason) => (StatusCode::BAD_REQUEST, json!({ "error": reason })),
            AppError::InvalidApiKey => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Invalid API key" }),
            ),
            AppError::RateLimited { limit, window_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({
                    "error": "Rate limit exceeded",
                    "details": format!("Max {} requests per {} seconds", limit, window_secs),
                }),
            ),
            AppError::Upstream(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "azure_call_failed", "detail": detail }),
            ),
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal_error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
