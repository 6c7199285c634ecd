//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, headers)
//! 2. Delegates to services (validation, persistence, completion)
//! 3. Returns HTTP response (JSON, status code)

use axum::http::HeaderMap;

/// Key generation endpoint
pub mod auth;
/// Chat endpoint
pub mod chat;
/// Health check endpoint
pub mod health;
/// Conversation history endpoint
pub mod history;

/// Header carrying the caller-chosen session identifier.
pub const SESSION_HEADER: &str = "X-Session-ID";

/// Session used when the header is absent. Callers omitting the header share
/// this session; session identity is not scoped to the API key.
pub const DEFAULT_SESSION: &str = "default";

/// Resolve the session id for a request: the header value verbatim, or the
/// shared default.
pub(crate) fn session_id(headers: &HeaderMap) -> String {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(DEFAULT_SESSION)
        .to_string()
}
