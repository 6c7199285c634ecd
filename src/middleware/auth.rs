//! API key authentication and rate limiting middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the API key from the Authorization header
//! 2. Run it through the request gate (validation, then rate limiting)
//! 3. Reject unauthorized requests with HTTP 401, over-budget ones with 429
//!
//! Authentication runs before rate limiting, so a request with an invalid
//! key never consumes a rate-limit slot.

use crate::{error::AppError, services::gate::GateResult, state::AppState};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// API key gate middleware function.
///
/// # Headers
///
/// Expected header format:
/// ```
/// Authorization: Bearer abc123xyz
/// ```
///
/// A missing or malformed header and an unknown or inactive key all produce
/// the same generic 401; the response does not reveal which case applied.
///
/// # Returns
///
/// - `Ok(Response)` if admitted (calls next handler)
/// - `Err(AppError::InvalidApiKey)` on any authentication failure (401)
/// - `Err(AppError::RateLimited)` when the key is over budget (429)
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extract "Authorization: Bearer <api_key>"
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::InvalidApiKey)?;

    let api_key = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::InvalidApiKey)?;

    match state.gate.authorize(api_key).await {
        GateResult::Admitted => Ok(next.run(request).await),
        GateResult::Unauthenticated => Err(AppError::InvalidApiKey),
        GateResult::RateLimited { limit, window_secs } => {
            Err(AppError::RateLimited { limit, window_secs })
        }
    }
}
