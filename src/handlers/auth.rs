//! API key generation endpoint.

use crate::{error::AppError, state::AppState};
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

/// Response carrying a freshly minted key.
///
/// The raw key appears here and nowhere else; only its salted hash is
/// stored.
#[derive(Debug, Serialize)]
pub struct GeneratedKeyResponse {
    pub api_key: String,
    pub message: String,
    pub usage: String,
}

/// Generate a new API key.
///
/// # Endpoint
///
/// `POST /auth/generate-key` — no authentication required.
///
/// # Response (201 Created)
///
/// ```json
/// {
///   "api_key": "dGhpcyBpcyBub3QgYSByZWFsIGtleQ",
///   "message": "Store this key securely. Use it in Authorization header.",
///   "usage": "Authorization: Bearer <api_key>"
/// }
/// ```
///
/// # Errors
///
/// - **500**: the key could not be persisted (the raw key is not returned)
pub async fn generate_key(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<GeneratedKeyResponse>), AppError> {
    let api_key = state.gate.validator().mint_key().await?;

    Ok((
        StatusCode::CREATED,
        Json(GeneratedKeyResponse {
            api_key,
            message: "Store this key securely. Use it in Authorization header.".to_string(),
            usage: "Authorization: Bearer <api_key>".to_string(),
        }),
    ))
}
