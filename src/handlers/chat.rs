//! Chat endpoint: validate the prompt, record the exchange, return the
//! assistant reply.

use crate::{
    error::AppError,
    models::conversation::{ChatRequest, ChatResponse},
    services::chat_service,
    state::AppState,
};
use axum::{Json, extract::State, http::HeaderMap};

/// Chat handler.
///
/// # Endpoint
///
/// `POST /chat`
///
/// # Authentication
///
/// Requires a valid API key within its rate-limit budget.
///
/// # Headers
///
/// - `X-Session-ID` (optional): conversation session, defaults to "default"
///
/// # Request Body
///
/// ```json
/// {
///   "prompt": "Hello?"
/// }
/// ```
///
/// # Responses
///
/// - **200**: `{from, session_id, response, result?}` — `result` is the raw
///   upstream payload and is absent for mock replies
/// - **400**: prompt empty after trimming, or over 2000 characters
/// - **401 / 429**: rejected by the request gate
/// - **500**: `{"error": "azure_call_failed", "detail": ...}` — the user
///   message is already persisted when this happens
pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let session_id = super::session_id(&headers);
    let prompt = chat_service::validate_prompt(&request.prompt)?;

    let response = chat_service::run_chat(
        &state.pool,
        state.completions.as_ref(),
        &session_id,
        &prompt,
    )
    .await?;

    Ok(Json(response))
}
