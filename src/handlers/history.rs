//! Conversation history endpoint.

use crate::{
    models::conversation::HistoryResponse, services::conversation_service, state::AppState,
};
use axum::{Json, extract::State, http::HeaderMap};

/// History handler.
///
/// # Endpoint
///
/// `GET /history`
///
/// # Authentication
///
/// Requires a valid API key within its rate-limit budget. Note that the
/// session itself is not bound to the key: any authenticated caller may read
/// any session id it supplies.
///
/// # Headers
///
/// - `X-Session-ID` (optional): conversation session, defaults to "default"
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "session_id": "default",
///   "history": [
///     { "role": "user", "content": "Hello?", "timestamp": "2026-08-07T10:00:00Z" }
///   ],
///   "total_messages": 1
/// }
/// ```
///
/// History is oldest-first and capped at 50 entries server-side. A storage
/// failure yields an empty history rather than an error.
pub async fn get_history(State(state): State<AppState>, headers: HeaderMap) -> Json<HistoryResponse> {
    let session_id = super::session_id(&headers);

    let history = conversation_service::fetch_history(&state.pool, &session_id).await;
    let total_messages = history.len();

    Json(HistoryResponse {
        session_id,
        history,
        total_messages,
    })
}
