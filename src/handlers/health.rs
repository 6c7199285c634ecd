//! Health check endpoint for service monitoring.

use crate::state::AppState;
use axum::{Json, extract::State};
use serde::Serialize;

/// Health check response.
///
/// Reports service status and the completion deployment mode.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Whether the mock provider was forced via LOCAL_MODE
    pub local_mode: bool,

    /// Whether all three Azure variables were present at startup
    pub azure_configured: bool,
}

/// Health check handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "ok",
///   "local_mode": false,
///   "azure_configured": true
/// }
/// ```
///
/// No authentication required.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        local_mode: state.local_mode,
        azure_configured: state.azure_configured,
    })
}
