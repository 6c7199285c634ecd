//! Conversation data models and API request/response types.
//!
//! This module defines:
//! - `ChatRequest`: Request body for POST /chat
//! - `ChatResponse`: Response body returned after a completion
//! - `HistoryEntry` / `HistoryResponse`: Persistent history read types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request body for the chat endpoint.
///
/// # JSON Example
///
/// ```json
/// {
///   "prompt": "Explain managed identities in one paragraph."
/// }
/// ```
///
/// A missing `prompt` field is treated as an empty prompt and rejected by
/// validation rather than by deserialization.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub prompt: String,
}

/// Response returned for a successful chat completion.
///
/// # JSON Example
///
/// ```json
/// {
///   "from": "azure",
///   "session_id": "default",
///   "response": "Managed identities are...",
///   "result": { "choices": [ ... ] }
/// }
/// ```
///
/// `result` carries the raw upstream payload and is omitted for mock
/// replies, which have no upstream exchange behind them.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Which provider produced the reply ("azure" or "local")
    pub from: String,

    /// Session the exchange was recorded under
    pub session_id: String,

    /// Assistant reply text
    pub response: String,

    /// Raw completion endpoint payload, when a remote call happened
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

/// One persisted message, as returned by the history endpoint.
///
/// Maps to the `messages` table (role, content, timestamp). Role is either
/// "user" or "assistant"; this system never mutates or deletes messages.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Response returned by GET /history.
///
/// # JSON Example
///
/// ```json
/// {
///   "session_id": "default",
///   "history": [
///     { "role": "user", "content": "Hello?", "timestamp": "2026-08-07T10:00:00Z" },
///     { "role": "assistant", "content": "Hi!", "timestamp": "2026-08-07T10:00:01Z" }
///   ],
///   "total_messages": 2
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,

    /// Oldest-first, capped server-side at 50 entries
    pub history: Vec<HistoryEntry>,

    /// Number of entries returned (after the cap)
    pub total_messages: usize,
}
