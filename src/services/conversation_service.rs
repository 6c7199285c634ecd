//! Conversation persistence: sessions, messages, and history reads.
//!
//! Storage errors here are deliberately lenient. Writes are best-effort
//! (logged and swallowed) and reads degrade to an empty history, so a
//! storage hiccup never takes down request serving. This is an explicit
//! policy, not an omission; key validation is the fail-closed counterpart.

use chrono::Utc;

use crate::{db::DbPool, models::conversation::HistoryEntry};

/// Server-side cap on history entries returned per read.
pub const HISTORY_LIMIT: i64 = 50;

/// Ensure a conversation session row exists for `session_id`.
///
/// Repeat calls are no-ops (`INSERT OR IGNORE` on the unique session id).
/// Errors are logged and swallowed.
pub async fn get_or_create_session(pool: &DbPool, session_id: &str) {
    let result =
        sqlx::query("INSERT OR IGNORE INTO conversations (session_id, user_id, created_at) VALUES (?, NULL, ?)")
            .bind(session_id)
            .bind(Utc::now())
            .execute(pool)
            .await;

    if let Err(e) = result {
        tracing::error!("Session creation error for {}: {}", session_id, e);
    }
}

/// Append one message to a session.
///
/// The timestamp is bound here rather than defaulted in SQL so it carries
/// sub-second precision; history ordering depends on it. Errors are logged
/// and swallowed (no retry queue).
pub async fn save_message(pool: &DbPool, session_id: &str, role: &str, content: &str) {
    let result =
        sqlx::query("INSERT INTO messages (session_id, role, content, timestamp) VALUES (?, ?, ?, ?)")
            .bind(session_id)
            .bind(role)
            .bind(content)
            .bind(Utc::now())
            .execute(pool)
            .await;

    if let Err(e) = result {
        tracing::error!("Message save error for {}: {}", session_id, e);
    }
}

/// Read a session's history, oldest first, capped at [`HISTORY_LIMIT`].
///
/// The id tie-break keeps messages written within the same instant in
/// arrival order. A storage error returns an empty history (logged).
pub async fn fetch_history(pool: &DbPool, session_id: &str) -> Vec<HistoryEntry> {
    let rows = sqlx::query_as::<_, HistoryEntry>(
        "SELECT role, content, timestamp FROM messages \
         WHERE session_id = ? ORDER BY timestamp ASC, id ASC LIMIT ?",
    )
    .bind(session_id)
    .bind(HISTORY_LIMIT)
    .fetch_all(pool)
    .await;

    match rows {
        Ok(history) => history,
        Err(e) => {
            tracing::error!("History retrieval error for {}: {}", session_id, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn unknown_session_has_empty_history() {
        let pool = test_pool().await;

        assert!(fetch_history(&pool, "nowhere").await.is_empty());
    }

    #[tokio::test]
    async fn messages_come_back_in_arrival_order() {
        let pool = test_pool().await;

        get_or_create_session(&pool, "s1").await;
        save_message(&pool, "s1", "user", "first").await;
        save_message(&pool, "s1", "assistant", "second").await;
        save_message(&pool, "s1", "user", "third").await;

        let history = fetch_history(&pool, "s1").await;

        assert_eq!(history.len(), 3);
        assert_eq!(history[0].content, "first");
        assert_eq!(history[1].content, "second");
        assert_eq!(history[2].content, "third");
        assert!(history[0].timestamp <= history[1].timestamp);
        assert!(history[1].timestamp <= history[2].timestamp);
    }

    #[tokio::test]
    async fn history_is_capped_at_fifty_oldest_entries() {
        let pool = test_pool().await;

        get_or_create_session(&pool, "busy").await;
        for i in 0..55 {
            save_message(&pool, "busy", "user", &format!("msg-{}", i)).await;
        }

        let history = fetch_history(&pool, "busy").await;

        assert_eq!(history.len(), 50);
        assert_eq!(history[0].content, "msg-0");
        assert_eq!(history[49].content, "msg-49");
    }

    #[tokio::test]
    async fn repeated_session_creation_is_ignored() {
        let pool = test_pool().await;

        get_or_create_session(&pool, "dup").await;
        get_or_create_session(&pool, "dup").await;

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM conversations WHERE session_id = ?")
                .bind("dup")
                .fetch_one(&pool)
                .await
                .expect("count");

        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn sessions_do_not_share_messages() {
        let pool = test_pool().await;

        get_or_create_session(&pool, "alpha").await;
        get_or_create_session(&pool, "beta").await;
        save_message(&pool, "alpha", "user", "for alpha").await;
        save_message(&pool, "beta", "user", "for beta").await;

        let alpha = fetch_history(&pool, "alpha").await;
        let beta = fetch_history(&pool, "beta").await;

        assert_eq!(alpha.len(), 1);
        assert_eq!(beta.len(), 1);
        assert_eq!(alpha[0].content, "for alpha");
        assert_eq!(beta[0].content, "for beta");
    }
}
