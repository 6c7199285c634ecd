//! Chat orchestration: prompt validation, persistence, completion.
//!
//! A request moves through validate → persist user message → complete →
//! persist assistant reply. If the completion call fails the user message
//! stays persisted and the error is surfaced; there is no compensating
//! rollback.

use crate::{
    db::DbPool,
    error::AppError,
    models::conversation::ChatResponse,
    services::{completion::CompletionProvider, conversation_service},
};

/// Maximum accepted prompt length in characters.
pub const MAX_PROMPT_CHARS: usize = 2000;

/// Validate and normalize a prompt.
///
/// Whitespace is trimmed first. An empty result or a prompt over
/// [`MAX_PROMPT_CHARS`] characters is rejected with a user-visible reason;
/// a prompt of exactly the limit passes unmodified.
pub fn validate_prompt(prompt: &str) -> Result<String, AppError> {
    let trimmed = prompt.trim();

    if trimmed.is_empty() {
        return Err(AppError::Validation("Prompt cannot be empty".to_string()));
    }

    if trimmed.chars().count() > MAX_PROMPT_CHARS {
        return Err(AppError::Validation(
            "Prompt too long (max 2000 characters)".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}

/// Run one chat exchange for an already-validated prompt.
///
/// # Partial-failure semantics
///
/// The user message is persisted before the completion call. On upstream
/// failure the error propagates with that message kept, so the history
/// faithfully records what the caller sent even when no reply was produced.
pub async fn run_chat(
    pool: &DbPool,
    provider: &dyn CompletionProvider,
    session_id: &str,
    prompt: &str,
) -> Result<ChatResponse, AppError> {
    conversation_service::get_or_create_session(pool, session_id).await;
    conversation_service::save_message(pool, session_id, "user", prompt).await;

    let outcome = provider.complete(prompt).await?;

    conversation_service::save_message(pool, session_id, "assistant", &outcome.reply).await;

    Ok(ChatResponse {
        from: provider.origin().to_string(),
        session_id: session_id.to_string(),
        response: outcome.reply,
        result: outcome.raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::services::completion::{FailingCompletionProvider, MockCompletionProvider};

    #[test]
    fn empty_and_whitespace_prompts_are_rejected() {
        for prompt in ["", "   ", "\n\t "] {
            match validate_prompt(prompt) {
                Err(AppError::Validation(reason)) => {
                    assert_eq!(reason, "Prompt cannot be empty");
                }
                other => panic!("expected validation error, got {:?}", other.map(|_| ())),
            }
        }
    }

    #[test]
    fn overlong_prompt_is_rejected() {
        let prompt = "x".repeat(2001);

        match validate_prompt(&prompt) {
            Err(AppError::Validation(reason)) => {
                assert_eq!(reason, "Prompt too long (max 2000 characters)");
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn prompt_at_limit_is_accepted_unmodified() {
        let prompt = "x".repeat(2000);

        assert_eq!(validate_prompt(&prompt).expect("valid"), prompt);
    }

    #[test]
    fn prompt_is_trimmed() {
        assert_eq!(validate_prompt("  hello  ").expect("valid"), "hello");
    }

    #[tokio::test]
    async fn chat_persists_both_sides_of_the_exchange() {
        let pool = test_pool().await;

        let response = run_chat(&pool, &MockCompletionProvider, "default", "Hello?")
            .await
            .expect("chat");

        assert_eq!(response.from, "local");
        assert_eq!(response.session_id, "default");
        assert!(response.response.starts_with("MOCK-ASSISTANT:"));
        assert!(response.result.is_none());

        let history = conversation_service::fetch_history(&pool, "default").await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, "user");
        assert_eq!(history[0].content, "Hello?");
        assert_eq!(history[1].role, "assistant");
        assert_eq!(history[1].content, response.response);
    }

    #[tokio::test]
    async fn upstream_failure_keeps_the_user_message() {
        let pool = test_pool().await;

        let result = run_chat(&pool, &FailingCompletionProvider, "default", "Hello?").await;
        assert!(matches!(result, Err(AppError::Upstream(_))));

        let history = conversation_service::fetch_history(&pool, "default").await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, "user");
    }
}
