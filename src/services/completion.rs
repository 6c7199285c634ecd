//! Completion providers: the hosted Azure OpenAI deployment and a
//! deterministic local mock.
//!
//! The provider is chosen once at startup from configuration and injected as
//! a trait object, so request handling never branches on deployment mode.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::config::Config;
use crate::error::AppError;

/// Completions API version the deployment is called with.
const AZURE_API_VERSION: &str = "2023-06-01-preview";

/// Upper bound on the completion call; on expiry the caller gets an
/// upstream-failure result instead of hanging.
const UPSTREAM_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(15);

/// Token budget requested per completion.
const MAX_COMPLETION_TOKENS: u32 = 200;

/// How many characters of the prompt the mock reply echoes back.
const MOCK_SUMMARY_CHARS: usize = 140;

/// Outcome of one completion call.
pub struct CompletionOutcome {
    /// Assistant reply text
    pub reply: String,

    /// Raw upstream payload, absent for mock replies
    pub raw: Option<serde_json::Value>,
}

/// A source of assistant replies.
///
/// Implementations must be cheap to share across request workers; no locks
/// are held while a completion is in flight.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider tag reported in chat responses ("azure" or "local").
    fn origin(&self) -> &'static str;

    async fn complete(&self, prompt: &str) -> Result<CompletionOutcome, AppError>;
}

/// Connection settings for an Azure OpenAI deployment.
#[derive(Debug, Clone)]
pub struct AzureSettings {
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
}

/// Calls the hosted completions deployment over HTTPS.
pub struct AzureCompletionProvider {
    client: reqwest::Client,
    settings: AzureSettings,
}

impl AzureCompletionProvider {
    pub fn new(settings: AzureSettings) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()?;

        Ok(Self { client, settings })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/completions?api-version={}",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.deployment,
            AZURE_API_VERSION
        )
    }
}

#[async_trait]
impl CompletionProvider for AzureCompletionProvider {
    fn origin(&self) -> &'static str {
        "azure"
    }

    /// POST the prompt to the deployment and extract `choices[0].text`.
    ///
    /// Any transport error, timeout, non-success status, or unparseable body
    /// becomes `AppError::Upstream` carrying the collaborator's error text.
    async fn complete(&self, prompt: &str) -> Result<CompletionOutcome, AppError> {
        let body = json!({
            "prompt": prompt,
            "max_tokens": MAX_COMPLETION_TOKENS,
        });

        let response = self
            .client
            .post(self.completions_url())
            .header("api-key", &self.settings.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "HTTP {}: {}",
                status, error_body
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse response: {}", e)))?;

        let reply = payload
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("text"))
            .and_then(|text| text.as_str())
            .unwrap_or_default()
            .trim()
            .to_string();

        Ok(CompletionOutcome {
            reply,
            raw: Some(payload),
        })
    }
}

/// Deterministic local provider used when the deployment is unconfigured or
/// local mode is forced.
pub struct MockCompletionProvider;

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    fn origin(&self) -> &'static str {
        "local"
    }

    async fn complete(&self, prompt: &str) -> Result<CompletionOutcome, AppError> {
        Ok(CompletionOutcome {
            reply: mock_reply(prompt),
            raw: None,
        })
    }
}

/// Build the canned mock reply: character count plus the first 140
/// characters of the prompt, with an ellipsis when truncated.
fn mock_reply(prompt: &str) -> String {
    let char_count = prompt.chars().count();
    let summary: String = prompt.chars().take(MOCK_SUMMARY_CHARS).collect();
    let ellipsis = if char_count > MOCK_SUMMARY_CHARS {
        "..."
    } else {
        ""
    };

    format!(
        "MOCK-ASSISTANT: I received your prompt ({} chars). Summary: {}{}",
        char_count, summary, ellipsis
    )
}

/// Choose the completion provider once at startup.
///
/// Mock when LOCAL_MODE is forced or the deployment is not fully configured,
/// Azure otherwise. Request handling never revisits this decision.
pub fn select_provider(config: &Config) -> reqwest::Result<Arc<dyn CompletionProvider>> {
    if config.local_mode() {
        tracing::info!("LOCAL_MODE set; using the mock completion provider");
        return Ok(Arc::new(MockCompletionProvider));
    }

    match config.azure_settings() {
        Some(settings) => Ok(Arc::new(AzureCompletionProvider::new(settings)?)),
        None => {
            tracing::warn!(
                "Azure credentials not found. Set AZURE_OPENAI_ENDPOINT, AZURE_OPENAI_KEY, and AZURE_OPENAI_DEPLOYMENT, or set LOCAL_MODE=true to use mock mode."
            );
            Ok(Arc::new(MockCompletionProvider))
        }
    }
}

/// Always-failing provider for exercising the upstream-failure path.
#[cfg(test)]
pub struct FailingCompletionProvider;

#[cfg(test)]
#[async_trait]
impl CompletionProvider for FailingCompletionProvider {
    fn origin(&self) -> &'static str {
        "azure"
    }

    async fn complete(&self, _prompt: &str) -> Result<CompletionOutcome, AppError> {
        Err(AppError::Upstream("simulated upstream outage".to_string()))
    }
}
