//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

use crate::services::completion::AzureSettings;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (optional): SQLite connection string, defaults to `sqlite:chatbot_data.db`
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 8080
/// - `AZURE_OPENAI_ENDPOINT` / `AZURE_OPENAI_KEY` / `AZURE_OPENAI_DEPLOYMENT` (optional):
///   the hosted completion deployment; all three must be present for remote calls
/// - `LOCAL_MODE` (optional): force the deterministic mock provider ("1", "true", or "yes")
/// - `API_KEY_SALT` (optional): salt appended to API keys before hashing
/// - `RATE_LIMIT_REQUESTS` (optional): requests allowed per window, defaults to 100
/// - `RATE_LIMIT_WINDOW` (optional): window length in seconds, defaults to 3600
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    pub azure_openai_endpoint: Option<String>,
    pub azure_openai_key: Option<String>,
    pub azure_openai_deployment: Option<String>,

    /// Raw LOCAL_MODE value; interpreted through [`Config::local_mode`].
    #[serde(default)]
    local_mode: String,

    #[serde(default = "default_api_key_salt")]
    pub api_key_salt: String,

    #[serde(default = "default_rate_limit_requests")]
    pub rate_limit_requests: usize,

    /// Rate limit window length in seconds.
    #[serde(default = "default_rate_limit_window")]
    pub rate_limit_window: u64,
}

fn default_database_url() -> String {
    "sqlite:chatbot_data.db".to_string()
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    8080
}

fn default_api_key_salt() -> String {
    "default-salt-change-in-production".to_string()
}

fn default_rate_limit_requests() -> usize {
    100
}

fn default_rate_limit_window() -> u64 {
    3600
}

/// LOCAL_MODE accepts the same truthy spellings on every platform.
fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable values cannot be parsed into
    /// expected types.
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Parse environment variables into Config struct
        // Field names are automatically converted: database_url -> DATABASE_URL
        envy::from_env::<Config>()
    }

    /// Whether the mock completion provider is forced on.
    pub fn local_mode(&self) -> bool {
        is_truthy(&self.local_mode)
    }

    /// The Azure deployment settings, if all three variables are present.
    pub fn azure_settings(&self) -> Option<AzureSettings> {
        match (
            &self.azure_openai_endpoint,
            &self.azure_openai_key,
            &self.azure_openai_deployment,
        ) {
            (Some(endpoint), Some(api_key), Some(deployment)) => Some(AzureSettings {
                endpoint: endpoint.clone(),
                api_key: api_key.clone(),
                deployment: deployment.clone(),
            }),
            _ => None,
        }
    }

    pub fn azure_configured(&self) -> bool {
        self.azure_settings().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_mode_accepts_common_truthy_spellings() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("yes"));
        assert!(!is_truthy(""));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("0"));
    }
}
