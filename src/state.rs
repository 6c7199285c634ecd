//! Shared application state.
//!
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the database pool, the request gate (API key validation plus
//! rate limiting), and the completion provider selected at startup.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::db::DbPool;
use crate::services::completion::CompletionProvider;
use crate::services::gate::RequestGate;
use crate::services::key_validator::KeyValidator;
use crate::services::rate_limiter::RateLimiter;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,

    /// Composed authentication + rate limiting gate for protected routes.
    pub gate: Arc<RequestGate>,

    /// Completion provider chosen once at startup (Azure or mock).
    pub completions: Arc<dyn CompletionProvider>,

    /// Reported by /health.
    pub local_mode: bool,
    pub azure_configured: bool,
}

impl AppState {
    pub fn new(pool: DbPool, config: &Config, completions: Arc<dyn CompletionProvider>) -> Self {
        let validator = KeyValidator::new(pool.clone(), config.api_key_salt.clone());
        let limiter = RateLimiter::new(
            config.rate_limit_requests,
            Duration::from_secs(config.rate_limit_window),
        );

        Self {
            pool,
            gate: Arc::new(RequestGate::new(validator, limiter)),
            completions,
            local_mode: config.local_mode(),
            azure_configured: config.azure_configured(),
        }
    }
}
