//! Request gate: authentication composed with rate limiting.
//!
//! Every protected request passes through `authorize`. The order of checks
//! is fixed and load-bearing: authentication first, then rate limiting, so
//! an invalid key never consumes a rate-limit slot. The gate holds no state
//! of its own beyond the two components it delegates to.

use crate::services::key_validator::KeyValidator;
use crate::services::rate_limiter::RateLimiter;

/// Outcome of gating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateResult {
    /// Key valid and within budget; proceed.
    Admitted,

    /// Key missing, unknown, or inactive. Deliberately carries no further
    /// detail.
    Unauthenticated,

    /// Key valid but over budget. Carries the configured limits for
    /// client-visible messaging.
    RateLimited { limit: usize, window_secs: u64 },
}

/// Composes the key validator and rate limiter ahead of protected routes.
pub struct RequestGate {
    validator: KeyValidator,
    limiter: RateLimiter,
}

impl RequestGate {
    pub fn new(validator: KeyValidator, limiter: RateLimiter) -> Self {
        Self { validator, limiter }
    }

    /// Authorize one request presented with `raw_key`.
    ///
    /// The validated raw key doubles as the rate-limit identifier, so each
    /// key gets an independent window.
    pub async fn authorize(&self, raw_key: &str) -> GateResult {
        if !self.validator.validate(raw_key).await {
            return GateResult::Unauthenticated;
        }

        if !self.limiter.admit(raw_key) {
            return GateResult::RateLimited {
                limit: self.limiter.limit(),
                window_secs: self.limiter.window_secs(),
            };
        }

        GateResult::Admitted
    }

    /// The underlying validator, for key minting.
    pub fn validator(&self) -> &KeyValidator {
        &self.validator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use std::time::Duration;

    async fn gate_with_limit(limit: usize) -> RequestGate {
        let pool = test_pool().await;
        RequestGate::new(
            KeyValidator::new(pool, "salt".to_string()),
            RateLimiter::new(limit, Duration::from_secs(3600)),
        )
    }

    #[tokio::test]
    async fn unknown_key_is_unauthenticated() {
        let gate = gate_with_limit(2).await;

        assert_eq!(gate.authorize("nope").await, GateResult::Unauthenticated);
        assert_eq!(gate.authorize("").await, GateResult::Unauthenticated);
    }

    #[tokio::test]
    async fn valid_key_is_admitted_until_limit() {
        let gate = gate_with_limit(2).await;
        let key = gate.validator().mint_key().await.expect("mint");

        assert_eq!(gate.authorize(&key).await, GateResult::Admitted);
        assert_eq!(gate.authorize(&key).await, GateResult::Admitted);
        assert_eq!(
            gate.authorize(&key).await,
            GateResult::RateLimited {
                limit: 2,
                window_secs: 3600
            }
        );
    }

    #[tokio::test]
    async fn failed_authentication_consumes_no_rate_limit_slot() {
        let gate = gate_with_limit(2).await;
        let key = gate.validator().mint_key().await.expect("mint");

        // Hammering with bad keys must leave the real key's budget intact
        for _ in 0..5 {
            assert_eq!(
                gate.authorize("invalid-key").await,
                GateResult::Unauthenticated
            );
        }

        assert_eq!(gate.authorize(&key).await, GateResult::Admitted);
        assert_eq!(gate.authorize(&key).await, GateResult::Admitted);
    }
}
