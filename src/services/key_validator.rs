//! API key validation, caching, and minting.
//!
//! Presented keys are hashed with a configured salt and looked up in the
//! `users` table. Successful lookups are cached in-process for one hour so
//! the common path never touches the database. The cache maps the raw key
//! to its expiry instant and is evicted lazily on the next lookup.
//!
//! The staleness window is deliberate: a key deactivated in the store keeps
//! working from cache until its entry expires. The cache is lost on restart,
//! which only means the next request falls back to a store lookup.

use std::time::{Duration, Instant};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use dashmap::DashMap;
use sha2::{Digest, Sha256};

use crate::{db::DbPool, error::AppError, models::api_key::ApiKeyRecord};

/// How long a successful validation is remembered before the store is
/// consulted again.
pub const KEY_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Validates presented API keys and mints new ones.
pub struct KeyValidator {
    pool: DbPool,

    /// Salt appended to the raw key before hashing
    salt: String,

    /// Raw key -> cache entry expiry. Sharded map; duplicate inserts for the
    /// same key under concurrency are idempotent.
    cache: DashMap<String, Instant>,
}

impl KeyValidator {
    pub fn new(pool: DbPool, salt: String) -> Self {
        Self {
            pool,
            salt,
            cache: DashMap::new(),
        }
    }

    /// Hash an API key for storage or lookup.
    ///
    /// SHA-256 over the raw key concatenated with the salt, hex-encoded:
    /// deterministic, 64 lowercase hex characters.
    pub fn hash_key(&self, raw_key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(raw_key.as_bytes());
        hasher.update(self.salt.as_bytes());

        hex::encode(hasher.finalize())
    }

    /// Validate a presented key.
    ///
    /// # Flow
    ///
    /// 1. Empty key: invalid, no store access
    /// 2. Unexpired cache entry: valid
    /// 3. Expired cache entry: evict, fall through
    /// 4. Store lookup by hash with `active = 1`; hit populates the cache
    ///
    /// A storage failure during lookup is logged and treated as invalid
    /// (fail closed), never propagated as a crash.
    pub async fn validate(&self, raw_key: &str) -> bool {
        if raw_key.is_empty() {
            return false;
        }

        // Copy the expiry out so no map guard is held across the await below
        if let Some(expires_at) = self.cache.get(raw_key).map(|entry| *entry.value()) {
            if Instant::now() < expires_at {
                return true;
            }
            self.cache.remove(raw_key);
        }

        let key_hash = self.hash_key(raw_key);

        let lookup = sqlx::query_as::<_, ApiKeyRecord>(
            "SELECT id, api_key, created_at, active FROM users WHERE api_key = ? AND active = 1",
        )
        .bind(&key_hash)
        .fetch_optional(&self.pool)
        .await;

        match lookup {
            Ok(Some(_)) => {
                self.cache
                    .insert(raw_key.to_string(), Instant::now() + KEY_CACHE_TTL);
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::error!("API key validation error: {}", e);
                false
            }
        }
    }

    /// Mint a new API key and store its salted hash.
    ///
    /// # Output
    ///
    /// 32 random bytes, URL-safe base64 without padding. The raw key is
    /// returned exactly once; only the hash is persisted.
    ///
    /// # Errors
    ///
    /// Returns `Database` if the insert fails. Unlike conversation writes,
    /// this is surfaced to the caller: silently losing a just-minted key
    /// would strand them with a credential nothing recognizes.
    pub async fn mint_key(&self) -> Result<String, AppError> {
        let random_bytes: [u8; 32] = rand::random();
        let api_key = URL_SAFE_NO_PAD.encode(random_bytes);

        let key_hash = self.hash_key(&api_key);

        sqlx::query("INSERT INTO users (api_key, created_at) VALUES (?, ?)")
            .bind(&key_hash)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn hash_is_deterministic_fixed_length_hex() {
        let validator = KeyValidator::new(test_pool().await, "salt".to_string());

        let h1 = validator.hash_key("key-one");
        let h2 = validator.hash_key("key-one");
        let h3 = validator.hash_key("key-two");

        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
        assert_eq!(h1.len(), 64);
        assert!(h1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn salt_changes_hash() {
        let pool = test_pool().await;
        let a = KeyValidator::new(pool.clone(), "salt-a".to_string());
        let b = KeyValidator::new(pool, "salt-b".to_string());

        assert_ne!(a.hash_key("same-key"), b.hash_key("same-key"));
    }

    #[tokio::test]
    async fn empty_key_is_rejected() {
        let validator = KeyValidator::new(test_pool().await, "salt".to_string());

        assert!(!validator.validate("").await);
    }

    #[tokio::test]
    async fn minted_key_validates_and_unknown_key_does_not() {
        let validator = KeyValidator::new(test_pool().await, "salt".to_string());

        let key = validator.mint_key().await.expect("mint");

        assert!(validator.validate(&key).await);
        assert!(!validator.validate("not-a-real-key").await);
    }

    #[tokio::test]
    async fn deactivated_key_stays_accepted_from_cache() {
        let pool = test_pool().await;
        let validator = KeyValidator::new(pool.clone(), "salt".to_string());

        let key = validator.mint_key().await.expect("mint");
        assert!(validator.validate(&key).await);

        sqlx::query("UPDATE users SET active = 0")
            .execute(&pool)
            .await
            .expect("deactivate");

        // Cached entry has not expired yet, so the stale answer is served
        assert!(validator.validate(&key).await);

        // A validator with a cold cache consults the store and rejects
        let fresh = KeyValidator::new(pool, "salt".to_string());
        assert!(!fresh.validate(&key).await);
    }

    #[tokio::test]
    async fn storage_failure_fails_closed() {
        let pool = test_pool().await;
        let validator = KeyValidator::new(pool.clone(), "salt".to_string());

        let key = validator.mint_key().await.expect("mint");

        pool.close().await;

        // Cold-cache validator cannot reach the store; the key is refused
        let fresh = KeyValidator::new(pool, "salt".to_string());
        assert!(!fresh.validate(&key).await);
    }
}
