//! API key model for authentication.
//!
//! API keys authenticate callers of the protected routes. They are stored in
//! the database as salted SHA-256 hashes; the raw key is shown exactly once
//! at generation time.

use chrono::{DateTime, Utc};

/// Represents an API key record from the database.
///
/// # Database Table
///
/// Maps to the `users` table with columns:
/// - `id`: Row id
/// - `api_key`: Salted SHA-256 hash of the actual API key (64 hex characters)
/// - `created_at`: When the key was created
/// - `active`: Whether the key is currently valid
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApiKeyRecord {
    pub id: i64,

    /// Salted SHA-256 hash of the actual API key.
    ///
    /// When a request comes in with "Bearer abc123", we hash "abc123" with
    /// the configured salt and look this value up.
    pub api_key: String,

    /// Timestamp when this API key was created
    pub created_at: DateTime<Utc>,

    /// Whether this API key is currently active.
    ///
    /// Inactive keys are rejected during authentication. This provides a way
    /// to revoke access without deleting the record.
    pub active: bool,
}
