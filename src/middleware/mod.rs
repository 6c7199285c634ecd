//! HTTP middleware components.
//!
//! Middleware are functions that run before route handlers.
//! They can:
//! - Authenticate requests
//! - Log requests
//! - Short-circuit requests (reject unauthorized or over-budget callers)

/// API key authentication + rate limiting middleware
pub mod auth;
