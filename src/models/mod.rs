//! Data models representing database entities and API types.
//!
//! This module contains the data structures that map to database tables and
//! the request/response bodies exchanged with clients.

/// API key authentication model
pub mod api_key;
/// Conversation session and message models
pub mod conversation;
