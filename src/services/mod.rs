//! Business logic services.
//!
//! Services contain the core logic separated from HTTP handlers: API key
//! validation and minting, rate limiting, the request gate composing the
//! two, completion providers, and conversation persistence.

pub mod chat_service;
pub mod completion;
pub mod conversation_service;
pub mod gate;
pub mod key_validator;
pub mod rate_limiter;
