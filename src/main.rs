//! Chatbot Service - Main Application Entry Point
//!
//! This is a REST API server that fronts a hosted completion deployment with
//! API-key authentication, per-key rate limiting, and persistent
//! conversation history.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: SQLite with sqlx (async queries)
//! - **Authentication**: API key with salted SHA-256 hashing + in-process cache
//! - **Rate Limiting**: per-key sliding-window log
//! - **Completions**: Azure OpenAI deployment, or a deterministic mock
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database pool and run migrations
//! 3. Select the completion provider (remote or mock)
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod services;
mod state;

use tracing_subscriber::EnvFilter;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the application router.
///
/// Public routes (health, key generation) are reachable without credentials;
/// everything else sits behind the request gate middleware.
fn app(state: AppState) -> Router {
    // Routes behind the API key gate
    let protected_routes = Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route("/history", get(handlers::history::get_history))
        // Apply authentication + rate limiting to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    Router::new()
        // Public routes (no authentication required)
        .route("/health", get(handlers::health::health_check))
        .route("/auth/generate-key", post(handlers::auth::generate_key))
        // Merge gated routes
        .merge(protected_routes)
        // Add request tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share application state with all handlers via State extraction
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    // Pick the completion provider once; handlers never branch on mode
    let completions = services::completion::select_provider(&config)?;
    tracing::info!("Completion provider selected: {}", completions.origin());

    let state = AppState::new(pool, &config, completions);
    let app = app(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}
