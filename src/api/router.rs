use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::account;
use super::auth;
use super::health;
use super::state::AppState;
use super::v1;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoint (no auth)
        .route("/health", get(health::health_check))
        // Session endpoints (register/login/refresh)
        .nest("/auth", auth::create_auth_router())
        // Session-protected account management
        .nest("/account", account::create_account_router())
        // API-key-protected country data
        .nest("/api/v1", v1::create_v1_router(state.clone()))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
