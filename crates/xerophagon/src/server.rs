use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::fast::FastTracker;
use crate::handlers;
use crate::views::Views;

// ============================================================================
// Server State
// ============================================================================

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct ServerState {
    pub tracker: FastTracker,
    pub views: Views,
    pub page_size: usize,
}

/// Router-level limits.
#[derive(Debug, Clone, Copy)]
pub struct ServerLimits {
    pub request_timeout_seconds: u64,
    pub max_connections: usize,
}

impl Default for ServerLimits {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 30,
            max_connections: 64,
        }
    }
}

// ============================================================================
// Server Setup
// ============================================================================

pub fn build_app(state: ServerState, limits: ServerLimits) -> Router {
    let pages = Router::new()
        .route("/", get(handlers::home))
        .route("/profile", get(handlers::profile))
        .route("/fasting", get(handlers::fasting))
        .route("/start_fast", post(handlers::start_fast))
        .route("/end_fast", post(handlers::end_fast))
        .route("/static/js/script.js", get(handlers::script))
        .with_state(state.clone());

    let api_v1 = Router::new()
        .route("/state", get(handlers::v1::get_state))
        .route("/history", get(handlers::v1::get_history))
        .route("/fasts/start", post(handlers::v1::start_fast))
        .route("/fasts/end", post(handlers::v1::end_fast))
        .with_state(state)
        .layer(DefaultBodyLimit::max(64 * 1024));

    Router::new()
        .route("/livez", get(handlers::livez))
        .route("/version", get(handlers::version))
        .merge(pages)
        .nest("/api/v1", api_v1)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(limits.request_timeout_seconds),
        ))
        .layer(ConcurrencyLimitLayer::new(limits.max_connections))
}
