//! HTML pages and form commands.
//!
//! Commands answer with `303 See Other` so a browser refresh never re-posts.
//! User-correctable failures are passed back to the fasting page through the
//! `error` query parameter.

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use chrono::Utc;
use serde::Deserialize;
use tracing::{error, warn};

use crate::fast::{FastError, TrackerError, paginate, parse_goal, parse_page};
use crate::handlers::query::{QueryPairs, first_value};
use crate::server::ServerState;
use crate::store::StorageError;
use crate::views::{FastingView, ProfileView};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartFastForm {
    goal: Option<String>,
}

// ============================================================================
// Pages
// ============================================================================

/// GET /
pub async fn home() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/profile")])
}

/// GET /profile
pub async fn profile(
    State(state): State<ServerState>,
    Query(query): Query<QueryPairs>,
) -> Response {
    let data = match state.tracker.snapshot().await {
        Ok(d) => d,
        Err(e) => return storage_failure("Error loading data", &e),
    };

    let page = paginate(
        &data.fasting_history,
        parse_page(first_value(&query, "page")),
        state.page_size,
    );
    let view = ProfileView::new(&data, &page, Utc::now());

    match state.views.profile(&view) {
        Ok(html) => Html(html).into_response(),
        Err(e) => render_failure(&e),
    }
}

/// GET /fasting
pub async fn fasting(
    State(state): State<ServerState>,
    Query(query): Query<QueryPairs>,
) -> Response {
    let data = match state.tracker.snapshot().await {
        Ok(d) => d,
        Err(e) => return storage_failure("Error loading data", &e),
    };

    let error_message = first_value(&query, "error").map(str::to_string);
    let view = FastingView::new(&data, error_message, Utc::now());

    match state.views.fasting(&view) {
        Ok(html) => Html(html).into_response(),
        Err(e) => render_failure(&e),
    }
}

// ============================================================================
// Commands
// ============================================================================

/// POST /start_fast
pub async fn start_fast(
    State(state): State<ServerState>,
    form: Result<Form<StartFastForm>, FormRejection>,
) -> Response {
    let Ok(Form(form)) = form else {
        return redirect_with_error("Error parsing form");
    };

    let goal_hours = match parse_goal(form.goal.as_deref()) {
        Ok(g) => g,
        Err(e) => return redirect_with_error(&e.to_string()),
    };

    match state.tracker.start_fast(goal_hours, Utc::now()).await {
        Ok(_) => Redirect::to("/fasting").into_response(),
        Err(TrackerError::Fast(e)) => redirect_with_error(&e.to_string()),
        Err(TrackerError::Storage(e)) => storage_failure("Error accessing data", &e),
    }
}

/// POST /end_fast
pub async fn end_fast(State(state): State<ServerState>) -> Response {
    match state.tracker.end_fast(Utc::now()).await {
        Ok(_) => Redirect::to("/fasting").into_response(),
        Err(TrackerError::Fast(e @ FastError::NoActiveFast)) => {
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Err(TrackerError::Fast(e)) => {
            warn!(error = %e, "Unexpected rejection ending fast");
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Err(TrackerError::Storage(e)) => storage_failure("Error accessing data", &e),
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn redirect_with_error(message: &str) -> Response {
    let location = format!("/fasting?error={}", urlencoding::encode(message));
    Redirect::to(&location).into_response()
}

fn storage_failure(message: &'static str, e: &StorageError) -> Response {
    error!(error = %e, "{message}");
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}

fn render_failure(e: &tera::Error) -> Response {
    error!(error = ?e, "Failed to render page");
    (StatusCode::INTERNAL_SERVER_ERROR, "Error rendering page").into_response()
}
