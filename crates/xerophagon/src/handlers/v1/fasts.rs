//! Fasting state and history over JSON.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::fast::{
    ActiveFast, CompletedFast, FastError, FastStatus, FastingStage, TrackerError, goal_from_hours,
    paginate, parse_page,
};
use crate::handlers::problem_details::{self, ProblemDetails};
use crate::handlers::query::{QueryPairs, first_value};
use crate::server::ServerState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub status: FastStatus,
    pub current_fast: Option<ActiveFast>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<&'static FastingStage>,
    pub completed_fasts: usize,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub fasts: Vec<CompletedFast>,
    pub current_page: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct StartFastRequest {
    #[serde(default)]
    pub goal_hours: Option<i64>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/state
pub async fn get_state(State(state): State<ServerState>) -> Response {
    let data = match state.tracker.snapshot().await {
        Ok(d) => d,
        Err(e) => return tracker_problem(e.into()).into_response(),
    };

    let now = Utc::now();
    let elapsed_hours = data.current_fast.as_ref().map(|f| f.elapsed_hours(now));

    Json(StateResponse {
        status: data.status(),
        elapsed_hours,
        stage: elapsed_hours.map(FastingStage::for_elapsed),
        completed_fasts: data.fasting_history.len(),
        current_fast: data.current_fast,
    })
    .into_response()
}

/// GET /api/v1/history
pub async fn get_history(
    State(state): State<ServerState>,
    Query(query): Query<QueryPairs>,
) -> Response {
    let data = match state.tracker.snapshot().await {
        Ok(d) => d,
        Err(e) => return tracker_problem(e.into()).into_response(),
    };

    let page = paginate(
        &data.fasting_history,
        parse_page(first_value(&query, "page")),
        state.page_size,
    );

    Json(HistoryResponse {
        fasts: page.items.to_vec(),
        current_page: page.current_page,
        total_pages: page.total_pages,
        has_prev: page.has_prev,
        has_next: page.has_next,
    })
    .into_response()
}

/// POST /api/v1/fasts/start
///
/// The body is optional; an empty body starts a fast without a goal.
pub async fn start_fast(State(state): State<ServerState>, body: Bytes) -> Response {
    let req = match parse_start_request(&body) {
        Ok(req) => req,
        Err(e) => {
            return problem_details::bad_request(format!("invalid request body: {e}"))
                .into_response();
        }
    };

    let goal_hours = match goal_from_hours(req.goal_hours) {
        Ok(g) => g,
        Err(e) => return tracker_problem(e.into()).into_response(),
    };

    match state.tracker.start_fast(goal_hours, Utc::now()).await {
        Ok(fast) => (StatusCode::CREATED, Json(fast)).into_response(),
        Err(e) => tracker_problem(e).into_response(),
    }
}

/// POST /api/v1/fasts/end
pub async fn end_fast(State(state): State<ServerState>) -> Response {
    match state.tracker.end_fast(Utc::now()).await {
        Ok(fast) => Json(fast).into_response(),
        Err(e) => tracker_problem(e).into_response(),
    }
}

fn parse_start_request(body: &[u8]) -> Result<StartFastRequest, serde_json::Error> {
    if body.trim_ascii().is_empty() {
        return Ok(StartFastRequest::default());
    }
    serde_json::from_slice(body)
}

// ============================================================================
// Error Mapping
// ============================================================================

fn tracker_problem(e: TrackerError) -> ProblemDetails {
    match e {
        TrackerError::Fast(e @ (FastError::AlreadyActive | FastError::NoActiveFast)) => {
            problem_details::conflict(e.to_string())
        }
        TrackerError::Fast(e @ FastError::InvalidInput { .. }) => {
            problem_details::bad_request(e.to_string())
        }
        TrackerError::Storage(e) => {
            error!(error = %e, "Fasting data unavailable");
            problem_details::internal_error("fasting data is unavailable")
        }
    }
}
