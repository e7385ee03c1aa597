//! Static front-end assets compiled into the binary.

use axum::http::header;
use axum::response::IntoResponse;

const SCRIPT_JS: &str = include_str!("../../static/js/script.js");

/// GET /static/js/script.js
pub async fn script() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        SCRIPT_JS,
    )
}
