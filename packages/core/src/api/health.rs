use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;

use super::ApiState;

/// Liveness read: uptime plus a hint at the bot commands. External
/// pingers hit this to keep the process awake and confirm it is alive.
pub async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let uptime = Utc::now() - state.started_at;
    let body = format!(
        "ok — up {}s. Send /status to the bot for per-SKU details.",
        uptime.num_seconds().max(0)
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))
        .body(Body::from(body))
        .expect("health response should be valid")
}
