//! Keep-alive HTTP surface.
//!
//! Two unauthenticated routes: `GET /` (liveness, read by external
//! uptime pingers) and `GET /metrics` (Prometheus text format). The
//! core logic never calls in here; it exists so infrastructure can see
//! the process is alive.

pub mod health;

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;

use crate::metrics::AppMetrics;

#[derive(Clone)]
pub struct ApiState {
    pub started_at: DateTime<Utc>,
    pub metrics: Arc<AppMetrics>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(health::health))
        .route("/metrics", get(metrics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn metrics(State(state): State<ApiState>) -> impl IntoResponse {
    match state.metrics.render() {
        Ok(body) => Response::builder()
            .status(StatusCode::OK)
            .header(
                header::CONTENT_TYPE,
                "text/plain; version=0.0.4",
            )
            .body(Body::from(body))
            .expect("metrics response should be valid"),
        Err(err) => {
            tracing::error!("Failed to render metrics: {}", err);
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Body::from("metrics unavailable"))
                .expect("error response should be valid")
        }
    }
}
