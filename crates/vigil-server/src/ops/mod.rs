//! Operational HTTP endpoints.
//!
//! - `/ping`    : liveness, plain text
//! - `/healthz` : liveness, JSON
//! - `/metrics` : Prometheus text format (path is configurable)
//!
//! The liveness handlers ignore the request entirely and cannot fail.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::app_state::AppState;

/// Content type of the text exposition format.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
}

pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain")], "pong")
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(Health { status: "healthy" }))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.registry().render();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        body,
    )
        .into_response()
}
