//! Operational HTTP endpoints.
//!
//! - `/health`  : liveness
//! - `/metrics` : Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::app_state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "status": "ok", "app": state.app_name() }))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics().render();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}
