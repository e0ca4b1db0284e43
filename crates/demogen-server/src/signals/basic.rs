use std::time::Duration;

use axum::{
    extract::{rejection::QueryRejection, Query},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct OkQuery {
    pub user: Option<String>,
}

pub async fn ok(
    query: Result<Query<OkQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(q) = query?;
    tracing::info!(user = ?q.user, "Request OK");
    Ok(Json(json!({ "ok": true, "user": q.user })))
}

pub async fn warn() -> Json<Value> {
    tracing::warn!(code = "DEMO_WARN", "Simulated warning");
    Json(json!({ "warn": true }))
}

#[derive(Debug, Deserialize)]
pub struct SlowQuery {
    #[serde(default = "default_slow_ms")]
    pub ms: i64,
}

fn default_slow_ms() -> i64 {
    800
}

/// Negative delays are served immediately.
pub async fn slow(
    query: Result<Query<SlowQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(q) = query?;
    let delay = Duration::from_millis(u64::try_from(q.ms).unwrap_or(0));
    tokio::time::sleep(delay).await;
    tracing::info!(ms = q.ms, "Slow request served");
    Ok(Json(json!({ "slow": true, "ms": q.ms })))
}
