use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::Level;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::logging::parse_level;

#[derive(Debug, Deserialize)]
pub struct SpamQuery {
    #[serde(default = "default_lines")]
    pub lines: i64,
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_lines() -> i64 {
    200
}

fn default_level() -> String {
    "info".into()
}

fn emit(level: Level, i: u64, batch: i64) {
    match level {
        Level::TRACE => tracing::trace!(i, batch, "Spam log line"),
        Level::DEBUG => tracing::debug!(i, batch, "Spam log line"),
        Level::INFO => tracing::info!(i, batch, "Spam log line"),
        Level::WARN => tracing::warn!(i, batch, "Spam log line"),
        _ => tracing::error!(i, batch, "Spam log line"),
    }
}

/// Emits `min(lines, spam_max_lines)` records; the reply echoes the request.
pub async fn spam_logs(
    State(state): State<AppState>,
    query: Result<Query<SpamQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(q) = query?;
    let level_name = q.level.to_lowercase();
    let level = parse_level(&level_name);
    let n = u64::try_from(q.lines)
        .unwrap_or(0)
        .min(state.cfg().signals.spam_max_lines);

    for i in 0..n {
        emit(level, i, q.lines);
    }
    Ok(Json(json!({ "spammed": q.lines, "level": level_name })))
}
