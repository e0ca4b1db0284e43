//! `/burn`: adjust the CPU burn level.
//!
//! Any integer is passed through; the controller owns range validation.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app_state::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct BurnQuery {
    #[serde(default)]
    pub level: i64,
}

pub async fn burn(
    State(state): State<AppState>,
    query: Result<Query<BurnQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(q) = query?;
    let level = state.burn().set_level(q.level)?;
    Ok(Json(json!({ "burn_level": level })))
}
