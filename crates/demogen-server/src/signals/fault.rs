//! `/error`: simulated failures.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use demogen_core::error::{DemoGenError, Result};

use crate::app_state::AppState;
use crate::error::ApiError;

const ENDPOINT: &str = "/error";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultKind {
    #[default]
    Exception,
    Http500,
    Timeout,
}

impl FaultKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FaultKind::Exception => "exception",
            FaultKind::Http500 => "http500",
            FaultKind::Timeout => "timeout",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ErrorQuery {
    #[serde(default)]
    pub kind: FaultKind,
}

fn divide(a: i64, b: i64) -> Result<i64> {
    a.checked_div(b)
        .ok_or_else(|| DemoGenError::Internal("division by zero".into()))
}

pub async fn error(
    State(state): State<AppState>,
    query: std::result::Result<Query<ErrorQuery>, QueryRejection>,
) -> std::result::Result<Response, ApiError> {
    let Query(q) = query?;
    let kind = q.kind;
    tracing::error!(kind = kind.as_str(), "Simulated error trigger");
    state
        .metrics()
        .errors
        .inc(&[("endpoint", ENDPOINT), ("type", kind.as_str())]);

    match kind {
        FaultKind::Exception => {
            let v = divide(1, 0).map_err(|e| {
                tracing::error!(exc = %e, "Exception occurred");
                e
            })?;
            Ok(Json(json!({ "result": v })).into_response())
        }
        FaultKind::Http500 => {
            Ok((StatusCode::INTERNAL_SERVER_ERROR, "internal error (simulated)").into_response())
        }
        FaultKind::Timeout => {
            tokio::time::sleep(state.cfg().signals.timeout()).await;
            Ok((StatusCode::GATEWAY_TIMEOUT, "gateway timeout (simulated)").into_response())
        }
    }
}
