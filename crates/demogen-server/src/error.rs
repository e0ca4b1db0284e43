//! HTTP mapping for core errors.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use demogen_core::error::DemoGenError;

/// Core error surfaced through axum.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub DemoGenError);

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(DemoGenError::BadRequest(msg.into()))
    }

    pub fn status(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::bad_request(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "code": self.0.client_code().as_str(),
                "msg": self.0.to_string(),
            }
        });
        (self.status(), Json(body)).into_response()
    }
}
