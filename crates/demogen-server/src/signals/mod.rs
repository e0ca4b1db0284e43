//! Signal endpoints: each request maps to a log record, metric updates, and a
//! canned response.
//!
//! `observe` wraps every signal route: it opens the request span, counts
//! `demo_requests_total` by returned status, and observes latency through a
//! drop guard so cancelled requests are still timed.

pub mod basic;
pub mod burn;
pub mod fault;
pub mod spam;

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

use crate::app_state::AppState;

pub use basic::{ok, slow, warn};
pub use burn::burn;
pub use fault::error;
pub use spam::spam_logs;

struct RequestTimer {
    state: AppState,
    endpoint: String,
    start: Instant,
}

impl RequestTimer {
    fn start(state: AppState, endpoint: String) -> Self {
        Self {
            state,
            endpoint,
            start: Instant::now(),
        }
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        self.state
            .metrics()
            .latency
            .observe(&[("endpoint", self.endpoint.as_str())], self.start.elapsed());
    }
}

pub async fn observe(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    let span = tracing::info_span!("request", app = %state.app_name(), endpoint = %endpoint);
    let _timer = RequestTimer::start(state.clone(), endpoint.clone());

    let resp = next.run(req).instrument(span).await;

    state
        .metrics()
        .requests
        .inc(&[("endpoint", endpoint.as_str()), ("status", resp.status().as_str())]);
    resp
}
