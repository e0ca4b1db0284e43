//! Axum router wiring.
//!
//! Signal routes sit behind the `observe` middleware; `/health` and
//! `/metrics` are not counted.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, ops, signals};

pub fn build_router(state: AppState) -> Router {
    let signal_routes = Router::new()
        .route("/ok", get(signals::ok))
        .route("/warn", get(signals::warn))
        .route("/error", get(signals::error))
        .route("/slow", get(signals::slow))
        .route("/spam-logs", get(signals::spam_logs))
        .route("/burn", get(signals::burn))
        .route_layer(middleware::from_fn_with_state(state.clone(), signals::observe));

    Router::new()
        .route("/health", get(ops::health))
        .route("/metrics", get(ops::metrics))
        .merge(signal_routes)
        .with_state(state)
}
