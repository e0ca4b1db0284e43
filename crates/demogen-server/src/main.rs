//! demogen server
//!
//! - Signal endpoints: /ok, /warn, /error, /slow, /spam-logs, /burn
//! - Ops endpoints: /health, /metrics
//! - Background CPU burner on a dedicated thread

use demogen_core::error::{DemoGenError, Result};
use demogen_server::{app_state::AppState, config, logging, router};

const DEFAULT_CONFIG_PATH: &str = "demogen.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    let path = std::env::var("DEMOGEN_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    let cfg = config::load(&path)?;
    logging::init(&cfg.log)?;

    let listen = cfg.server.listen_addr()?;
    let state = AppState::new(cfg);
    let _burner = state.spawn_burner()?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, app = %state.app_name(), "demogen-server starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| DemoGenError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| DemoGenError::Internal(format!("server failed: {e}")))?;

    tracing::info!("demogen-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "ctrl-c handler failed");
        std::future::pending::<()>().await;
    }
}
