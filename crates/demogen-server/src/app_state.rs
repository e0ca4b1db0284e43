//! Shared application state.
//!
//! The burn controller is owned here and handed to the burner thread; request
//! handlers reach it through the same `Arc`.

use std::sync::Arc;
use std::thread::JoinHandle;

use demogen_core::burn::{BurnController, BurnGauges};
use demogen_core::error::{DemoGenError, Result};

use crate::config::DemoConfig;
use crate::obs::DemoMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: DemoConfig,
    metrics: Arc<DemoMetrics>,
    burn: Arc<BurnController>,
}

impl AppState {
    pub fn new(cfg: DemoConfig) -> Self {
        let burn = Arc::new(BurnController::new(cfg.burn.timing()));
        Self::with_controller(cfg, burn)
    }

    /// Build state around an existing controller.
    pub fn with_controller(cfg: DemoConfig, burn: Arc<BurnController>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                metrics: Arc::new(DemoMetrics::new()),
                burn,
            }),
        }
    }

    pub fn cfg(&self) -> &DemoConfig {
        &self.inner.cfg
    }

    pub fn app_name(&self) -> &str {
        &self.inner.cfg.app.name
    }

    pub fn metrics(&self) -> &DemoMetrics {
        &self.inner.metrics
    }

    pub fn burn(&self) -> Arc<BurnController> {
        Arc::clone(&self.inner.burn)
    }

    /// Start the background burner, feeding this state's metrics registry.
    pub fn spawn_burner(&self) -> Result<JoinHandle<()>> {
        let gauges: Arc<dyn BurnGauges> = self.inner.metrics.clone();
        let span = tracing::info_span!("burner", app = %self.app_name());
        self.inner
            .burn
            .spawn(gauges, span)
            .map_err(|e| DemoGenError::Internal(format!("spawn cpu burner failed: {e}")))
    }
}
