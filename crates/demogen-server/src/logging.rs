//! Subscriber setup.
//!
//! `RUST_LOG` wins over the configured level when set.

use tracing_subscriber::{fmt, EnvFilter};

use demogen_core::error::{DemoGenError, Result};

use crate::config::{LogFormat, LogSection};

pub fn init(cfg: &LogSection) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));

    let res = match cfg.format {
        LogFormat::Json => fmt()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_env_filter(filter)
            .try_init(),
        LogFormat::Text => fmt().with_env_filter(filter).try_init(),
    };
    res.map_err(|e| DemoGenError::Internal(format!("logging init failed: {e}")))
}

/// Map a free-form level name onto a tracing level. Unknown names are INFO.
pub fn parse_level(name: &str) -> tracing::Level {
    match name {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "warn" | "warning" => tracing::Level::WARN,
        "error" | "critical" | "exception" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
