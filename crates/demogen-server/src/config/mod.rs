//! Config loader (strict parsing + env overrides).

pub mod schema;

use std::fs;
use std::path::Path;

use demogen_core::error::{DemoGenError, Result};

pub use schema::{
    AppSection, BurnSection, DemoConfig, LogFormat, LogSection, ServerSection, SignalsSection,
};

pub fn load_from_file(path: impl AsRef<Path>) -> Result<DemoConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(|e| {
        DemoGenError::Internal(format!("read config {} failed: {e}", path.display()))
    })?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<DemoConfig> {
    let cfg: DemoConfig = serde_yaml::from_str(s)
        .map_err(|e| DemoGenError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `path` if it exists (defaults otherwise), then apply `APP_NAME` and
/// `LOG_LEVEL` from the process environment.
pub fn load(path: impl AsRef<Path>) -> Result<DemoConfig> {
    let path = path.as_ref();
    let mut cfg = if path.exists() {
        load_from_file(path)?
    } else {
        DemoConfig::default()
    };
    cfg.apply_overrides(|k| std::env::var(k).ok());
    cfg.validate()?;
    Ok(cfg)
}
