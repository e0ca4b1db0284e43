use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;

use demogen_core::burn::BurnTiming;
use demogen_core::error::{DemoGenError, Result};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DemoConfig {
    pub version: u32,

    #[serde(default)]
    pub app: AppSection,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub log: LogSection,

    #[serde(default)]
    pub burn: BurnSection,

    #[serde(default)]
    pub signals: SignalsSection,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            version: 1,
            app: AppSection::default(),
            server: ServerSection::default(),
            log: LogSection::default(),
            burn: BurnSection::default(),
            signals: SignalsSection::default(),
        }
    }
}

impl DemoConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(DemoGenError::UnsupportedVersion);
        }
        self.app.validate()?;
        self.server.validate()?;
        self.log.validate()?;
        self.burn.validate()?;
        self.signals.validate()?;
        Ok(())
    }

    /// Apply `APP_NAME` / `LOG_LEVEL` overrides from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("APP_NAME").filter(|v| !v.trim().is_empty()) {
            self.app.name = name;
        }
        if let Some(level) = lookup("LOG_LEVEL").filter(|v| !v.trim().is_empty()) {
            self.log.level = normalize_level(&level);
        }
    }
}

/// `WARNING` -> `warn`, `CRITICAL` -> `error`, otherwise lower-cased.
fn normalize_level(level: &str) -> String {
    match level.trim().to_ascii_lowercase().as_str() {
        "warning" => "warn".into(),
        "critical" | "fatal" => "error".into(),
        other => other.into(),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    #[serde(default = "default_app_name")]
    pub name: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: default_app_name(),
        }
    }
}

impl AppSection {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DemoGenError::BadRequest("app.name must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            DemoGenError::BadRequest(format!("server.listen must be a valid SocketAddr: {e}"))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl LogSection {
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.level.as_str()) {
            return Err(DemoGenError::BadRequest(format!(
                "log.level must be one of {:?}, got {:?}",
                LOG_LEVELS, self.level
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BurnSection {
    #[serde(default = "default_spin_per_level_ms")]
    pub spin_per_level_ms: u64,

    #[serde(default = "default_rest_ms")]
    pub rest_ms: u64,

    #[serde(default = "default_idle_ms")]
    pub idle_ms: u64,
}

impl Default for BurnSection {
    fn default() -> Self {
        Self {
            spin_per_level_ms: default_spin_per_level_ms(),
            rest_ms: default_rest_ms(),
            idle_ms: default_idle_ms(),
        }
    }
}

impl BurnSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.spin_per_level_ms) {
            return Err(DemoGenError::BadRequest(
                "burn.spin_per_level_ms must be between 1 and 100".into(),
            ));
        }
        if !(1..=10_000).contains(&self.rest_ms) {
            return Err(DemoGenError::BadRequest(
                "burn.rest_ms must be between 1 and 10000".into(),
            ));
        }
        if !(1..=10_000).contains(&self.idle_ms) {
            return Err(DemoGenError::BadRequest(
                "burn.idle_ms must be between 1 and 10000".into(),
            ));
        }
        Ok(())
    }

    pub fn timing(&self) -> BurnTiming {
        BurnTiming {
            spin_per_level: Duration::from_millis(self.spin_per_level_ms),
            rest: Duration::from_millis(self.rest_ms),
            idle: Duration::from_millis(self.idle_ms),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignalsSection {
    /// Upper bound on lines emitted by one `/spam-logs` call.
    #[serde(default = "default_spam_max_lines")]
    pub spam_max_lines: u64,

    /// Simulated downstream timeout for `/error?kind=timeout`.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for SignalsSection {
    fn default() -> Self {
        Self {
            spam_max_lines: default_spam_max_lines(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SignalsSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=100_000).contains(&self.spam_max_lines) {
            return Err(DemoGenError::BadRequest(
                "signals.spam_max_lines must be between 1 and 100000".into(),
            ));
        }
        if self.timeout_ms > 60_000 {
            return Err(DemoGenError::BadRequest(
                "signals.timeout_ms must not exceed 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_app_name() -> String {
    "demo-generator".into()
}
fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_log_level() -> String {
    "info".into()
}
fn default_spin_per_level_ms() -> u64 {
    20
}
fn default_rest_ms() -> u64 {
    50
}
fn default_idle_ms() -> u64 {
    200
}
fn default_spam_max_lines() -> u64 {
    5000
}
fn default_timeout_ms() -> u64 {
    2500
}
