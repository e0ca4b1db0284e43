//! Lightweight in-process metrics.
//!
//! Metrics are stored as atomics behind `DashMap` label maps and rendered in
//! Prometheus text exposition format by the `/metrics` handler. The registry
//! also acts as the burn loop's gauge sink.

pub mod metrics;

pub use metrics::DemoMetrics;
