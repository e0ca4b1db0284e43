//! demogen server library entry.
//!
//! Wires config, logging, the metrics registry, the signal endpoints and the
//! CPU burn controller into an axum service. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod error;
pub mod logging;
pub mod obs;
pub mod ops;
pub mod router;
pub mod signals;
