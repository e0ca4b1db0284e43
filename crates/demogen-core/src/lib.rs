//! demogen core: the CPU burn controller, its level type, and the shared error
//! surface.
//!
//! This crate carries no HTTP or async runtime dependencies. The server crate
//! injects a [`burn::BurnController`] into both its request handlers and the
//! background burner thread, and plugs its metrics registry in through
//! [`burn::BurnGauges`].
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `DemoGenError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod burn;
pub mod error;

/// Shared result type.
pub use error::{Result, DemoGenError};
