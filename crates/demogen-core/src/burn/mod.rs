//! CPU burn simulation.
//!
//! A single adjustable level (0..=10) drives a background loop that spins a
//! core for `spin_per_level * level`, then rests. Level and a random sample are
//! pushed to gauges on every iteration.

pub mod controller;
pub mod level;

pub use controller::{BurnController, BurnGauges, BurnTiming, Iteration};
pub use level::BurnLevel;
