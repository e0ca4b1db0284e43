//! Burn controller: level cell + spin/rest loop.
//!
//! The level lives in an `AtomicU8`. Setters store, the loop loads once per
//! iteration, and no lock is held while spinning, so `set_level` is never
//! starved by the burn phase.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{dispatcher, Dispatch, Span};

use super::level::BurnLevel;
use crate::error::Result;

/// Gauge-style sinks fed by the burn loop on every iteration.
pub trait BurnGauges: Send + Sync {
    fn set_burn_level(&self, level: BurnLevel);
    /// Uniform sample in `[0, 1)`, independent of the level.
    fn set_random_sample(&self, sample: f64);
}

/// Loop pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurnTiming {
    /// Spin time per level unit (level 10 => 10x this).
    pub spin_per_level: Duration,
    /// Sleep after a spin phase.
    pub rest: Duration,
    /// Sleep when the level is 0.
    pub idle: Duration,
}

impl Default for BurnTiming {
    fn default() -> Self {
        Self {
            spin_per_level: Duration::from_millis(20),
            rest: Duration::from_millis(50),
            idle: Duration::from_millis(200),
        }
    }
}

impl BurnTiming {
    pub fn spin_for(&self, level: BurnLevel) -> Duration {
        self.spin_per_level * u32::from(level.get())
    }
}

/// Outcome of one loop iteration.
#[derive(Debug, Clone, Copy)]
pub struct Iteration {
    pub level: BurnLevel,
    pub sample: f64,
    /// Measured busy-spin time. Zero on the idle path.
    pub spun: Duration,
}

/// Owns the burn level and drives the burn loop.
#[derive(Debug)]
pub struct BurnController {
    level: AtomicU8,
    timing: BurnTiming,
}

impl Default for BurnController {
    fn default() -> Self {
        Self::new(BurnTiming::default())
    }
}

impl BurnController {
    pub fn new(timing: BurnTiming) -> Self {
        Self {
            level: AtomicU8::new(BurnLevel::MIN.get()),
            timing,
        }
    }

    pub fn timing(&self) -> BurnTiming {
        self.timing
    }

    /// Current level. No side effects.
    pub fn level(&self) -> BurnLevel {
        BurnLevel::from_stored(self.level.load(Ordering::Acquire))
    }

    /// Replace the level. Rejects anything outside `0..=10` without touching
    /// the stored value.
    pub fn set_level(&self, n: i64) -> Result<BurnLevel> {
        let level = BurnLevel::new(n)?;
        self.level.store(level.get(), Ordering::Release);
        tracing::warn!(level = level.get(), "CPU burn updated");
        Ok(level)
    }

    /// Run exactly one iteration of the burn loop.
    pub fn tick(&self, gauges: &dyn BurnGauges) -> Iteration {
        let level = self.level();
        let sample: f64 = rand::thread_rng().gen();

        gauges.set_burn_level(level);
        gauges.set_random_sample(sample);

        if level.is_idle() {
            thread::sleep(self.timing.idle);
            return Iteration {
                level,
                sample,
                spun: Duration::ZERO,
            };
        }

        let spun = spin(self.timing.spin_for(level));
        thread::sleep(self.timing.rest);
        Iteration { level, sample, spun }
    }

    /// The burn loop. Never returns; a panicking iteration is logged and the
    /// loop moves on.
    pub fn run(&self, gauges: &dyn BurnGauges) {
        tracing::info!(timing = ?self.timing, "cpu burner started");
        loop {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| self.tick(gauges))) {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!(%reason, "cpu burner iteration failed");
                thread::sleep(self.timing.idle);
            }
        }
    }

    /// Start `run` on a dedicated OS thread so spinning never occupies an
    /// async worker. The thread keeps the caller's dispatcher and every
    /// record the loop emits is tagged by `span`.
    pub fn spawn(
        self: &Arc<Self>,
        gauges: Arc<dyn BurnGauges>,
        span: Span,
    ) -> io::Result<JoinHandle<()>> {
        let this = Arc::clone(self);
        let dispatch = dispatcher::get_default(Dispatch::clone);
        thread::Builder::new()
            .name("cpu-burner".into())
            .spawn(move || {
                dispatcher::with_default(&dispatch, || {
                    let _entered = span.enter();
                    this.run(gauges.as_ref())
                })
            })
    }
}

/// Busy-spin until `budget` has elapsed. No yield or sleep inside the window.
fn spin(budget: Duration) -> Duration {
    let start = Instant::now();
    let deadline = start + budget;
    let mut acc = 0u64;
    while Instant::now() < deadline {
        acc = std::hint::black_box(acc.wrapping_mul(31).wrapping_add(7));
    }
    start.elapsed()
}
