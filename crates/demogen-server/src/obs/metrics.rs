//! Minimal metrics registry for the demo generator.
//!
//! Counter and histogram series carry dynamic labels, flattened into sorted
//! key vectors to keep deterministic ordering. Histogram observations are
//! accumulated in microseconds and rendered in seconds.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use demogen_core::burn::{BurnGauges, BurnLevel};

type LabelKey = Vec<(String, String)>;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
}

fn series(name: &str, labels: &str) -> String {
    if labels.is_empty() {
        name.to_string()
    } else {
        format!("{}{{{}}}", name, labels)
    }
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value of one series (0 when never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "counter");
        let mut rows: Vec<(String, u64)> = self
            .map
            .iter()
            .map(|r| (label_str(r.key()), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort();
        for (labels, val) in rows {
            let _ = writeln!(out, "{} {}", series(name, &labels), val);
        }
    }
}

/// Unlabelled float gauge (stored as `f64` bits).
pub struct Gauge {
    bits: AtomicU64,
}

impl Default for Gauge {
    fn default() -> Self {
        Self {
            bits: AtomicU64::new(0f64.to_bits()),
        }
    }
}

impl Gauge {
    pub fn set(&self, v: f64) {
        self.bits.store(v.to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "gauge");
        let _ = writeln!(out, "{} {}", name, self.get());
    }
}

// Latency buckets in microseconds:
// 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2s, 5s
const BUCKETS_MICROS: [u64; 9] = [
    10_000, 25_000, 50_000, 100_000, 250_000, 500_000, 1_000_000, 2_000_000, 5_000_000,
];

#[derive(Default)]
struct AtomicHistogram {
    count: AtomicU64,
    sum_micros: AtomicU64,
    buckets: [AtomicU64; BUCKETS_MICROS.len()],
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a duration and increment cumulative buckets.
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let hist = self
            .map
            .entry(label_key(labels))
            .or_insert_with(AtomicHistogram::default);
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum_micros.fetch_add(micros, Ordering::Relaxed);

        for (i, &b) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn count(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|h| h.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format (unit: seconds).
    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "histogram");
        let mut keys: Vec<LabelKey> = self.map.iter().map(|r| r.key().clone()).collect();
        keys.sort();
        for key in keys {
            let Some(hist) = self.map.get(&key) else {
                continue;
            };
            let labels = label_str(&key);
            let prefix = if labels.is_empty() {
                String::new()
            } else {
                format!("{},", labels)
            };

            for (i, &le) in BUCKETS_MICROS.iter().enumerate() {
                let count = hist.buckets[i].load(Ordering::Relaxed);
                let le_secs = le as f64 / 1_000_000.0;
                let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le_secs, count);
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, count);

            let sum = hist.sum_micros.load(Ordering::Relaxed) as f64 / 1_000_000.0;
            let _ = writeln!(out, "{} {}", series(&format!("{}_sum", name), &labels), sum);
            let _ = writeln!(out, "{} {}", series(&format!("{}_count", name), &labels), count);
        }
    }
}

#[derive(Default)]
pub struct DemoMetrics {
    /// labels: endpoint, status
    pub requests: CounterVec,
    /// labels: endpoint, type
    pub errors: CounterVec,
    /// labels: endpoint
    pub latency: HistogramVec,
    pub cpu_burn_level: Gauge,
    pub random_gauge: Gauge,
}

impl DemoMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render all registered metrics.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.requests.render("demo_requests_total", "Total requests", &mut out);
        self.errors.render("demo_errors_total", "Total errors", &mut out);
        self.latency.render("demo_request_latency_seconds", "Request latency", &mut out);
        self.cpu_burn_level.render("demo_cpu_burn_level", "CPU burn intensity (0-10)", &mut out);
        self.random_gauge.render("demo_random_gauge", "Random gauge for demos", &mut out);
        out
    }
}

impl BurnGauges for DemoMetrics {
    fn set_burn_level(&self, level: BurnLevel) {
        self.cpu_burn_level.set(f64::from(level.get()));
    }

    fn set_random_sample(&self, sample: f64) {
        self.random_gauge.set(sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_labels_are_order_insensitive() {
        let c = CounterVec::default();
        c.inc(&[("endpoint", "/ok"), ("status", "200")]);
        c.inc(&[("status", "200"), ("endpoint", "/ok")]);
        assert_eq!(c.get(&[("endpoint", "/ok"), ("status", "200")]), 2);

        let mut out = String::new();
        c.render("demo_requests_total", "Total requests", &mut out);
        assert!(out.contains("demo_requests_total{endpoint=\"/ok\",status=\"200\"} 2"));
    }

    #[test]
    fn histogram_buckets_are_cumulative_seconds() {
        let h = HistogramVec::default();
        h.observe(&[("endpoint", "/slow")], Duration::from_millis(30));
        h.observe(&[("endpoint", "/slow")], Duration::from_millis(800));

        let mut out = String::new();
        h.render("lat", "Request latency", &mut out);
        assert!(out.contains("lat_bucket{endpoint=\"/slow\",le=\"0.025\"} 0"));
        assert!(out.contains("lat_bucket{endpoint=\"/slow\",le=\"0.05\"} 1"));
        assert!(out.contains("lat_bucket{endpoint=\"/slow\",le=\"1\"} 2"));
        assert!(out.contains("lat_bucket{endpoint=\"/slow\",le=\"+Inf\"} 2"));
        assert!(out.contains("lat_count{endpoint=\"/slow\"} 2"));
        assert!(out.contains("lat_sum{endpoint=\"/slow\"} 0.83"));
    }

    #[test]
    fn burn_gauges_feed_registry() {
        let m = DemoMetrics::new();
        m.set_burn_level(BurnLevel::MAX);
        m.set_random_sample(0.25);

        let out = m.render();
        assert!(out.contains("# TYPE demo_cpu_burn_level gauge\ndemo_cpu_burn_level 10\n"));
        assert!(out.contains("demo_random_gauge 0.25\n"));
    }

    #[test]
    fn escapes_label_values() {
        assert_eq!(escape_label("a\"b\\c\nd"), "a\\\"b\\\\c\\nd");
    }
}
