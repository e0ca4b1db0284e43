#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{self, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use demogen_server::{app_state::AppState, config::DemoConfig, router};

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn test_app(cfg: DemoConfig) -> (AppState, Router) {
    let state = AppState::new(cfg);
    let app = router::build_router(state.clone());
    (state, app)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_str(&body).unwrap())
}

#[tokio::test]
async fn burn_sets_level() {
    let (state, app) = test_app(DemoConfig::default());

    let (status, body) = get_json(&app, "/burn?level=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "burn_level": 7 }));
    assert_eq!(state.burn().level().get(), 7);

    let (_, body) = get_json(&app, "/burn").await;
    assert_eq!(body, json!({ "burn_level": 0 }));
}

#[tokio::test]
async fn burn_rejects_out_of_range() {
    let (state, app) = test_app(DemoConfig::default());
    get(&app, "/burn?level=3").await;

    for uri in ["/burn?level=11", "/burn?level=-1", "/burn?level=1000"] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"]["code"], "INVALID_LEVEL");
    }
    assert_eq!(state.burn().level().get(), 3);
    assert_eq!(
        state.metrics().requests.get(&[("endpoint", "/burn"), ("status", "400")]),
        3
    );
}

#[tokio::test]
async fn burn_rejects_non_integer() {
    let (_, app) = test_app(DemoConfig::default());
    let (status, body) = get_json(&app, "/burn?level=high").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn ok_counts_and_times_request() {
    let (state, app) = test_app(DemoConfig::default());

    let (status, body) = get_json(&app, "/ok?user=alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "user": "alice" }));

    let (_, body) = get_json(&app, "/ok").await;
    assert_eq!(body, json!({ "ok": true, "user": null }));

    let m = state.metrics();
    assert_eq!(m.requests.get(&[("endpoint", "/ok"), ("status", "200")]), 2);
    assert_eq!(m.latency.count(&[("endpoint", "/ok")]), 2);
}

#[tokio::test]
async fn warn_replies() {
    let (_, app) = test_app(DemoConfig::default());
    let (status, body) = get_json(&app, "/warn").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "warn": true }));
}

#[tokio::test]
async fn error_kinds() {
    let mut cfg = DemoConfig::default();
    cfg.signals.timeout_ms = 10;
    let (state, app) = test_app(cfg);

    let (status, body) = get(&app, "/error?kind=http500").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "internal error (simulated)");

    let (status, body) = get_json(&app, "/error").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "INTERNAL");

    let (status, body) = get(&app, "/error?kind=timeout").await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body, "gateway timeout (simulated)");

    let (status, body) = get_json(&app, "/error?kind=meltdown").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let m = state.metrics();
    for ty in ["http500", "exception", "timeout"] {
        assert_eq!(m.errors.get(&[("endpoint", "/error"), ("type", ty)]), 1, "{ty}");
    }
    assert_eq!(m.requests.get(&[("endpoint", "/error"), ("status", "500")]), 2);
    assert_eq!(m.requests.get(&[("endpoint", "/error"), ("status", "504")]), 1);
}

#[tokio::test]
async fn slow_waits_and_ignores_negative_delay() {
    let (_, app) = test_app(DemoConfig::default());

    let (status, body) = get_json(&app, "/slow?ms=-5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "slow": true, "ms": -5 }));

    let start = std::time::Instant::now();
    let (_, body) = get_json(&app, "/slow?ms=30").await;
    assert!(start.elapsed() >= Duration::from_millis(30));
    assert_eq!(body["ms"], 30);
}

#[tokio::test]
async fn spam_logs_echoes_request() {
    let (_, app) = test_app(DemoConfig::default());

    let (status, body) = get_json(&app, "/spam-logs?lines=3&level=WARNING").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "spammed": 3, "level": "warning" }));

    let (_, body) = get_json(&app, "/spam-logs").await;
    assert_eq!(body, json!({ "spammed": 200, "level": "info" }));
}

#[tokio::test]
async fn health_is_not_counted() {
    let (state, app) = test_app(DemoConfig::default());

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "app": "demo-generator" }));
    assert_eq!(
        state.metrics().requests.get(&[("endpoint", "/health"), ("status", "200")]),
        0
    );
}

#[tokio::test]
async fn metrics_expose_burn_gauges() {
    let mut cfg = DemoConfig::default();
    cfg.burn.spin_per_level_ms = 1;
    cfg.burn.rest_ms = 1;
    cfg.burn.idle_ms = 5;
    let (state, app) = test_app(cfg);
    let _burner = state.spawn_burner().unwrap();

    get(&app, "/burn?level=3").await;
    get(&app, "/ok").await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain; version=0.0.4"));
    let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(text.contains("\ndemo_cpu_burn_level 3\n"), "{text}");
    assert!(text.contains("# TYPE demo_random_gauge gauge"));
    assert!(text.contains("demo_requests_total{endpoint=\"/ok\",status=\"200\"} 1"));
    assert!(text.contains("demo_request_latency_seconds_count{endpoint=\"/ok\"} 1"));

    let sample = state.metrics().random_gauge.get();
    assert!((0.0..1.0).contains(&sample));

    state.burn().set_level(0).unwrap();
}

#[tokio::test]
async fn spam_logs_caps_emitted_records() {
    let mut cfg = DemoConfig::default();
    cfg.signals.spam_max_lines = 5;
    let (_, app) = test_app(cfg);

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .without_time()
        .finish();
    // current-thread runtime: the handler runs on this thread
    let _guard = tracing::subscriber::set_default(subscriber);

    let (status, body) = get_json(&app, "/spam-logs?lines=50&level=error").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "spammed": 50, "level": "error" }));

    let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    let lines: Vec<&str> = text.lines().filter(|l| l.contains("Spam log line")).collect();
    assert_eq!(lines.len(), 5, "{text}");
    assert!(lines.iter().all(|l| l.contains("ERROR") && l.contains("batch=50")));
    assert!(lines[0].contains("endpoint=/spam-logs"), "{}", lines[0]);
}

#[tokio::test]
async fn malformed_queries_get_json_errors() {
    let (state, app) = test_app(DemoConfig::default());

    for uri in [
        "/slow?ms=soon",
        "/spam-logs?lines=many",
        "/error?kind=42x",
        "/burn?level=high",
    ] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"]["code"], "BAD_REQUEST", "{uri}");
        assert!(body["error"]["msg"].as_str().unwrap().starts_with("bad request:"));
    }
    assert_eq!(
        state.metrics().requests.get(&[("endpoint", "/slow"), ("status", "400")]),
        1
    );
}
