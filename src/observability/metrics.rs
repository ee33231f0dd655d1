//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): completed requests by method, route, status
//! - `http_request_duration_seconds` (histogram): latency distribution, same labels
//! - `http_active_connections` (gauge): requests currently in flight
//! - `process_start_time_seconds` / `process_uptime_seconds` (gauges)
//!
//! # Design Decisions
//! - Route labels come from the matched route pattern, never the raw path;
//!   anything the router does not match records under the fixed label
//!   `unmatched`, so cardinality is bounded by the route table
//! - Counters reset on restart; a scrape-based collector tolerates the
//!   discontinuity
//! - Histogram buckets tuned for typical web latencies

use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

pub const REQUESTS_TOTAL: &str = "http_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
pub const ACTIVE_CONNECTIONS: &str = "http_active_connections";

/// Route label recorded for paths the router did not match.
pub const UNMATCHED_ROUTE: &str = "unmatched";

const DURATION_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

static RECORDER: OnceLock<PrometheusHandle> = OnceLock::new();
static INSTALL_LOCK: Mutex<()> = Mutex::new(());

/// Install the global Prometheus recorder and return its render handle.
///
/// Idempotent: repeated calls (including from parallel tests) return the
/// handle installed first.
pub fn install() -> Result<PrometheusHandle, BuildError> {
    let _guard = INSTALL_LOCK.lock().expect("metrics install lock poisoned");

    if let Some(handle) = RECORDER.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION_SECONDS.to_string()),
            DURATION_BUCKETS,
        )?
        .install_recorder()?;

    describe_counter!(
        REQUESTS_TOTAL,
        "Completed HTTP requests by method, route and status code."
    );
    describe_histogram!(
        REQUEST_DURATION_SECONDS,
        Unit::Seconds,
        "HTTP request latency by method, route and status code."
    );
    describe_gauge!(ACTIVE_CONNECTIONS, "HTTP requests currently in flight.");
    describe_gauge!(
        "process_start_time_seconds",
        "Unix timestamp of process start."
    );
    describe_gauge!("process_uptime_seconds", "Seconds since process start.");

    let _ = RECORDER.set(handle.clone());
    Ok(handle)
}

/// Axum middleware observing every request/response cycle.
///
/// Increments the in-flight gauge on entry; on completion records the
/// elapsed time and the (method, route, status) counter, then decrements
/// the gauge. The framework drives the response future to completion
/// exactly once per request, so increments and decrements stay paired.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

    gauge!(ACTIVE_CONNECTIONS).increment(1.0);

    let response = next.run(request).await;

    let labels = [
        ("method", method),
        ("route", route),
        ("status", response.status().as_u16().to_string()),
    ];
    histogram!(REQUEST_DURATION_SECONDS, &labels).record(start.elapsed().as_secs_f64());
    counter!(REQUESTS_TOTAL, &labels).increment(1);
    gauge!(ACTIVE_CONNECTIONS).decrement(1.0);

    response
}

/// Render the exposition text, refreshing the process-level gauges first.
pub fn render(handle: &PrometheusHandle, started: Instant, started_unix_secs: f64) -> String {
    gauge!("process_start_time_seconds").set(started_unix_secs);
    gauge!("process_uptime_seconds").set(started.elapsed().as_secs_f64());
    handle.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_is_idempotent() {
        let first = install().unwrap();
        let second = install().unwrap();

        // Both handles render the same registry.
        counter!(REQUESTS_TOTAL, &[("method", "GET"), ("route", "/test"), ("status", "200")])
            .increment(1);
        assert!(first.render().contains(REQUESTS_TOTAL));
        assert!(second.render().contains(REQUESTS_TOTAL));
    }

    #[test]
    fn render_includes_process_gauges() {
        let handle = install().unwrap();
        let body = render(&handle, Instant::now(), 1_700_000_000.0);

        assert!(body.contains("process_start_time_seconds"));
        assert!(body.contains("process_uptime_seconds"));
    }
}
