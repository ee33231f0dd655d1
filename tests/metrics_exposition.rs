//! Metrics properties: paired gauge updates, counter accounting, and
//! exposition format validity.
//!
//! Everything lives in one test function: the recorder is process-global,
//! so parallel test functions hitting the same server would race the gauge
//! snapshot assertions.

use serde_json::Value;

mod common;

async fn scrape(client: &reqwest::Client, base_url: &str) -> String {
    let response = client
        .get(format!("{base_url}/metrics"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    response.text().await.unwrap()
}

/// Value of the first sample line matching the metric name and all label
/// fragments.
fn sample_value(body: &str, name: &str, labels: &[&str]) -> Option<f64> {
    body.lines()
        .filter(|line| !line.starts_with('#'))
        .filter(|line| line.starts_with(name))
        .find(|line| labels.iter().all(|l| line.contains(l)))
        .and_then(|line| line.split_whitespace().last())
        .and_then(|value| value.parse().ok())
}

#[tokio::test]
async fn metrics_properties_hold_across_a_burst() {
    let server = common::start_server().await;
    let client = reqwest::Client::new();

    let before = scrape(&client, &server.base_url).await;
    let gauge_before = sample_value(&before, "http_active_connections", &[])
        .expect("gauge should be exported");

    // Burst of completed requests against one route.
    for _ in 0..5 {
        let response = client
            .get(format!("{}/api/skills", server.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    let after = scrape(&client, &server.base_url).await;

    // Property: the counter for this exact (method, route, status) triple
    // equals the number of completed requests observed with it.
    let count = sample_value(
        &after,
        "http_requests_total",
        &[r#"method="GET""#, r#"route="/api/skills""#, r#"status="200""#],
    )
    .expect("counter should be exported");
    assert_eq!(count, 5.0);

    // Property: monotonically non-decreasing.
    client
        .get(format!("{}/api/skills", server.base_url))
        .send()
        .await
        .unwrap();
    let later = scrape(&client, &server.base_url).await;
    let count_later = sample_value(
        &later,
        "http_requests_total",
        &[r#"method="GET""#, r#"route="/api/skills""#, r#"status="200""#],
    )
    .unwrap();
    assert_eq!(count_later, 6.0);

    // Property: the gauge returns to its pre-burst value once all
    // in-flight requests complete (paired increment/decrement).
    let gauge_after = sample_value(&later, "http_active_connections", &[]).unwrap();
    assert_eq!(gauge_after, gauge_before);

    // Property: histogram observed the same number of samples.
    let histogram_count = sample_value(
        &later,
        "http_request_duration_seconds_count",
        &[r#"route="/api/skills""#],
    )
    .unwrap();
    assert_eq!(histogram_count, 6.0);

    // Unmatched paths collapse to the bounded "unmatched" label, never the
    // raw path.
    client
        .get(format!("{}/definitely/not/a/route", server.base_url))
        .send()
        .await
        .unwrap();
    let with_unmatched = scrape(&client, &server.base_url).await;
    assert!(with_unmatched.contains(r#"route="unmatched""#));
    assert!(!with_unmatched.contains("definitely/not/a/route"));

    // The body parses as exposition text: every sample line is
    // "<name or name{labels}> <float>".
    for line in with_unmatched.lines() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let value = line.split_whitespace().last().unwrap();
        assert!(
            value.parse::<f64>().is_ok() || value == "+Inf" || value == "NaN",
            "unparseable sample line: {line}"
        );
    }
    assert!(with_unmatched.contains("# TYPE http_requests_total counter"));
    assert!(with_unmatched.contains("# TYPE http_request_duration_seconds histogram"));

    // Error responses are counted under their status code.
    let missing: Value = client
        .get(format!("{}/api/projects/999", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(missing["success"], false);

    let with_404 = scrape(&client, &server.base_url).await;
    let not_found_count = sample_value(
        &with_404,
        "http_requests_total",
        &[r#"route="/api/projects/{id}""#, r#"status="404""#],
    )
    .unwrap();
    assert_eq!(not_found_count, 1.0);
}
