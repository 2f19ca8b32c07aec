//! Prometheus metrics: request counting middleware and render endpoint

use std::time::Instant;

use axum::extract::{MatchedPath, State};
use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics_exporter_prometheus::PrometheusHandle;

/// Middleware that records a counter and latency histogram per request.
/// The matched route template keeps label cardinality bounded.
pub async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    let latency = started.elapsed().as_secs_f64();

    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status,
    )
    .increment(1);
    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
    )
    .record(latency);

    response
}

/// GET /metrics: render the Prometheus exposition text.
pub async fn render_metrics(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}
