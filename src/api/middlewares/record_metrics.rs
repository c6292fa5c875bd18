use std::sync::Arc;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use tokio::time::Instant;

use crate::telemetry::Metrics;

/// Endpoint label for requests that reached the fallback.
const UNMATCHED_ENDPOINT: &str = "unmatched";

fn get_labels(req: &Request) -> (String, String) {
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(
            || UNMATCHED_ENDPOINT.to_string(),
            |matched_path| matched_path.as_str().to_string(),
        );

    (req.method().as_str().to_string(), endpoint)
}

pub async fn record_metrics(
    State(metrics): State<Arc<Metrics>>,
    req: Request,
    next: Next,
) -> Response {
    let (method, endpoint) = get_labels(&req);

    metrics.http_requests_pending(&method, &endpoint).inc();

    let start = Instant::now();
    let response = next.run(req).await;

    let status_code = response.status().as_u16().to_string();
    let duration_seconds = start.elapsed().as_secs_f64();

    metrics.http_requests_pending(&method, &endpoint).dec();
    metrics
        .http_requests_total(&method, &endpoint, &status_code)
        .inc();
    metrics
        .http_requests_duration_seconds(&method, &endpoint, &status_code)
        .observe(duration_seconds);

    response
}
