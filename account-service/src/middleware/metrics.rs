use crate::services::metrics::{HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS};
use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

/// Label used for requests that matched no route.
const UNMATCHED_PATH: &str = "unmatched";

/// Record request count and latency per route template.
///
/// The path label is the matched route (`/balance`), never the raw URI, so
/// query strings and unknown paths cannot grow the label set.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH.to_string());

    let response = next.run(req).await;

    let elapsed = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();
    let labels = [method.as_str(), path.as_str(), status.as_str()];

    if let Some(counter) = HTTP_REQUESTS_TOTAL.get() {
        counter.with_label_values(&labels).inc();
    }
    if let Some(histogram) = HTTP_REQUEST_DURATION_SECONDS.get() {
        histogram.with_label_values(&labels).observe(elapsed);
    }

    response
}
