//! Per-request access log.
//!
//! Emits one structured event on the `access_log` target for every request,
//! after the response has been produced. Only header *names* are recorded so
//! bearer tokens never reach the log sink.

use axum::{
    body::HttpBody,
    extract::Request,
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};

use crate::middleware::tracing::RequestId;

pub const ACCESS_LOG_TARGET: &str = "access_log";

pub async fn access_log_middleware(req: Request, next: Next) -> Response {
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let url = format!("http://{}{}", host, req.uri().path());
    let query = req.uri().query().unwrap_or("").to_string();
    let header_names = header_names(req.headers());
    let req_body_len = content_length(req.headers());
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.as_str().to_string())
        .unwrap_or_else(|| "-".to_string());

    let response = next.run(req).await;

    let status_class = status_class(response.status());
    let rsp_body_len = response.body().size_hint().exact();

    tracing::info!(
        target: ACCESS_LOG_TARGET,
        request_id = %request_id,
        url = %url,
        qs_params = %query,
        headers = %header_names,
        req_body_len = ?req_body_len,
        status_class = status_class,
        rsp_body_len = ?rsp_body_len,
        "request served"
    );

    response
}

/// Collapse a status code to its class label (`2xx`, `4xx`, ...).
pub fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() {
        0..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "",
    }
}

fn header_names(headers: &HeaderMap) -> String {
    let mut names: Vec<&str> = headers.keys().map(|k| k.as_str()).collect();
    names.sort_unstable();
    names.join(",")
}

fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}
