//! Prometheus metrics collection middleware
//!
//! Records `http_requests_total` (counter) and `http_request_duration_seconds`
//! (histogram) for every request, with method/path/status labels.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Collapse request paths to a fixed label set.
/// Image file names share one label and unknown paths are grouped.
fn normalize_path(path: &str) -> &'static str {
    match path {
        "/" => "/",
        "/scripts.js" => "/scripts.js",
        "/styles.css" => "/styles.css",
        "/diagnose" => "/diagnose",
        "/veterinary-details" => "/veterinary-details",
        "/health" => "/health",
        "/metrics" => "/metrics",
        p if p.starts_with("/images/") => "/images/{file}",
        _ => "other",
    }
}

/// Middleware that records request count and duration metrics.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    let start = Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();

    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path,
        "status" => status
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(duration);

    response
}

#[cfg(test)]
mod tests {
    use super::normalize_path;

    #[test]
    fn image_paths_share_a_label() {
        assert_eq!(normalize_path("/images/cat.png"), "/images/{file}");
        assert_eq!(normalize_path("/images/sub/dog.jpg"), "/images/{file}");
    }

    #[test]
    fn unknown_paths_are_grouped() {
        assert_eq!(normalize_path("/wp-admin"), "other");
        assert_eq!(normalize_path("/diagnose"), "/diagnose");
    }
}
