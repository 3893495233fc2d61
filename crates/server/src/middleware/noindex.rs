use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

const X_ROBOTS_TAG: &str = "x-robots-tag";

/// Tell search crawlers not to index anything this server returns
pub async fn noindex_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(X_ROBOTS_TAG, HeaderValue::from_static("noindex"));
    response
}
