//! HTTP request metrics middleware.

use std::time::Instant;

use {
    axum::{
        body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response,
    },
    msgrelay_metrics::{counter, histogram, http as http_metrics, labels},
};

/// Records `msgrelay_http_requests_total` and
/// `msgrelay_http_request_duration_seconds` per endpoint, method and status.
pub async fn http_metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    // Label by route template, never the raw path, to bound cardinality.
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |p| p.as_str().to_string());

    let response = next.run(request).await;
    let status = response.status().as_u16().to_string();

    counter!(
        http_metrics::REQUESTS_TOTAL,
        labels::ENDPOINT => endpoint.clone(),
        labels::METHOD => method.clone(),
        labels::STATUS => status.clone()
    )
    .increment(1);

    histogram!(
        http_metrics::REQUEST_DURATION_SECONDS,
        labels::ENDPOINT => endpoint,
        labels::METHOD => method,
        labels::STATUS => status
    )
    .record(start.elapsed().as_secs_f64());

    response
}
