//! Metric name and label definitions.
//!
//! Every metric emitted by msgrelay is named here so the set of exported
//! series can be read in one place.

/// HTTP gateway metrics
pub mod http {
    /// Total number of HTTP requests handled
    pub const REQUESTS_TOTAL: &str = "msgrelay_http_requests_total";
    /// Duration of HTTP requests in seconds
    pub const REQUEST_DURATION_SECONDS: &str = "msgrelay_http_request_duration_seconds";
}

/// Message service registry and dispatch metrics
pub mod msgsvc {
    /// Number of registered message services
    pub const REGISTERED: &str = "msgrelay_msgsvc_registered";
    /// Inbound messages handed to a message service
    pub const DISPATCH_TOTAL: &str = "msgrelay_msgsvc_dispatch_total";
    /// Inbound dispatch failures (topic missing, delivery failed, ...)
    pub const DISPATCH_ERRORS_TOTAL: &str = "msgrelay_msgsvc_dispatch_errors_total";
    /// Inbound messages no registered service accepted
    pub const UNROUTED_TOTAL: &str = "msgrelay_msgsvc_unrouted_total";
}

/// Webhook delivery metrics
pub mod webhook {
    /// Webhook notify calls, labelled by outcome
    pub const DELIVERIES_TOTAL: &str = "msgrelay_webhook_deliveries_total";
    /// Time spent delivering one notification to all webhook URLs
    pub const DELIVERY_DURATION_SECONDS: &str = "msgrelay_webhook_delivery_duration_seconds";
}

/// Common label keys used across metrics
pub mod labels {
    pub const ENDPOINT: &str = "endpoint";
    pub const METHOD: &str = "method";
    pub const STATUS: &str = "status";
    pub const SERVICE: &str = "service";
    pub const ERROR_TYPE: &str = "error_type";
}

/// Standard histogram buckets for different metric types
pub mod buckets {
    use once_cell::sync::Lazy;

    /// HTTP request duration buckets (in seconds)
    /// Covers 1ms to 60s
    pub static HTTP_DURATION: Lazy<Vec<f64>> = Lazy::new(|| {
        vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
        ]
    });

    /// Webhook delivery buckets (in seconds)
    /// Spans a fast local hook up to several timed-out endpoints in a row.
    pub static WEBHOOK_DURATION: Lazy<Vec<f64>> = Lazy::new(|| {
        vec![
            0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0,
        ]
    });
}
