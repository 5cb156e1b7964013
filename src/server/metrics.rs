use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all metadata-server metrics
const PREFIX: &str = "movie_metadata";

lazy_static! {
    // Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Upstream Provider Metrics
    pub static ref UPSTREAM_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_upstream_requests_total"), "Total upstream provider requests"),
        &["endpoint", "outcome"]
    ).expect("Failed to create upstream_requests_total metric");

    pub static ref UPSTREAM_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_upstream_request_duration_seconds"),
            "Upstream provider request duration in seconds"
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]),
        &["endpoint"]
    ).expect("Failed to create upstream_request_duration_seconds metric");

    // Cache Metrics
    pub static ref CACHE_LOOKUPS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_cache_lookups_total"), "Cache lookups by outcome"),
        &["outcome"]
    ).expect("Failed to create cache_lookups_total metric");

    pub static ref CACHE_ENTRIES: Gauge = Gauge::new(
        format!("{PREFIX}_cache_entries"),
        "Number of cached movie records"
    ).expect("Failed to create cache_entries metric");

    // Error Metrics
    pub static ref LOOKUP_FAILURES_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_lookup_failures_total"), "Failed lookups by error kind"),
        &["kind"]
    ).expect("Failed to create lookup_failures_total metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Register all metrics - ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(UPSTREAM_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(UPSTREAM_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(CACHE_LOOKUPS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(CACHE_ENTRIES.clone()));
    let _ = REGISTRY.register(Box::new(LOOKUP_FAILURES_TOTAL.clone()));

    tracing::info!("Metrics system initialized successfully");
}

/// Initialize the cache gauge from the persisted store
pub fn init_cache_metrics(cached_records: usize) {
    CACHE_ENTRIES.set(cached_records as f64);
    tracing::info!("Cache metrics initialized: {} records", cached_records);
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

/// Record one upstream provider call
pub fn record_upstream_request(endpoint: &str, outcome: &str, duration: Duration) {
    UPSTREAM_REQUESTS_TOTAL
        .with_label_values(&[endpoint, outcome])
        .inc();

    UPSTREAM_REQUEST_DURATION_SECONDS
        .with_label_values(&[endpoint])
        .observe(duration.as_secs_f64());
}

/// Record a cache lookup outcome ("hit", "miss" or "expired")
pub fn record_cache_lookup(outcome: &str) {
    CACHE_LOOKUPS_TOTAL.with_label_values(&[outcome]).inc();
}

/// Update the cached-records gauge
pub fn set_cache_entries(count: usize) {
    CACHE_ENTRIES.set(count as f64);
}

/// Record a failed lookup
pub fn record_lookup_failure(kind: &str) {
    LOOKUP_FAILURES_TOTAL.with_label_values(&[kind]).inc();
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_else(|_| String::from(""));
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
