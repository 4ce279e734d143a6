//! Client metrics.
//!
//! # Metrics
//! - `nakadi_client_requests_total` (counter): attempts by method and status
//!   (`status="error"` when no response arrived)
//! - `nakadi_client_retries_total` (counter): retry sleeps by operation

/// Record one HTTP attempt.
pub fn record_request(method: &str, status: Option<u16>) {
    let status = status.map_or_else(|| "error".to_string(), |s| s.to_string());
    ::metrics::counter!(
        "nakadi_client_requests_total",
        "method" => method.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Record a retry after a transient failure.
pub fn record_retry(operation: &'static str) {
    ::metrics::counter!("nakadi_client_retries_total", "operation" => operation).increment(1);
}
