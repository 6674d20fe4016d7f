//! Metric names and recorders for the API layer and view tracking.
//!
//! Only the `metrics` facade is used here. Without an installed recorder every call is a no-op.

pub const API_REQUESTS_TOTAL: &str = "rewrapped_api_requests_total";
pub const API_ERRORS_TOTAL: &str = "rewrapped_api_errors_total";
pub const API_REQUEST_DURATION_SECONDS: &str = "rewrapped_api_request_duration_seconds";
pub const VIEWS_TRACKED_TOTAL: &str = "rewrapped_event_views_tracked_total";
pub const VIEW_TRACKING_ERRORS_TOTAL: &str = "rewrapped_event_view_errors_total";

/// Register descriptions with whatever recorder the host process installed.
pub fn describe_metrics() {
    ::metrics::describe_counter!(API_REQUESTS_TOTAL, "Requests sent to the Re-Wrapped backend");
    ::metrics::describe_counter!(API_ERRORS_TOTAL, "Failed backend requests, labelled by kind");
    ::metrics::describe_histogram!(
        API_REQUEST_DURATION_SECONDS,
        ::metrics::Unit::Seconds,
        "Time until a response arrived"
    );
    ::metrics::describe_counter!(VIEWS_TRACKED_TOTAL, "Event views reported after debouncing");
    ::metrics::describe_counter!(VIEW_TRACKING_ERRORS_TOTAL, "Event view reports that failed");
}

pub struct ApiMetrics;

impl ApiMetrics {
    pub fn record_request(method: &str) {
        ::metrics::counter!(API_REQUESTS_TOTAL, "method" => method.to_string()).increment(1);
    }

    pub fn record_response(duration_secs: f64) {
        ::metrics::histogram!(API_REQUEST_DURATION_SECONDS).record(duration_secs);
    }

    /// `kind` is `transport` or `status`.
    pub fn record_error(kind: &'static str) {
        ::metrics::counter!(API_ERRORS_TOTAL, "kind" => kind).increment(1);
    }
}

pub struct TrackingMetrics;

impl TrackingMetrics {
    pub fn record_tracked() {
        ::metrics::counter!(VIEWS_TRACKED_TOTAL).increment(1);
    }

    pub fn record_error() {
        ::metrics::counter!(VIEW_TRACKING_ERRORS_TOTAL).increment(1);
    }
}
