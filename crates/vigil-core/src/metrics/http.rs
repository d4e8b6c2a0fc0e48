//! The two fixed HTTP instruments recorded for every instrumented request.

use std::sync::Arc;

use crate::error::Result;

use super::{CounterVec, HistogramVec, MetricDesc, MetricRegistry};

pub const REQUESTS_TOTAL: MetricDesc<3> = MetricDesc::new(
    "http_requests_total",
    "Total number of HTTP requests",
    ["method", "endpoint", "status"],
);

pub const REQUEST_DURATION: MetricDesc<2> = MetricDesc::new(
    "http_request_duration_seconds",
    "Duration of HTTP requests in seconds",
    ["method", "endpoint"],
);

/// Handle to the request counter and duration histogram.
///
/// Cheap to clone; clones record into the same instruments.
#[derive(Clone)]
pub struct HttpMetrics {
    requests: Arc<CounterVec<3>>,
    duration: Arc<HistogramVec<2>>,
}

impl HttpMetrics {
    /// Create both instruments and register them. Fails if either name is
    /// already taken in `registry`.
    pub fn register(registry: &mut MetricRegistry) -> Result<Self> {
        let requests = Arc::new(CounterVec::new(REQUESTS_TOTAL));
        let duration = Arc::new(HistogramVec::new(REQUEST_DURATION));
        registry.register(requests.clone())?;
        registry.register(duration.clone())?;
        Ok(Self { requests, duration })
    }

    pub fn record_request(&self, method: &str, endpoint: &str, status_text: &str) {
        self.requests.inc([method, endpoint, status_text]);
    }

    pub fn record_duration(&self, method: &str, endpoint: &str, seconds: f64) {
        self.duration.observe([method, endpoint], seconds);
    }

    /// Counter value for a tuple; 0 if unseen.
    pub fn request_count(&self, method: &str, endpoint: &str, status_text: &str) -> u64 {
        self.requests.get([method, endpoint, status_text])
    }

    /// Number of duration observations for a tuple; 0 if unseen.
    pub fn duration_count(&self, method: &str, endpoint: &str) -> u64 {
        self.duration
            .snapshot([method, endpoint])
            .map(|s| s.count)
            .unwrap_or(0)
    }
}
