//! Transparent timing and outcome recording around a route handler.
//!
//! Each wrapped invocation records exactly one `http_requests_total`
//! increment and one `http_request_duration_seconds` observation, labeled
//! with the request method and the route label given at wiring time (never
//! the raw request path). The response is returned untouched.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};
use futures_util::FutureExt;

use vigil_core::HttpMetrics;

/// Middleware state: where to record, and under which route label.
#[derive(Clone)]
pub struct Instrumentation {
    metrics: HttpMetrics,
    route: Arc<str>,
}

impl Instrumentation {
    pub fn new(metrics: HttpMetrics, route: impl Into<Arc<str>>) -> Self {
        Self {
            metrics,
            route: route.into(),
        }
    }
}

/// Decorate `method_router` so every call through it is timed and counted
/// under `route`.
///
/// Applied with `layer` rather than `route_layer`, so routers built from
/// `any(..)` are covered, and so is the method-not-allowed fallback.
pub fn instrument_route<S>(
    route: &str,
    metrics: &HttpMetrics,
    method_router: MethodRouter<S>,
) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let state = Instrumentation::new(metrics.clone(), route);
    method_router.layer(middleware::from_fn_with_state(state, track))
}

/// Status that labels the counter sample. Starts at 200 and is replaced by
/// whatever the inner handler produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CapturedStatus(StatusCode);

impl Default for CapturedStatus {
    fn default() -> Self {
        Self(StatusCode::OK)
    }
}

impl CapturedStatus {
    fn capture(&mut self, status: StatusCode) {
        self.0 = status;
    }

    /// Canonical reason phrase; empty for codes without one.
    fn text(self) -> &'static str {
        self.0.canonical_reason().unwrap_or("")
    }
}

/// Started at invocation, consumed once the inner handler has returned.
struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    fn observe_duration(self, metrics: &HttpMetrics, method: &str, route: &str) -> f64 {
        let secs = self.start.elapsed().as_secs_f64();
        metrics.record_duration(method, route, secs);
        secs
    }
}

async fn track(State(ins): State<Instrumentation>, req: Request, next: Next) -> Response {
    let timer = RequestTimer::start();
    let method = req.method().clone();
    let mut status = CapturedStatus::default();

    // A panic in the inner handler is recorded as a 500 and then resumed, so
    // whatever sits above this layer sees the same unwind it would without it.
    let outcome = AssertUnwindSafe(next.run(req)).catch_unwind().await;
    match &outcome {
        Ok(resp) => status.capture(resp.status()),
        Err(_) => status.capture(StatusCode::INTERNAL_SERVER_ERROR),
    }

    let secs = timer.observe_duration(&ins.metrics, method.as_str(), &ins.route);
    ins.metrics
        .record_request(method.as_str(), &ins.route, status.text());

    tracing::trace!(
        method = %method,
        endpoint = %ins.route,
        status = status.0.as_u16(),
        elapsed_secs = secs,
        "request recorded"
    );

    match outcome {
        Ok(resp) => resp,
        Err(payload) => {
            tracing::error!(method = %method, endpoint = %ins.route, "handler panicked");
            std::panic::resume_unwind(payload)
        }
    }
}
