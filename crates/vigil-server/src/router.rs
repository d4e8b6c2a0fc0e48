//! Axum router wiring.
//!
//! Liveness routes answer any method. When `metrics.instrument_liveness` is
//! set they are wrapped with the instrumentation middleware under their own
//! path as route label. The scrape route itself is never instrumented.

use axum::{
    routing::{any, get, MethodRouter},
    Router,
};

use crate::{app_state::AppState, obs, ops};

pub const PING_PATH: &str = "/ping";
pub const HEALTHZ_PATH: &str = "/healthz";

pub fn build_router(state: AppState) -> Router {
    let metrics_path = state.cfg().metrics.path.clone();

    Router::new()
        .route(PING_PATH, liveness(&state, PING_PATH, any(ops::ping)))
        .route(HEALTHZ_PATH, liveness(&state, HEALTHZ_PATH, any(ops::healthz)))
        .route(&metrics_path, get(ops::metrics))
        .with_state(state)
}

fn liveness(
    state: &AppState,
    route: &str,
    method_router: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    if state.cfg().metrics.instrument_liveness {
        obs::instrument_route(route, state.http_metrics(), method_router)
    } else {
        method_router
    }
}
