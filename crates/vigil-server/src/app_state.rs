//! Shared application state for the vigil server.
//!
//! Owns the metric registry for the lifetime of the process. Instruments are
//! registered here, once, before the router is built.

use std::sync::Arc;

use vigil_core::error::Result;
use vigil_core::{HttpMetrics, MetricRegistry};

use crate::config::VigilConfig;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    http: HttpMetrics,
}

struct AppStateInner {
    cfg: VigilConfig,
    registry: MetricRegistry,
}

impl AppState {
    /// Build application state.
    /// Returns Result so a duplicate registration aborts startup in `main`.
    pub fn new(cfg: VigilConfig) -> Result<Self> {
        let mut registry = MetricRegistry::new();
        let http = HttpMetrics::register(&mut registry)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, registry }),
            http,
        })
    }

    pub fn cfg(&self) -> &VigilConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.inner.registry
    }

    pub fn http_metrics(&self) -> &HttpMetrics {
        &self.http
    }
}
