//! vigil core: transport-agnostic metric instruments, registry and error types.
//!
//! This crate holds the counter/histogram vectors, the registry that renders
//! them in the Prometheus text exposition format, and the fixed pair of HTTP
//! instruments recorded by the server's instrumentation middleware. It carries
//! no HTTP or runtime dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Recording paths are
//! infallible; the only errors are registration-time configuration errors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metrics;

pub use error::{Result, VigilError};
pub use metrics::{HttpMetrics, MetricRegistry};
