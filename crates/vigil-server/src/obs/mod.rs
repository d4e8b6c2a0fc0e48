//! Request instrumentation.
//!
//! Handlers are decorated per route with a caller-chosen label; the metric
//! instruments themselves live in `vigil_core::metrics`.

pub mod instrument;

pub use instrument::{instrument_route, Instrumentation};
