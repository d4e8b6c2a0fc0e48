//! vigil server library entry.
//!
//! Wires liveness routes, the request instrumentation middleware and the
//! scrape endpoint into an axum router. Consumed by the binary (`main.rs`)
//! and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
